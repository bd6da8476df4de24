//! Field-level helpers over schemars output.
//!
//! - [`prune_unknown`] walks a value alongside its schema and removes every
//!   object key the schema does not declare, returning the dotted paths it
//!   removed. Objects whose schema declares no properties (free-form maps)
//!   are left alone.
//! - [`to_violation`] turns a `jsonschema` error into a [`Violation`] that
//!   names the offending field the same way `Validate` does.

use std::collections::BTreeMap;

use jsonschema::ValidationError;
use jsonschema::error::ValidationErrorKind;
use journey_core::validation::{Rule, Violation};
use serde_json::Value;

/// Field name used for violations about the document as a whole.
pub const ROOT_FIELD: &str = "$";

/// Remove keys not declared by `schema` from `value`, recursively.
///
/// `schema` must be a root schema: `$ref`s are resolved against it.
pub fn prune_unknown(schema: &Value, value: &mut Value) -> Vec<String> {
    let mut removed = Vec::new();
    prune(schema, schema, value, "", &mut removed);
    removed
}

fn prune(root: &Value, schema: &Value, value: &mut Value, path: &str, removed: &mut Vec<String>) {
    let schema = resolve(root, schema);
    match value {
        Value::Object(map) => {
            let mut known = BTreeMap::new();
            collect_properties(root, schema, &mut known);
            if known.is_empty() {
                return;
            }
            let unknown: Vec<String> = map
                .keys()
                .filter(|key| !known.contains_key(key.as_str()))
                .cloned()
                .collect();
            for key in unknown {
                map.remove(&key);
                removed.push(join(path, &key));
            }
            for (key, child) in map.iter_mut() {
                if let Some(child_schema) = known.get(key.as_str()) {
                    prune(root, child_schema, child, &join(path, key), removed);
                }
            }
        }
        Value::Array(items) => {
            if let Some(item_schema) = items_schema(root, schema) {
                for (i, item) in items.iter_mut().enumerate() {
                    prune(root, item_schema, item, &format!("{path}[{i}]"), removed);
                }
            }
        }
        _ => {}
    }
}

/// Follow `$ref` chains of the form `#/...` within `root`.
fn resolve<'a>(root: &'a Value, mut schema: &'a Value) -> &'a Value {
    while let Some(target) = schema
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|r| r.strip_prefix('#'))
        .and_then(|pointer| root.pointer(pointer))
    {
        schema = target;
    }
    schema
}

/// Gather declared properties, looking through `allOf`/`anyOf`/`oneOf`
/// branches (flattened structs and `Option<Struct>` end up there).
fn collect_properties<'a>(root: &'a Value, schema: &'a Value, known: &mut BTreeMap<&'a str, &'a Value>) {
    let schema = resolve(root, schema);
    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (name, property) in properties {
            known.insert(name.as_str(), property);
        }
    }
    for combinator in ["allOf", "anyOf", "oneOf"] {
        if let Some(branches) = schema.get(combinator).and_then(Value::as_array) {
            for branch in branches {
                collect_properties(root, branch, known);
            }
        }
    }
}

fn items_schema<'a>(root: &'a Value, schema: &'a Value) -> Option<&'a Value> {
    let schema = resolve(root, schema);
    if let Some(items) = schema.get("items") {
        return Some(items);
    }
    ["anyOf", "oneOf"]
        .into_iter()
        .filter_map(|combinator| schema.get(combinator).and_then(Value::as_array))
        .flatten()
        .find_map(|branch| items_schema(root, branch))
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

/// Convert a JSON pointer (`/nodes/0/id`) to a field path (`nodes[0].id`).
#[must_use]
pub fn pointer_to_field(pointer: &str) -> String {
    let mut field = String::new();
    for segment in pointer.split('/').skip(1) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            field.push('[');
            field.push_str(&segment);
            field.push(']');
        } else {
            if !field.is_empty() {
                field.push('.');
            }
            field.push_str(&segment);
        }
    }
    if field.is_empty() {
        ROOT_FIELD.to_string()
    } else {
        field
    }
}

/// Map a schema validation error to a violation naming the field.
#[must_use]
pub fn to_violation(error: &ValidationError<'_>) -> Violation {
    let location = pointer_to_field(&error.instance_path.to_string());
    let detail = error.to_string();
    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = property.as_str().map_or_else(|| property.to_string(), str::to_string);
            let field = if location == ROOT_FIELD {
                name
            } else {
                format!("{location}.{name}")
            };
            Violation::new(field, Rule::Required, "is required")
        }
        ValidationErrorKind::Format { .. } => Violation::new(location, Rule::InvalidFormat, detail),
        ValidationErrorKind::Minimum { .. }
        | ValidationErrorKind::Maximum { .. }
        | ValidationErrorKind::ExclusiveMinimum { .. }
        | ValidationErrorKind::ExclusiveMaximum { .. } => {
            Violation::new(location, Rule::OutOfRange, detail)
        }
        _ => Violation::new(location, Rule::InvalidType, detail),
    }
}
