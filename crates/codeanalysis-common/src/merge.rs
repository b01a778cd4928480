//! Adding properties to loosely shaped JSON documents

use tracing::debug;

use crate::error::{Error, ErrorKind, Result};
use crate::value::{Array, Object, Value};

/// Adds `name: value` to `target` and returns the merged value.
///
/// An absent or null target starts out as an empty object. When the target is
/// an array, the first object in it that already holds a truthy `name` is
/// merged into instead; if there is none, `{name: value}` is appended.
///
/// When the property already exists:
/// - an array gets `value` appended,
/// - a scalar is replaced by `[existing, value]`,
/// - an object is a [`ErrorKind::PropertyConflict`].
pub fn add_prop(target: Option<Value>, name: &str, value: impl Into<Value>) -> Result<Value> {
    debug!("Adding property to JSON: {name}");
    let mut target = match target {
        None | Some(Value::Null) => Value::Object(Object::new()),
        Some(target) => target,
    };
    merge_into(&mut target, name, value.into())?;
    Ok(target)
}

fn merge_into(target: &mut Value, name: &str, value: Value) -> Result<()> {
    match target {
        Value::Object(obj) => merge_into_object(obj, name, value),
        Value::Array(items) => {
            let holder = items.iter_mut().find_map(|item| match item {
                Value::Object(obj) if obj.get(name).is_some_and(Value::is_truthy) => Some(obj),
                _ => None,
            });
            if let Some(obj) = holder {
                return merge_into_object(obj, name, value);
            }

            let mut entry = Object::new();
            entry.insert(name, value);
            items.push(entry);
            Ok(())
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            Err(Error::new(ErrorKind::NotAContainer))
        }
    }
}

fn merge_into_object(obj: &mut Object, name: &str, value: Value) -> Result<()> {
    match obj.get_mut(name) {
        None => {
            obj.insert(name, value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(Value::Object(_)) => {
            return Err(Error::new(ErrorKind::PropertyConflict {
                name: name.to_string(),
            }));
        }
        Some(existing) => {
            let first = std::mem::take(existing);
            *existing = Value::Array(Array::from(vec![first, value]));
        }
    }
    Ok(())
}
