use crate::core::{PropertyDescriptor, PropertyKey, Realm, Value};
use crate::error::JSError;
use crate::raise_syntax_error;

/// Build a script value from parsed JSON. Arrays become dense arrays and objects become ordinary
/// objects with their keys in document order.
pub fn value_from_json(realm: &Realm, json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::from(s.as_str()),
        serde_json::Value::Array(items) => {
            let values = items.iter().map(|item| value_from_json(realm, item)).collect();
            Value::Object(realm.new_array(values))
        }
        serde_json::Value::Object(map) => {
            let obj = realm.new_object();
            for (k, v) in map {
                let value = value_from_json(realm, v);
                obj.borrow_mut().insert(PropertyKey::from(k), PropertyDescriptor::data(value));
            }
            Value::Object(obj)
        }
    }
}

/// `JSON.parse` without a reviver.
pub fn parse_json(realm: &Realm, text: &str) -> Result<Value, JSError> {
    let json: serde_json::Value = serde_json::from_str(text).map_err(|e| raise_syntax_error!(format!("JSON.parse: {e}")))?;
    Ok(value_from_json(realm, &json))
}
