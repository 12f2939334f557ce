use crate::core::{Realm, Value, to_integer_or_infinity, to_number, to_string};
use crate::error::JSError;
use crate::js_function::define_builtin_function;
use crate::js_object::this_string_value;
use crate::raise_type_error;

/// `String(value)` called as a function.
pub(crate) fn string_constructor(realm: &Realm, _this: &Value, args: &[Value]) -> Result<Value, JSError> {
    match args.first() {
        None => Ok(Value::String(Vec::new())),
        Some(v) => Ok(Value::String(to_string(realm, v)?)),
    }
}

fn string_prototype_to_string(_realm: &Realm, this: &Value, _args: &[Value]) -> Result<Value, JSError> {
    this_string_value(this)
}

fn string_prototype_char_at(realm: &Realm, this: &Value, args: &[Value]) -> Result<Value, JSError> {
    if this.is_null_or_undefined() {
        return Err(raise_type_error!("String.prototype.charAt called on null or undefined"));
    }
    let s = to_string(realm, this)?;
    let pos = to_integer_or_infinity(to_number(realm, args.first().unwrap_or(&Value::Undefined))?);
    if pos < 0.0 || pos >= s.len() as f64 {
        return Ok(Value::String(Vec::new()));
    }
    Ok(Value::String(vec![s[pos as usize]]))
}

pub(crate) fn initialize_string_prototype(realm: &Realm) {
    let proto = &realm.string_prototype;
    define_builtin_function(realm, proto, "toString", 0, string_prototype_to_string);
    define_builtin_function(realm, proto, "valueOf", 0, string_prototype_to_string);
    define_builtin_function(realm, proto, "charAt", 1, string_prototype_char_at);
}
