use crate::core::{ObjectKind, Realm, Value, number_to_string, to_object};
use crate::error::JSError;
use crate::js_function::define_builtin_function;
use crate::raise_type_error;

fn object_prototype_to_string(realm: &Realm, this: &Value, _args: &[Value]) -> Result<Value, JSError> {
    let tag = match this {
        Value::Undefined => "Undefined".to_string(),
        Value::Null => "Null".to_string(),
        _ => to_object(realm, this)?.borrow().class_name(),
    };
    Ok(Value::from(format!("[object {tag}]")))
}

fn object_prototype_value_of(realm: &Realm, this: &Value, _args: &[Value]) -> Result<Value, JSError> {
    Ok(Value::Object(to_object(realm, this)?))
}

// `thisNumberValue` / `thisBooleanValue`: the primitive itself or the one inside a wrapper.
fn this_primitive_value(this: &Value, type_name: &str) -> Result<Value, JSError> {
    let unwrapped = match this {
        Value::Object(obj) => match &obj.borrow().kind {
            ObjectKind::PrimitiveWrapper(v) => v.clone(),
            _ => this.clone(),
        },
        _ => this.clone(),
    };
    let matches = matches!(
        (type_name, &unwrapped),
        ("Number", Value::Number(_)) | ("Boolean", Value::Boolean(_)) | ("String", Value::String(_))
    );
    if matches {
        Ok(unwrapped)
    } else {
        Err(raise_type_error!("{}.prototype.valueOf requires that 'this' be a {}", type_name, type_name))
    }
}

pub(crate) fn this_string_value(this: &Value) -> Result<Value, JSError> {
    this_primitive_value(this, "String")
}

fn number_prototype_value_of(_realm: &Realm, this: &Value, _args: &[Value]) -> Result<Value, JSError> {
    this_primitive_value(this, "Number")
}

fn number_prototype_to_string(_realm: &Realm, this: &Value, _args: &[Value]) -> Result<Value, JSError> {
    match this_primitive_value(this, "Number")? {
        Value::Number(n) => Ok(Value::from(number_to_string(n))),
        other => Ok(other),
    }
}

fn boolean_prototype_value_of(_realm: &Realm, this: &Value, _args: &[Value]) -> Result<Value, JSError> {
    this_primitive_value(this, "Boolean")
}

fn boolean_prototype_to_string(_realm: &Realm, this: &Value, _args: &[Value]) -> Result<Value, JSError> {
    let b = this_primitive_value(this, "Boolean")?;
    Ok(Value::from(b.to_string()))
}

pub(crate) fn initialize_object_prototype(realm: &Realm) {
    let proto = &realm.object_prototype;
    define_builtin_function(realm, proto, "toString", 0, object_prototype_to_string);
    define_builtin_function(realm, proto, "valueOf", 0, object_prototype_value_of);

    let number = &realm.number_prototype;
    define_builtin_function(realm, number, "valueOf", 0, number_prototype_value_of);
    define_builtin_function(realm, number, "toString", 0, number_prototype_to_string);

    let boolean = &realm.boolean_prototype;
    define_builtin_function(realm, boolean, "valueOf", 0, boolean_prototype_value_of);
    define_builtin_function(realm, boolean, "toString", 0, boolean_prototype_to_string);
}
