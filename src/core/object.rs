//! Property access on the object model: own-property lookup, prototype-chain walks, getters and
//! setters, and the conversions that need them.
//!
//! No `RefCell` borrow is held while script code (a getter, a setter, `valueOf`) runs, so that
//! code may freely mutate the objects being inspected.

use crate::core::{JSObjectDataPtr, ObjectKind, PropertyDescriptor, PropertyKey, Realm, Value, new_js_object_data, to_length, to_number};
use crate::error::JSError;
use crate::js_array::set_array_length;
use crate::js_function::{call_function_with_this, is_callable};
use crate::raise_type_error;
use crate::unicode::{utf8_to_utf16, utf16_char_at};
use std::rc::Rc;

// How an object answers own-property queries before its ordinary property map is consulted.
enum OwnLookup {
    Found(Option<PropertyDescriptor>),
    Host(Rc<dyn crate::js_host::HostObject>),
    Ordinary,
}

/// `[[GetOwnProperty]]`.
pub fn get_own_property(obj: &JSObjectDataPtr, key: &PropertyKey) -> Result<Option<PropertyDescriptor>, JSError> {
    let lookup = {
        let data = obj.borrow();
        match (&data.kind, key) {
            (ObjectKind::Array(elements), PropertyKey::Index(i)) => OwnLookup::Found(elements.get(*i).cloned().map(PropertyDescriptor::data)),
            (ObjectKind::Array(elements), PropertyKey::String(s)) if s == "length" => {
                OwnLookup::Found(Some(PropertyDescriptor::data(Value::from(elements.len()))))
            }
            (ObjectKind::PrimitiveWrapper(Value::String(s)), PropertyKey::Index(i)) => match utf16_char_at(s, *i as usize) {
                Some(unit) => OwnLookup::Found(Some(PropertyDescriptor::read_only(Value::String(vec![unit])))),
                None => OwnLookup::Ordinary,
            },
            (ObjectKind::PrimitiveWrapper(Value::String(s)), PropertyKey::String(name)) if name == "length" => {
                OwnLookup::Found(Some(PropertyDescriptor::read_only(Value::Number(s.len() as f64))))
            }
            (ObjectKind::Host(h), _) => OwnLookup::Host(h.clone()),
            _ => OwnLookup::Ordinary,
        }
    };

    match lookup {
        OwnLookup::Found(Some(desc)) => return Ok(Some(desc)),
        OwnLookup::Found(None) => {}
        OwnLookup::Host(host) => {
            let found = match key {
                PropertyKey::Index(i) => host.get_index(*i)?,
                PropertyKey::String(name) if name == "length" => match host.length() {
                    Some(len) => Some(Value::Number(len as f64)),
                    None => host.get_named(name)?,
                },
                PropertyKey::String(name) => host.get_named(name)?,
            };
            if let Some(v) = found {
                return Ok(Some(PropertyDescriptor::data(v)));
            }
        }
        OwnLookup::Ordinary => {}
    }
    Ok(obj.borrow().properties.get(key).cloned())
}

/// Find `key` on `obj` or the first object of its prototype chain that has it.
pub fn find_property(obj: &JSObjectDataPtr, key: &PropertyKey) -> Result<Option<PropertyDescriptor>, JSError> {
    let mut current = Some(obj.clone());
    while let Some(o) = current {
        if let Some(desc) = get_own_property(&o, key)? {
            return Ok(Some(desc));
        }
        current = o.borrow().prototype.clone();
    }
    Ok(None)
}

/// `HasProperty`: own or inherited.
pub fn has_property(obj: &JSObjectDataPtr, key: &PropertyKey) -> Result<bool, JSError> {
    Ok(find_property(obj, key)?.is_some())
}

/// Resolve a descriptor to a value, invoking the getter with `receiver` as `this`.
pub fn descriptor_value(realm: &Realm, desc: PropertyDescriptor, receiver: &Value) -> Result<Value, JSError> {
    match desc {
        PropertyDescriptor::Data { value, .. } => Ok(value),
        PropertyDescriptor::Accessor { getter: Some(getter), .. } => call_function_with_this(realm, &getter, receiver, &[]),
        PropertyDescriptor::Accessor { getter: None, .. } => Ok(Value::Undefined),
    }
}

/// `[[Get]]` with an explicit receiver.
pub fn get_with_receiver(realm: &Realm, obj: &JSObjectDataPtr, key: &PropertyKey, receiver: &Value) -> Result<Value, JSError> {
    match find_property(obj, key)? {
        Some(desc) => descriptor_value(realm, desc, receiver),
        None => Ok(Value::Undefined),
    }
}

/// `Get(O, P)`.
pub fn get(realm: &Realm, obj: &JSObjectDataPtr, key: &PropertyKey) -> Result<Value, JSError> {
    get_with_receiver(realm, obj, key, &Value::Object(obj.clone()))
}

/// `GetV(V, P)`: property read on any value; primitives read through their wrapper prototype.
pub fn get_value(realm: &Realm, value: &Value, key: &PropertyKey) -> Result<Value, JSError> {
    match value {
        Value::Object(obj) => get(realm, obj, key),
        _ => {
            let obj = to_object(realm, value)?;
            get_with_receiver(realm, &obj, key, value)
        }
    }
}

/// `CreateDataProperty`: define or overwrite an own data property.
pub fn create_data_property(realm: &Realm, obj: &JSObjectDataPtr, key: &PropertyKey, value: Value) -> Result<bool, JSError> {
    enum Target {
        Array,
        FrozenString(usize),
        Host(Rc<dyn crate::js_host::HostObject>),
        Plain,
    }

    let target = match &obj.borrow().kind {
        ObjectKind::Array(_) => Target::Array,
        ObjectKind::PrimitiveWrapper(Value::String(s)) => Target::FrozenString(s.len()),
        ObjectKind::Host(h) => Target::Host(h.clone()),
        _ => Target::Plain,
    };

    match target {
        Target::Array => match key {
            PropertyKey::Index(i) => {
                let mut data = obj.borrow_mut();
                // A data write replaces an accessor installed on the index.
                data.properties.shift_remove(key);
                if let Some(elements) = data.array_elements_mut() {
                    elements.set(*i, value);
                }
                return Ok(true);
            }
            PropertyKey::String(s) if s == "length" => {
                set_array_length(realm, obj, &value)?;
                return Ok(true);
            }
            PropertyKey::String(_) => {}
        },
        Target::FrozenString(len) => {
            let is_code_unit = matches!(key, PropertyKey::Index(i) if (*i as usize) < len);
            if is_code_unit || key.is_named("length") {
                return Ok(false);
            }
        }
        Target::Host(host) => {
            if let PropertyKey::Index(i) = key
                && host.set_index(*i, value.clone())?
            {
                return Ok(true);
            }
        }
        Target::Plain => {}
    }

    let mut data = obj.borrow_mut();
    if !data.extensible && !data.properties.contains_key(key) {
        return Ok(false);
    }
    data.insert(key.clone(), PropertyDescriptor::data(value));
    Ok(true)
}

/// `[[Set]]` with the object itself as receiver. Returns false where strict code would throw.
pub fn set(realm: &Realm, obj: &JSObjectDataPtr, key: &PropertyKey, value: Value) -> Result<bool, JSError> {
    match find_property(obj, key)? {
        Some(PropertyDescriptor::Data { writable: false, .. }) => Ok(false),
        Some(PropertyDescriptor::Accessor { setter: Some(setter), .. }) => {
            call_function_with_this(realm, &setter, &Value::Object(obj.clone()), &[value])?;
            Ok(true)
        }
        Some(PropertyDescriptor::Accessor { setter: None, .. }) => Ok(false),
        Some(PropertyDescriptor::Data { .. }) | None => create_data_property(realm, obj, key, value),
    }
}

/// `Set(O, P, V, true)`: like [`set`] but a refused write is a TypeError.
pub fn put(realm: &Realm, obj: &JSObjectDataPtr, key: &PropertyKey, value: Value) -> Result<(), JSError> {
    if set(realm, obj, key, value)? {
        Ok(())
    } else {
        Err(raise_type_error!("Cannot assign to read only property '{}'", key))
    }
}

/// Install an accessor property (`get 0() { ... }` in an object literal).
///
/// On an array the accessor replaces whatever element the index held, and an index at or past
/// `length` extends `length` the way any other index write does.
pub fn define_accessor(obj: &JSObjectDataPtr, key: &PropertyKey, getter: Option<Value>, setter: Option<Value>) {
    let mut data = obj.borrow_mut();
    if let PropertyKey::Index(i) = key
        && let Some(elements) = data.array_elements_mut()
    {
        elements.remove(*i);
        if *i >= elements.len() {
            elements.set_len(*i + 1);
        }
    }
    data.insert(key.clone(), PropertyDescriptor::accessor(getter, setter));
}

/// `[[Delete]]`.
pub fn delete_property(obj: &JSObjectDataPtr, key: &PropertyKey) -> bool {
    let mut guard = obj.borrow_mut();
    let data = &mut *guard;
    match (&mut data.kind, key) {
        (ObjectKind::Array(elements), PropertyKey::Index(i)) => {
            elements.remove(*i);
            data.properties.shift_remove(key);
            true
        }
        (ObjectKind::Array(_), PropertyKey::String(s)) if s == "length" => false,
        (ObjectKind::PrimitiveWrapper(Value::String(s)), PropertyKey::Index(i)) if (*i as usize) < s.len() => false,
        (ObjectKind::PrimitiveWrapper(Value::String(_)), PropertyKey::String(s)) if s == "length" => false,
        _ => {
            data.properties.shift_remove(key);
            true
        }
    }
}

/// `[[SetPrototypeOf]]`; refuses to create a cycle.
pub fn set_prototype_of(obj: &JSObjectDataPtr, proto: Option<JSObjectDataPtr>) -> bool {
    let mut p = proto.clone();
    while let Some(candidate) = p {
        if Rc::ptr_eq(&candidate, obj) {
            return false;
        }
        p = candidate.borrow().prototype.clone();
    }
    obj.borrow_mut().prototype = proto;
    true
}

/// `ToObject`.
pub fn to_object(realm: &Realm, value: &Value) -> Result<JSObjectDataPtr, JSError> {
    let prototype = match value {
        Value::Object(obj) => return Ok(obj.clone()),
        Value::Undefined | Value::Null => return Err(raise_type_error!("Cannot convert {} to object", value)),
        Value::String(_) => realm.string_prototype.clone(),
        Value::Number(_) => realm.number_prototype.clone(),
        Value::Boolean(_) => realm.boolean_prototype.clone(),
    };
    Ok(new_js_object_data(Some(prototype), ObjectKind::PrimitiveWrapper(value.clone())))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreferredType {
    Number,
    String,
}

/// `ToPrimitive` through `OrdinaryToPrimitive`.
pub fn to_primitive(realm: &Realm, value: &Value, hint: PreferredType) -> Result<Value, JSError> {
    let Value::Object(obj) = value else {
        return Ok(value.clone());
    };
    let order = match hint {
        PreferredType::Number => ["valueOf", "toString"],
        PreferredType::String => ["toString", "valueOf"],
    };
    for name in order {
        let method = get(realm, obj, &name.into())?;
        if is_callable(&method) {
            let result = call_function_with_this(realm, &method, value, &[])?;
            if !result.is_object() {
                return Ok(result);
            }
        }
    }
    Err(raise_type_error!("Cannot convert object to primitive value"))
}

/// `ToString`, as UTF-16.
pub fn to_string(realm: &Realm, value: &Value) -> Result<Vec<u16>, JSError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Object(_) => {
            let prim = to_primitive(realm, value, PreferredType::String)?;
            to_string(realm, &prim)
        }
        other => Ok(utf8_to_utf16(&other.to_string())),
    }
}

/// `LengthOfArrayLike`: `ToLength(? Get(obj, "length"))`.
pub fn length_of_array_like(realm: &Realm, obj: &JSObjectDataPtr) -> Result<u64, JSError> {
    let len = get(realm, obj, &"length".into())?;
    Ok(to_length(to_number(realm, &len)?))
}

/// `CreateListFromArrayLike`, as used by `Function.prototype.apply`.
pub fn create_list_from_array_like(realm: &Realm, value: &Value) -> Result<Vec<Value>, JSError> {
    let Value::Object(obj) = value else {
        return Err(raise_type_error!("CreateListFromArrayLike called on non-object {}", value));
    };
    let len = length_of_array_like(realm, obj)?;
    let mut list = Vec::new();
    for i in 0..len {
        list.push(get(realm, obj, &PropertyKey::index(i))?);
    }
    Ok(list)
}
