use crate::core::{
    ArrayLike, JSObjectDataPtr, MAX_SAFE_INTEGER, ObjectKind, PropertyKey, Realm, Receiver, Value, length_of_array_like, new_js_object_data,
    put, to_boolean, to_number, to_object, to_uint32,
};
use crate::error::{JSError, JSErrorKind};
use crate::js_function::{call_function_with_this, define_builtin_function, is_callable};
use crate::{make_js_error, raise_range_error, raise_type_error};
use std::collections::BTreeMap;

// Writes further than this past the current end switch the storage to sparse.
const MAX_DENSE_GAP: u32 = 1024;

/// Element storage of an array exotic object. Holes are `None` in dense storage and missing keys
/// in sparse storage.
#[derive(Clone, Debug)]
pub enum ArrayElements {
    Dense(Vec<Option<Value>>),
    Sparse { elements: BTreeMap<u32, Value>, length: u32 },
}

impl Default for ArrayElements {
    fn default() -> Self {
        ArrayElements::Dense(Vec::new())
    }
}

impl ArrayElements {
    pub fn from_values(values: Vec<Value>) -> Self {
        ArrayElements::Dense(values.into_iter().map(Some).collect())
    }

    /// `new Array(len)`: all holes.
    pub fn with_length(len: u32) -> Self {
        if len <= MAX_DENSE_GAP {
            ArrayElements::Dense(vec![None; len as usize])
        } else {
            ArrayElements::Sparse {
                elements: BTreeMap::new(),
                length: len,
            }
        }
    }

    pub fn len(&self) -> u32 {
        match self {
            ArrayElements::Dense(v) => v.len() as u32,
            ArrayElements::Sparse { length, .. } => *length,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, ArrayElements::Sparse { .. })
    }

    pub fn get(&self, index: u32) -> Option<&Value> {
        match self {
            ArrayElements::Dense(v) => v.get(index as usize).and_then(Option::as_ref),
            ArrayElements::Sparse { elements, .. } => elements.get(&index),
        }
    }

    /// Store `value` at `index`, growing `length` to `index + 1` if needed.
    pub fn set(&mut self, index: u32, value: Value) {
        if let ArrayElements::Dense(v) = self {
            let len = v.len() as u32;
            if index < len {
                v[index as usize] = Some(value);
                return;
            }
            if index - len <= MAX_DENSE_GAP {
                v.resize(index as usize, None);
                v.push(Some(value));
                return;
            }
            self.make_sparse();
        }
        if let ArrayElements::Sparse { elements, length } = self {
            elements.insert(index, value);
            if index >= *length {
                *length = index + 1;
            }
        }
    }

    /// Turn `index` into a hole; `length` is unchanged.
    pub fn remove(&mut self, index: u32) {
        match self {
            ArrayElements::Dense(v) => {
                if let Some(slot) = v.get_mut(index as usize) {
                    *slot = None;
                }
            }
            ArrayElements::Sparse { elements, .. } => {
                elements.remove(&index);
            }
        }
    }

    pub fn set_len(&mut self, new_len: u32) {
        if let ArrayElements::Dense(v) = self {
            let len = v.len() as u32;
            if new_len <= len || new_len - len <= MAX_DENSE_GAP {
                v.resize(new_len as usize, None);
                return;
            }
            self.make_sparse();
        }
        if let ArrayElements::Sparse { elements, length } = self {
            if new_len < *length {
                elements.split_off(&new_len);
            }
            *length = new_len;
        }
    }

    fn make_sparse(&mut self) {
        if let ArrayElements::Dense(v) = self {
            let length = v.len() as u32;
            let elements = std::mem::take(v)
                .into_iter()
                .enumerate()
                .filter_map(|(i, slot)| slot.map(|value| (i as u32, value)))
                .collect();
            log::debug!("array storage switched to sparse at length {length}");
            *self = ArrayElements::Sparse { elements, length };
        }
    }
}

pub(crate) fn create_array(realm: &Realm, values: Vec<Value>) -> JSObjectDataPtr {
    new_js_object_data(Some(realm.array_prototype.clone()), ObjectKind::Array(ArrayElements::from_values(values)))
}

pub(crate) fn create_array_with_length(realm: &Realm, len: u32) -> JSObjectDataPtr {
    new_js_object_data(Some(realm.array_prototype.clone()), ObjectKind::Array(ArrayElements::with_length(len)))
}

/// Check if an object is an Array
pub fn is_array(obj: &JSObjectDataPtr) -> bool {
    obj.borrow().is_array()
}

pub fn get_array_length(obj: &JSObjectDataPtr) -> Option<u32> {
    obj.borrow().array_elements().map(ArrayElements::len)
}

/// `ArraySetLength`: the new length must be a valid uint32.
pub(crate) fn set_array_length(realm: &Realm, obj: &JSObjectDataPtr, value: &Value) -> Result<(), JSError> {
    let number = to_number(realm, value)?;
    let new_len = to_uint32(number);
    if f64::from(new_len) != number {
        return Err(raise_range_error!("Invalid array length"));
    }
    let mut data = obj.borrow_mut();
    if let Some(elements) = data.array_elements_mut() {
        elements.set_len(new_len);
    }
    // Accessors on indices live outside element storage and are cut off too.
    data.properties.retain(|key, _| !matches!(key, PropertyKey::Index(i) if *i >= new_len));
    Ok(())
}

const FIND_LAST_INDEX: &str = "Array.prototype.findLastIndex";

/// `Array.prototype.findLastIndex(predicate, thisArg)` with an explicit receiver.
///
/// Visits indices `length - 1` down to `0` and returns the first one whose predicate call is
/// truthy, or `-1`. `length` is read once up front; each element is read right before its
/// predicate call, so writes made by earlier calls are seen by later ones while the visited range
/// stays fixed. Absent slots are visited too and read as `undefined`.
///
/// Errors from reading `length`, reading an element or calling the predicate are returned as-is.
pub fn find_last_index(realm: &Realm, receiver: &Value, predicate: &Value, this_arg: Option<&Value>) -> Result<i64, JSError> {
    if receiver.is_null_or_undefined() {
        return Err(make_js_error!(JSErrorKind::NullOrUndefinedReceiver {
            method: FIND_LAST_INDEX.to_string()
        }));
    }
    // Must fail before `length` is touched, even for empty receivers.
    if !is_callable(predicate) {
        return Err(make_js_error!(JSErrorKind::InvalidPredicate {
            method: FIND_LAST_INDEX.to_string(),
            found: predicate.to_string(),
        }));
    }

    let object = to_object(realm, receiver)?;
    let this_arg = this_arg.cloned().unwrap_or(Value::Undefined);
    let target = Receiver::new(&object);
    let len = target.length(realm)?;
    log::debug!("{FIND_LAST_INDEX}: len={len} receiver={}", target.receiver());

    let receiver = target.receiver();
    for k in (0..len).rev() {
        let slot = target.element(realm, k)?;
        log::trace!("{FIND_LAST_INDEX}: k={k} present={} slot={slot:?}", slot.is_present());
        let value = slot.into_value();
        let args = [value, Value::Number(k as f64), receiver.clone()];
        let verdict = call_function_with_this(realm, predicate, &this_arg, &args)?;
        if to_boolean(&verdict) {
            log::debug!("{FIND_LAST_INDEX}: found at {k}");
            return Ok(k as i64);
        }
    }
    Ok(-1)
}

/// Same as [`find_last_index`] with the arguments taken from a list, the way a script call site
/// passes them: missing arguments are `undefined`, extra ones are ignored.
pub fn find_last_index_with_args(realm: &Realm, receiver: &Value, args: &[Value]) -> Result<i64, JSError> {
    let predicate = args.first().cloned().unwrap_or(Value::Undefined);
    find_last_index(realm, receiver, &predicate, args.get(1))
}

fn array_prototype_find_last_index(realm: &Realm, this: &Value, args: &[Value]) -> Result<Value, JSError> {
    let index = find_last_index_with_args(realm, this, args)?;
    Ok(Value::Number(index as f64))
}

// Generic `push`: works on any object with a `length`.
fn array_prototype_push(realm: &Realm, this: &Value, args: &[Value]) -> Result<Value, JSError> {
    let obj = to_object(realm, this)?;
    let len = length_of_array_like(realm, &obj)?;
    let count = args.len() as u64;
    if len + count > MAX_SAFE_INTEGER {
        return Err(raise_type_error!("Pushing {} elements on an array-like of length {} is disallowed", count, len));
    }
    for (i, arg) in args.iter().enumerate() {
        put(realm, &obj, &PropertyKey::index(len + i as u64), arg.clone())?;
    }
    let new_len = Value::Number((len + count) as f64);
    put(realm, &obj, &"length".into(), new_len.clone())?;
    Ok(new_len)
}

pub(crate) fn initialize_array_prototype(realm: &Realm) {
    let proto = &realm.array_prototype;
    define_builtin_function(realm, proto, "findLastIndex", 1, array_prototype_find_last_index);
    define_builtin_function(realm, proto, "push", 1, array_prototype_push);
}
