//! Indexed, length-bearing view over any receiver.
//!
//! Array builtins are written against [`ArrayLike`] so they run unchanged over native arrays,
//! string wrappers, host objects and plain `{0: .., length: ..}` objects. Every `element` call
//! is a fresh lookup: nothing is prefetched or cached, which keeps getter and host side effects
//! interleaved with whatever the caller does between reads.

use crate::core::{JSObjectDataPtr, PropertyKey, Realm, Value, descriptor_value, get_own_property, length_of_array_like};
use crate::error::JSError;
use num_traits::ToPrimitive;

/// Result of reading one index.
#[derive(Clone, Debug, PartialEq)]
pub enum Slot {
    Present(Value),
    /// No own or inherited property at this index.
    Absent,
}

impl Slot {
    pub fn is_present(&self) -> bool {
        matches!(self, Slot::Present(_))
    }

    /// Collapse to the value a script sees; absent slots read as `undefined`.
    pub fn into_value(self) -> Value {
        match self {
            Slot::Present(v) => v,
            Slot::Absent => Value::Undefined,
        }
    }
}

pub trait ArrayLike {
    /// Number of indices to visit, derived from `length`.
    fn length(&self, realm: &Realm) -> Result<u64, JSError>;

    /// Read index `index`, walking the prototype chain and running getters at the moment of access.
    fn element(&self, realm: &Realm, index: u64) -> Result<Slot, JSError>;

    /// The receiver as passed back to callbacks.
    fn receiver(&self) -> Value;
}

/// Walk from `start` up the prototype chain; getters run with `receiver` as `this`.
pub fn lookup_element(realm: &Realm, start: Option<JSObjectDataPtr>, key: &PropertyKey, receiver: &Value) -> Result<Slot, JSError> {
    let mut current = start;
    while let Some(obj) = current {
        if let Some(desc) = get_own_property(&obj, key)? {
            log::trace!("lookup_element: key={key} found accessor={}", desc.is_accessor());
            return descriptor_value(realm, desc, receiver).map(Slot::Present);
        }
        current = obj.borrow().prototype.clone();
    }
    Ok(Slot::Absent)
}

/// Array exotic object: reads its element storage directly and only walks the prototype chain
/// for holes.
pub struct NativeArray<'a> {
    object: &'a JSObjectDataPtr,
}

impl<'a> NativeArray<'a> {
    pub fn new(object: &'a JSObjectDataPtr) -> Self {
        NativeArray { object }
    }
}

impl ArrayLike for NativeArray<'_> {
    fn length(&self, _realm: &Realm) -> Result<u64, JSError> {
        Ok(self.object.borrow().array_elements().map(|e| u64::from(e.len())).unwrap_or(0))
    }

    fn element(&self, realm: &Realm, index: u64) -> Result<Slot, JSError> {
        let receiver = self.receiver();
        let key = PropertyKey::index(index);
        let prototype = {
            let data = self.object.borrow();
            if let Some(v) = index.to_u32().and_then(|i| data.array_elements().and_then(|e| e.get(i))) {
                return Ok(Slot::Present(v.clone()));
            }
            // A hole may still carry an own accessor installed with `define_accessor`.
            if let Some(desc) = data.properties.get(&key).cloned() {
                drop(data);
                return descriptor_value(realm, desc, &receiver).map(Slot::Present);
            }
            data.prototype.clone()
        };
        lookup_element(realm, prototype, &key, &receiver)
    }

    fn receiver(&self) -> Value {
        Value::Object(self.object.clone())
    }
}

/// Any other object: `length` and indices go through generic property lookup.
pub struct GenericObject<'a> {
    object: &'a JSObjectDataPtr,
}

impl<'a> GenericObject<'a> {
    pub fn new(object: &'a JSObjectDataPtr) -> Self {
        GenericObject { object }
    }
}

impl ArrayLike for GenericObject<'_> {
    fn length(&self, realm: &Realm) -> Result<u64, JSError> {
        length_of_array_like(realm, self.object)
    }

    fn element(&self, realm: &Realm, index: u64) -> Result<Slot, JSError> {
        lookup_element(realm, Some(self.object.clone()), &PropertyKey::index(index), &self.receiver())
    }

    fn receiver(&self) -> Value {
        Value::Object(self.object.clone())
    }
}

/// Picks the accessor for a receiver object.
pub enum Receiver<'a> {
    Array(NativeArray<'a>),
    Generic(GenericObject<'a>),
}

impl<'a> Receiver<'a> {
    pub fn new(object: &'a JSObjectDataPtr) -> Self {
        if object.borrow().is_array() {
            Receiver::Array(NativeArray::new(object))
        } else {
            Receiver::Generic(GenericObject::new(object))
        }
    }
}

impl ArrayLike for Receiver<'_> {
    fn length(&self, realm: &Realm) -> Result<u64, JSError> {
        match self {
            Receiver::Array(a) => a.length(realm),
            Receiver::Generic(g) => g.length(realm),
        }
    }

    fn element(&self, realm: &Realm, index: u64) -> Result<Slot, JSError> {
        match self {
            Receiver::Array(a) => a.element(realm, index),
            Receiver::Generic(g) => g.element(realm, index),
        }
    }

    fn receiver(&self) -> Value {
        match self {
            Receiver::Array(a) => a.receiver(),
            Receiver::Generic(g) => g.receiver(),
        }
    }
}
