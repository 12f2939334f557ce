//! Host collections exposed to script code as objects.
//!
//! A host list reads like an array: indices map onto list positions and `length` is its size.
//! Writes past the end grow the list, padding with `null`. A host map answers only for keys it
//! contains; an index lookup is a lookup of the index's decimal string.

use crate::core::Value;
use crate::error::JSError;
use indexmap::IndexMap;
use std::cell::RefCell;

/// Backing store for an [`ObjectKind::Host`](crate::ObjectKind::Host) object.
///
/// Lookups return `Ok(None)` when the host has nothing under that key; the object's own
/// property map and prototype chain are consulted next.
pub trait HostObject {
    fn class_name(&self) -> &str;

    fn get_index(&self, index: u32) -> Result<Option<Value>, JSError>;

    fn get_named(&self, _name: &str) -> Result<Option<Value>, JSError> {
        Ok(None)
    }

    /// Value of the `length` property, if the host defines one.
    fn length(&self) -> Option<usize> {
        None
    }

    /// Store under an index. Returns false if the host does not take the write.
    fn set_index(&self, _index: u32, _value: Value) -> Result<bool, JSError> {
        Ok(false)
    }
}

#[derive(Default)]
pub struct HostList {
    items: RefCell<Vec<Value>>,
}

impl HostList {
    pub fn new(items: Vec<Value>) -> Self {
        HostList { items: RefCell::new(items) }
    }

    pub fn push(&self, value: Value) {
        self.items.borrow_mut().push(value);
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }
}

impl HostObject for HostList {
    fn class_name(&self) -> &str {
        "HostList"
    }

    fn get_index(&self, index: u32) -> Result<Option<Value>, JSError> {
        Ok(self.items.borrow().get(index as usize).cloned())
    }

    fn length(&self) -> Option<usize> {
        Some(self.len())
    }

    fn set_index(&self, index: u32, value: Value) -> Result<bool, JSError> {
        let mut items = self.items.borrow_mut();
        let index = index as usize;
        if index >= items.len() {
            items.resize(index + 1, Value::Null);
        }
        items[index] = value;
        Ok(true)
    }
}

#[derive(Default)]
pub struct HostMap {
    entries: RefCell<IndexMap<String, Value>>,
}

impl HostMap {
    pub fn new<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        HostMap {
            entries: RefCell::new(entries.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.entries.borrow_mut().insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl HostObject for HostMap {
    fn class_name(&self) -> &str {
        "HostMap"
    }

    fn get_index(&self, index: u32) -> Result<Option<Value>, JSError> {
        Ok(self.get(&index.to_string()))
    }

    fn get_named(&self, name: &str) -> Result<Option<Value>, JSError> {
        Ok(self.get(name))
    }

    fn set_index(&self, index: u32, value: Value) -> Result<bool, JSError> {
        self.insert(index.to_string(), value);
        Ok(true)
    }
}
