use crate::core::Value;

/// An own property as stored on an object.
#[derive(Clone, Debug)]
pub enum PropertyDescriptor {
    Data { value: Value, writable: bool },
    Accessor { getter: Option<Value>, setter: Option<Value> },
}

impl PropertyDescriptor {
    pub fn data(value: Value) -> Self {
        PropertyDescriptor::Data { value, writable: true }
    }

    pub fn read_only(value: Value) -> Self {
        PropertyDescriptor::Data { value, writable: false }
    }

    pub fn accessor(getter: Option<Value>, setter: Option<Value>) -> Self {
        PropertyDescriptor::Accessor { getter, setter }
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self, PropertyDescriptor::Accessor { .. })
    }
}
