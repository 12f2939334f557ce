use crate::core::{PropertyDescriptor, PropertyKey, number_to_string};
use crate::js_array::ArrayElements;
use crate::js_function::Callable;
use crate::js_host::HostObject;
use crate::unicode::{utf8_to_utf16, utf16_to_utf8};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

pub type JSObjectDataPtr = Rc<RefCell<JSObjectData>>;

#[inline]
pub fn new_js_object_data(prototype: Option<JSObjectDataPtr>, kind: ObjectKind) -> JSObjectDataPtr {
    Rc::new(RefCell::new(JSObjectData::new(prototype, kind)))
}

/// What an object is beyond its ordinary property map.
#[derive(Clone)]
pub enum ObjectKind {
    Ordinary,
    /// Array exotic object; `length` and indexed elements live in the storage, not in `properties`.
    Array(ArrayElements),
    /// Result of `ToObject` on a primitive. String wrappers expose their code units as indices.
    PrimitiveWrapper(Value),
    Function(Callable),
    RegExp {
        source: String,
    },
    Host(Rc<dyn HostObject>),
}

#[derive(Clone)]
pub struct JSObjectData {
    pub properties: IndexMap<PropertyKey, PropertyDescriptor>,
    pub prototype: Option<JSObjectDataPtr>,
    pub kind: ObjectKind,
    // Whether new own properties can be added to this object. Default true.
    pub extensible: bool,
}

impl JSObjectData {
    pub fn new(prototype: Option<JSObjectDataPtr>, kind: ObjectKind) -> Self {
        JSObjectData {
            properties: IndexMap::new(),
            prototype,
            kind,
            extensible: true,
        }
    }

    pub fn insert(&mut self, key: PropertyKey, desc: PropertyDescriptor) {
        self.properties.insert(key, desc);
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, ObjectKind::Array(_))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, ObjectKind::Function(_))
    }

    pub fn callable(&self) -> Option<Callable> {
        match &self.kind {
            ObjectKind::Function(c) => Some(c.clone()),
            _ => None,
        }
    }

    pub fn array_elements(&self) -> Option<&ArrayElements> {
        match &self.kind {
            ObjectKind::Array(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn array_elements_mut(&mut self) -> Option<&mut ArrayElements> {
        match &mut self.kind {
            ObjectKind::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Built-in tag used by `Object.prototype.toString`.
    pub fn class_name(&self) -> String {
        match &self.kind {
            ObjectKind::Ordinary => "Object".to_string(),
            ObjectKind::Array(_) => "Array".to_string(),
            ObjectKind::PrimitiveWrapper(Value::String(_)) => "String".to_string(),
            ObjectKind::PrimitiveWrapper(Value::Number(_)) => "Number".to_string(),
            ObjectKind::PrimitiveWrapper(Value::Boolean(_)) => "Boolean".to_string(),
            ObjectKind::PrimitiveWrapper(_) => "Object".to_string(),
            ObjectKind::Function(_) => "Function".to_string(),
            ObjectKind::RegExp { .. } => "RegExp".to_string(),
            ObjectKind::Host(h) => h.class_name().to_string(),
        }
    }

    pub fn prevent_extensions(&mut self) {
        self.extensible = false;
    }
}

#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(Vec<u16>),
    Object(JSObjectDataPtr),
}

impl Value {
    pub fn is_null_or_undefined(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_object(&self) -> Option<&JSObjectDataPtr> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

/// JS `ToBoolean`.
pub fn to_boolean(val: &Value) -> bool {
    match val {
        Value::Undefined | Value::Null => false,
        Value::Boolean(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::String(s) => !s.is_empty(),
        Value::Object(_) => true,
    }
}

/// Strict equality (`===`): NaN is unequal to itself and objects compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(utf8_to_utf16(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(utf8_to_utf16(&s))
    }
}

impl From<JSObjectDataPtr> for Value {
    fn from(obj: JSObjectDataPtr) -> Self {
        Value::Object(obj)
    }
}

impl From<&JSObjectDataPtr> for Value {
    fn from(obj: &JSObjectDataPtr) -> Self {
        Value::Object(obj.clone())
    }
}

// Objects are described without running any script code and without following references,
// so cyclic structures print fine.
fn describe_object(obj: &JSObjectDataPtr) -> String {
    let Ok(data) = obj.try_borrow() else {
        return "[object]".to_string();
    };
    match &data.kind {
        ObjectKind::Function(c) => format!("function {}() {{ [native code] }}", c.name()),
        ObjectKind::RegExp { source } => format!("/{source}/"),
        _ => format!("[object {}]", data.class_name()),
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{}", number_to_string(*n)),
            Value::String(s) => write!(f, "{}", utf16_to_utf8(s)),
            Value::Object(obj) => write!(f, "{}", describe_object(obj)),
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => write!(f, "Boolean({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::String(s) => write!(f, "String({:?})", utf16_to_utf8(s)),
            Value::Object(obj) => write!(f, "Object({} @ {:p})", describe_object(obj), Rc::as_ptr(obj)),
        }
    }
}
