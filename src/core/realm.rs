use crate::core::{JSObjectDataPtr, ObjectKind, PropertyDescriptor, PropertyKey, Value, new_js_object_data};
use crate::error::JSError;
use crate::js_array::{ArrayElements, create_array, create_array_with_length};
use crate::js_function::{create_native_function, function_prototype_behaviour};
use crate::js_host::HostObject;
use std::rc::Rc;

/// The intrinsic objects every value is created against.
pub struct Realm {
    pub object_prototype: JSObjectDataPtr,
    pub function_prototype: JSObjectDataPtr,
    pub array_prototype: JSObjectDataPtr,
    pub string_prototype: JSObjectDataPtr,
    pub number_prototype: JSObjectDataPtr,
    pub boolean_prototype: JSObjectDataPtr,
    pub regexp_prototype: JSObjectDataPtr,
    /// The `String` function.
    pub string_constructor: JSObjectDataPtr,
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}

impl Realm {
    pub fn new() -> Self {
        let object_prototype = new_js_object_data(None, ObjectKind::Ordinary);
        let with_object_proto = |kind| new_js_object_data(Some(object_prototype.clone()), kind);

        let function_prototype = with_object_proto(ObjectKind::Function(function_prototype_behaviour()));
        // %Array.prototype% is itself an array, %String.prototype% a String wrapper of "", and so on.
        let array_prototype = with_object_proto(ObjectKind::Array(ArrayElements::default()));
        let string_prototype = with_object_proto(ObjectKind::PrimitiveWrapper(Value::String(Vec::new())));
        let number_prototype = with_object_proto(ObjectKind::PrimitiveWrapper(Value::Number(0.0)));
        let boolean_prototype = with_object_proto(ObjectKind::PrimitiveWrapper(Value::Boolean(false)));
        let regexp_prototype = with_object_proto(ObjectKind::Ordinary);
        // Replaced below, once Function.prototype exists to hang it from.
        let string_constructor = with_object_proto(ObjectKind::Ordinary);

        let mut realm = Realm {
            object_prototype,
            function_prototype,
            array_prototype,
            string_prototype,
            number_prototype,
            boolean_prototype,
            regexp_prototype,
            string_constructor,
        };
        realm.string_constructor = create_native_function(&realm, "String", 1, crate::js_string::string_constructor);

        crate::js_object::initialize_object_prototype(&realm);
        crate::js_function::initialize_function_prototype(&realm);
        crate::js_array::initialize_array_prototype(&realm);
        crate::js_string::initialize_string_prototype(&realm);

        link_constructor(&realm.string_constructor, &realm.string_prototype);
        log::debug!("realm initialized");
        realm
    }

    pub fn new_object(&self) -> JSObjectDataPtr {
        new_js_object_data(Some(self.object_prototype.clone()), ObjectKind::Ordinary)
    }

    /// Ordinary object whose properties are set from `entries` in order.
    pub fn new_object_from<K: Into<PropertyKey>>(&self, entries: impl IntoIterator<Item = (K, Value)>) -> JSObjectDataPtr {
        let obj = self.new_object();
        {
            let mut data = obj.borrow_mut();
            for (k, v) in entries {
                data.insert(k.into(), PropertyDescriptor::data(v));
            }
        }
        obj
    }

    /// Dense array holding `values`.
    pub fn new_array(&self, values: Vec<Value>) -> JSObjectDataPtr {
        create_array(self, values)
    }

    /// `new Array(len)`: `len` holes.
    pub fn new_array_with_length(&self, len: u32) -> JSObjectDataPtr {
        create_array_with_length(self, len)
    }

    /// Native function object. `length` is the arity reported to scripts.
    pub fn new_function<F>(&self, name: &str, length: u32, f: F) -> Value
    where
        F: Fn(&Realm, &Value, &[Value]) -> Result<Value, JSError> + 'static,
    {
        Value::Object(create_native_function(self, name, length, f))
    }

    /// Opaque regular-expression object. Only its identity and non-callability matter here.
    pub fn new_regexp(&self, source: &str) -> Value {
        Value::Object(new_js_object_data(
            Some(self.regexp_prototype.clone()),
            ObjectKind::RegExp { source: source.to_string() },
        ))
    }

    pub fn new_host_object(&self, host: Rc<dyn HostObject>) -> JSObjectDataPtr {
        new_js_object_data(Some(self.object_prototype.clone()), ObjectKind::Host(host))
    }

    /// `Array.prototype.findLastIndex`.
    pub fn array_find_last_index(&self) -> Value {
        self.intrinsic_method(&self.array_prototype, "findLastIndex")
    }

    /// `Array.prototype.push`.
    pub fn array_push(&self) -> Value {
        self.intrinsic_method(&self.array_prototype, "push")
    }

    fn intrinsic_method(&self, proto: &JSObjectDataPtr, name: &str) -> Value {
        match proto.borrow().properties.get(&PropertyKey::from(name)) {
            Some(PropertyDescriptor::Data { value, .. }) => value.clone(),
            _ => Value::Undefined,
        }
    }
}

fn link_constructor(ctor: &JSObjectDataPtr, proto: &JSObjectDataPtr) {
    ctor.borrow_mut().insert("prototype".into(), PropertyDescriptor::read_only(Value::Object(proto.clone())));
    proto.borrow_mut().insert("constructor".into(), PropertyDescriptor::data(Value::Object(ctor.clone())));
}
