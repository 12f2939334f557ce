use crate::core::{
    JSObjectDataPtr, ObjectKind, PropertyDescriptor, PropertyKey, Realm, Value, create_list_from_array_like, get, new_js_object_data,
    to_integer_or_infinity,
};
use crate::error::JSError;
use crate::raise_type_error;
use crate::unicode::utf16_to_utf8;
use std::rc::Rc;

/// Native code behind a function object: `(realm, this, arguments)`.
pub type NativeFunction = Rc<dyn Fn(&Realm, &Value, &[Value]) -> Result<Value, JSError>>;

/// The `[[Call]]` behaviour of a function object.
#[derive(Clone)]
pub enum Callable {
    Native { name: String, func: NativeFunction },
    Bound { target: JSObjectDataPtr, bound_this: Value, bound_args: Vec<Value> },
}

impl Callable {
    pub fn name(&self) -> String {
        match self {
            Callable::Native { name, .. } => name.clone(),
            Callable::Bound { target, .. } => match target.borrow().callable() {
                Some(inner) => format!("bound {}", inner.name()),
                None => "bound".to_string(),
            },
        }
    }
}

/// `IsCallable`.
pub fn is_callable(value: &Value) -> bool {
    match value {
        Value::Object(obj) => obj.borrow().is_callable(),
        _ => false,
    }
}

fn callable_of(value: &Value) -> Option<Callable> {
    match value {
        Value::Object(obj) => obj.borrow().callable(),
        _ => None,
    }
}

/// `Call(F, thisArg, args)`. `this_val` is passed through unchanged.
pub fn call_function_with_this(realm: &Realm, func: &Value, this_val: &Value, args: &[Value]) -> Result<Value, JSError> {
    // Clone the callable out so no borrow of the function object is held while it runs.
    let Some(callable) = callable_of(func) else {
        return Err(raise_type_error!("{} is not a function", func));
    };
    match callable {
        Callable::Native { name, func } => {
            log::trace!("call native '{name}' with {} args", args.len());
            func(realm, this_val, args)
        }
        Callable::Bound {
            target,
            bound_this,
            mut bound_args,
        } => {
            bound_args.extend_from_slice(args);
            call_function_with_this(realm, &Value::Object(target), &bound_this, &bound_args)
        }
    }
}

pub(crate) fn create_function_object(realm: &Realm, callable: Callable, name: &str, length: f64) -> JSObjectDataPtr {
    let func = new_js_object_data(Some(realm.function_prototype.clone()), ObjectKind::Function(callable));
    {
        let mut data = func.borrow_mut();
        data.insert("length".into(), PropertyDescriptor::read_only(Value::Number(length)));
        data.insert("name".into(), PropertyDescriptor::read_only(Value::from(name)));
    }
    func
}

pub(crate) fn create_native_function<F>(realm: &Realm, name: &str, length: u32, f: F) -> JSObjectDataPtr
where
    F: Fn(&Realm, &Value, &[Value]) -> Result<Value, JSError> + 'static,
{
    let callable = Callable::Native {
        name: name.to_string(),
        func: Rc::new(f),
    };
    create_function_object(realm, callable, name, f64::from(length))
}

/// Install a builtin method on `target`.
pub(crate) fn define_builtin_function<F>(realm: &Realm, target: &JSObjectDataPtr, name: &str, length: u32, f: F)
where
    F: Fn(&Realm, &Value, &[Value]) -> Result<Value, JSError> + 'static,
{
    let func = create_native_function(realm, name, length, f);
    target.borrow_mut().insert(name.into(), PropertyDescriptor::data(Value::Object(func)));
}

fn ensure_callable<'a>(this: &'a Value, method: &str) -> Result<&'a Value, JSError> {
    if is_callable(this) {
        Ok(this)
    } else {
        Err(raise_type_error!("Function.prototype.{} called on non-callable {}", method, this))
    }
}

fn function_prototype_call(realm: &Realm, this: &Value, args: &[Value]) -> Result<Value, JSError> {
    let func = ensure_callable(this, "call")?;
    let this_arg = args.first().cloned().unwrap_or(Value::Undefined);
    let rest = args.get(1..).unwrap_or(&[]);
    call_function_with_this(realm, func, &this_arg, rest)
}

fn function_prototype_apply(realm: &Realm, this: &Value, args: &[Value]) -> Result<Value, JSError> {
    let func = ensure_callable(this, "apply")?;
    let this_arg = args.first().cloned().unwrap_or(Value::Undefined);
    let arg_list = match args.get(1) {
        None | Some(Value::Undefined) | Some(Value::Null) => Vec::new(),
        Some(array_like) => create_list_from_array_like(realm, array_like)?,
    };
    call_function_with_this(realm, func, &this_arg, &arg_list)
}

fn function_prototype_bind(realm: &Realm, this: &Value, args: &[Value]) -> Result<Value, JSError> {
    let func = ensure_callable(this, "bind")?;
    let Value::Object(target) = func else {
        return Err(raise_type_error!("Bind must be called on a function"));
    };
    let bound_this = args.first().cloned().unwrap_or(Value::Undefined);
    let bound_args: Vec<Value> = args.get(1..).unwrap_or(&[]).to_vec();

    let target_length = match get(realm, target, &"length".into())? {
        Value::Number(n) => to_integer_or_infinity(n),
        _ => 0.0,
    };
    let length = (target_length - bound_args.len() as f64).max(0.0);
    let target_name = match get(realm, target, &"name".into())? {
        Value::String(s) => utf16_to_utf8(&s),
        _ => String::new(),
    };

    let callable = Callable::Bound {
        target: target.clone(),
        bound_this,
        bound_args,
    };
    let bound = create_function_object(realm, callable, &format!("bound {target_name}"), length);
    bound.borrow_mut().prototype = target.borrow().prototype.clone();
    Ok(Value::Object(bound))
}

// `Function.prototype` itself is callable and returns undefined.
pub(crate) fn function_prototype_behaviour() -> Callable {
    Callable::Native {
        name: String::new(),
        func: Rc::new(|_: &Realm, _: &Value, _: &[Value]| Ok(Value::Undefined)),
    }
}

pub(crate) fn initialize_function_prototype(realm: &Realm) {
    let proto = &realm.function_prototype;
    define_builtin_function(realm, proto, "call", 1, function_prototype_call);
    define_builtin_function(realm, proto, "apply", 2, function_prototype_apply);
    define_builtin_function(realm, proto, "bind", 1, function_prototype_bind);
    proto.borrow_mut().insert(PropertyKey::from("length"), PropertyDescriptor::read_only(Value::Number(0.0)));
    proto.borrow_mut().insert(PropertyKey::from("name"), PropertyDescriptor::read_only(Value::from("")));
}

