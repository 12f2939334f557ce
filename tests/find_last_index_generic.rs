use js_find_last::{
    HostList, HostMap, HostObject, JSError, PropertyKey, Realm, Value, call_function_with_this, define_accessor, find_last_index, get,
    get_value, put, set_prototype_of, to_string, utf16_to_utf8,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// Initialize logger for this integration test binary so `RUST_LOG` is honored.
// Using `ctor` ensures initialization runs before tests start.
#[ctor::ctor]
fn __init_test_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default()).is_test(true).try_init();
}

fn method(realm: &Realm, name: &str) -> Value {
    get(realm, &realm.function_prototype, &name.into()).unwrap()
}

/// `Array.prototype.findLastIndex.call(receiver, ...args)`
fn call_form(realm: &Realm, receiver: Value, args: &[Value]) -> Result<Value, JSError> {
    let mut call_args = vec![receiver];
    call_args.extend_from_slice(args);
    call_function_with_this(realm, &method(realm, "call"), &realm.array_find_last_index(), &call_args)
}

/// `Array.prototype.findLastIndex.apply(receiver, [...args])`
fn apply_form(realm: &Realm, receiver: Value, args: &[Value]) -> Result<Value, JSError> {
    let list = Value::Object(realm.new_array(args.to_vec()));
    call_function_with_this(realm, &method(realm, "apply"), &realm.array_find_last_index(), &[receiver, list])
}

fn text(realm: &Realm, v: &Value) -> String {
    utf16_to_utf8(&to_string(realm, v).unwrap())
}

#[test]
fn test_string_receiver() {
    let realm = Realm::new();
    let last: Rc<RefCell<Option<(Value, Value, String, Value)>>> = Rc::new(RefCell::new(None));

    let l = last.clone();
    let pred = realm.new_function("p", 3, move |realm, _, args| {
        assert!(args[2].is_object());
        let o = utf16_to_utf8(&to_string(realm, &args[2])?);
        let len = get_value(realm, &args[2], &"length".into())?;
        *l.borrow_mut() = Some((args[0].clone(), args[1].clone(), o, len));
        Ok(Value::Boolean(false))
    });
    assert_eq!(call_form(&realm, Value::from("abcd"), &[pred]).unwrap(), Value::from(-1));
    let (v, k, o, len) = last.borrow_mut().take().unwrap();
    assert_eq!(v, Value::from("a"));
    assert_eq!(k, Value::from(0));
    assert_eq!(o, "abcd");
    assert_eq!(len, Value::from(4));

    let l = last.clone();
    let pred = realm.new_function("p", 3, move |realm, _, args| {
        let o = utf16_to_utf8(&to_string(realm, &args[2])?);
        let len = get_value(realm, &args[2], &"length".into())?;
        *l.borrow_mut() = Some((args[0].clone(), args[1].clone(), o, len));
        Ok(Value::Boolean(true))
    });
    assert_eq!(apply_form(&realm, Value::from("abcd"), &[pred]).unwrap(), Value::from(3));
    let (v, k, _, _) = last.borrow_mut().take().unwrap();
    assert_eq!(v, Value::from("d"));
    assert_eq!(k, Value::from(3));
}

#[test]
fn test_simple_array_like() {
    let realm = Realm::new();
    let o = realm.new_object_from([
        (PropertyKey::Index(0), Value::from(0)),
        (PropertyKey::Index(1), Value::from(1)),
        (PropertyKey::Index(2), Value::from(2)),
        (PropertyKey::from("length"), Value::from(3)),
    ]);

    let target = o.clone();
    let pred = realm.new_function("p", 1, move |realm, _, args| {
        Ok(Value::Boolean(args[0] == get(realm, &target, &PropertyKey::Index(2))?))
    });
    assert_eq!(call_form(&realm, Value::Object(o.clone()), &[pred]).unwrap(), Value::from(2));

    let target = o.clone();
    let pred = realm.new_function("p", 1, move |realm, _, args| {
        Ok(Value::Boolean(args[0] == get(realm, &target, &PropertyKey::Index(1))?))
    });
    assert_eq!(apply_form(&realm, Value::Object(o), &[pred]).unwrap(), Value::from(1));
}

#[test]
fn test_array_like_without_length_is_empty() {
    let realm = Realm::new();
    let o = realm.new_object_from([(PropertyKey::Index(0), Value::from(0)), (PropertyKey::Index(1), Value::from(1))]);
    let called = Rc::new(Cell::new(false));
    let c = called.clone();
    let pred = realm.new_function("p", 0, move |_, _, _| {
        c.set(true);
        Ok(Value::Boolean(true))
    });
    assert_eq!(find_last_index(&realm, &Value::Object(o), &pred, None).unwrap(), -1);
    assert!(!called.get());
}

#[test]
fn test_mixed_array_like_built_with_push() {
    let realm = Realm::new();
    let obj = realm.new_object();
    put(&realm, &obj, &"prop1".into(), Value::from("x")).unwrap();
    let is_valid = realm.new_function("isValid", 0, |realm, this, _| {
        let prop1 = get_value(realm, this, &"prop1".into())?;
        Ok(Value::Boolean(prop1 == Value::from("x")))
    });
    put(&realm, &obj, &"isValid".into(), is_valid).unwrap();
    put(&realm, &obj, &"length".into(), Value::from(0)).unwrap();

    // Array.prototype.push.apply(obj, [10, 20, 30])
    let items = Value::Object(realm.new_array(vec![Value::from(10), Value::from(20), Value::from(30)]));
    call_function_with_this(&realm, &method(&realm, "apply"), &realm.array_push(), &[Value::Object(obj.clone()), items]).unwrap();

    let last = Rc::new(RefCell::new((Value::Undefined, Value::Undefined, Value::Undefined)));
    let l = last.clone();
    let pred = realm.new_function("p", 3, move |realm, _, args| {
        let len = get_value(realm, &args[2], &"length".into())?;
        *l.borrow_mut() = (args[0].clone(), args[1].clone(), len);
        let check = get_value(realm, &args[2], &"isValid".into())?;
        let valid = call_function_with_this(realm, &check, &args[2], &[])?;
        Ok(Value::Boolean(valid == Value::Boolean(false)))
    });
    assert_eq!(find_last_index(&realm, &Value::Object(obj), &pred, None).unwrap(), -1);
    let (v, k, len) = last.borrow().clone();
    assert_eq!(v, Value::from(10));
    assert_eq!(k, Value::from(0));
    assert_eq!(len, Value::from(3));
}

#[test]
fn test_inherited_indices_are_visited() {
    let realm = Realm::new();
    let o1 = realm.new_object_from([(PropertyKey::Index(0), Value::from(0)), (PropertyKey::Index(1), Value::from(1))]);
    let o2 = realm.new_object_from([(PropertyKey::Index(2), Value::from(2)), (PropertyKey::from("length"), Value::from(3))]);
    assert!(set_prototype_of(&o2, Some(o1)));

    let visited = Rc::new(RefCell::new(Vec::new()));
    let v = visited.clone();
    let pred = realm.new_function("p", 1, move |_, _, args| {
        v.borrow_mut().push(args[0].clone());
        Ok(Value::Boolean(false))
    });
    assert_eq!(find_last_index(&realm, &Value::Object(o2.clone()), &pred, None).unwrap(), -1);
    assert_eq!(*visited.borrow(), vec![Value::from(2), Value::from(1), Value::from(0)]);

    let pred = realm.new_function("p", 0, |_, _, _| Ok(Value::Boolean(true)));
    assert_eq!(find_last_index(&realm, &Value::Object(o2), &pred, None).unwrap(), 2);
}

#[test]
fn test_array_hole_falls_through_to_prototype() {
    let realm = Realm::new();
    let proto = realm.new_object_from([(PropertyKey::Index(1), Value::from("inherited"))]);
    let arr = realm.new_array_with_length(3);
    put(&realm, &arr, &PropertyKey::Index(2), Value::from("own")).unwrap();
    assert!(set_prototype_of(&arr, Some(proto)));

    let visited = Rc::new(RefCell::new(Vec::new()));
    let v = visited.clone();
    let pred = realm.new_function("p", 1, move |_, _, args| {
        v.borrow_mut().push(args[0].clone());
        Ok(Value::Boolean(false))
    });
    find_last_index(&realm, &Value::Object(arr), &pred, None).unwrap();
    assert_eq!(*visited.borrow(), vec![Value::from("own"), Value::from("inherited"), Value::Undefined]);
}

#[test]
fn test_getter_value_is_passed_to_predicate() {
    let realm = Realm::new();
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    let getter = realm.new_function("get 0", 0, move |_, _, _| {
        let n = c.get();
        c.set(n + 1);
        Ok(Value::from(n))
    });
    let o = realm.new_object_from([(PropertyKey::from("length"), Value::from(1))]);
    define_accessor(&o, &PropertyKey::Index(0), Some(getter), None);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    let pred = realm.new_function("p", 1, move |_, _, args| {
        s.borrow_mut().push(args[0].clone());
        Ok(Value::Boolean(true))
    });
    assert_eq!(find_last_index(&realm, &Value::Object(o), &pred, None).unwrap(), 0);
    assert_eq!(count.get(), 1);
    assert_eq!(*seen.borrow(), vec![Value::from(0)]);
}

#[test]
fn test_element_reads_interleave_with_predicate_calls() {
    let realm = Realm::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    let o = realm.new_object_from([(PropertyKey::from("length"), Value::from(3))]);
    for i in 0..3u32 {
        let e = events.clone();
        let getter = realm.new_function("get", 0, move |_, _, _| {
            e.borrow_mut().push(format!("get {i}"));
            Ok(Value::from(i))
        });
        define_accessor(&o, &PropertyKey::Index(i), Some(getter), None);
    }
    let e = events.clone();
    let pred = realm.new_function("p", 2, move |realm, _, args| {
        e.borrow_mut().push(format!("call {}", text(realm, &args[1])));
        Ok(Value::Boolean(false))
    });
    assert_eq!(find_last_index(&realm, &Value::Object(o), &pred, None).unwrap(), -1);
    assert_eq!(*events.borrow(), ["get 2", "call 2", "get 1", "call 1", "get 0", "call 0"]);
}

#[test]
fn test_getter_receives_original_receiver_as_this() {
    let realm = Realm::new();
    let proto = realm.new_object();
    let seen_this = Rc::new(RefCell::new(Value::Undefined));
    let s = seen_this.clone();
    let getter = realm.new_function("get", 0, move |_, this, _| {
        *s.borrow_mut() = this.clone();
        Ok(Value::from(1))
    });
    define_accessor(&proto, &PropertyKey::Index(0), Some(getter), None);
    let o = realm.new_object_from([(PropertyKey::from("length"), Value::from(1))]);
    assert!(set_prototype_of(&o, Some(proto)));

    let pred = realm.new_function("p", 0, |_, _, _| Ok(Value::Boolean(false)));
    find_last_index(&realm, &Value::Object(o.clone()), &pred, None).unwrap();
    assert_eq!(*seen_this.borrow(), Value::Object(o));
}

#[test]
fn test_length_is_read_once_and_coerced() {
    let realm = Realm::new();
    let reads = Rc::new(Cell::new(0));
    let r = reads.clone();
    let length_getter = realm.new_function("get length", 0, move |_, _, _| {
        r.set(r.get() + 1);
        Ok(Value::from("3"))
    });
    let o = realm.new_object();
    define_accessor(&o, &"length".into(), Some(length_getter), None);

    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    let pred = realm.new_function("p", 0, move |_, _, _| {
        c.set(c.get() + 1);
        Ok(Value::Boolean(false))
    });
    assert_eq!(find_last_index(&realm, &Value::Object(o), &pred, None).unwrap(), -1);
    assert_eq!(reads.get(), 1);
    assert_eq!(calls.get(), 3);
}

#[test]
fn test_unusual_lengths() {
    let realm = Realm::new();
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    let pred = realm.new_function("p", 0, move |_, _, _| {
        c.set(c.get() + 1);
        Ok(Value::Boolean(false))
    });

    let value_of = realm.new_function("valueOf", 0, |_, _, _| Ok(Value::from(2)));
    let length_object = Value::Object(realm.new_object_from([("valueOf", value_of)]));

    for (length, expected_calls) in [
        (Value::from(-5), 0),
        (Value::from(f64::NAN), 0),
        (Value::from(2.7), 2),
        (Value::Null, 0),
        (Value::Boolean(true), 1),
        (Value::from(""), 0),
        (length_object, 2),
    ] {
        calls.set(0);
        let o = realm.new_object_from([(PropertyKey::from("length"), length.clone())]);
        assert_eq!(find_last_index(&realm, &Value::Object(o), &pred, None).unwrap(), -1);
        assert_eq!(calls.get(), expected_calls, "length {length:?}");
    }
}

#[test]
fn test_primitive_receivers_are_wrapped() {
    let realm = Realm::new();
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    let pred = realm.new_function("p", 0, move |_, _, _| {
        c.set(c.get() + 1);
        Ok(Value::Boolean(true))
    });
    for receiver in [Value::from(5), Value::Boolean(true), Value::from("")] {
        assert_eq!(find_last_index(&realm, &receiver, &pred, None).unwrap(), -1);
    }
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_host_list_receiver() {
    let realm = Realm::new();
    let list = Rc::new(HostList::new(vec![Value::from(1), Value::from(2), Value::from(3)]));
    let host = Value::Object(realm.new_host_object(list.clone()));

    let pred = realm.new_function("p", 1, |_, _, args| Ok(Value::Boolean(args[0] == Value::from(2))));
    assert_eq!(find_last_index(&realm, &host, &pred, None).unwrap(), 1);

    // grows through index writes like an array
    let Value::Object(obj) = &host else { unreachable!() };
    put(&realm, obj, &PropertyKey::Index(5), Value::from(2)).unwrap();
    assert_eq!(list.len(), 6);
    assert_eq!(list.to_vec()[4], Value::Null);
    assert_eq!(find_last_index(&realm, &host, &pred, None).unwrap(), 5);
}

#[test]
fn test_host_map_receiver() {
    let realm = Realm::new();
    let map = Rc::new(HostMap::new([("0", Value::from("a")), ("1", Value::from("b")), ("length", Value::from(3))]));
    let host = Value::Object(realm.new_host_object(map.clone()));

    let visited = Rc::new(RefCell::new(Vec::new()));
    let v = visited.clone();
    let pred = realm.new_function("p", 1, move |_, _, args| {
        v.borrow_mut().push(args[0].clone());
        Ok(Value::Boolean(args[0] == Value::from("a")))
    });
    assert_eq!(find_last_index(&realm, &host, &pred, None).unwrap(), 0);
    assert_eq!(*visited.borrow(), vec![Value::Undefined, Value::from("b"), Value::from("a")]);
    assert!(!map.contains_key("2"));
}

struct CountingHost {
    reads: RefCell<Vec<u32>>,
}

impl HostObject for CountingHost {
    fn class_name(&self) -> &str {
        "CountingHost"
    }

    fn get_index(&self, index: u32) -> Result<Option<Value>, JSError> {
        self.reads.borrow_mut().push(index);
        Ok(Some(Value::from(index * 10)))
    }

    fn length(&self) -> Option<usize> {
        Some(4)
    }
}

#[test]
fn test_custom_host_object_is_read_once_per_index() {
    let realm = Realm::new();
    let host = Rc::new(CountingHost { reads: RefCell::new(Vec::new()) });
    let obj = Value::Object(realm.new_host_object(host.clone()));

    let pred = realm.new_function("p", 1, |_, _, args| Ok(Value::Boolean(args[0] == Value::from(10))));
    assert_eq!(find_last_index(&realm, &obj, &pred, None).unwrap(), 1);
    assert_eq!(*host.reads.borrow(), vec![3, 2, 1]);

    let class = get(&realm, &realm.object_prototype, &"toString".into()).unwrap();
    let tag = call_function_with_this(&realm, &class, &obj, &[]).unwrap();
    assert_eq!(tag, Value::from("[object CountingHost]"));
}
