pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod js_array;
pub(crate) mod js_function;
pub(crate) mod js_host;
pub(crate) mod js_object;
pub(crate) mod js_string;
pub(crate) mod unicode;

pub use crate::core::{
    ArrayLike, GenericObject, JSObjectData, JSObjectDataPtr, MAX_SAFE_INTEGER, NativeArray, ObjectKind, PreferredType, PropertyDescriptor,
    PropertyKey, Realm, Receiver, Slot, Value, create_data_property, create_list_from_array_like, define_accessor, delete_property,
    find_property, get, get_own_property, get_value, get_with_receiver, has_property, length_of_array_like, lookup_element,
    new_js_object_data, number_to_string, parse_json, put, set, set_prototype_of, string_to_number, to_boolean, to_integer_or_infinity,
    to_length, to_number, to_object, to_primitive, to_string, to_uint32, value_from_json,
};
pub use crate::error::{JSError, JSErrorInner, JSErrorKind};
pub use crate::js_array::{ArrayElements, find_last_index, find_last_index_with_args, get_array_length, is_array};
pub use crate::js_function::{Callable, NativeFunction, call_function_with_this, is_callable};
pub use crate::js_host::{HostList, HostMap, HostObject};
pub use crate::unicode::{utf8_to_utf16, utf16_to_utf8};
