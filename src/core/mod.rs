mod value;
pub use value::*;

mod descriptor;
pub use descriptor::*;

mod property_key;
pub use property_key::*;

mod number;
pub use number::*;

mod object;
pub use object::*;

mod array_like;
pub use array_like::*;

mod realm;
pub use realm::*;

mod json;
pub use json::*;
