use crate::core::Value;

#[derive(thiserror::Error, Debug, Clone)]
pub enum JSErrorKind {
    #[error("TypeError: {method} called on null or undefined")]
    NullOrUndefinedReceiver { method: String },

    #[error("TypeError: {found} is not a function (in {method})")]
    InvalidPredicate { method: String, found: String },

    #[error("TypeError: {message}")]
    TypeError { message: String },

    #[error("RangeError: {message}")]
    RangeError { message: String },

    #[error("SyntaxError: {message}")]
    SyntaxError { message: String },

    #[error("Uncaught {0}")]
    Throw(Value),
}

#[derive(Debug, Clone)]
pub struct JSErrorInner {
    pub kind: JSErrorKind,
    pub file: String,
    pub line: usize,
    pub method: String,
}

/// Error raised by the object model or by a builtin.
///
/// Errors produced by script code (a predicate, a getter, a host callback) travel through the
/// builtins untouched, so the caller always sees the exact error that was raised.
#[derive(Debug, Clone)]
pub struct JSError {
    pub inner: Box<JSErrorInner>,
}

impl JSError {
    pub fn new(kind: JSErrorKind, file: &str, line: usize, method: &str) -> Self {
        log::debug!("raising {kind} at {method} {file}:{line}");
        JSError {
            inner: Box::new(JSErrorInner {
                kind,
                file: file.to_string(),
                line,
                method: method.to_string(),
            }),
        }
    }

    pub fn kind(&self) -> &JSErrorKind {
        &self.inner.kind
    }

    /// True for every error a script would observe as a `TypeError`.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self.inner.kind,
            JSErrorKind::NullOrUndefinedReceiver { .. } | JSErrorKind::InvalidPredicate { .. } | JSErrorKind::TypeError { .. }
        )
    }

    pub fn is_range_error(&self) -> bool {
        matches!(self.inner.kind, JSErrorKind::RangeError { .. })
    }

    /// The script value carried by a `throw`, if this error is one.
    pub fn thrown_value(&self) -> Option<&Value> {
        match &self.inner.kind {
            JSErrorKind::Throw(v) => Some(v),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        self.inner.kind.to_string()
    }
}

impl std::fmt::Display for JSError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {} {}:{}", self.inner.kind, self.inner.method, self.inner.file, self.inner.line)
    }
}

impl std::error::Error for JSError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner.kind)
    }
}

impl From<JSError> for std::io::Error {
    fn from(err: JSError) -> std::io::Error {
        std::io::Error::other(err.to_string())
    }
}

// Macro that builds a JSError carrying the compile-time caller location.
// Using a macro (rather than a function) ensures `file!()` and `line!()`
// expand to the site where the macro is invoked.
#[macro_export]
macro_rules! make_js_error {
    ($kind:expr) => {
        $crate::JSError::new($kind, file!(), line!() as usize, $crate::function_name!())
    };
}

#[macro_export]
macro_rules! raise_type_error {
    ($msg:expr) => {
        $crate::make_js_error!($crate::JSErrorKind::TypeError { message: $msg.to_string() })
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::raise_type_error!(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! raise_range_error {
    ($msg:expr) => {
        $crate::make_js_error!($crate::JSErrorKind::RangeError { message: $msg.to_string() })
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::raise_range_error!(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! raise_syntax_error {
    ($msg:expr) => {
        $crate::make_js_error!($crate::JSErrorKind::SyntaxError { message: $msg.to_string() })
    };
}

/// Wrap a script value as a thrown error, the way a `throw` statement would.
#[macro_export]
macro_rules! throw_value {
    ($value:expr) => {
        $crate::make_js_error!($crate::JSErrorKind::Throw($crate::Value::from($value)))
    };
}

#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        // remove the trailing "::f"
        &name[..name.len() - 3]
    }};
}
