use num_traits::ToPrimitive;

/// Property key. Canonical array indices (`0 ..= 2^32 - 2`) are always stored as `Index`, so
/// `"7"` and `7` name the same property.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Index(u32),
    String(String),
}

impl PropertyKey {
    /// Key for an integer index, falling back to the string form outside the array index range.
    pub fn index(i: u64) -> Self {
        match i.to_u32() {
            Some(n) if n != u32::MAX => PropertyKey::Index(n),
            _ => PropertyKey::String(i.to_string()),
        }
    }

    pub fn as_array_index(&self) -> Option<u32> {
        match self {
            PropertyKey::Index(i) => Some(*i),
            PropertyKey::String(_) => None,
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        matches!(self, PropertyKey::String(s) if s == name)
    }
}

fn canonical_array_index(s: &str) -> Option<u32> {
    let n = s.parse::<u32>().ok()?;
    if n == u32::MAX || n.to_string() != s {
        return None;
    }
    Some(n)
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        match canonical_array_index(s) {
            Some(i) => PropertyKey::Index(i),
            None => PropertyKey::String(s.to_string()),
        }
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        match canonical_array_index(&s) {
            Some(i) => PropertyKey::Index(i),
            None => PropertyKey::String(s),
        }
    }
}

impl From<&String> for PropertyKey {
    fn from(s: &String) -> Self {
        PropertyKey::from(s.as_str())
    }
}

impl From<u32> for PropertyKey {
    fn from(i: u32) -> Self {
        PropertyKey::index(u64::from(i))
    }
}

impl From<u64> for PropertyKey {
    fn from(i: u64) -> Self {
        PropertyKey::index(i)
    }
}

impl std::fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyKey::Index(i) => write!(f, "{i}"),
            PropertyKey::String(s) => write!(f, "{s}"),
        }
    }
}
