/// Value of a nested DTO field that was present on the wire.
///
/// The outer `Option` of the field says whether the key was present at all;
/// `Nested::Null` records an explicit JSON `null`, which is written back out
/// as `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested<N> {
    Null,
    Value(Box<N>),
}

impl<N> Nested<N> {
    pub fn new(value: N) -> Self {
        Nested::Value(Box::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Nested::Null)
    }

    pub fn get(&self) -> Option<&N> {
        match self {
            Nested::Null => None,
            Nested::Value(value) => Some(&**value),
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut N> {
        match self {
            Nested::Null => None,
            Nested::Value(value) => Some(&mut **value),
        }
    }

    pub fn into_inner(self) -> Option<N> {
        match self {
            Nested::Null => None,
            Nested::Value(value) => Some(*value),
        }
    }
}

impl<N> From<N> for Nested<N> {
    fn from(value: N) -> Self {
        Nested::new(value)
    }
}
