// SPDX-License-Identifier: Apache-2.0

/// The kind of value a [`Pattern`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A quoted string, bare number or boolean.
    Any,
    /// A quoted string.
    String,
    /// A bare number.
    Number,
    /// `true` or `false`.
    Bool,
}

/// What to look for: a key, the shape of its value and optional filters.
///
/// Patterns are plain borrowed data and can be built in `const` context:
///
/// ```rust
/// use sipjson::Pattern;
///
/// const STATION_ID: Pattern<'static> = Pattern::string("id").containing("/stations/");
/// const HUMIDITY: Pattern<'static> = Pattern::number("value").within("relativeHumidity");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern<'p> {
    key: &'p str,
    shape: Shape,
    filter: Option<&'p str>,
    parent: Option<&'p str>,
}

impl<'p> Pattern<'p> {
    pub const fn new(key: &'p str, shape: Shape) -> Self {
        Self {
            key,
            shape,
            filter: None,
            parent: None,
        }
    }

    /// Match a string, number or boolean value.
    pub const fn any(key: &'p str) -> Self {
        Self::new(key, Shape::Any)
    }

    pub const fn string(key: &'p str) -> Self {
        Self::new(key, Shape::String)
    }

    pub const fn number(key: &'p str) -> Self {
        Self::new(key, Shape::Number)
    }

    pub const fn boolean(key: &'p str) -> Self {
        Self::new(key, Shape::Bool)
    }

    /// Only accept values whose decoded text contains `needle`.
    ///
    /// Rejected values are skipped and the search continues after them.
    pub const fn containing(self, needle: &'p str) -> Self {
        Self {
            filter: Some(needle),
            ..self
        }
    }

    /// Look for the key inside the object that is the value of `parent`.
    ///
    /// Only one level of nesting is supported; the parent object must fit
    /// in the scratch buffer.
    pub const fn within(self, parent: &'p str) -> Self {
        Self {
            parent: Some(parent),
            ..self
        }
    }

    pub fn key(&self) -> &'p str {
        self.key
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn filter(&self) -> Option<&'p str> {
        self.filter
    }

    pub fn parent(&self) -> Option<&'p str> {
        self.parent
    }
}
