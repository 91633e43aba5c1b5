//! Identifier management using string interning for efficient storage and comparison.
//!
//! This module provides the [`Id`] type with an efficient string-interner based approach.
//! Model elements are addressed by `Id` everywhere in Vantage; ownership links
//! (container to software system, component to container, deployment child to
//! parent) are expressed as nested identifiers joined with `::`.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Efficient identifier type using string interning.
///
/// This type provides efficient storage and comparison of string identifiers
/// through string interning.
///
/// # Examples
///
/// ```
/// use vantage_core::identifier::Id;
///
/// // Create identifiers from element names
/// let bank = Id::new("Internet Banking System");
/// let customer = Id::new("Personal Customer");
///
/// // Create nested identifiers for owned elements
/// let api = bank.create_nested(Id::new("API Application"));
/// assert_eq!(api, "Internet Banking System::API Application");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Examples
    ///
    /// ```
    /// use vantage_core::identifier::Id;
    ///
    /// let system_id = Id::new("Mainframe Banking System");
    /// ```
    pub fn new(name: &str) -> Self {
        let mut interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let symbol = interner.get_or_intern(name);
        Self(symbol)
    }

    /// Creates an internal `Id` identifier without string representation.
    ///
    /// Useful for generated identifiers that have no user-supplied name.
    pub fn from_anonymous(idx: usize) -> Self {
        let name = format!("__{idx}");
        Self::new(&name)
    }

    /// Creates a nested ID by combining parent ID and child ID with '::' separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use vantage_core::identifier::Id;
    ///
    /// let system = Id::new("bank");
    /// let container = Id::new("database");
    /// let nested = system.create_nested(container);
    /// assert_eq!(nested, "bank::database");
    /// ```
    pub fn create_nested(&self, child_id: Id) -> Self {
        let mut interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let parent_str = interner
            .resolve(self.0)
            .expect("Parent ID should exist in interner");
        let child_str = interner
            .resolve(child_id.0)
            .expect("Child ID should exist in interner");
        let nested_name = format!("{}::{}", parent_str, child_str);
        let symbol = interner.get_or_intern(&nested_name);
        Self(symbol)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{}", str_value)
    }
}

impl std::str::FromStr for Id {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice.
    ///
    /// This is a convenience implementation that calls `Id::new`.
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    ///
    /// # Examples
    ///
    /// ```
    /// use vantage_core::identifier::Id;
    ///
    /// let id = Id::new("Web Application");
    /// assert!(id == "Web Application");
    /// ```
    fn eq(&self, other: &str) -> bool {
        let interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    /// Allows direct comparison with string references: `id == &string`
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
