//! String interning for names read out of SDL.

use rustc_hash::FxHashMap;
use std::cell::RefCell;

/// An interned name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Text(u32);

impl Text {
    #[must_use]
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

/// GraphQL's built-in scalar names.
pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// Deduplicating string table shared by every file of one schema.
#[derive(Debug)]
pub struct Interner {
    map: RefCell<FxHashMap<String, Text>>,
    strings: RefCell<Vec<String>>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    /// Creates an interner with the built-in scalars and root type names
    /// pre-registered.
    #[must_use]
    pub fn new() -> Self {
        let interner = Self {
            map: RefCell::new(FxHashMap::default()),
            strings: RefCell::new(Vec::new()),
        };

        for name in BUILTIN_SCALARS
            .iter()
            .chain(&["Query", "Mutation", "Subscription", "deprecated", "reason"])
        {
            interner.intern(name);
        }

        interner
    }

    /// Interns a string, returning its identifier.
    pub fn intern(&self, s: &str) -> Text {
        if let Some(&id) = self.map.borrow().get(s) {
            return id;
        }

        let mut strings = self.strings.borrow_mut();
        let id = Text(strings.len() as u32);
        strings.push(s.to_string());
        self.map.borrow_mut().insert(s.to_string(), id);
        id
    }

    /// Looks up a string without interning it.
    #[must_use]
    pub fn lookup(&self, s: &str) -> Option<Text> {
        self.map.borrow().get(s).copied()
    }

    /// Gets the string for an identifier.
    #[must_use]
    pub fn get(&self, id: Text) -> String {
        self.strings
            .borrow()
            .get(id.0 as usize)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns true if `id` names one of GraphQL's built-in scalars.
    #[must_use]
    pub fn is_builtin_scalar(&self, id: Text) -> bool {
        // Built-ins are registered first, in BUILTIN_SCALARS order.
        (id.0 as usize) < BUILTIN_SCALARS.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.borrow().is_empty()
    }
}
