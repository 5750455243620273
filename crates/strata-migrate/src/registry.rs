use strata_common::{Error, Result};

use crate::migration::Migration;
use crate::seeder::Seeder;

/// Statically assembled, name-unique collection processed in insertion order.
pub struct Registry<T: ?Sized> {
    entries: Vec<(String, Box<T>)>,
}

pub type MigrationRegistry = Registry<dyn Migration>;
pub type SeederRegistry = Registry<dyn Seeder>;

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: ?Sized> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `item` under `name`. Names must be unique and usable inside a
    /// command token, so `,` and `=` are rejected.
    pub fn register(&mut self, name: impl Into<String>, item: Box<T>) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::Validation("registry names cannot be empty".into()));
        }
        if name.contains([',', '=']) || name.trim() != name {
            return Err(Error::Validation(format!(
                "registry name {name:?} cannot contain ',', '=' or surrounding whitespace"
            )));
        }
        if self.contains(&name) {
            return Err(Error::Validation(format!("{name} is registered twice")));
        }
        self.entries.push((name, item));
        Ok(())
    }

    /// Builder form of [`Registry::register`].
    pub fn with(mut self, name: impl Into<String>, item: Box<T>) -> Result<Self> {
        self.register(name, item)?;
        Ok(self)
    }

    /// Order entries lexically, for timestamp-prefixed names.
    pub fn sort_by_name(&mut self) {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries
            .iter()
            .map(|(n, item)| (n.as_str(), item.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
