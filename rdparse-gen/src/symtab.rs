//! Name tables for the terminal and non-terminal namespaces of a grammar.
use std::collections::HashMap;

/// Names with dense ids in first-seen order.
#[derive(Default, Debug, Clone)]
pub struct Symtab {
    ids: HashMap<String, usize>,
    names: Vec<String>,
}

impl Symtab {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table in which every name is new; returns the first repeated name otherwise.
    pub fn unique<'a, I>(names: I) -> Result<Self, &'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tab = Self::new();
        for name in names {
            if tab.insert(name).is_err() {
                return Err(name);
            }
        }
        Ok(tab)
    }

    /// Interns `name`. `Err` carries the id it already had.
    pub fn insert(&mut self, name: &str) -> Result<usize, usize> {
        if let Some(&id) = self.ids.get(name) {
            return Err(id);
        }
        let id = self.names.len();
        self.names.push(name.to_owned());
        self.ids.insert(name.to_owned(), id);
        Ok(id)
    }

    pub fn id(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

/// Collects names, keeping the first id of a repeated name.
impl<'a> FromIterator<&'a str> for Symtab {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut tab = Symtab::new();
        for name in iter {
            let _ = tab.insert(name);
        }
        tab
    }
}
