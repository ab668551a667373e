//! Stamp name to id lookup, fetched once at startup.

use std::collections::HashMap;

use crate::service::api::Stamp;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StampTable {
    by_name: HashMap<String, String>,
}

impl StampTable {
    pub fn id_of(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl FromIterator<Stamp> for StampTable {
    fn from_iter<T: IntoIterator<Item = Stamp>>(iter: T) -> Self {
        Self {
            by_name: iter.into_iter().map(|s| (s.name, s.id)).collect(),
        }
    }
}
