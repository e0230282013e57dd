use std::collections::{HashMap, HashSet};

/// Module identifiers left unresolved in outputs, and their global names for library deployment.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExternalTable {
    externals: HashSet<String>,
    mapping: HashMap<String, String>,
}

impl ExternalTable {
    /// Every mapping key and value becomes an external as well.
    pub fn new(
        externals: impl IntoIterator<Item = String>,
        mapping: HashMap<String, String>,
    ) -> Self {
        Self {
            externals: externals
                .into_iter()
                .chain(mapping.keys().cloned())
                .chain(mapping.values().cloned())
                .collect(),
            mapping,
        }
    }

    pub fn externals(&self) -> &HashSet<String> {
        &self.externals
    }

    pub fn mapping(&self) -> &HashMap<String, String> {
        &self.mapping
    }

    pub fn is_external(&self, id: &str) -> bool {
        self.externals.contains(id)
    }

    pub fn global_name(&self, id: &str) -> Option<&str> {
        self.mapping.get(id).map(String::as_str)
    }
}
