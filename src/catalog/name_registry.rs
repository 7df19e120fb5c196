use super::bimap::BiMap;

/// Whitespace-normalized name → identity registry.
///
/// Names are compared after trimming and collapsing internal runs of whitespace, so
/// `"Sgr  B2 "` and `"Sgr B2"` resolve to the same entity. Identity references are used
/// everywhere past ingestion; this registry is only consulted when turning names into ids.
#[derive(Debug, Clone)]
pub(crate) struct NameRegistry<Id>
where
    Id: Eq + std::hash::Hash + Copy,
{
    names: BiMap<String, Id>,
}

impl<Id> Default for NameRegistry<Id>
where
    Id: Eq + std::hash::Hash + Copy,
{
    fn default() -> Self {
        NameRegistry {
            names: BiMap::new(),
        }
    }
}

pub(crate) fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl<Id> NameRegistry<Id>
where
    Id: Eq + std::hash::Hash + Copy,
{
    /// Register a name for an identity.
    ///
    /// Return
    /// ----------
    /// * `false` if the normalized name (or the id) is already registered.
    pub(crate) fn register(&mut self, name: &str, id: Id) -> bool {
        self.names.insert_unique(normalize_name(name), id)
    }

    pub(crate) fn resolve(&self, name: &str) -> Option<Id> {
        self.names.get_by_key(&normalize_name(name)).copied()
    }

    pub(crate) fn name_of(&self, id: Id) -> Option<&str> {
        self.names.get_by_value(&id).map(String::as_str)
    }
}

#[cfg(test)]
mod name_registry_test {
    use super::*;
    use crate::constants::SourceId;

    #[test]
    fn test_whitespace_insensitive_resolution() {
        let mut registry = NameRegistry::default();
        assert!(registry.register("Sgr B2", SourceId(0)));
        assert_eq!(registry.resolve("  Sgr   B2 "), Some(SourceId(0)));
        assert_eq!(registry.name_of(SourceId(0)), Some("Sgr B2"));
        assert!(!registry.register("Sgr  B2", SourceId(1)));
        assert_eq!(registry.resolve("Sgr B2(N)"), None);
        assert_eq!(registry.name_of(SourceId(1)), None);
    }
}
