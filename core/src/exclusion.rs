use std::collections::HashSet;

/// Station identifiers that must never be queried.
///
/// Parsed once from the comma-separated configuration value. Identifiers
/// are compared case-insensitively, the same folding applied to the
/// publish key, so `abc` in the list excludes the provider's `ABC`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionList {
    ids: HashSet<String>,
}

impl ExclusionList {
    pub fn parse(raw: &str) -> Self {
        let ids = raw
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { ids }
    }

    pub fn is_excluded(&self, station_id: &str) -> bool {
        !self.ids.is_empty() && self.ids.contains(&station_id.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
