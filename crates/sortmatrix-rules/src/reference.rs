//! Closed registries of known location and item-type codes.

use std::collections::BTreeSet;
use std::ops::Bound;

use crate::pattern;
use crate::rule::Column;

/// Known codes for the columns the compiler writes.
#[derive(Debug, Clone, Default)]
pub struct ReferenceRegistry {
    locations: BTreeSet<String>,
    item_types: BTreeSet<String>,
}

impl ReferenceRegistry {
    pub fn new<L, T>(locations: L, item_types: T) -> Self
    where
        L: IntoIterator<Item = String>,
        T: IntoIterator<Item = String>,
    {
        Self {
            locations: locations.into_iter().collect(),
            item_types: item_types.into_iter().collect(),
        }
    }

    pub fn add_location(&mut self, code: impl Into<String>) {
        self.locations.insert(code.into());
    }

    pub fn add_item_type(&mut self, code: impl Into<String>) {
        self.item_types.insert(code.into());
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty() && self.item_types.is_empty()
    }

    /// Registry for a column, if one is kept for it.
    fn entries(&self, column: Column) -> Option<&BTreeSet<String>> {
        match column {
            Column::PermanentLocation => Some(&self.locations),
            Column::CollectionCode => Some(&self.item_types),
            _ => None,
        }
    }

    /// Columns this registry can check (non-empty registries only).
    pub fn checked_columns(&self) -> impl Iterator<Item = Column> + '_ {
        [Column::PermanentLocation, Column::CollectionCode]
            .into_iter()
            .filter(|c| self.entries(*c).is_some_and(|set| !set.is_empty()))
    }

    /// Whether `token` names a known code. A prefix wildcard is valid when
    /// some entry starts with its prefix.
    pub fn is_known(&self, column: Column, token: &str) -> bool {
        let Some(set) = self.entries(column) else {
            return true;
        };
        if pattern::is_universal(token) {
            return true;
        }
        match pattern::prefix_of(token) {
            Some(prefix) => set
                .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
                .next()
                .is_some_and(|entry| entry.starts_with(prefix)),
            None => set.contains(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ReferenceRegistry {
        ReferenceRegistry::new(
            ["FICGENERAL", "FICMYSTERY", "NONFICTION"].map(String::from),
            ["BOOK", "DVD21"].map(String::from),
        )
    }

    #[test]
    fn literal_lookup() {
        let reg = registry();
        assert!(reg.is_known(Column::PermanentLocation, "NONFICTION"));
        assert!(!reg.is_known(Column::PermanentLocation, "BOOK"));
        assert!(reg.is_known(Column::CollectionCode, "BOOK"));
    }

    #[test]
    fn prefix_lookup() {
        let reg = registry();
        assert!(reg.is_known(Column::PermanentLocation, "FIC*"));
        assert!(reg.is_known(Column::PermanentLocation, "FICM*"));
        assert!(!reg.is_known(Column::PermanentLocation, "FICZ*"));
        assert!(reg.is_known(Column::CollectionCode, "DVD*"));
        assert!(reg.is_known(Column::CollectionCode, "*"));
    }

    #[test]
    fn unchecked_columns_pass() {
        let reg = registry();
        assert!(reg.is_known(Column::CallNumber, "anything"));
        assert_eq!(reg.checked_columns().count(), 2);
        assert_eq!(ReferenceRegistry::default().checked_columns().count(), 0);
    }
}
