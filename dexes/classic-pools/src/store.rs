// ─────────────────────────────────────────────────────────────────────────────
// Keyed entity store
// ─────────────────────────────────────────────────────────────────────────────

use crate::entities::{Entity, EntityKind, StoredEntity};
use std::collections::BTreeMap;

/// Keyed load/save/remove of typed records.
///
/// There are no transactions: every `save` is committed immediately, so a
/// handler that aborts keeps whatever it already wrote.
pub trait EntityStore {
    fn load<E: Entity>(&self, id: &str) -> Option<E>;

    fn save<E: Entity>(&mut self, entity: &E);

    fn remove(&mut self, kind: EntityKind, id: &str);

    fn contains(&self, kind: EntityKind, id: &str) -> bool;
}

/// In-process store, ordered by kind then id so dumps are deterministic
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entities: BTreeMap<(EntityKind, String), StoredEntity>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of records of one kind
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.keys().filter(|(entry_kind, _)| *entry_kind == kind).count()
    }

    /// All records of one kind, in id order
    pub fn all<E: Entity>(&self) -> Vec<E> {
        self.entities
            .iter()
            .filter(|((kind, _), _)| *kind == E::KIND)
            .filter_map(|(_, stored)| E::from_stored(stored))
            .collect()
    }
}

impl EntityStore for MemoryStore {
    fn load<E: Entity>(&self, id: &str) -> Option<E> {
        self.entities
            .get(&(E::KIND, id.to_string()))
            .and_then(E::from_stored)
    }

    fn save<E: Entity>(&mut self, entity: &E) {
        self.entities
            .insert((E::KIND, entity.id().to_string()), entity.clone().into_stored());
    }

    fn remove(&mut self, kind: EntityKind, id: &str) {
        self.entities.remove(&(kind, id.to_string()));
    }

    fn contains(&self, kind: EntityKind, id: &str) -> bool {
        self.entities.contains_key(&(kind, id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Bundle, Factory, User};
    use substreams::scalar::BigDecimal;

    #[test]
    fn saves_loads_and_removes() {
        let mut store = MemoryStore::new();
        store.save(&Factory::new("0xfactory"));
        store.save(&Bundle::new());

        assert_eq!(store.len(), 2);
        assert_eq!(store.load::<Factory>("0xfactory").unwrap().pool_count, 0);
        assert!(store.load::<Bundle>("0xfactory").is_none());

        store.remove(EntityKind::Factory, "0xfactory");
        assert!(!store.contains(EntityKind::Factory, "0xfactory"));
        assert_eq!(store.count(EntityKind::Bundle), 1);
    }

    #[test]
    fn save_overwrites_and_lists_by_kind() {
        let mut store = MemoryStore::new();
        for id in ["0xb", "0xa"] {
            store.save(&User {
                id: id.to_string(),
                usd_swapped: BigDecimal::zero(),
            });
        }
        store.save(&User {
            id: "0xa".to_string(),
            usd_swapped: BigDecimal::one(),
        });

        let users = store.all::<User>();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, "0xa");
        assert_eq!(users[0].usd_swapped, BigDecimal::one());
    }
}
