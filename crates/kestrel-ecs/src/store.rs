use std::collections::{HashMap, HashSet};

use kestrel_core::EntityId;

use crate::component::{Component, ComponentCell, ComponentKind};
use crate::entity::{EntityMut, EntityRef};
use crate::error::EcsError;

/// Sole owner of all entity/component state.
///
/// The store keeps two inverted indices and maintains them together on every
/// mutation: entity -> (kind -> instance), and kind -> set of entities. The
/// first gives O(1) component lookup per entity; the second makes queries
/// proportional to the seed kind's entity set instead of all entities.
///
/// An entry in `by_entity` exists (possibly empty) for every live entity, so
/// key presence doubles as the live set.
#[derive(Default)]
pub struct ComponentStore {
    by_entity: HashMap<EntityId, HashMap<ComponentKind, ComponentCell>>,
    by_kind: HashMap<ComponentKind, HashSet<EntityId>>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Entity management ----

    /// Allocate a fresh entity with no components. Never fails.
    pub fn create_entity(&mut self) -> EntityId {
        let id = EntityId::new();
        self.by_entity.insert(id, HashMap::new());
        id
    }

    /// Delete an entity, removing every component it holds from both
    /// indices. Returns `false` when the id is not live; deleting an
    /// unknown id is a defined no-op outcome, not a fault.
    pub fn delete_entity(&mut self, id: EntityId) -> bool {
        let Some(components) = self.by_entity.remove(&id) else {
            return false;
        };
        for kind in components.keys() {
            self.unindex(*kind, id);
        }
        true
    }

    /// Whether the store considers this id live.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.by_entity.contains_key(&id)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.by_entity.len()
    }

    /// A read-only view of a live entity, or `None` when the id is not live.
    pub fn entity(&self, id: EntityId) -> Option<EntityRef<'_>> {
        self.is_alive(id).then(|| EntityRef::new(self, id))
    }

    /// A mutable view of a live entity, or `None` when the id is not live.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<EntityMut<'_>> {
        if self.is_alive(id) {
            Some(EntityMut::new(self, id))
        } else {
            None
        }
    }

    // ---- Component management ----

    /// Attach a component to a live entity, replacing any prior instance of
    /// the same kind. Fails with `UnknownEntity` when the id is not live.
    pub fn add_component<T: Component>(
        &mut self,
        id: EntityId,
        component: T,
    ) -> Result<(), EcsError> {
        let kind = ComponentKind::of::<T>();
        let components = self
            .by_entity
            .get_mut(&id)
            .ok_or(EcsError::UnknownEntity(id))?;
        components.insert(kind, Box::new(component));
        self.by_kind.entry(kind).or_default().insert(id);
        Ok(())
    }

    /// Detach one component kind from a live entity. An absent kind is
    /// silently ignored; the operation is idempotent.
    pub fn remove_component<T: Component>(&mut self, id: EntityId) -> Result<(), EcsError> {
        self.remove_components(id, &[ComponentKind::of::<T>()])
    }

    /// Detach the given component kinds from a live entity. Absent kinds are
    /// silently ignored. Fails with `UnknownEntity` when the id is not live.
    pub fn remove_components(
        &mut self,
        id: EntityId,
        kinds: &[ComponentKind],
    ) -> Result<(), EcsError> {
        let components = self
            .by_entity
            .get_mut(&id)
            .ok_or(EcsError::UnknownEntity(id))?;
        let removed: Vec<ComponentKind> = kinds
            .iter()
            .filter(|kind| components.remove(*kind).is_some())
            .copied()
            .collect();
        for kind in removed {
            self.unindex(kind, id);
        }
        Ok(())
    }

    /// The component of type `T` on an entity, or `None` when the entity is
    /// not live or does not hold one. Never fails.
    pub fn get_component<T: Component>(&self, id: EntityId) -> Option<&T> {
        self.by_entity
            .get(&id)?
            .get(&ComponentKind::of::<T>())?
            .downcast_ref()
    }

    /// Mutable access to the component of type `T` on an entity.
    pub fn get_component_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        self.by_entity
            .get_mut(&id)?
            .get_mut(&ComponentKind::of::<T>())?
            .downcast_mut()
    }

    /// The component of type `T` on an entity, for call sites that have
    /// already proven it exists (e.g. via a query that required the kind).
    ///
    /// # Panics
    /// Panics when the component is absent. Only use this behind such a
    /// proof; otherwise reach for [`get_component`](Self::get_component).
    pub fn expect_component<T: Component>(&self, id: EntityId) -> &T {
        self.get_component(id).unwrap_or_else(|| {
            panic!(
                "missing component {} on entity {id}",
                ComponentKind::of::<T>().name()
            )
        })
    }

    /// Mutable variant of [`expect_component`](Self::expect_component).
    ///
    /// # Panics
    /// Panics when the component is absent.
    pub fn expect_component_mut<T: Component>(&mut self, id: EntityId) -> &mut T {
        match self.get_component_mut(id) {
            Some(component) => component,
            None => panic!(
                "missing component {} on entity {id}",
                ComponentKind::of::<T>().name()
            ),
        }
    }

    /// Whether a live entity holds every one of the given kinds.
    pub fn has_components(&self, id: EntityId, kinds: &[ComponentKind]) -> bool {
        self.by_entity
            .get(&id)
            .is_some_and(|components| kinds.iter().all(|kind| components.contains_key(kind)))
    }

    // ---- Queries ----

    /// All entities holding every one of the given kinds, computed as the
    /// intersection of the per-kind entity sets seeded from the first kind.
    ///
    /// Result order is the seed set's iteration order and is not guaranteed
    /// stable across insertions or deletions. Fails with `InvalidQuery` when
    /// zero kinds are requested.
    pub fn query_entities(&self, kinds: &[ComponentKind]) -> Result<Vec<EntityId>, EcsError> {
        let (seed_kind, rest) = kinds.split_first().ok_or(EcsError::InvalidQuery)?;
        let Some(seed) = self.by_kind.get(seed_kind) else {
            return Ok(Vec::new());
        };
        Ok(seed
            .iter()
            .filter(|id| {
                rest.iter().all(|kind| {
                    self.by_kind
                        .get(kind)
                        .is_some_and(|entities| entities.contains(id))
                })
            })
            .copied()
            .collect())
    }

    /// Drop `id` from `by_kind[kind]`, discarding the set once empty.
    fn unindex(&mut self, kind: ComponentKind, id: EntityId) {
        if let Some(entities) = self.by_kind.get_mut(&kind) {
            entities.remove(&id);
            if entities.is_empty() {
                self.by_kind.remove(&kind);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Speed(f32);

    #[derive(Debug, Clone, PartialEq)]
    struct Tag;

    /// The bidirectional index invariant: a kind is present on an entity iff
    /// the entity is in that kind's set.
    fn assert_index_symmetry(store: &ComponentStore) {
        for (id, components) in &store.by_entity {
            for kind in components.keys() {
                assert!(
                    store.by_kind.get(kind).is_some_and(|set| set.contains(id)),
                    "{kind:?} on {id} missing from by_kind"
                );
            }
        }
        for (kind, entities) in &store.by_kind {
            for id in entities {
                assert!(
                    store
                        .by_entity
                        .get(id)
                        .is_some_and(|components| components.contains_key(kind)),
                    "{id} in by_kind[{kind:?}] but not holding it"
                );
            }
        }
    }

    #[test]
    fn create_and_delete() {
        let mut store = ComponentStore::new();
        let id = store.create_entity();
        assert!(store.is_alive(id));
        assert_eq!(store.entity_count(), 1);

        assert!(store.delete_entity(id));
        assert!(!store.is_alive(id));
        assert!(store.entity(id).is_none());
        assert_eq!(store.entity_count(), 0);
    }

    #[test]
    fn delete_unknown_is_false_not_error() {
        let mut store = ComponentStore::new();
        assert!(!store.delete_entity(EntityId::new()));
    }

    #[test]
    fn created_ids_are_distinct() {
        let mut store = ComponentStore::new();
        let ids: std::collections::HashSet<EntityId> =
            (0..100).map(|_| store.create_entity()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn add_get_remove_component() {
        let mut store = ComponentStore::new();
        let id = store.create_entity();

        store.add_component(id, Position { x: 1.0, y: 2.0 }).unwrap();
        assert_eq!(
            store.get_component::<Position>(id),
            Some(&Position { x: 1.0, y: 2.0 })
        );
        assert!(store.has_components(id, &[ComponentKind::of::<Position>()]));
        assert_index_symmetry(&store);

        store.remove_component::<Position>(id).unwrap();
        assert_eq!(store.get_component::<Position>(id), None);
        assert!(!store.has_components(id, &[ComponentKind::of::<Position>()]));
        assert_index_symmetry(&store);
    }

    #[test]
    fn second_add_replaces_first() {
        let mut store = ComponentStore::new();
        let id = store.create_entity();
        store.add_component(id, Speed(1.0)).unwrap();
        store.add_component(id, Speed(2.0)).unwrap();
        assert_eq!(store.get_component::<Speed>(id), Some(&Speed(2.0)));
        assert_index_symmetry(&store);
    }

    #[test]
    fn removal_is_idempotent() {
        let mut store = ComponentStore::new();
        let id = store.create_entity();
        store.add_component(id, Tag).unwrap();

        store.remove_component::<Tag>(id).unwrap();
        // Second removal of an absent kind is a no-op, not an error.
        store.remove_component::<Tag>(id).unwrap();
        assert_eq!(store.get_component::<Tag>(id), None);
        assert_index_symmetry(&store);
    }

    #[test]
    fn mutation_of_dead_entity_fails() {
        let mut store = ComponentStore::new();
        let id = store.create_entity();
        store.delete_entity(id);

        assert_eq!(
            store.add_component(id, Tag),
            Err(EcsError::UnknownEntity(id))
        );
        assert_eq!(
            store.remove_component::<Tag>(id),
            Err(EcsError::UnknownEntity(id))
        );
        // The failed add must not leave an orphaned index entry behind.
        assert_eq!(store.query_entities(&[ComponentKind::of::<Tag>()]), Ok(vec![]));
        assert_index_symmetry(&store);
    }

    #[test]
    fn deletion_scrubs_every_index() {
        let mut store = ComponentStore::new();
        let id = store.create_entity();
        let other = store.create_entity();
        store.add_component(id, Position { x: 0.0, y: 0.0 }).unwrap();
        store.add_component(id, Speed(3.0)).unwrap();
        store.add_component(other, Speed(4.0)).unwrap();

        assert!(store.delete_entity(id));
        assert!(store.entity(id).is_none());
        assert_eq!(
            store.query_entities(&[ComponentKind::of::<Position>()]),
            Ok(vec![])
        );
        assert_eq!(
            store.query_entities(&[ComponentKind::of::<Speed>()]),
            Ok(vec![other])
        );
        assert_index_symmetry(&store);
    }

    #[test]
    fn query_intersects_kinds() {
        let mut store = ComponentStore::new();
        let e1 = store.create_entity();
        let e2 = store.create_entity();
        let e3 = store.create_entity();
        store.add_component(e1, Position { x: 0.0, y: 0.0 }).unwrap();
        store.add_component(e1, Speed(1.0)).unwrap();
        store.add_component(e2, Position { x: 1.0, y: 1.0 }).unwrap();
        store.add_component(e3, Speed(2.0)).unwrap();

        let both = store
            .query_entities(&[ComponentKind::of::<Position>(), ComponentKind::of::<Speed>()])
            .unwrap();
        assert_eq!(both, vec![e1]);

        let mut positions = store
            .query_entities(&[ComponentKind::of::<Position>()])
            .unwrap();
        positions.sort_by_key(|id| id.0);
        let mut expected = vec![e1, e2];
        expected.sort_by_key(|id| id.0);
        assert_eq!(positions, expected);
    }

    #[test]
    fn query_with_zero_kinds_fails() {
        let store = ComponentStore::new();
        assert_eq!(store.query_entities(&[]), Err(EcsError::InvalidQuery));
    }

    #[test]
    fn query_on_unseen_kind_is_empty() {
        let mut store = ComponentStore::new();
        store.create_entity();
        assert_eq!(store.query_entities(&[ComponentKind::of::<Tag>()]), Ok(vec![]));
    }

    #[test]
    fn expect_component_returns_proven_value() {
        let mut store = ComponentStore::new();
        let id = store.create_entity();
        store.add_component(id, Speed(9.0)).unwrap();
        assert_eq!(store.expect_component::<Speed>(id), &Speed(9.0));
        store.expect_component_mut::<Speed>(id).0 = 10.0;
        assert_eq!(store.expect_component::<Speed>(id), &Speed(10.0));
    }

    #[test]
    #[should_panic(expected = "missing component")]
    fn expect_component_panics_when_absent() {
        let mut store = ComponentStore::new();
        let id = store.create_entity();
        store.expect_component::<Speed>(id);
    }
}
