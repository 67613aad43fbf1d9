use kestrel_core::EntityId;

use crate::component::{Component, ComponentKind};
use crate::error::EcsError;
use crate::store::ComponentStore;

/// A read-only view of one live entity.
///
/// Views carry no state beyond the bound id and a borrow of the store; every
/// call forwards to the store. A view can only be obtained while the entity
/// is live, and the borrow keeps it live for the view's lifetime, so a view
/// never dangles.
pub struct EntityRef<'a> {
    store: &'a ComponentStore,
    id: EntityId,
}

impl<'a> EntityRef<'a> {
    pub(crate) fn new(store: &'a ComponentStore, id: EntityId) -> Self {
        Self { store, id }
    }

    /// The bound entity id.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Whether the store still considers the bound id live.
    pub fn is_valid(&self) -> bool {
        self.store.is_alive(self.id)
    }

    /// The component of type `T`, or `None` when absent.
    pub fn get<T: Component>(&self) -> Option<&'a T> {
        self.store.get_component(self.id)
    }

    /// The component of type `T`, for call sites that have already proven it
    /// exists.
    ///
    /// # Panics
    /// Panics when the component is absent.
    pub fn expect<T: Component>(&self) -> &'a T {
        self.store.expect_component(self.id)
    }

    /// Whether the entity holds every one of the given kinds.
    pub fn has(&self, kinds: &[ComponentKind]) -> bool {
        self.store.has_components(self.id, kinds)
    }
}

/// A mutable view of one live entity, forwarding all mutations to the store.
pub struct EntityMut<'a> {
    store: &'a mut ComponentStore,
    id: EntityId,
}

impl<'a> EntityMut<'a> {
    pub(crate) fn new(store: &'a mut ComponentStore, id: EntityId) -> Self {
        Self { store, id }
    }

    /// The bound entity id.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Whether the store still considers the bound id live.
    pub fn is_valid(&self) -> bool {
        self.store.is_alive(self.id)
    }

    /// Attach a component, replacing any prior instance of the same kind.
    pub fn add<T: Component>(&mut self, component: T) -> Result<(), EcsError> {
        self.store.add_component(self.id, component)
    }

    /// Detach the given component kinds; absent kinds are silently ignored.
    pub fn remove(&mut self, kinds: &[ComponentKind]) -> Result<(), EcsError> {
        self.store.remove_components(self.id, kinds)
    }

    /// The component of type `T`, or `None` when absent.
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.store.get_component(self.id)
    }

    /// Mutable access to the component of type `T`.
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.store.get_component_mut(self.id)
    }

    /// The component of type `T`, for call sites that have already proven it
    /// exists.
    ///
    /// # Panics
    /// Panics when the component is absent.
    pub fn expect<T: Component>(&self) -> &T {
        self.store.expect_component(self.id)
    }

    /// Mutable variant of [`expect`](Self::expect).
    ///
    /// # Panics
    /// Panics when the component is absent.
    pub fn expect_mut<T: Component>(&mut self) -> &mut T {
        self.store.expect_component_mut(self.id)
    }

    /// Whether the entity holds every one of the given kinds.
    pub fn has(&self, kinds: &[ComponentKind]) -> bool {
        self.store.has_components(self.id, kinds)
    }

    /// Delete the underlying entity, consuming the view.
    pub fn destroy(self) -> bool {
        self.store.delete_entity(self.id)
    }
}
