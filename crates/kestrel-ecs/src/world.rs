use std::time::Instant;

use kestrel_core::EntityId;

use crate::component::{Component, ComponentKind};
use crate::entity::{EntityMut, EntityRef};
use crate::error::EcsError;
use crate::scheduler::{FrameScheduler, TickHandle, TickScheduler};
use crate::store::ComponentStore;
use crate::system::{System, SystemId};

struct SystemSlot {
    id: SystemId,
    /// `None` only while the system is executing its own tick.
    system: Option<Box<dyn System>>,
}

/// The aggregate root: owns one component store, the ordered system
/// registry, and at most one active scheduler.
///
/// Entity and query operations forward verbatim to the store. The frame
/// loop is cooperative and single-threaded: `start` arms the first tick,
/// `run`/`pump` wait for it and dispatch, and every dispatch re-arms the
/// next tick until `stop`.
pub struct World {
    store: ComponentStore,
    systems: Vec<SystemSlot>,
    next_system: u64,
    running: bool,
    last_tick: Instant,
    scheduler: Option<Box<dyn TickScheduler>>,
    pending: Option<TickHandle>,
}

impl World {
    pub fn new() -> Self {
        Self {
            store: ComponentStore::new(),
            systems: Vec::new(),
            next_system: 0,
            running: false,
            last_tick: Instant::now(),
            scheduler: None,
            pending: None,
        }
    }

    // ---- Entity and component facade ----

    /// Allocate a fresh entity with no components.
    pub fn create_entity(&mut self) -> EntityId {
        self.store.create_entity()
    }

    /// Delete an entity and everything it holds. `false` for unknown ids.
    pub fn delete_entity(&mut self, id: EntityId) -> bool {
        self.store.delete_entity(id)
    }

    /// A read-only view of a live entity.
    pub fn entity(&self, id: EntityId) -> Option<EntityRef<'_>> {
        self.store.entity(id)
    }

    /// A mutable view of a live entity.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<EntityMut<'_>> {
        self.store.entity_mut(id)
    }

    /// Whether this id is live.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.store.is_alive(id)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.store.entity_count()
    }

    /// Attach a component, replacing any prior instance of the same kind.
    pub fn add_component<T: Component>(
        &mut self,
        id: EntityId,
        component: T,
    ) -> Result<(), EcsError> {
        self.store.add_component(id, component)
    }

    /// Detach the given component kinds; absent kinds are silently ignored.
    pub fn remove_components(
        &mut self,
        id: EntityId,
        kinds: &[ComponentKind],
    ) -> Result<(), EcsError> {
        self.store.remove_components(id, kinds)
    }

    /// The component of type `T` on an entity, or `None` when absent.
    pub fn get_component<T: Component>(&self, id: EntityId) -> Option<&T> {
        self.store.get_component(id)
    }

    /// Mutable access to the component of type `T` on an entity.
    pub fn get_component_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        self.store.get_component_mut(id)
    }

    /// The component of type `T`, for call sites that have already proven it
    /// exists.
    ///
    /// # Panics
    /// Panics when the component is absent.
    pub fn expect_component<T: Component>(&self, id: EntityId) -> &T {
        self.store.expect_component(id)
    }

    /// Mutable variant of [`expect_component`](Self::expect_component).
    ///
    /// # Panics
    /// Panics when the component is absent.
    pub fn expect_component_mut<T: Component>(&mut self, id: EntityId) -> &mut T {
        self.store.expect_component_mut(id)
    }

    /// Whether a live entity holds every one of the given kinds.
    pub fn has_components(&self, id: EntityId, kinds: &[ComponentKind]) -> bool {
        self.store.has_components(id, kinds)
    }

    /// All entities holding every one of the given kinds. Fails with
    /// `InvalidQuery` when zero kinds are requested; result order is
    /// implementation-defined.
    pub fn with_components(&self, kinds: &[ComponentKind]) -> Result<Vec<EntityId>, EcsError> {
        self.store.query_entities(kinds)
    }

    // ---- System registry ----

    /// Attach a system: `configure` runs synchronously against the world
    /// first, then the system joins the end of the tick order.
    pub fn add_system<S: System + 'static>(&mut self, system: S) -> SystemId {
        let id = SystemId(self.next_system);
        self.next_system += 1;
        let mut system: Box<dyn System> = Box::new(system);
        system.configure(self);
        self.systems.push(SystemSlot {
            id,
            system: Some(system),
        });
        tracing::debug!(system = id.0, "system attached");
        id
    }

    /// Detach a system: it leaves the tick order immediately, then
    /// `unconfigure` runs against the world. Returns `false` for an unknown
    /// id. A system that removes itself mid-tick is unconfigured once its
    /// current tick returns.
    pub fn remove_system(&mut self, id: SystemId) -> bool {
        let Some(pos) = self.systems.iter().position(|slot| slot.id == id) else {
            return false;
        };
        let slot = self.systems.remove(pos);
        if let Some(mut system) = slot.system {
            system.unconfigure(self);
        }
        tracing::debug!(system = id.0, "system detached");
        true
    }

    /// Number of registered systems.
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    // ---- Frame loop ----

    /// Start ticking with the default frame-synchronized scheduler. No-op
    /// when already running.
    pub fn start(&mut self) {
        self.start_with(Box::<FrameScheduler>::default());
    }

    /// Start ticking with the given scheduler, constructed by the caller.
    /// No-op when already running.
    pub fn start_with(&mut self, mut scheduler: Box<dyn TickScheduler>) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_tick = Instant::now();
        self.pending = Some(scheduler.schedule_tick());
        self.scheduler = Some(scheduler);
        tracing::info!("world started");
    }

    /// Stop ticking: cancels the pending tick and releases the scheduler.
    /// No-op when already idle.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let (Some(scheduler), Some(handle)) = (self.scheduler.as_mut(), self.pending.take()) {
            scheduler.cancel_tick(handle);
        }
        self.scheduler = None;
        tracing::info!("world stopped");
    }

    /// Whether the frame loop is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Wait for the pending tick and dispatch it once. Returns whether
    /// another tick is pending afterwards.
    pub fn pump(&mut self) -> bool {
        let Some(handle) = self.pending.take() else {
            return false;
        };
        let Some(mut scheduler) = self.scheduler.take() else {
            return false;
        };
        let fired = scheduler.wait_for_tick(handle);
        self.scheduler = Some(scheduler);
        if let Some(now) = fired {
            self.dispatch_tick(now);
        }
        self.running && self.pending.is_some()
    }

    /// Drive the frame loop until the world is stopped.
    pub fn run(&mut self) {
        while self.pump() {}
    }

    /// The internal tick handler. The running-flag guard at entry closes
    /// the race where a tick fires after `stop` because the scheduler could
    /// not actually cancel it.
    fn dispatch_tick(&mut self, now: Instant) {
        if !self.running {
            tracing::debug!("tick fired after stop, ignoring");
            return;
        }
        let delta = now.duration_since(self.last_tick);
        self.last_tick = now;

        // Snapshot the tick order up front: systems attached mid-frame wait
        // for the next frame, detached ones are skipped.
        let order: Vec<SystemId> = self.systems.iter().map(|slot| slot.id).collect();
        for id in order {
            let Some(pos) = self.systems.iter().position(|slot| slot.id == id) else {
                continue;
            };
            let Some(mut system) = self.systems[pos].system.take() else {
                continue;
            };
            system.tick(self, delta);
            match self.systems.iter().position(|slot| slot.id == id) {
                Some(pos) => self.systems[pos].system = Some(system),
                // The system removed itself during its own tick; its slot is
                // gone, so teardown runs now that the tick has returned.
                None => system.unconfigure(self),
            }
        }

        if self.running {
            if let Some(scheduler) = self.scheduler.as_mut() {
                self.pending = Some(scheduler.schedule_tick());
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for World {
    fn drop(&mut self) {
        self.stop();
        // Systems are torn down with the world.
        let mut slots = std::mem::take(&mut self.systems);
        for slot in &mut slots {
            if let Some(mut system) = slot.system.take() {
                system.unconfigure(self);
            }
        }
    }
}
