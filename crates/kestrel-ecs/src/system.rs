use std::time::Duration;

use crate::world::World;

/// A logic unit ticked once per frame by the world.
///
/// `configure` runs synchronously when the system is attached, before it is
/// eligible for ticking; `unconfigure` must undo everything `configure` set
/// up and runs after the system has been detached, so it receives no ticks
/// during teardown. Systems with no setup or teardown needs keep the empty
/// default bodies.
pub trait System {
    fn configure(&mut self, _world: &mut World) {}

    fn unconfigure(&mut self, _world: &mut World) {}

    /// Per-frame update. `delta` is the wall-clock time elapsed since the
    /// previous tick; the first tick measures from `start()`.
    fn tick(&mut self, world: &mut World, delta: Duration);
}

/// Registration token returned by [`World::add_system`], used to remove the
/// system again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemId(pub(crate) u64);
