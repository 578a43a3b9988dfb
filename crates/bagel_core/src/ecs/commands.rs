//! # Commands
//!
//! Deferred structural changes.
//!
//! A system iterating the world holds `&World`, so it cannot add or remove
//! components in place. It records commands through [`Commands`] instead;
//! [`World::step`] applies them in record order at the frame boundary.
//!
//! ## Invariants
//! - Commands are applied in the order they are recorded.
//! - Identities destroyed during a flush are not recycled until the flush
//!   ends, so a later command in the same flush cannot hit a new occupant.

use parking_lot::Mutex;

use super::bundle::ComponentBundle;
use super::component::Component;
use super::entity::Entity;
use super::world::World;
use crate::error::BagelResult;

/// Typed insertion, erased until the flush.
pub(crate) type Inserter = Box<dyn FnOnce(&mut World, Entity) -> BagelResult<()> + Send>;

/// A recorded structural change.
pub(crate) enum Command {
    /// Create an entity and attach a bundle.
    Spawn {
        /// Attaches the bundle.
        insert: Inserter,
    },

    /// Attach or overwrite components on an existing entity.
    Insert {
        /// Target entity.
        entity: Entity,
        /// Attaches the value.
        insert: Inserter,
    },

    /// Remove one component type.
    Remove {
        /// Target entity.
        entity: Entity,
        /// Monomorphized `remove_component::<T>`.
        remove: fn(&mut World, Entity),
    },

    /// Remove every component and retire the identity.
    Destroy {
        /// Target entity.
        entity: Entity,
    },
}

/// Ordered buffer of pending commands.
#[derive(Default)]
pub(crate) struct CommandQueue {
    commands: Vec<Command>,
}

impl CommandQueue {
    #[inline]
    pub(crate) fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.commands.len()
    }

    /// Takes every pending command, leaving the queue empty.
    pub(crate) fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }
}

/// Records structural changes through a shared world borrow.
///
/// # Example
///
/// ```rust,ignore
/// let tagged = world.query_with::<(DestroyedTag,)>();
/// for entity in tagged {
///     world.commands().destroy(entity);
/// }
/// world.step()?;
/// ```
pub struct Commands<'w> {
    queue: &'w Mutex<CommandQueue>,
}

impl<'w> Commands<'w> {
    pub(crate) fn new(queue: &'w Mutex<CommandQueue>) -> Self {
        Self { queue }
    }

    /// Queues creation of a new entity with `bundle` attached.
    pub fn spawn<B: ComponentBundle>(&self, bundle: B) {
        self.queue.lock().push(Command::Spawn {
            insert: Box::new(move |world, entity| world.add_all(entity, bundle)),
        });
    }

    /// Queues attaching (or overwriting) `component` on `entity`.
    pub fn insert<T: Component>(&self, entity: Entity, component: T) {
        self.queue.lock().push(Command::Insert {
            entity,
            insert: Box::new(move |world, entity| world.add_component(entity, component)),
        });
    }

    /// Queues removal of `T` from `entity`.
    pub fn remove<T: Component>(&self, entity: Entity) {
        self.queue.lock().push(Command::Remove {
            entity,
            remove: |world, entity| {
                world.remove_component::<T>(entity);
            },
        });
    }

    /// Queues destruction of `entity`.
    pub fn destroy(&self, entity: Entity) {
        self.queue.lock().push(Command::Destroy { entity });
    }

    /// Number of commands waiting for the next `step`.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }
}

/// Outcome of one [`World::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Frame number that just ended.
    pub frame: u64,
    /// Commands applied.
    pub applied: usize,
    /// Commands skipped because their target was already destroyed.
    pub skipped: usize,
}
