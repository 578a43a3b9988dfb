//! # ECS World
//!
//! The central container for all entities and components. Every structural
//! operation updates a storage and the matching mask bit inside one `&mut`
//! call, so no reader ever sees the two disagree.
//!
//! Systems scan `[0, max_id]` and select entities with a mask test:
//!
//! ```rust,ignore
//! let required = world.mask_of::<(Position, Velocity)>();
//! for entity in world.query_with::<(Position, Velocity)>() {
//!     let vel = *world.get_component::<Velocity>(entity);
//!     world.get_component_mut::<Position>(entity).x += vel.dx;
//! }
//! ```

use parking_lot::Mutex;

use super::bundle::{ComponentBundle, ComponentSet};
use super::commands::{Command, CommandQueue, Commands, StepReport};
use super::component::{Component, ComponentId, ComponentInfo, ComponentRegistry};
use super::entity::{Entity, EntityAllocator};
use super::mask::{Mask, MaskTable};
use super::storage::{AnyColumn, Column, Storage};
use crate::config::WorldConfig;
use crate::error::{BagelError, BagelResult};

/// The ECS World - registry of entities, masks, and component storages.
///
/// Construct one per process (or per test) and pass it to every system.
pub struct World {
    /// Identity allocation and liveness.
    entities: EntityAllocator,
    /// One mask per identity slot.
    masks: MaskTable,
    /// Component type -> mask bit.
    registry: ComponentRegistry,
    /// Storage per registered component, indexed by `ComponentId`.
    columns: Vec<Box<dyn AnyColumn>>,
    /// Structural changes waiting for `step`.
    commands: Mutex<CommandQueue>,
    /// Completed frame count.
    frame: u64,
}

impl World {
    /// Creates a world from a validated configuration.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration fails validation.
    pub fn new(config: WorldConfig) -> BagelResult<Self> {
        config.validate()?;
        let capacity = config.initial_capacity;

        Ok(Self {
            entities: EntityAllocator::new(capacity, config.dynamic_resize),
            masks: MaskTable::new(capacity as usize),
            registry: ComponentRegistry::new(config.max_components),
            columns: Vec::new(),
            commands: Mutex::new(CommandQueue::default()),
            frame: 0,
        })
    }

    /// Creates a growable world with the given starting capacity.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn with_capacity(capacity: u32) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        let config = WorldConfig {
            initial_capacity: capacity,
            ..WorldConfig::default()
        };
        match Self::new(config) {
            Ok(world) => world,
            Err(e) => panic!("{e}"),
        }
    }

    /// Returns the current entity capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.entities.capacity()
    }

    /// Returns the number of live entities.
    #[inline]
    #[must_use]
    pub const fn live_count(&self) -> usize {
        self.entities.live_count()
    }

    /// Returns the number of completed frames.
    #[inline]
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Creates an entity with an empty mask.
    ///
    /// # Errors
    ///
    /// `CapacityExhausted` when full and dynamic resizing is off.
    pub fn create_entity(&mut self) -> BagelResult<Entity> {
        let entity = self.entities.create()?;
        self.sync_capacity();
        debug_assert!(self.masks.get(entity).is_empty(), "reused identity kept bits");
        tracing::debug!("created entity {}", entity);
        Ok(entity)
    }

    /// Creates an entity and attaches `bundle`.
    ///
    /// # Errors
    ///
    /// Capacity or registration errors.
    pub fn spawn<B: ComponentBundle>(&mut self, bundle: B) -> BagelResult<Entity> {
        let entity = self.create_entity()?;
        self.add_all(entity, bundle)?;
        Ok(entity)
    }

    /// Grows masks and storages after the allocator grew.
    fn sync_capacity(&mut self) {
        let capacity = self.entities.capacity() as usize;
        if capacity > self.masks.len() {
            self.masks.grow(capacity);
            for column in &mut self.columns {
                column.grow(capacity);
            }
        }
    }

    /// Checks whether an identity is live.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    fn ensure_alive(&self, entity: Entity) -> BagelResult<()> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(BagelError::InvalidEntity {
                entity,
                max_id: self.max_id(),
            })
        }
    }

    /// Largest identity ever allocated; the inclusive bound of a full scan.
    #[inline]
    #[must_use]
    pub fn max_id(&self) -> Option<Entity> {
        self.entities.high_water_mark()
    }

    /// Every identity in `[0, max_id]`, live or not.
    pub fn ids(&self) -> impl Iterator<Item = Entity> {
        let end = self.max_id().map_or(0, |e| e.index() + 1);
        (0..end).map(Entity::new)
    }

    /// Removes every component of `entity` and retires its identity.
    ///
    /// # Errors
    ///
    /// `InvalidEntity` if the identity is not live.
    pub fn destroy_entity(&mut self, entity: Entity) -> BagelResult<()> {
        self.ensure_alive(entity)?;
        self.strip(entity);
        self.entities.release(entity);
        tracing::debug!("destroyed entity {}", entity);
        Ok(())
    }

    /// Removes every present component, one set bit at a time.
    fn strip(&mut self, entity: Entity) {
        let mask = self.masks.get(entity);
        for id in mask.iter() {
            self.columns[id.slot()].remove_entity(entity);
            self.masks.get_mut(entity).clear(id);
        }
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Registers `T` (idempotent) and returns its mask bit.
    ///
    /// # Errors
    ///
    /// `TooManyComponents` or `RegistryFrozen` for a new type.
    pub fn register<T: Component>(&mut self) -> BagelResult<ComponentId> {
        let (id, newly) = self.registry.register::<T>()?;
        if newly {
            debug_assert_eq!(id.slot(), self.columns.len());
            self.columns
                .push(Box::new(Column::<T>::new(self.entities.capacity() as usize)));
        }
        Ok(id)
    }

    /// Forbids registering any further component types.
    pub fn freeze_components(&mut self) {
        self.registry.freeze();
    }

    /// Returns the mask bit of `T`, if registered.
    #[inline]
    #[must_use]
    pub fn component_id<T: Component>(&self) -> Option<ComponentId> {
        self.registry.id_of::<T>()
    }

    /// Diagnostics for a registered component.
    #[must_use]
    pub fn component_info(&self, id: ComponentId) -> Option<&ComponentInfo> {
        self.registry.info(id)
    }

    /// Number of entities holding the component at `id`.
    #[must_use]
    pub fn component_count(&self, id: ComponentId) -> usize {
        self.columns.get(id.slot()).map_or(0, |column| column.len())
    }

    fn column<T: Component>(&self) -> Option<&Column<T>> {
        let id = self.registry.id_of::<T>()?;
        self.columns[id.slot()].as_any().downcast_ref::<Column<T>>()
    }

    fn column_mut<T: Component>(&mut self) -> Option<&mut Column<T>> {
        let id = self.registry.id_of::<T>()?;
        self.columns[id.slot()].as_any_mut().downcast_mut::<Column<T>>()
    }

    /// Read-only view of `T`'s storage, for iteration-heavy systems.
    #[must_use]
    pub fn storage<T: Component>(&self) -> Option<&T::Storage> {
        self.column::<T>().map(|column| &column.storage)
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Attaches `value` to `entity`, overwriting any existing `T`.
    ///
    /// # Errors
    ///
    /// `InvalidEntity` if the identity is not live; registration errors if
    /// `T` is new.
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) -> BagelResult<()> {
        self.ensure_alive(entity)?;
        let id = self.register::<T>()?;

        let Some(column) = self.column_mut::<T>() else {
            unreachable!("registered component has no column");
        };
        column.storage.set(entity, value);
        self.masks.get_mut(entity).set(id);

        tracing::trace!("entity {} += {}", entity, std::any::type_name::<T>());
        Ok(())
    }

    /// Attaches several components in one call.
    ///
    /// # Errors
    ///
    /// The first failing `add_component`; earlier elements stay attached.
    pub fn add_all<B: ComponentBundle>(&mut self, entity: Entity, bundle: B) -> BagelResult<()> {
        bundle.insert_into(self, entity)
    }

    /// Detaches `T` from `entity`, returning the old value.
    ///
    /// A no-op returning `None` if the component is absent, the type was
    /// never registered, or the identity is not live.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let id = self.registry.id_of::<T>()?;
        if !self.masks.get(entity).has(id) {
            return None;
        }

        let value = self.column_mut::<T>()?.storage.remove(entity);
        self.masks.get_mut(entity).clear(id);

        tracing::trace!("entity {} -= {}", entity, std::any::type_name::<T>());
        value
    }

    /// Checks whether `entity` currently holds `T`.
    #[inline]
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.registry
            .id_of::<T>()
            .is_some_and(|id| self.masks.get(entity).has(id))
    }

    /// Reads `T` from `entity`.
    ///
    /// # Errors
    ///
    /// `MissingComponent` if absent.
    pub fn try_get<T: Component>(&self, entity: Entity) -> BagelResult<&T> {
        self.column::<T>()
            .and_then(|column| column.storage.get(entity))
            .ok_or_else(|| BagelError::MissingComponent {
                entity,
                component: std::any::type_name::<T>(),
            })
    }

    /// Mutably reads `T` from `entity`.
    ///
    /// # Errors
    ///
    /// `MissingComponent` if absent.
    pub fn try_get_mut<T: Component>(&mut self, entity: Entity) -> BagelResult<&mut T> {
        self.column_mut::<T>()
            .and_then(|column| column.storage.get_mut(entity))
            .ok_or_else(|| BagelError::MissingComponent {
                entity,
                component: std::any::type_name::<T>(),
            })
    }

    /// Reads `T` from `entity`.
    ///
    /// # Panics
    ///
    /// Panics if the entity does not hold `T`. Test the mask first.
    #[track_caller]
    #[must_use]
    pub fn get_component<T: Component>(&self, entity: Entity) -> &T {
        match self.try_get::<T>(entity) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }

    /// Mutably reads `T` from `entity`.
    ///
    /// # Panics
    ///
    /// Panics if the entity does not hold `T`. Test the mask first.
    #[track_caller]
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        match self.try_get_mut::<T>(entity) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }

    // =========================================================================
    // Masks & queries
    // =========================================================================

    /// Returns the entity's current mask (empty for dead identities).
    #[inline]
    #[must_use]
    pub fn mask(&self, entity: Entity) -> Mask {
        self.masks.get(entity)
    }

    /// Required mask for a tuple of component types, or `None` if any was
    /// never registered (so nothing can match).
    #[must_use]
    pub fn mask_of<S: ComponentSet>(&self) -> Option<Mask> {
        S::mask(&self.registry)
    }

    /// Live entities whose mask is a superset of `required`, in identity order.
    pub fn query(&self, required: Mask) -> impl Iterator<Item = Entity> + '_ {
        self.ids()
            .filter(move |&entity| self.masks.test(entity, required) && self.is_alive(entity))
    }

    /// Collects [`query`](Self::query) so the caller may mutate while walking it.
    #[must_use]
    pub fn query_snapshot(&self, required: Mask) -> Vec<Entity> {
        self.query(required).collect()
    }

    /// Snapshot of live entities holding every type in `S`.
    #[must_use]
    pub fn query_with<S: ComponentSet>(&self) -> Vec<Entity> {
        match self.mask_of::<S>() {
            Some(required) => self.query_snapshot(required),
            None => Vec::new(),
        }
    }

    /// Returns `true` if every mask bit agrees with its storage for every
    /// identity in `[0, max_id]`.
    #[must_use]
    pub fn is_coherent(&self) -> bool {
        self.ids().all(|entity| {
            let mask = self.masks.get(entity);
            self.columns.iter().enumerate().all(|(slot, column)| {
                let id = ComponentId::new(slot as u8);
                mask.has(id) == column.has_entity(entity)
            })
        })
    }

    // =========================================================================
    // Frame boundary
    // =========================================================================

    /// Recorder for deferred structural changes, usable through `&World`.
    #[must_use]
    pub fn commands(&self) -> Commands<'_> {
        Commands::new(&self.commands)
    }

    /// Applies every deferred command in record order and ends the frame.
    ///
    /// Commands aimed at an entity that is already gone are skipped.
    /// Identities destroyed here return to the free list only after the
    /// whole queue has been applied.
    ///
    /// # Errors
    ///
    /// The first failing command. Later commands are still applied, the
    /// frame still ends, and an entity whose deferred spawn failed is
    /// destroyed again.
    pub fn step(&mut self) -> BagelResult<StepReport> {
        let commands = self.commands.get_mut().take();
        let mut report = StepReport {
            frame: self.frame,
            ..StepReport::default()
        };
        let mut retired: Vec<Entity> = Vec::new();
        let mut first_error: Option<BagelError> = None;

        for command in commands {
            let target = match &command {
                Command::Spawn { .. } => None,
                Command::Insert { entity, .. }
                | Command::Remove { entity, .. }
                | Command::Destroy { entity } => Some(*entity),
            };
            if let Some(entity) = target {
                if retired.contains(&entity) || !self.is_alive(entity) {
                    tracing::warn!("skipping deferred command for dead entity {}", entity);
                    report.skipped += 1;
                    continue;
                }
            }

            let outcome = match command {
                Command::Spawn { insert } => match self.create_entity() {
                    Ok(entity) => {
                        let inserted = insert(self, entity);
                        if inserted.is_err() {
                            self.strip(entity);
                            retired.push(entity);
                        }
                        inserted
                    }
                    Err(err) => Err(err),
                },
                Command::Insert { entity, insert } => insert(self, entity),
                Command::Remove { entity, remove } => {
                    remove(self, entity);
                    Ok(())
                }
                Command::Destroy { entity } => {
                    self.strip(entity);
                    retired.push(entity);
                    Ok(())
                }
            };

            match outcome {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    tracing::warn!("deferred command failed: {}", err);
                    first_error.get_or_insert(err);
                }
            }
        }

        for entity in retired {
            self.entities.release(entity);
            tracing::debug!("destroyed entity {}", entity);
        }

        tracing::debug!(
            "frame {} closed: {} applied, {} skipped",
            report.frame,
            report.applied,
            report.skipped
        );
        self.frame += 1;
        match first_error {
            Some(err) => Err(err),
            None => Ok(report),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::with_capacity(WorldConfig::default().initial_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    struct BallTag;

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    struct Hits(u32);

    crate::bagel_components! {
        Position => Packed,
        Velocity => Packed,
        BallTag => Tag,
        Hits => Sparse,
    }

    #[test]
    fn test_world_creation() {
        let world = World::with_capacity(1000);
        assert_eq!(world.capacity(), 1000);
        assert_eq!(world.live_count(), 0);
        assert_eq!(world.max_id(), None);
    }

    #[test]
    fn test_add_get_remove() {
        let mut world = World::with_capacity(8);
        let e = world.create_entity().unwrap();
        assert!(world.mask(e).is_empty());

        world.add_component(e, Position { x: 1.0, y: 2.0 }).unwrap();
        assert!(world.has_component::<Position>(e));
        assert_eq!(world.get_component::<Position>(e).y, 2.0);

        // Overwrite is idempotent on the mask
        world.add_component(e, Position { x: 5.0, y: 5.0 }).unwrap();
        assert_eq!(world.mask(e).count(), 1);
        assert_eq!(world.get_component::<Position>(e).x, 5.0);

        assert_eq!(world.remove_component::<Position>(e), Some(Position { x: 5.0, y: 5.0 }));
        assert!(!world.has_component::<Position>(e));
        assert_eq!(world.remove_component::<Position>(e), None);
        assert_eq!(world.remove_component::<Velocity>(e), None);
    }

    #[test]
    fn test_position_update() {
        let mut world = World::with_capacity(10);
        let e = world
            .spawn((Position::default(), Velocity { dx: 1.0, dy: 2.0 }))
            .unwrap();

        for entity in world.query_with::<(Position, Velocity)>() {
            let vel = *world.get_component::<Velocity>(entity);
            let pos = world.get_component_mut::<Position>(entity);
            pos.x += vel.dx;
            pos.y += vel.dy;
        }

        assert_eq!(*world.get_component::<Position>(e), Position { x: 1.0, y: 2.0 });
    }

    #[test]
    fn test_invalid_entity_rejected() {
        let mut world = World::with_capacity(4);
        let ghost = Entity::new(3);
        assert!(matches!(
            world.add_component(ghost, Hits(1)),
            Err(BagelError::InvalidEntity { .. })
        ));
        assert!(matches!(world.destroy_entity(ghost), Err(BagelError::InvalidEntity { .. })));
    }

    #[test]
    #[should_panic(expected = "has no")]
    fn test_get_missing_component_panics() {
        let mut world = World::with_capacity(4);
        let e = world.spawn((Position::default(),)).unwrap();
        let _ = world.get_component::<Velocity>(e);
    }

    #[test]
    fn test_destroy_clears_every_bit_and_recycles() {
        let mut world = World::with_capacity(4);
        let e = world
            .spawn((Position::default(), BallTag, Hits(3)))
            .unwrap();
        let other = world.spawn((Hits(9),)).unwrap();

        world.destroy_entity(e).unwrap();
        assert!(!world.is_alive(e));
        assert!(world.mask(e).is_empty());
        let hits = world.component_id::<Hits>().unwrap();
        assert_eq!(world.component_count(hits), 1);
        assert_eq!(*world.get_component::<Hits>(other), Hits(9));

        let reused = world.create_entity().unwrap();
        assert_eq!(reused, e);
        assert!(world.mask(reused).is_empty());
        assert!(!world.has_component::<BallTag>(reused));
    }

    #[test]
    fn test_growth_extends_storages() {
        let mut world = World::with_capacity(2);
        let mut spawned = Vec::new();
        for i in 0..5 {
            spawned.push(world.spawn((Hits(i),)).unwrap());
        }
        assert_eq!(world.capacity(), 8);
        for (i, &e) in spawned.iter().enumerate() {
            assert_eq!(world.get_component::<Hits>(e).0, i as u32);
        }
    }

    #[test]
    fn test_deferred_commands_apply_at_step() {
        let mut world = World::with_capacity(8);
        let a = world.spawn((Position::default(), BallTag)).unwrap();
        let b = world.spawn((Position::default(),)).unwrap();

        for entity in world.query_with::<(BallTag,)>() {
            world.commands().destroy(entity);
        }
        world.commands().insert(b, Hits(2));
        world.commands().spawn((Velocity::default(),));
        assert_eq!(world.commands().pending(), 3);

        // Nothing changes until the frame boundary
        assert!(world.is_alive(a));
        assert!(!world.has_component::<Hits>(b));

        let report = world.step().unwrap();
        assert_eq!(report, StepReport { frame: 0, applied: 3, skipped: 0 });
        assert_eq!(world.frame(), 1);
        assert!(!world.is_alive(a));
        assert_eq!(*world.get_component::<Hits>(b), Hits(2));
        assert_eq!(world.query_with::<(Velocity,)>().len(), 1);
    }

    #[test]
    fn test_destroyed_identity_not_reused_within_flush() {
        let mut world = World::with_capacity(8);
        let a = world.spawn((Hits(1),)).unwrap();

        world.commands().destroy(a);
        world.commands().spawn((Hits(2),));
        world.commands().insert(a, BallTag);
        world.commands().destroy(a);

        let report = world.step().unwrap();
        assert_eq!(report.applied, 2);
        assert_eq!(report.skipped, 2);

        let survivors = world.query_with::<(Hits,)>();
        assert_eq!(survivors.len(), 1);
        assert_ne!(survivors[0], a);
        assert!(world.query_with::<(BallTag,)>().is_empty());
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    struct Late;

    crate::bagel_components! {
        Late => Tag,
    }

    #[test]
    fn test_failed_command_does_not_wedge_flush() {
        let mut world = World::new(WorldConfig::fixed(2)).unwrap();
        let a = world.spawn((Hits(1),)).unwrap();
        let b = world.spawn((Hits(2),)).unwrap();
        world.freeze_components();

        world.commands().destroy(a);
        world.commands().insert(b, Late);
        world.commands().insert(b, Hits(99));

        assert!(matches!(world.step(), Err(BagelError::RegistryFrozen { .. })));
        assert_eq!(world.commands().pending(), 0);
        assert_eq!(world.frame(), 1);

        // Destroyed before the failure, still released
        assert!(!world.is_alive(a));
        assert_eq!(world.live_count(), 1);

        // Commands after the failure still ran
        assert_eq!(*world.get_component::<Hits>(b), Hits(99));
        assert!(!world.has_component::<Late>(b));
        assert!(world.is_coherent());

        assert_eq!(world.create_entity().unwrap(), a);
    }

    #[test]
    fn test_failed_spawn_releases_its_entity() {
        let mut world = World::with_capacity(4);
        world.register::<Hits>().unwrap();
        world.freeze_components();

        world.commands().spawn((Hits(5), Late));
        assert!(world.step().is_err());

        assert_eq!(world.live_count(), 0);
        assert!(world.query_with::<(Hits,)>().is_empty());
        assert!(world.is_coherent());
    }
}
