//! # Component Storage
//!
//! Three interchangeable backings for "the data of component `T` across all
//! entities":
//!
//! ```text
//! TagStorage:    presence bits only         [1 0 1 1 0 ...]      (no payload)
//! SparseStorage: indexed by entity id       [Some(a) None Some(b) ...]
//! PackedStorage: dense payloads + indirection
//!                dense:   [a b c]           <- contiguous, no gaps
//!                owners:  [#4 #0 #9]        slot -> entity
//!                slots:   [1 - - - 0 ...]   entity -> slot
//! ```
//!
//! Packed removal swaps the last payload into the hole, so dense order is
//! unspecified and changes across removals. Any reference into a storage is
//! invalidated by the next structural change to that storage.

use std::any::{type_name, Any};
use std::mem::size_of;

use super::component::Component;
use super::entity::Entity;

/// Layout strategy a component type is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// Presence only, zero-sized payload.
    Tag,
    /// Entity-indexed slots.
    Sparse,
    /// Dense array with entity/slot indirection.
    Packed,
}

/// Narrow contract every storage strategy implements.
///
/// Storages never touch masks; keeping the two in step is the world's job.
pub trait Storage<T>: Send + Sync + 'static {
    /// Which strategy this is.
    const KIND: StorageKind;

    /// Creates storage sized for `capacity` entity identities.
    fn with_capacity(capacity: usize) -> Self;

    /// Makes room for identities below `capacity`. Never shrinks.
    fn grow(&mut self, capacity: usize);

    /// Returns `true` if the entity has a value here.
    fn has(&self, entity: Entity) -> bool;

    /// Reads the entity's value.
    fn get(&self, entity: Entity) -> Option<&T>;

    /// Mutably reads the entity's value.
    fn get_mut(&mut self, entity: Entity) -> Option<&mut T>;

    /// Inserts or overwrites the entity's value.
    fn set(&mut self, entity: Entity, value: T);

    /// Deletes the entity's value, returning it.
    fn remove(&mut self, entity: Entity) -> Option<T>;

    /// Number of entities with a value.
    fn len(&self) -> usize;

    /// Returns `true` if no entity has a value.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// TAG STORAGE
// ============================================================================

/// Presence-only storage for zero-sized marker components.
///
/// Keeps one bit per identity (64 identities per `u64`) and a single marker
/// value that every `get` hands out.
pub struct TagStorage<T> {
    /// Bitset: 1 = present. 64 entities per word.
    bits: Vec<u64>,
    /// Cached count of present entities.
    count: usize,
    /// The one marker value.
    marker: T,
}

impl<T> TagStorage<T> {
    #[inline]
    fn locate(entity: Entity) -> (usize, u64) {
        let index = entity.slot();
        (index / 64, 1u64 << (index % 64))
    }

    /// Iterates over the entities carrying the tag, in identity order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.bits.iter().enumerate().flat_map(|(word_index, &word)| {
            let base = word_index * 64;
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let tz = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some(Entity::new((base + tz) as u32))
            })
        })
    }
}

impl<T: Default + Send + Sync + 'static> Storage<T> for TagStorage<T> {
    const KIND: StorageKind = StorageKind::Tag;

    /// # Panics
    ///
    /// Panics if `T` carries a payload.
    fn with_capacity(capacity: usize) -> Self {
        assert!(
            size_of::<T>() == 0,
            "Tag storage requires a zero-sized component, {} is {} bytes",
            type_name::<T>(),
            size_of::<T>()
        );
        Self {
            bits: vec![0u64; capacity.div_ceil(64)],
            count: 0,
            marker: T::default(),
        }
    }

    fn grow(&mut self, capacity: usize) {
        let words = capacity.div_ceil(64);
        if words > self.bits.len() {
            self.bits.resize(words, 0);
        }
    }

    #[inline]
    fn has(&self, entity: Entity) -> bool {
        let (word, bit) = Self::locate(entity);
        self.bits.get(word).is_some_and(|w| w & bit != 0)
    }

    #[inline]
    fn get(&self, entity: Entity) -> Option<&T> {
        self.has(entity).then_some(&self.marker)
    }

    #[inline]
    fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        if self.has(entity) {
            Some(&mut self.marker)
        } else {
            None
        }
    }

    fn set(&mut self, entity: Entity, _value: T) {
        let (word, bit) = Self::locate(entity);
        if word >= self.bits.len() {
            self.bits.resize(word + 1, 0);
        }
        if self.bits[word] & bit == 0 {
            self.bits[word] |= bit;
            self.count += 1;
        }
    }

    fn remove(&mut self, entity: Entity) -> Option<T> {
        let (word, bit) = Self::locate(entity);
        match self.bits.get_mut(word) {
            Some(w) if *w & bit != 0 => {
                *w &= !bit;
                self.count -= 1;
                Some(T::default())
            }
            _ => None,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.count
    }
}

// ============================================================================
// SPARSE STORAGE
// ============================================================================

/// Entity-indexed storage.
///
/// O(1) access regardless of occupancy, O(capacity) memory.
pub struct SparseStorage<T> {
    slots: Vec<Option<T>>,
    count: usize,
}

impl<T> SparseStorage<T> {
    /// Iterates over `(entity, value)` pairs in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (Entity::new(i as u32), v)))
    }

    /// Iterates mutably over `(entity, value)` pairs in identity order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|v| (Entity::new(i as u32), v)))
    }
}

impl<T: Send + Sync + 'static> Storage<T> for SparseStorage<T> {
    const KIND: StorageKind = StorageKind::Sparse;

    fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots, count: 0 }
    }

    fn grow(&mut self, capacity: usize) {
        if capacity > self.slots.len() {
            self.slots.resize_with(capacity, || None);
        }
    }

    #[inline]
    fn has(&self, entity: Entity) -> bool {
        matches!(self.slots.get(entity.slot()), Some(Some(_)))
    }

    #[inline]
    fn get(&self, entity: Entity) -> Option<&T> {
        self.slots.get(entity.slot())?.as_ref()
    }

    #[inline]
    fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slots.get_mut(entity.slot())?.as_mut()
    }

    fn set(&mut self, entity: Entity, value: T) {
        let index = entity.slot();
        if index >= self.slots.len() {
            self.grow(index + 1);
        }
        if self.slots[index].replace(value).is_none() {
            self.count += 1;
        }
    }

    fn remove(&mut self, entity: Entity) -> Option<T> {
        let value = self.slots.get_mut(entity.slot())?.take();
        if value.is_some() {
            self.count -= 1;
        }
        value
    }

    #[inline]
    fn len(&self) -> usize {
        self.count
    }
}

// ============================================================================
// PACKED STORAGE
// ============================================================================

/// Sentinel: entity has no slot in the dense array.
const EMPTY: u32 = u32::MAX;

/// Dense storage for iteration-heavy components.
///
/// `dense` has no gaps: iterating it touches only live data.
pub struct PackedStorage<T> {
    /// Contiguous payloads.
    dense: Vec<T>,
    /// Owner of each dense slot.
    owners: Vec<Entity>,
    /// Dense slot of each entity, or `EMPTY`.
    slots: Vec<u32>,
}

impl<T> PackedStorage<T> {
    #[inline]
    fn slot_of(&self, entity: Entity) -> Option<usize> {
        match self.slots.get(entity.slot()) {
            Some(&slot) if slot != EMPTY => Some(slot as usize),
            _ => None,
        }
    }

    /// Returns the payloads in dense order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.dense
    }

    /// Returns the payloads mutably in dense order.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.dense
    }

    /// Returns the owner of each dense slot.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.owners
    }

    /// Iterates over `(entity, value)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        debug_assert_eq!(self.owners.len(), self.dense.len());
        self.owners.iter().copied().zip(self.dense.iter())
    }

    /// Iterates mutably over `(entity, value)` pairs in dense order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.owners.iter().copied().zip(self.dense.iter_mut())
    }
}

impl<T: Send + Sync + 'static> Storage<T> for PackedStorage<T> {
    const KIND: StorageKind = StorageKind::Packed;

    fn with_capacity(capacity: usize) -> Self {
        Self {
            dense: Vec::new(),
            owners: Vec::new(),
            slots: vec![EMPTY; capacity],
        }
    }

    fn grow(&mut self, capacity: usize) {
        if capacity > self.slots.len() {
            self.slots.resize(capacity, EMPTY);
        }
    }

    #[inline]
    fn has(&self, entity: Entity) -> bool {
        self.slot_of(entity).is_some()
    }

    #[inline]
    fn get(&self, entity: Entity) -> Option<&T> {
        let slot = self.slot_of(entity)?;
        Some(&self.dense[slot])
    }

    #[inline]
    fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let slot = self.slot_of(entity)?;
        Some(&mut self.dense[slot])
    }

    fn set(&mut self, entity: Entity, value: T) {
        if let Some(slot) = self.slot_of(entity) {
            self.dense[slot] = value;
            return;
        }

        let index = entity.slot();
        if index >= self.slots.len() {
            self.grow(index + 1);
        }
        self.slots[index] = self.dense.len() as u32;
        self.dense.push(value);
        self.owners.push(entity);
    }

    fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.slot_of(entity)?;

        let value = self.dense.swap_remove(slot);
        self.owners.swap_remove(slot);
        self.slots[entity.slot()] = EMPTY;

        // The former last element now lives at `slot`
        if let Some(&moved) = self.owners.get(slot) {
            self.slots[moved.slot()] = slot as u32;
        }

        Some(value)
    }

    #[inline]
    fn len(&self) -> usize {
        self.dense.len()
    }
}

// ============================================================================
// TYPE-ERASED COLUMN
// ============================================================================

/// A component type's storage, as held by the world.
pub(crate) struct Column<T: Component> {
    pub(crate) storage: T::Storage,
}

/// Object-safe view of a column for operations that only know a [`ComponentId`].
///
/// [`ComponentId`]: super::component::ComponentId
pub(crate) trait AnyColumn: Send + Sync {
    fn has_entity(&self, entity: Entity) -> bool;
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn grow(&mut self, capacity: usize);
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> Column<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            storage: <T::Storage as Storage<T>>::with_capacity(capacity),
        }
    }
}

impl<T: Component> AnyColumn for Column<T> {
    fn has_entity(&self, entity: Entity) -> bool {
        self.storage.has(entity)
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.storage.remove(entity).is_some()
    }

    fn grow(&mut self, capacity: usize) {
        self.storage.grow(capacity);
    }

    fn len(&self) -> usize {
        self.storage.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
