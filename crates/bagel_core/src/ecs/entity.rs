//! # Entity Management
//!
//! Entities are small dense integer identities. A destroyed identity goes
//! back on a free list and is handed out again by the next `create`.
//!
//! The allocator also owns the high-water mark: the largest identity ever
//! handed out. Systems scan `[0, max_id]` inclusive.

use std::fmt;

use crate::error::{BagelError, BagelResult};

/// Unique identifier for a live entity.
///
/// Identities are reused after destruction; holding an `Entity` across a
/// `destroy_entity` call is a caller bug.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    /// Creates an entity from its raw index.
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<Entity> for u32 {
    fn from(entity: Entity) -> Self {
        entity.0
    }
}

/// Issues and recycles entity identities.
///
/// # Capacity
///
/// With `dynamic_resize` the capacity doubles when exhausted. Without it,
/// creating past capacity is a configuration error.
#[derive(Debug)]
pub struct EntityAllocator {
    /// Liveness per identity ever handed out; `alive.len() - 1` is the high-water mark.
    alive: Vec<bool>,
    /// Free list of identities for reuse.
    free_indices: Vec<u32>,
    /// Number of currently live identities.
    live_count: usize,
    /// Current capacity.
    capacity: u32,
    /// Whether capacity may grow.
    dynamic_resize: bool,
}

impl EntityAllocator {
    /// Creates an allocator with the given starting capacity.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn new(capacity: u32, dynamic_resize: bool) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        Self {
            alive: Vec::with_capacity(capacity as usize),
            free_indices: Vec::new(),
            live_count: 0,
            capacity,
            dynamic_resize,
        }
    }

    /// Returns the current capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the number of live identities.
    #[inline]
    #[must_use]
    pub const fn live_count(&self) -> usize {
        self.live_count
    }

    /// Returns the largest identity ever allocated, or `None` before the first `create`.
    #[inline]
    #[must_use]
    pub fn high_water_mark(&self) -> Option<Entity> {
        let len = self.alive.len();
        (len > 0).then(|| Entity::new((len - 1) as u32))
    }

    /// Returns a fresh identity, reusing a freed one when available.
    ///
    /// # Errors
    ///
    /// `CapacityExhausted` if every slot is live and dynamic resizing is off
    /// (or the identity space itself is exhausted).
    pub fn create(&mut self) -> BagelResult<Entity> {
        if let Some(index) = self.free_indices.pop() {
            self.alive[index as usize] = true;
            self.live_count += 1;
            return Ok(Entity::new(index));
        }

        let next = self.alive.len() as u32;
        if next >= self.capacity {
            self.grow()?;
        }

        self.alive.push(true);
        self.live_count += 1;
        Ok(Entity::new(next))
    }

    fn grow(&mut self) -> BagelResult<()> {
        if !self.dynamic_resize || self.capacity == u32::MAX {
            return Err(BagelError::CapacityExhausted {
                capacity: self.capacity,
            });
        }

        let grown = self.capacity.saturating_mul(2);
        tracing::debug!("entity capacity grown: {} -> {}", self.capacity, grown);
        self.capacity = grown;
        Ok(())
    }

    /// Checks whether an identity is currently live.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.slot()).copied().unwrap_or(false)
    }

    /// Returns an identity to the free list.
    ///
    /// Returns `false` if it was not live.
    pub fn release(&mut self, entity: Entity) -> bool {
        match self.alive.get_mut(entity.slot()) {
            Some(live) if *live => {
                *live = false;
                self.live_count -= 1;
                self.free_indices.push(entity.index());
                true
            }
            _ => false,
        }
    }
}
