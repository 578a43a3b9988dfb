//! # Entity Masks
//!
//! One bitmask per entity identity. Bit `i` is set iff the entity holds the
//! component registered at index `i`, and iff that component's storage holds
//! data for the entity. Only the world's structural operations write masks.
//!
//! ## Performance
//!
//! - Test/set/clear: O(1), a single `u64` operation
//! - Iterate set bits: O(set bits) via `trailing_zeros`

use std::ops::{BitAnd, BitOr, BitOrAssign};

use super::component::ComponentId;
use super::entity::Entity;

/// Maximum number of distinct component types (bits in a [`Mask`]).
pub const MAX_COMPONENTS: usize = 64;

/// Fixed-width set of component bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Mask(u64);

impl Mask {
    /// The empty mask.
    pub const EMPTY: Self = Self(0);

    /// Returns a mask with only `id` set.
    #[inline]
    #[must_use]
    pub const fn bit(id: ComponentId) -> Self {
        Self(1 << id.index())
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Sets the bit for `id`.
    #[inline]
    pub fn set(&mut self, id: ComponentId) {
        self.0 |= 1 << id.index();
    }

    /// Clears the bit for `id`.
    #[inline]
    pub fn clear(&mut self, id: ComponentId) {
        self.0 &= !(1 << id.index());
    }

    /// Checks a single bit.
    #[inline]
    #[must_use]
    pub const fn has(self, id: ComponentId) -> bool {
        (self.0 >> id.index()) & 1 == 1
    }

    /// Returns `true` iff every bit of `required` is also set here.
    #[inline]
    #[must_use]
    pub const fn test(self, required: Mask) -> bool {
        self.0 & required.0 == required.0
    }

    /// Returns `true` if any bit is shared with `other`.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Mask) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` if no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of set bits.
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Lowest set bit, or `None` for the empty mask.
    #[inline]
    #[must_use]
    pub fn ctz(self) -> Option<ComponentId> {
        if self.0 == 0 {
            None
        } else {
            Some(ComponentId::new(self.0.trailing_zeros() as u8))
        }
    }

    /// Iterates over the set bits in ascending order.
    pub fn iter(self) -> impl Iterator<Item = ComponentId> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let tz = bits.trailing_zeros();
            bits &= bits - 1;
            Some(ComponentId::new(tz as u8))
        })
    }
}

impl BitOr for Mask {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mask {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Mask {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl FromIterator<ComponentId> for Mask {
    fn from_iter<I: IntoIterator<Item = ComponentId>>(iter: I) -> Self {
        let mut mask = Self::EMPTY;
        for id in iter {
            mask.set(id);
        }
        mask
    }
}

/// One mask per identity slot, grown alongside the entity allocator.
#[derive(Debug, Default)]
pub struct MaskTable {
    masks: Vec<Mask>,
}

impl MaskTable {
    /// Creates a table with `capacity` empty masks.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            masks: vec![Mask::EMPTY; capacity],
        }
    }

    /// Number of slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    /// Returns `true` if the table has no slots.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Extends the table to `capacity` slots. Never shrinks.
    pub fn grow(&mut self, capacity: usize) {
        if capacity > self.masks.len() {
            self.masks.resize(capacity, Mask::EMPTY);
        }
    }

    /// Reads an entity's mask. Slots past the end read as empty.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: Entity) -> Mask {
        self.masks.get(entity.slot()).copied().unwrap_or_default()
    }

    /// Mutable access for structural operations only.
    #[inline]
    pub(crate) fn get_mut(&mut self, entity: Entity) -> &mut Mask {
        let slot = entity.slot();
        if slot >= self.masks.len() {
            self.grow(slot + 1);
        }
        &mut self.masks[slot]
    }

    /// Returns `true` iff the entity's mask is a superset of `required`.
    #[inline]
    #[must_use]
    pub fn test(&self, entity: Entity, required: Mask) -> bool {
        self.get(entity).test(required)
    }
}
