//! # Component Registry
//!
//! Components are plain data containers with no behavior. Each type is
//! statically bound to one storage strategy through [`Component::Storage`]
//! and receives a registry index (its mask bit) the first time a world
//! sees it.
//!
//! ## Invariants
//! - A [`ComponentId`] is unique and stable for the lifetime of its world.
//! - IDs are handed out sequentially and never reused across types.
//! - When frozen, registering a new type fails.

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use super::mask::MAX_COMPONENTS;
use super::storage::{Storage, StorageKind};
use crate::error::{BagelError, BagelResult};

/// Marker trait for components.
///
/// Implement it with [`bagel_components!`](crate::bagel_components) rather
/// than by hand:
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Debug, Default)]
/// struct Position { x: f32, y: f32 }
///
/// #[derive(Clone, Copy, Debug, Default)]
/// struct BallTag;
///
/// bagel_components! {
///     Position => Packed,
///     BallTag => Tag,
/// }
/// ```
pub trait Component: Sized + Send + Sync + 'static {
    /// Backing storage for this type across all entities.
    type Storage: Storage<Self>;
}

/// Binds component types to storage strategies.
///
/// Accepts `Type => Packed | Sparse | Tag` pairs. A `Tag` binding of a type
/// with a payload is rejected at compile time:
///
/// ```compile_fail
/// #[derive(Clone, Copy, Debug, Default)]
/// struct Heavy(u32);
///
/// bagel_core::bagel_components! {
///     Heavy => Tag,
/// }
/// ```
#[macro_export]
macro_rules! bagel_components {
    (@storage Packed, $ty:ty) => { $crate::PackedStorage<$ty> };
    (@storage Sparse, $ty:ty) => { $crate::SparseStorage<$ty> };
    (@storage Tag, $ty:ty) => { $crate::TagStorage<$ty> };
    (@check Tag, $ty:ty) => {
        const _: () = ::core::assert!(
            ::core::mem::size_of::<$ty>() == 0,
            "Tag components must be zero-sized"
        );
    };
    (@check $kind:ident, $ty:ty) => {};
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            $crate::bagel_components!(@check $kind, $ty);

            impl $crate::Component for $ty {
                type Storage = $crate::bagel_components!(@storage $kind, $ty);
            }
        )*
    };
}

/// Registry index of a component type; also its bit position in a mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ComponentId(u8);

impl ComponentId {
    /// Creates an ID from its raw index.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not fit in a mask.
    #[inline]
    #[must_use]
    pub const fn new(index: u8) -> Self {
        assert!((index as usize) < MAX_COMPONENTS, "component index out of range");
        Self(index)
    }

    /// Returns the raw index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}

/// Diagnostic description of a registered component type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentInfo {
    /// Rust type name.
    pub name: &'static str,
    /// Storage strategy the type is bound to.
    pub kind: StorageKind,
    /// Rust type identity.
    pub type_id: TypeId,
}

/// Maps component types to compact registry indices.
#[derive(Debug)]
pub struct ComponentRegistry {
    by_type: HashMap<TypeId, ComponentId>,
    infos: Vec<ComponentInfo>,
    limit: usize,
    frozen: bool,
}

impl ComponentRegistry {
    /// Creates an empty registry accepting at most `limit` types.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero or exceeds [`MAX_COMPONENTS`].
    #[must_use]
    pub fn new(limit: usize) -> Self {
        assert!(
            (1..=MAX_COMPONENTS).contains(&limit),
            "Component limit must be in 1..={MAX_COMPONENTS}"
        );
        Self {
            by_type: HashMap::new(),
            infos: Vec::with_capacity(limit),
            limit,
            frozen: false,
        }
    }

    /// Returns the index of `T`, if registered.
    #[inline]
    #[must_use]
    pub fn id_of<T: Component>(&self) -> Option<ComponentId> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    /// Registers `T` if needed.
    ///
    /// Returns the ID and whether it was newly assigned.
    ///
    /// # Errors
    ///
    /// `RegistryFrozen` or `TooManyComponents` for a new type.
    pub fn register<T: Component>(&mut self) -> BagelResult<(ComponentId, bool)> {
        if let Some(id) = self.id_of::<T>() {
            return Ok((id, false));
        }

        let name = type_name::<T>();
        if self.frozen {
            return Err(BagelError::RegistryFrozen { name });
        }
        if self.infos.len() >= self.limit {
            return Err(BagelError::TooManyComponents { limit: self.limit });
        }

        let id = ComponentId::new(self.infos.len() as u8);
        self.infos.push(ComponentInfo {
            name,
            kind: <T::Storage as Storage<T>>::KIND,
            type_id: TypeId::of::<T>(),
        });
        self.by_type.insert(TypeId::of::<T>(), id);
        tracing::debug!("registered component {} as bit {} ({:?})", name, id.0, self.infos[id.slot()].kind);

        Ok((id, true))
    }

    /// Looks up diagnostics for a registered index.
    #[must_use]
    pub fn info(&self, id: ComponentId) -> Option<&ComponentInfo> {
        self.infos.get(id.slot())
    }

    /// Forbids further registrations.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Returns `true` once frozen.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Configured limit.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Health(#[allow(dead_code)] i32);
    #[derive(Default)]
    struct Frozen;
    #[derive(Default)]
    struct Extra;

    crate::bagel_components! {
        Health => Sparse,
        Frozen => Tag,
        Extra => Packed,
    }

    #[test]
    fn test_ids_are_sequential_and_stable() {
        let mut registry = ComponentRegistry::new(MAX_COMPONENTS);
        let (health, new) = registry.register::<Health>().unwrap();
        assert!(new);
        let (frozen, _) = registry.register::<Frozen>().unwrap();
        assert_eq!(health.index(), 0);
        assert_eq!(frozen.index(), 1);

        // Re-registering is a lookup
        assert_eq!(registry.register::<Health>().unwrap(), (health, false));
        assert_eq!(registry.id_of::<Frozen>(), Some(frozen));
        assert_eq!(registry.info(frozen).unwrap().kind, StorageKind::Tag);
    }

    #[test]
    fn test_limit_enforced() {
        let mut registry = ComponentRegistry::new(1);
        registry.register::<Health>().unwrap();
        assert_eq!(
            registry.register::<Frozen>(),
            Err(BagelError::TooManyComponents { limit: 1 })
        );
    }

    #[test]
    fn test_freeze_rejects_new_types_only() {
        let mut registry = ComponentRegistry::new(4);
        registry.register::<Health>().unwrap();
        registry.freeze();

        assert!(registry.register::<Health>().is_ok());
        assert!(matches!(
            registry.register::<Extra>(),
            Err(BagelError::RegistryFrozen { .. })
        ));
    }
}
