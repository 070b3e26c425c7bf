//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Entities in this system get their identity from the store, so an entity
/// built in memory has no id until its first save.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the identifier, or `None` if the entity was never persisted.
    fn id(&self) -> Option<Self::Id>;

    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}
