use alloc::collections::BTreeMap;

use crate::{
    any::TypeInfo,
    errors::{RegisterErrorKind, ResolveErrorKind},
    producer::Producer,
};

/// Mapping of abstractions to their producers.
///
/// Holds at most one producer per abstraction, an occupied abstraction is only overridden on request.
#[derive(Default, Clone, Debug)]
pub struct Registry {
    producers: BTreeMap<TypeInfo, Producer>,
}

impl Registry {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            producers: BTreeMap::new(),
        }
    }

    /// Adds a producer for the abstraction, returning the replaced one.
    ///
    /// # Errors
    /// Returns [`RegisterErrorKind::Conflict`] if the abstraction is registered and `replace` is `false`
    pub fn add(&mut self, abstraction: TypeInfo, producer: Producer, replace: bool) -> Result<Option<Producer>, RegisterErrorKind> {
        if !replace && self.producers.contains_key(&abstraction) {
            return Err(RegisterErrorKind::Conflict { abstraction });
        }
        Ok(self.producers.insert(abstraction, producer))
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, abstraction: &TypeInfo) -> bool {
        self.producers.contains_key(abstraction)
    }

    /// # Errors
    /// Returns [`ResolveErrorKind::NotRegistered`] if nothing is registered for the abstraction
    #[inline]
    pub fn get(&self, abstraction: &TypeInfo) -> Result<&Producer, ResolveErrorKind> {
        self.producers
            .get(abstraction)
            .ok_or(ResolveErrorKind::NotRegistered { abstraction: *abstraction })
    }

    #[inline]
    pub fn clear(&mut self) {
        self.producers.clear();
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }
}
