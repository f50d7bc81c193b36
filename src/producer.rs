use core::fmt::{self, Debug, Formatter};

use crate::{
    any::{Instance, TypeInfo},
    descriptor::Descriptor,
    errors::ResolveErrorKind,
    registry::Registry,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
};

pub(crate) trait Factory: Fn(&Registry) -> Result<Instance, ResolveErrorKind> + SendSafety + SyncSafety {}

impl<F> Factory for F where F: Fn(&Registry) -> Result<Instance, ResolveErrorKind> + SendSafety + SyncSafety {}

#[derive(Clone)]
enum Kind {
    Transient(RcThreadSafety<dyn Factory>),
    Singleton(Instance),
}

/// Registered way of producing an abstraction.
///
/// - Transient producers call their factory on every fetch.
/// - Singleton producers hand out the same instance on every fetch.
///
/// Producers registered through auto-construction keep the [`Descriptor`] of their implementation,
/// manually supplied factories and instances are opaque to the resolution engine.
#[derive(Clone)]
pub struct Producer {
    kind: Kind,
    implementation: TypeInfo,
    descriptor: Option<Descriptor>,
}

impl Producer {
    #[inline]
    #[must_use]
    pub(crate) fn transient<F: Factory + 'static>(factory: F, implementation: TypeInfo, descriptor: Option<Descriptor>) -> Self {
        Self {
            kind: Kind::Transient(RcThreadSafety::new(factory)),
            implementation,
            descriptor,
        }
    }

    #[inline]
    #[must_use]
    pub(crate) const fn singleton(instance: Instance, implementation: TypeInfo, descriptor: Option<Descriptor>) -> Self {
        Self {
            kind: Kind::Singleton(instance),
            implementation,
            descriptor,
        }
    }

    /// Produces an instance of the abstraction this producer is registered for.
    ///
    /// # Errors
    /// Only a transient factory can fail, singletons always return their instance
    #[inline]
    pub fn instantiate(&self, registry: &Registry) -> Result<Instance, ResolveErrorKind> {
        match &self.kind {
            Kind::Transient(factory) => factory(registry),
            Kind::Singleton(instance) => Ok(instance.clone()),
        }
    }

    #[inline]
    #[must_use]
    pub const fn implementation(&self) -> TypeInfo {
        self.implementation
    }

    #[inline]
    #[must_use]
    pub const fn is_auto_constructed(&self) -> bool {
        self.descriptor.is_some()
    }

    #[inline]
    #[must_use]
    pub const fn is_singleton(&self) -> bool {
        matches!(self.kind, Kind::Singleton(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self.kind, Kind::Transient(_))
    }

    #[inline]
    pub(crate) const fn descriptor(&self) -> Option<&Descriptor> {
        self.descriptor.as_ref()
    }
}

impl Debug for Producer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("singleton", &self.is_singleton())
            .field("implementation", &self.implementation.name)
            .field("auto_constructed", &self.is_auto_constructed())
            .finish()
    }
}
