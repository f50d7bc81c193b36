use alloc::{boxed::Box, vec::Vec};
use core::fmt::{self, Debug, Formatter};

use crate::{
    any::{Instance, TypeInfo},
    dependency::Dependency,
    errors::ResolveErrorKind,
    instantiator::{Constructor, InstantiateFn},
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
};

/// Static provider declaration of an implementation type.
///
/// The container never inspects types at runtime: everything the resolution engine needs to know about `Self`
/// is declared here.
///
/// - [`Self::interfaces`] lists the abstractions `Self` can be registered as (besides `Self` itself).
/// - [`Self::constructors`] lists the constructors the engine may choose from.
///   They're tried in ascending order of their parameter count, the first satisfiable one wins.
/// - [`Self::fields`] lists the fields filled by [`crate::Container::inject_fields`].
///
/// # Examples
/// ```rust
/// use autowire::{constructor, interfaces, Container, Inject, Injectable, Interface, Constructor};
/// use std::sync::Arc;
///
/// trait Clock: Send + Sync {}
/// trait Scheduler: Send + Sync {}
///
/// struct SystemClock;
/// impl Clock for SystemClock {}
///
/// struct CronScheduler(Arc<dyn Clock>);
/// impl Scheduler for CronScheduler {}
///
/// impl Injectable for SystemClock {
///     fn interfaces() -> Vec<Interface<Self>> {
///         interfaces![dyn Clock]
///     }
///
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![constructor(|| Ok(SystemClock))]
///     }
/// }
///
/// impl Injectable for CronScheduler {
///     fn interfaces() -> Vec<Interface<Self>> {
///         interfaces![dyn Scheduler]
///     }
///
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![constructor(|Inject(clock): Inject<dyn Clock>| Ok(CronScheduler(clock)))]
///     }
/// }
///
/// let mut container = Container::new();
/// container.register_transient::<dyn Clock, SystemClock>().unwrap();
/// container.register_singleton::<dyn Scheduler, CronScheduler>().unwrap();
///
/// let _scheduler: Arc<dyn Scheduler> = container.resolve().unwrap();
/// ```
pub trait Injectable: SendSafety + SyncSafety + Sized + 'static {
    fn interfaces() -> Vec<Interface<Self>> {
        Vec::new()
    }

    fn constructors() -> Vec<Constructor<Self>> {
        Vec::new()
    }

    fn fields() -> Vec<Field<Self>> {
        Vec::new()
    }
}

pub(crate) trait UpcastFn<T>: Fn(RcThreadSafety<T>) -> Instance + SendSafety + SyncSafety {}

impl<T, F> UpcastFn<T> for F where F: Fn(RcThreadSafety<T>) -> Instance + SendSafety + SyncSafety {}

/// Abstraction `T` can be registered as, with the conversion of `T` handles into handles of the abstraction.
///
/// Usually declared with the [`crate::interfaces`] macro.
pub struct Interface<T> {
    pub(crate) type_info: TypeInfo,
    pub(crate) upcast: RcThreadSafety<dyn UpcastFn<T>>,
}

impl<T: 'static> Interface<T> {
    #[must_use]
    pub fn new<A>(upcast: fn(RcThreadSafety<T>) -> RcThreadSafety<A>) -> Self
    where
        A: ?Sized + SendSafety + SyncSafety + 'static,
    {
        Self {
            type_info: TypeInfo::of::<A>(),
            upcast: RcThreadSafety::new(move |value: RcThreadSafety<T>| Instance::new(upcast(value))),
        }
    }

    #[inline]
    #[must_use]
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }
}

pub(crate) trait FieldFn<T>: Fn(&mut T, Instance) -> Result<(), ResolveErrorKind> + SendSafety + SyncSafety {}

impl<T, F> FieldFn<T> for F where F: Fn(&mut T, Instance) -> Result<(), ResolveErrorKind> + SendSafety + SyncSafety {}

/// Injectable field of `T`: the field's dependency and the setter writing the resolved value
pub struct Field<T> {
    pub(crate) dependency: TypeInfo,
    pub(crate) inject: Box<dyn FieldFn<T>>,
}

impl<T: 'static> Field<T> {
    #[must_use]
    pub fn new<D: ?Sized + 'static>(setter: fn(&mut T, RcThreadSafety<D>)) -> Self {
        Self {
            dependency: TypeInfo::of::<D>(),
            inject: Box::new(move |target: &mut T, instance: Instance| {
                let value = instance.downcast::<D>().ok_or(ResolveErrorKind::IncorrectType {
                    expected: TypeInfo::of::<D>(),
                    actual: instance.type_info(),
                })?;
                setter(target, value);
                Ok(())
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn dependency(&self) -> TypeInfo {
        self.dependency
    }
}

/// Conversion of `T` handles into instances of `abstraction`, if `T` can stand for it
pub(crate) fn upcast_to<T: Injectable>(abstraction: TypeInfo) -> Option<RcThreadSafety<dyn UpcastFn<T>>> {
    if abstraction == TypeInfo::of::<T>() {
        let upcast: RcThreadSafety<dyn UpcastFn<T>> = RcThreadSafety::new(Instance::new::<T>);
        return Some(upcast);
    }

    T::interfaces()
        .into_iter()
        .find(|interface| interface.type_info == abstraction)
        .map(|interface| interface.upcast)
}

pub(crate) struct ConstructorData {
    pub(crate) dependencies: Box<[Dependency]>,
    pub(crate) instantiate: Box<dyn InstantiateFn<Instance>>,
}

struct DescriptorInner {
    provides: TypeInfo,
    implementation: TypeInfo,
    assignable_to: Box<[TypeInfo]>,
    constructors: Box<[ConstructorData]>,
}

/// Type-erased [`Injectable`] declaration the resolution engine works on.
///
/// Instances built from it are produced for [`Self::provides`]:
/// the implementation type itself, or the abstraction it was registered as.
#[derive(Clone)]
pub struct Descriptor {
    inner: RcThreadSafety<DescriptorInner>,
}

impl Descriptor {
    #[must_use]
    pub fn of<T: Injectable>() -> Self {
        let upcast: RcThreadSafety<dyn UpcastFn<T>> = RcThreadSafety::new(Instance::new::<T>);
        Self::build::<T>(TypeInfo::of::<T>(), upcast, T::interfaces())
    }

    /// Descriptor of `T` producing instances of `abstraction`.
    ///
    /// Returns `None` if `T` isn't `abstraction` and doesn't declare it in [`Injectable::interfaces`].
    #[must_use]
    pub fn of_abstraction<T: Injectable>(abstraction: TypeInfo) -> Option<Self> {
        let upcast = upcast_to::<T>(abstraction)?;
        Some(Self::build::<T>(abstraction, upcast, T::interfaces()))
    }

    fn build<T: Injectable>(provides: TypeInfo, upcast: RcThreadSafety<dyn UpcastFn<T>>, interfaces: Vec<Interface<T>>) -> Self {
        let mut constructors: Vec<ConstructorData> = T::constructors()
            .into_iter()
            .map(|Constructor { dependencies, instantiate }| {
                let upcast = upcast.clone();
                ConstructorData {
                    dependencies: dependencies.into_boxed_slice(),
                    instantiate: Box::new(move |arguments: Vec<Instance>| {
                        instantiate(arguments).map(|value| upcast(RcThreadSafety::new(value)))
                    }),
                }
            })
            .collect();
        // Stable, so declaration order breaks ties
        constructors.sort_by_key(|constructor| constructor.dependencies.len());

        let assignable_to = core::iter::once(TypeInfo::of::<T>())
            .chain(interfaces.iter().map(Interface::type_info))
            .collect();

        Self {
            inner: RcThreadSafety::new(DescriptorInner {
                provides,
                implementation: TypeInfo::of::<T>(),
                assignable_to,
                constructors: constructors.into_boxed_slice(),
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn provides(&self) -> TypeInfo {
        self.inner.provides
    }

    #[inline]
    #[must_use]
    pub fn implementation(&self) -> TypeInfo {
        self.inner.implementation
    }

    /// Returns `true` if a value of the implementation type can stand for `type_info`
    #[inline]
    #[must_use]
    pub fn is_assignable_to(&self, type_info: &TypeInfo) -> bool {
        self.inner.assignable_to.contains(type_info)
    }

    #[inline]
    pub(crate) fn constructors(&self) -> &[ConstructorData] {
        &self.inner.constructors
    }
}

impl Debug for Descriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("provides", &self.inner.provides.name)
            .field("implementation", &self.inner.implementation.name)
            .field("constructors", &self.inner.constructors.len())
            .finish()
    }
}
