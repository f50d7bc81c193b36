use core::any::type_name;
use parking_lot::Mutex;
use tracing::{debug, error, info_span, warn};

use crate::{
    any::{Instance, TypeInfo},
    config::Config,
    descriptor::{upcast_to, Descriptor, Injectable, UpcastFn},
    errors::{BootstrapErrorKind, InstantiateErrorKind, RegisterErrorKind, ResolveErrorKind},
    inject_queue::InjectQueue,
    producer::Producer,
    registry::Registry,
    resolver,
    services::Services,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
};

/// Dependency injection container.
///
/// Registration requires `&mut self`, resolution only `&self`,
/// so once the container is configured it can be shared between readers.
///
/// # Examples
/// ```rust
/// use autowire::{constructor, interfaces, Constructor, Container, Inject, Injectable, Interface};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct Name(&'static str);
///
/// impl Injectable for Name {}
///
/// struct HelloGreeter(Arc<Name>);
///
/// impl Greeter for HelloGreeter {
///     fn greet(&self) -> String {
///         format!("Hello, {}!", self.0 .0)
///     }
/// }
///
/// impl Injectable for HelloGreeter {
///     fn interfaces() -> Vec<Interface<Self>> {
///         interfaces![dyn Greeter]
///     }
///
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![constructor(|Inject(name): Inject<Name>| Ok(HelloGreeter(name)))]
///     }
/// }
///
/// let mut container = Container::new();
/// container.register_instance::<Name, Name>(Name("world")).unwrap();
/// container.register_transient::<dyn Greeter, HelloGreeter>().unwrap();
///
/// let greeter = container.resolve::<dyn Greeter>().unwrap();
/// assert_eq!(greeter.greet(), "Hello, world!");
/// ```
#[derive(Default)]
pub struct Container {
    registry: Registry,
    queue: InjectQueue,
    configured: bool,
}

impl Container {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Container {
    /// Registers `R` as a transient producer of `A`, built by the resolution engine on every fetch.
    ///
    /// The registration proves that `R` can be constructed against the current registry.
    ///
    /// # Errors
    /// - [`RegisterErrorKind::TypeMismatch`] if `R` isn't `A` and doesn't declare it in its interfaces
    /// - [`RegisterErrorKind::Conflict`] if `A` is already registered
    /// - [`RegisterErrorKind::NotConstructible`] if no constructor of `R` can be satisfied
    #[inline]
    pub fn register_transient<A, R>(&mut self) -> Result<(), RegisterErrorKind>
    where
        A: ?Sized + SendSafety + SyncSafety + 'static,
        R: Injectable,
    {
        self.register_transient_with_config::<A, R>(Config::default())
    }

    /// Registers `R` as a transient producer of `A` with the config.
    /// See [`Self::register_transient`].
    #[allow(clippy::missing_errors_doc)]
    pub fn register_transient_with_config<A, R>(&mut self, config: Config) -> Result<(), RegisterErrorKind>
    where
        A: ?Sized + SendSafety + SyncSafety + 'static,
        R: Injectable,
    {
        let span = info_span!("register_transient", abstraction = type_name::<A>(), implementation = type_name::<R>());
        let _guard = span.enter();

        let descriptor = self.prepare::<A, R>(config)?;
        let implementation = TypeInfo::of::<R>();
        if let Err(reason) = resolver::can_construct(&descriptor, &self.registry) {
            let err = RegisterErrorKind::NotConstructible { implementation, reason };
            error!("{}", err);
            return Err(err);
        }
        debug!("Constructible");

        let factory = {
            let descriptor = descriptor.clone();
            move |registry: &Registry| {
                resolver::construct(&descriptor, registry)
                    .map_err(|reason| ResolveErrorKind::NotConstructible { implementation, reason })
            }
        };
        self.insert(TypeInfo::of::<A>(), Producer::transient(factory, implementation, Some(descriptor)), config)
    }

    /// Registers a factory as a transient producer of `A`.
    ///
    /// The factory is opaque to the resolution engine: it's assumed to succeed.
    ///
    /// # Errors
    /// - [`RegisterErrorKind::TypeMismatch`] if `R` isn't `A` and doesn't declare it in its interfaces
    /// - [`RegisterErrorKind::Conflict`] if `A` is already registered
    #[inline]
    pub fn register_transient_factory<A, R, F>(&mut self, factory: F) -> Result<(), RegisterErrorKind>
    where
        A: ?Sized + SendSafety + SyncSafety + 'static,
        R: Injectable,
        F: Fn() -> Result<R, InstantiateErrorKind> + SendSafety + SyncSafety + 'static,
    {
        self.register_transient_factory_with_config::<A, R, F>(factory, Config::default())
    }

    /// Registers a factory as a transient producer of `A` with the config.
    /// See [`Self::register_transient_factory`].
    #[allow(clippy::missing_errors_doc)]
    pub fn register_transient_factory_with_config<A, R, F>(&mut self, factory: F, config: Config) -> Result<(), RegisterErrorKind>
    where
        A: ?Sized + SendSafety + SyncSafety + 'static,
        R: Injectable,
        F: Fn() -> Result<R, InstantiateErrorKind> + SendSafety + SyncSafety + 'static,
    {
        let span = info_span!(
            "register_transient_factory",
            abstraction = type_name::<A>(),
            implementation = type_name::<R>()
        );
        let _guard = span.enter();

        let upcast = self.prepare_manual::<A, R>(config)?;
        let factory = move |_: &Registry| {
            factory()
                .map(|value| upcast(RcThreadSafety::new(value)))
                .map_err(ResolveErrorKind::Instantiate)
        };
        self.insert(TypeInfo::of::<A>(), Producer::transient(factory, TypeInfo::of::<R>(), None), config)
    }

    /// Registers `R` as a singleton producer of `A`, constructed once by the resolution engine right away.
    ///
    /// # Errors
    /// - [`RegisterErrorKind::TypeMismatch`] if `R` isn't `A` and doesn't declare it in its interfaces
    /// - [`RegisterErrorKind::Conflict`] if `A` is already registered
    /// - [`RegisterErrorKind::NotConstructible`] if `R` can't be constructed
    #[inline]
    pub fn register_singleton<A, R>(&mut self) -> Result<(), RegisterErrorKind>
    where
        A: ?Sized + SendSafety + SyncSafety + 'static,
        R: Injectable,
    {
        self.register_singleton_with_config::<A, R>(Config::default())
    }

    /// Registers `R` as a singleton producer of `A` with the config.
    /// See [`Self::register_singleton`].
    #[allow(clippy::missing_errors_doc)]
    pub fn register_singleton_with_config<A, R>(&mut self, config: Config) -> Result<(), RegisterErrorKind>
    where
        A: ?Sized + SendSafety + SyncSafety + 'static,
        R: Injectable,
    {
        let span = info_span!("register_singleton", abstraction = type_name::<A>(), implementation = type_name::<R>());
        let _guard = span.enter();

        let descriptor = self.prepare::<A, R>(config)?;
        let implementation = TypeInfo::of::<R>();
        let instance = match resolver::construct(&descriptor, &self.registry) {
            Ok(instance) => instance,
            Err(reason) => {
                let err = RegisterErrorKind::NotConstructible { implementation, reason };
                error!("{}", err);
                return Err(err);
            }
        };
        debug!("Constructed");

        self.insert(TypeInfo::of::<A>(), Producer::singleton(instance, implementation, Some(descriptor)), config)
    }

    /// Registers an already built instance as a singleton producer of `A`.
    ///
    /// # Errors
    /// - [`RegisterErrorKind::TypeMismatch`] if `R` isn't `A` and doesn't declare it in its interfaces
    /// - [`RegisterErrorKind::Conflict`] if `A` is already registered
    #[inline]
    pub fn register_instance<A, R>(&mut self, instance: R) -> Result<(), RegisterErrorKind>
    where
        A: ?Sized + SendSafety + SyncSafety + 'static,
        R: Injectable,
    {
        self.register_instance_with_config::<A, R>(instance, Config::default())
    }

    /// Registers an already built instance as a singleton producer of `A` with the config.
    /// See [`Self::register_instance`].
    #[allow(clippy::missing_errors_doc)]
    pub fn register_instance_with_config<A, R>(&mut self, instance: R, config: Config) -> Result<(), RegisterErrorKind>
    where
        A: ?Sized + SendSafety + SyncSafety + 'static,
        R: Injectable,
    {
        let span = info_span!("register_instance", abstraction = type_name::<A>(), implementation = type_name::<R>());
        let _guard = span.enter();

        let upcast = self.prepare_manual::<A, R>(config)?;
        let instance = upcast(RcThreadSafety::new(instance));
        self.insert(TypeInfo::of::<A>(), Producer::singleton(instance, TypeInfo::of::<R>(), None), config)
    }

    fn check_conflict(&self, abstraction: TypeInfo, config: Config) -> Result<(), RegisterErrorKind> {
        if !config.replace && self.registry.contains(&abstraction) {
            let err = RegisterErrorKind::Conflict { abstraction };
            error!("{}", err);
            return Err(err);
        }
        Ok(())
    }

    fn type_mismatch<A: ?Sized + 'static, R: 'static>() -> RegisterErrorKind {
        let err = RegisterErrorKind::TypeMismatch {
            abstraction: TypeInfo::of::<A>(),
            implementation: TypeInfo::of::<R>(),
        };
        error!("{}", err);
        err
    }

    /// Descriptor of `R` viewed through `A`, once the registration is known to be allowed
    fn prepare<A, R>(&self, config: Config) -> Result<Descriptor, RegisterErrorKind>
    where
        A: ?Sized + 'static,
        R: Injectable,
    {
        let abstraction = TypeInfo::of::<A>();
        let descriptor = Descriptor::of_abstraction::<R>(abstraction).ok_or_else(Self::type_mismatch::<A, R>)?;
        self.check_conflict(abstraction, config)?;
        Ok(descriptor)
    }

    fn prepare_manual<A, R>(&self, config: Config) -> Result<RcThreadSafety<dyn UpcastFn<R>>, RegisterErrorKind>
    where
        A: ?Sized + 'static,
        R: Injectable,
    {
        let abstraction = TypeInfo::of::<A>();
        let upcast = upcast_to::<R>(abstraction).ok_or_else(Self::type_mismatch::<A, R>)?;
        self.check_conflict(abstraction, config)?;
        Ok(upcast)
    }

    fn insert(&mut self, abstraction: TypeInfo, producer: Producer, config: Config) -> Result<(), RegisterErrorKind> {
        match self.registry.add(abstraction, producer, config.replace) {
            Ok(Some(_)) => {
                debug!("Registered, previous producer replaced");
                Ok(())
            }
            Ok(None) => {
                debug!("Registered");
                Ok(())
            }
            Err(err) => {
                error!("{}", err);
                Err(err)
            }
        }
    }
}

impl Container {
    /// Resolves an instance of the abstraction
    ///
    /// # Errors
    /// - [`ResolveErrorKind::NotRegistered`] if nothing is registered for `A`
    /// - Errors of the producer: construction failure of an auto-constructed transient or a failing factory
    pub fn resolve<A: ?Sized + 'static>(&self) -> Result<RcThreadSafety<A>, ResolveErrorKind> {
        let span = info_span!("resolve", abstraction = type_name::<A>());
        let _guard = span.enter();

        let instance = self.resolve_instance_inner(TypeInfo::of::<A>())?;
        instance.downcast::<A>().ok_or_else(|| {
            let err = ResolveErrorKind::IncorrectType {
                expected: TypeInfo::of::<A>(),
                actual: instance.type_info(),
            };
            error!("{}", err);
            err
        })
    }

    /// Resolves a type-erased instance of the abstraction
    ///
    /// # Errors
    /// See [`Self::resolve`]
    pub fn resolve_instance(&self, abstraction: TypeInfo) -> Result<Instance, ResolveErrorKind> {
        let span = info_span!("resolve_instance", abstraction = abstraction.name);
        let _guard = span.enter();

        self.resolve_instance_inner(abstraction)
    }

    fn resolve_instance_inner(&self, abstraction: TypeInfo) -> Result<Instance, ResolveErrorKind> {
        let producer = self.registry.get(&abstraction).inspect_err(|err| error!("{}", err))?;
        debug!(singleton = producer.is_singleton(), "Found producer");
        producer.instantiate(&self.registry).inspect_err(|err| error!("{}", err))
    }

    #[inline]
    #[must_use]
    pub fn contains<A: ?Sized + 'static>(&self) -> bool {
        self.registry.contains(&TypeInfo::of::<A>())
    }

    /// Returns the implementation registered for the abstraction
    #[must_use]
    pub fn implementation_of<A: ?Sized + 'static>(&self) -> Option<TypeInfo> {
        self.registry.get(&TypeInfo::of::<A>()).ok().map(Producer::implementation)
    }

    /// Returns `true` if `R` can be constructed against the current registry.
    /// No constructor is called.
    #[must_use]
    pub fn can_construct<R: Injectable>(&self) -> bool {
        let span = info_span!("can_construct", implementation = type_name::<R>());
        let _guard = span.enter();

        match resolver::can_construct(&Descriptor::of::<R>(), &self.registry) {
            Ok(()) => true,
            Err(err) => {
                debug!(%err, "Not constructible");
                false
            }
        }
    }

    /// Constructs `R` against the current registry without registering it
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::NotConstructible`] if no constructor of `R` can be satisfied
    /// or a constructor failed
    pub fn construct<R: Injectable>(&self) -> Result<RcThreadSafety<R>, ResolveErrorKind> {
        let span = info_span!("construct", implementation = type_name::<R>());
        let _guard = span.enter();

        let implementation = TypeInfo::of::<R>();
        let instance = resolver::construct(&Descriptor::of::<R>(), &self.registry).map_err(|reason| {
            let err = ResolveErrorKind::NotConstructible { implementation, reason };
            error!("{}", err);
            err
        })?;
        instance.downcast::<R>().ok_or(ResolveErrorKind::IncorrectType {
            expected: implementation,
            actual: instance.type_info(),
        })
    }

    /// Removes every registration and every queued injection target.
    /// The container can be configured again afterwards.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.queue.clear();
        self.configured = false;
        debug!("Container cleared");
    }
}

impl Container {
    /// Injects the fields `T` declares in [`Injectable::fields`]
    ///
    /// # Errors
    /// Returns the error of the first field which dependency can't be resolved.
    /// Fields before it stay injected.
    pub fn inject_fields<T: Injectable>(&self, target: &mut T) -> Result<(), ResolveErrorKind> {
        let span = info_span!("inject_fields", object = type_name::<T>());
        let _guard = span.enter();

        for field in T::fields() {
            let instance = self.resolve_instance_inner(field.dependency)?;
            (field.inject)(target, instance).inspect_err(|err| error!("{}", err))?;
            debug!(dependency = field.dependency.name, "Field injected");
        }
        Ok(())
    }

    /// Queues an object the container didn't construct for field injection.
    /// The queue is flushed by [`Self::flush_inject_queue`] and [`Self::bootstrap`].
    ///
    /// Returns `false` if the same object is already queued.
    /// The object's lock must be free when the queue is flushed, a held lock fails its injection.
    pub fn enqueue<T: Injectable>(&mut self, target: &RcThreadSafety<Mutex<T>>) -> bool {
        let queued = self.queue.push(target);
        debug!(object = type_name::<T>(), queued, "Enqueue");
        queued
    }

    /// Injects fields of every queued object in queue order.
    ///
    /// The queue is empty afterwards, even if an injection failed.
    ///
    /// # Errors
    /// Returns the first injection error, the rest of the queue is still processed.
    /// [`ResolveErrorKind::Locked`] is returned for an object which lock is held.
    pub fn flush_inject_queue(&mut self) -> Result<(), ResolveErrorKind> {
        let span = info_span!("flush_inject_queue", len = self.queue.len());
        let _guard = span.enter();

        let mut result = Ok(());
        for pending in self.queue.take() {
            if let Err(err) = (pending.inject)(&*self) {
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }

    /// Configures the container with the services and flushes the injection queue.
    ///
    /// Services are configured once, a repeated call only flushes the queue.
    /// That holds for a failed configuration too, its registrations stay in place.
    /// Call [`Self::clear`] to configure the container again.
    ///
    /// # Errors
    /// - [`BootstrapErrorKind::Register`] if a registration failed
    /// - [`BootstrapErrorKind::Inject`] if a queued object's field can't be injected
    pub fn bootstrap<S: Services + ?Sized>(&mut self, services: &S) -> Result<(), BootstrapErrorKind> {
        let span = info_span!("bootstrap");
        let _guard = span.enter();

        if self.configured {
            warn!("Container is already configured, configuration skipped");
        } else {
            self.configured = true;
            services.configure(self).inspect_err(|err| error!("{}", err))?;
            debug!(registered = self.registry.len(), "Configured");
        }

        self.flush_inject_queue()?;
        Ok(())
    }
}
