use alloc::{boxed::Box, vec::Vec};

use super::{
    any::{Instance, TypeInfo},
    dependency::Dependency,
    dependency_resolver::DependencyResolver,
    errors::{ConstructErrorKind, InstantiateErrorKind},
};
use crate::utils::thread_safety::{SendSafety, SyncSafety};

/// Constructor body of an implementation type.
///
/// Implemented for closures whose parameters are [`DependencyResolver`]s,
/// e.g. `|Inject(repo): Inject<dyn UserRepo>| Ok(Service::new(repo))`.
pub trait Instantiator<Deps>: SendSafety + SyncSafety + 'static
where
    Deps: DependencyResolver,
{
    type Provides: 'static;
    type Error: Into<InstantiateErrorKind>;

    fn instantiate(&self, dependencies: Deps) -> Result<Self::Provides, Self::Error>;
}

pub(crate) trait InstantiateFn<T>: Fn(Vec<Instance>) -> Result<T, ConstructErrorKind> + SendSafety + SyncSafety {}

impl<T, F> InstantiateFn<T> for F where F: Fn(Vec<Instance>) -> Result<T, ConstructErrorKind> + SendSafety + SyncSafety {}

/// A declared constructor of `T`: its parameter descriptors and the body building `T` from resolved arguments
pub struct Constructor<T> {
    pub(crate) dependencies: Vec<Dependency>,
    pub(crate) instantiate: Box<dyn InstantiateFn<T>>,
}

impl<T> Constructor<T> {
    #[inline]
    #[must_use]
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }
}

/// Declares a constructor from an instantiator.
///
/// The instantiator is only called after every parameter was resolved.
#[must_use]
pub fn constructor<T, Inst, Deps>(instantiator: Inst) -> Constructor<T>
where
    T: 'static,
    Inst: Instantiator<Deps, Provides = T, Error = InstantiateErrorKind>,
    Deps: DependencyResolver + 'static,
{
    Constructor {
        dependencies: Deps::dependencies(),
        instantiate: Box::new(move |arguments: Vec<Instance>| {
            let implementation = TypeInfo::of::<T>();
            let dependencies = Deps::resolve(&mut arguments.into_iter()).map_err(|err| ConstructErrorKind::Arguments {
                implementation,
                reason: Box::new(err),
            })?;
            instantiator
                .instantiate(dependencies)
                .map_err(|reason| ConstructErrorKind::Instantiate { implementation, reason })
        }),
    }
}

macro_rules! impl_instantiator {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<F, Response, Err, $($ty,)*> Instantiator<($($ty,)*)> for F
        where
            F: Fn($($ty,)*) -> Result<Response, Err> + SendSafety + SyncSafety + 'static,
            Response: 'static,
            Err: Into<InstantiateErrorKind>,
            $( $ty: DependencyResolver, )*
        {
            type Provides = Response;
            type Error = Err;

            fn instantiate(&self, ($($ty,)*): ($($ty,)*)) -> Result<Self::Provides, Self::Error> {
                self($($ty,)*)
            }
        }
    };
}

all_the_tuples!(impl_instantiator);
