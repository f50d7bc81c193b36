use alloc::vec::{IntoIter, Vec};

use crate::{any::Instance, dependency::Dependency, errors::ResolveErrorKind};

/// Parameter list of a constructor.
///
/// Implemented for the parameter wrappers ([`crate::Inject`], [`crate::Autowired`])
/// and for tuples of them, so a closure's parameter list describes the constructor's dependencies.
pub trait DependencyResolver: Sized {
    /// Parameter descriptors in declaration order
    fn dependencies() -> Vec<Dependency>;

    /// Takes resolved arguments in the order of [`Self::dependencies`]
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::MissingArgument`] or [`ResolveErrorKind::IncorrectType`]
    /// if the arguments don't match the declared dependencies
    fn resolve(arguments: &mut IntoIter<Instance>) -> Result<Self, ResolveErrorKind>;
}

macro_rules! impl_dependency_resolver {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case, unused_mut)]
        impl<$($ty,)*> DependencyResolver for ($($ty,)*)
        where
            $( $ty: DependencyResolver, )*
        {
            #[inline]
            fn dependencies() -> Vec<Dependency> {
                let mut dependencies = Vec::new();
                $( dependencies.extend($ty::dependencies()); )*
                dependencies
            }

            #[inline]
            #[allow(unused_variables)]
            fn resolve(arguments: &mut IntoIter<Instance>) -> Result<Self, ResolveErrorKind> {
                Ok(($($ty::resolve(arguments)?,)*))
            }
        }
    };
}

all_the_tuples!(impl_dependency_resolver);
