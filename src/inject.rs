use alloc::vec::{IntoIter, Vec};

use crate::{
    any::{Instance, TypeInfo},
    dependency::Dependency,
    dependency_resolver::DependencyResolver,
    descriptor::{Descriptor, Injectable},
    utils::thread_safety::RcThreadSafety,
    ResolveErrorKind,
};

/// Constructor parameter resolved through the registry.
///
/// Use it for abstractions (`Inject<dyn Trait>`): if nothing is registered for `Dep`,
/// the constructor can't be satisfied.
pub struct Inject<Dep: ?Sized>(pub RcThreadSafety<Dep>);

impl<Dep: ?Sized + 'static> DependencyResolver for Inject<Dep> {
    fn dependencies() -> Vec<Dependency> {
        alloc::vec![Dependency::registered(TypeInfo::of::<Dep>())]
    }

    fn resolve(arguments: &mut IntoIter<Instance>) -> Result<Self, ResolveErrorKind> {
        take::<Dep>(arguments).map(Self)
    }
}

/// Constructor parameter resolved through the registry,
/// or constructed automatically from the [`Injectable`] declaration of `Dep` if it isn't registered.
pub struct Autowired<Dep>(pub RcThreadSafety<Dep>);

impl<Dep: Injectable> DependencyResolver for Autowired<Dep> {
    fn dependencies() -> Vec<Dependency> {
        alloc::vec![Dependency::autowired(TypeInfo::of::<Dep>(), Descriptor::of::<Dep>)]
    }

    fn resolve(arguments: &mut IntoIter<Instance>) -> Result<Self, ResolveErrorKind> {
        take::<Dep>(arguments).map(Self)
    }
}

fn take<Dep: ?Sized + 'static>(arguments: &mut IntoIter<Instance>) -> Result<RcThreadSafety<Dep>, ResolveErrorKind> {
    let expected = TypeInfo::of::<Dep>();
    let Some(instance) = arguments.next() else {
        return Err(ResolveErrorKind::MissingArgument { expected });
    };
    instance.downcast().ok_or(ResolveErrorKind::IncorrectType {
        expected,
        actual: instance.type_info(),
    })
}
