use alloc::{boxed::Box, vec::Vec};
use tracing::debug;

use crate::{
    any::{Instance, TypeInfo},
    dependency::Dependency,
    descriptor::{ConstructorData, Descriptor},
    errors::ConstructErrorKind,
    producer::Producer,
    registry::Registry,
};

/// What the resolver produces for every node of the dependency graph
pub(crate) trait Strategy {
    type Output;

    /// Called for a dependency served by a manually registered producer
    fn leaf(producer: &Producer, registry: &Registry, dependency: TypeInfo) -> Result<Self::Output, ConstructErrorKind>;

    /// Called once every parameter of the selected constructor is resolved
    fn finish(constructor: &ConstructorData, arguments: Vec<Self::Output>) -> Result<Self::Output, ConstructErrorKind>;
}

/// Feasibility check, no user code is called
pub(crate) struct Check;

impl Strategy for Check {
    type Output = ();

    #[inline]
    fn leaf(_producer: &Producer, _registry: &Registry, _dependency: TypeInfo) -> Result<(), ConstructErrorKind> {
        Ok(())
    }

    #[inline]
    fn finish(_constructor: &ConstructorData, _arguments: Vec<()>) -> Result<(), ConstructErrorKind> {
        Ok(())
    }
}

pub(crate) struct Build;

impl Strategy for Build {
    type Output = Instance;

    fn leaf(producer: &Producer, registry: &Registry, dependency: TypeInfo) -> Result<Instance, ConstructErrorKind> {
        producer
            .instantiate(registry)
            .map_err(|reason| ConstructErrorKind::Dependency {
                dependency,
                reason: Box::new(reason),
            })
    }

    #[inline]
    fn finish(constructor: &ConstructorData, arguments: Vec<Instance>) -> Result<Instance, ConstructErrorKind> {
        (constructor.instantiate)(arguments)
    }
}

/// Frame of the descriptors being resolved along the current path.
///
/// Every call pushes its own frame on top of its caller's, so sibling branches never see each other.
struct Visiting<'a> {
    descriptor: &'a Descriptor,
    parent: Option<&'a Visiting<'a>>,
}

impl<'a> Visiting<'a> {
    fn frames(&'a self) -> impl Iterator<Item = &'a Descriptor> {
        let mut current = Some(self);
        core::iter::from_fn(move || {
            let frame = current?;
            current = frame.parent;
            Some(frame.descriptor)
        })
    }

    /// Returns `true` if a type being resolved can stand for `dependency`
    fn is_visiting(&'a self, dependency: &TypeInfo) -> bool {
        self.frames().any(|descriptor| descriptor.is_assignable_to(dependency))
    }

    /// Implementations along the path, outermost first
    fn path(&'a self) -> Box<[TypeInfo]> {
        let mut path: Vec<TypeInfo> = self.frames().map(Descriptor::implementation).collect();
        path.reverse();
        path.into_boxed_slice()
    }
}

/// Checks that the descriptor can be constructed against the registry
#[inline]
pub(crate) fn can_construct(descriptor: &Descriptor, registry: &Registry) -> Result<(), ConstructErrorKind> {
    resolve::<Check>(descriptor, registry, None)
}

/// Constructs an instance of [`Descriptor::provides`]
#[inline]
pub(crate) fn construct(descriptor: &Descriptor, registry: &Registry) -> Result<Instance, ConstructErrorKind> {
    resolve::<Build>(descriptor, registry, None)
}

fn resolve<S: Strategy>(
    descriptor: &Descriptor,
    registry: &Registry,
    parent: Option<&Visiting<'_>>,
) -> Result<S::Output, ConstructErrorKind> {
    let implementation = descriptor.implementation();
    let constructors = descriptor.constructors();
    if constructors.is_empty() {
        return Err(ConstructErrorKind::NoConstructors { implementation });
    }

    let visiting = Visiting { descriptor, parent };
    let mut rejected = Vec::new();
    for (index, constructor) in constructors.iter().enumerate() {
        match resolve_arguments::<S>(constructor, registry, &visiting) {
            Ok(arguments) => {
                debug!(implementation = implementation.name, index, "Constructor selected");
                return S::finish(constructor, arguments);
            }
            Err(err) if err.is_terminal() => return Err(err),
            Err(err) => {
                debug!(implementation = implementation.name, index, %err, "Constructor rejected");
                rejected.push(err);
            }
        }
    }

    Err(ConstructErrorKind::Unsatisfied {
        implementation,
        rejected: rejected.into_boxed_slice(),
    })
}

fn resolve_arguments<S: Strategy>(
    constructor: &ConstructorData,
    registry: &Registry,
    visiting: &Visiting<'_>,
) -> Result<Vec<S::Output>, ConstructErrorKind> {
    constructor
        .dependencies
        .iter()
        .map(|dependency| resolve_dependency::<S>(dependency, registry, visiting))
        .collect()
}

fn resolve_dependency<S: Strategy>(
    dependency: &Dependency,
    registry: &Registry,
    visiting: &Visiting<'_>,
) -> Result<S::Output, ConstructErrorKind> {
    let type_info = dependency.type_info;
    if visiting.is_visiting(&type_info) {
        return Err(ConstructErrorKind::CyclicDependency {
            dependency: type_info,
            path: visiting.path(),
        });
    }

    if let Ok(producer) = registry.get(&type_info) {
        // Auto-constructed producers are walked through their implementation, manual ones are opaque
        return match producer.descriptor() {
            Some(descriptor) => resolve::<S>(descriptor, registry, Some(visiting)),
            None => S::leaf(producer, registry, type_info),
        };
    }

    match dependency.descriptor() {
        Some(descriptor) => resolve::<S>(&descriptor, registry, Some(visiting)),
        None => Err(ConstructErrorKind::Unresolvable { dependency: type_info }),
    }
}
