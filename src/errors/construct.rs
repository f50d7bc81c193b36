use alloc::boxed::Box;
use core::fmt::{self, Display, Formatter};

use super::{instantiate::InstantiateErrorKind, resolve::ResolveErrorKind};
use crate::any::TypeInfo;

/// Reason why the resolution engine couldn't construct a type.
///
/// Structural failures (cycles, unresolvable dependencies, unsatisfied constructors) make the engine
/// abandon the current constructor and try the next one.
/// Terminal failures, see [`Self::is_terminal`], abort the whole resolution.
#[derive(thiserror::Error, Debug)]
pub enum ConstructErrorKind {
    NoConstructors {
        implementation: TypeInfo,
    },
    CyclicDependency {
        dependency: TypeInfo,
        path: Box<[TypeInfo]>,
    },
    Unresolvable {
        dependency: TypeInfo,
    },
    Unsatisfied {
        implementation: TypeInfo,
        rejected: Box<[ConstructErrorKind]>,
    },
    Instantiate {
        implementation: TypeInfo,
        reason: InstantiateErrorKind,
    },
    Arguments {
        implementation: TypeInfo,
        reason: Box<ResolveErrorKind>,
    },
    Dependency {
        dependency: TypeInfo,
        reason: Box<ResolveErrorKind>,
    },
}

impl ConstructErrorKind {
    /// Returns `true` if the error was raised by user code or by a broken invariant,
    /// so trying another constructor can't help
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Instantiate { .. } | Self::Arguments { .. } | Self::Dependency { .. })
    }
}

impl Display for ConstructErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConstructors { implementation } => write!(f, "{implementation} doesn't declare any constructor"),
            Self::CyclicDependency { dependency, path } => {
                write!(f, "Cyclic dependency detected: ")?;
                for type_info in path.iter() {
                    write!(f, "{} -> ", type_info.short_name())?;
                }
                write!(f, "{}", dependency.short_name())
            }
            Self::Unresolvable { dependency } => {
                write!(f, "{dependency} is not registered and can't be constructed automatically")
            }
            Self::Unsatisfied { implementation, rejected } => {
                write!(f, "no constructor of {implementation} can be satisfied")?;
                for (index, reason) in rejected.iter().enumerate() {
                    write!(f, "; #{index}: {reason}")?;
                }
                Ok(())
            }
            Self::Instantiate { implementation, reason } => write!(f, "constructor of {implementation} failed: {reason}"),
            Self::Arguments { implementation, reason } => write!(f, "arguments of {implementation} are invalid: {reason}"),
            Self::Dependency { dependency, reason } => write!(f, "dependency {dependency} failed: {reason}"),
        }
    }
}
