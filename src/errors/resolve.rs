use super::{construct::ConstructErrorKind, instantiate::InstantiateErrorKind};
use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("{abstraction} is not registered")]
    NotRegistered { abstraction: TypeInfo },
    #[error("{implementation} can't be constructed: {reason}")]
    NotConstructible {
        implementation: TypeInfo,
        reason: ConstructErrorKind,
    },
    #[error("Incorrect instance type. Actual: {actual}, expected: {expected}")]
    IncorrectType { expected: TypeInfo, actual: TypeInfo },
    #[error("Constructor received fewer arguments than declared, missing: {expected}")]
    MissingArgument { expected: TypeInfo },
    #[error("{object} is locked, its fields can't be injected")]
    Locked { object: TypeInfo },
    #[error(transparent)]
    Instantiate(InstantiateErrorKind),
}
