use super::construct::ConstructErrorKind;
use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum RegisterErrorKind {
    #[error("{abstraction} is already registered. Register with `Config::replace()` to override it")]
    Conflict { abstraction: TypeInfo },
    #[error("{implementation} can't be registered as {abstraction}: the abstraction isn't declared in its interfaces")]
    TypeMismatch { abstraction: TypeInfo, implementation: TypeInfo },
    #[error("{implementation} can't be constructed: {reason}")]
    NotConstructible {
        implementation: TypeInfo,
        reason: ConstructErrorKind,
    },
}
