use core::{
    any::{type_name, TypeId},
    cmp::Ordering,
    fmt::{self, Debug, Display, Formatter},
};

use crate::utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety};

/// Nominal identity of a type, used as the registry key.
///
/// Equality and ordering only look at the [`TypeId`], the name is kept for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Display for TypeInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit_once("::").map_or(self.name, |(_, name)| name)
    }
}

/// Type-erased shared instance.
///
/// Holds a `RcThreadSafety<T>` for the type `T` it was produced for.
/// Cloning it shares the same underlying value, so identity survives the erasure.
#[derive(Clone)]
pub struct Instance {
    type_info: TypeInfo,
    value: RcAnyThreadSafety,
}

impl Instance {
    #[inline]
    #[must_use]
    pub fn new<T>(value: RcThreadSafety<T>) -> Self
    where
        T: ?Sized + SendSafety + SyncSafety + 'static,
    {
        Self {
            type_info: TypeInfo::of::<T>(),
            value: RcThreadSafety::new(value),
        }
    }

    #[inline]
    #[must_use]
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// Returns the shared value if the instance was produced for `T`
    #[must_use]
    pub fn downcast<T: ?Sized + 'static>(&self) -> Option<RcThreadSafety<T>> {
        self.value.downcast_ref::<RcThreadSafety<T>>().cloned()
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance").field("type_info", &self.type_info.name).finish_non_exhaustive()
    }
}
