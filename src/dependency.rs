use core::fmt::{self, Debug, Formatter};

use crate::{any::TypeInfo, descriptor::Descriptor};

/// Parameter descriptor of a constructor.
///
/// `descriptor` is set when the parameter type can be constructed automatically if it isn't registered.
#[derive(Clone, Copy)]
pub struct Dependency {
    pub type_info: TypeInfo,
    pub(crate) descriptor: Option<fn() -> Descriptor>,
}

impl Dependency {
    #[inline]
    #[must_use]
    pub const fn registered(type_info: TypeInfo) -> Self {
        Self { type_info, descriptor: None }
    }

    #[inline]
    #[must_use]
    pub const fn autowired(type_info: TypeInfo, descriptor: fn() -> Descriptor) -> Self {
        Self {
            type_info,
            descriptor: Some(descriptor),
        }
    }

    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> Option<Descriptor> {
        self.descriptor.map(|descriptor| descriptor())
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.type_info == other.type_info && self.descriptor.is_some() == other.descriptor.is_some()
    }
}

impl Eq for Dependency {}

impl Debug for Dependency {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependency")
            .field("type_info", &self.type_info.name)
            .field("autowired", &self.descriptor.is_some())
            .finish()
    }
}
