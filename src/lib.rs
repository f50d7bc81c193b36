#![no_std]

extern crate alloc;

#[macro_use]
pub(crate) mod macros;

pub(crate) mod any;
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod dependency;
pub(crate) mod dependency_resolver;
pub(crate) mod descriptor;
pub(crate) mod errors;
pub(crate) mod inject;
pub(crate) mod inject_queue;
pub(crate) mod instantiator;
pub(crate) mod producer;
pub(crate) mod registry;
pub(crate) mod resolver;
pub(crate) mod services;

pub mod utils;

pub use any::{Instance, TypeInfo};
pub use config::Config;
pub use container::Container;
pub use dependency::Dependency;
pub use dependency_resolver::DependencyResolver;
pub use descriptor::{Descriptor, Field, Injectable, Interface};
pub use errors::{BootstrapErrorKind, ConstructErrorKind, InstantiateErrorKind, RegisterErrorKind, ResolveErrorKind};
pub use inject::{Autowired, Inject};
pub use instantiator::{constructor, Constructor, Instantiator};
pub use producer::Producer;
pub use registry::Registry;
pub use services::Services;

#[doc(hidden)]
pub mod __private {
    pub use alloc::vec;
}
