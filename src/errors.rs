mod bootstrap;
mod construct;
mod instantiate;
mod register;
mod resolve;

pub use bootstrap::BootstrapErrorKind;
pub use construct::ConstructErrorKind;
pub use instantiate::InstantiateErrorKind;
pub use register::RegisterErrorKind;
pub use resolve::ResolveErrorKind;
