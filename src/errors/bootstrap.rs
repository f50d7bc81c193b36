use super::{register::RegisterErrorKind, resolve::ResolveErrorKind};

#[derive(thiserror::Error, Debug)]
pub enum BootstrapErrorKind {
    #[error("Services configuration failed: {0}")]
    Register(#[from] RegisterErrorKind),
    #[error("Deferred injection failed: {0}")]
    Inject(#[from] ResolveErrorKind),
}
