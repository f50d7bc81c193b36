/// Config for a registration
/// ## Fields
/// - `replace`:
///   If `true`, the registration overrides a producer already registered for the same abstraction.
///   Otherwise registering an occupied abstraction fails with [`crate::RegisterErrorKind::Conflict`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub replace: bool,
}

impl Config {
    #[inline]
    #[must_use]
    pub const fn replace() -> Self {
        Self { replace: true }
    }
}
