use crate::{container::Container, errors::RegisterErrorKind};

/// Configuration entry point of an application: registers its services into the container.
///
/// Implemented for `Fn(&mut Container) -> Result<(), RegisterErrorKind>` closures.
/// See [`Container::bootstrap`].
pub trait Services {
    /// # Errors
    /// Returns the first failed registration
    fn configure(&self, container: &mut Container) -> Result<(), RegisterErrorKind>;
}

impl<F> Services for F
where
    F: Fn(&mut Container) -> Result<(), RegisterErrorKind>,
{
    #[inline]
    fn configure(&self, container: &mut Container) -> Result<(), RegisterErrorKind> {
        self(container)
    }
}
