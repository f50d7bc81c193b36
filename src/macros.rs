macro_rules! all_the_tuples {
    ($name:ident) => {
        $name!([]);
        $name!([T1]);
        $name!([T1, T2]);
        $name!([T1, T2, T3]);
        $name!([T1, T2, T3, T4]);
        $name!([T1, T2, T3, T4, T5]);
        $name!([T1, T2, T3, T4, T5, T6]);
        $name!([T1, T2, T3, T4, T5, T6, T7]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12]);
    };
}

/// Declares the abstractions an [`Injectable`](crate::Injectable) type can be registered as.
///
/// # Examples
/// ```rust
/// use autowire::{interfaces, Injectable, Interface};
///
/// trait UserRepo: Send + Sync {}
///
/// struct PostgresUserRepo;
///
/// impl UserRepo for PostgresUserRepo {}
///
/// impl Injectable for PostgresUserRepo {
///     fn interfaces() -> Vec<Interface<Self>> {
///         interfaces![dyn UserRepo]
///     }
/// }
/// ```
#[macro_export]
macro_rules! interfaces {
    ($($abstraction:ty),* $(,)?) => {
        $crate::__private::vec![
            $(
                $crate::Interface::new::<$abstraction>(
                    |value: $crate::utils::thread_safety::RcThreadSafety<Self>| -> $crate::utils::thread_safety::RcThreadSafety<$abstraction> { value },
                ),
            )*
        ]
    };
}
