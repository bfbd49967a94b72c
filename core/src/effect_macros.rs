//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when reducers hand async work to the store.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use composable_admin_core::async_effect;
///
/// async_effect! {
///     match api.list_users().await {
///         Ok(users) => Some(Action::UsersLoaded { users }),
///         Err(error) => Some(Action::LoadFailed { error: error.to_string() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
