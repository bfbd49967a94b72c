//! # Composable Admin Testing
//!
//! Testing utilities and helpers for reducer-driven admin screens.
//!
//! This crate provides:
//! - [`ReducerTest`]: a Given-When-Then harness for reducers
//! - [`assertions`]: effect assertions
//! - [`helpers`]: running effect descriptions without a store
//!
//! ## Example
//!
//! ```ignore
//! use composable_admin_testing::{helpers, ReducerTest};
//!
//! let mut state = ListState::default();
//! let effects = reducer.reduce(&mut state, ListAction::Load, &env);
//!
//! // Drive the network call by hand and feed the result back
//! for action in helpers::resolve_all(effects).await {
//!     reducer.reduce(&mut state, action, &env);
//! }
//! assert!(!state.is_busy);
//! ```


/// Test helpers for driving effects by hand
pub mod helpers {
    use composable_admin_core::effect::Effect;

    /// Run an effect to completion and collect the action it produces, if any
    pub async fn resolve<A>(effect: Effect<A>) -> Option<A> {
        match effect {
            Effect::None => None,
            Effect::Future(fut) => fut.await,
        }
    }

    /// Resolve every effect a reducer returned, in order
    pub async fn resolve_all<A, I>(effects: I) -> Vec<A>
    where
        I: IntoIterator<Item = Effect<A>>,
    {
        let mut actions = Vec::new();
        for effect in effects {
            actions.extend(resolve(effect).await);
        }
        actions
    }
}

// Re-export commonly used items
pub use reducer_test::{assertions, ReducerTest};
