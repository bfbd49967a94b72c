//! # Composable Admin Core
//!
//! Core traits and types for admin screens built on the reducer pattern.
//!
//! ## Core Concepts
//!
//! - **State**: Screen state owned by a single store
//! - **Action**: Every input to a reducer (user intents, UI mutations, network results)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected collaborators (HTTP clients, repositories)
//!
//! ## Example
//!
//! ```ignore
//! use composable_admin_core::*;
//!
//! #[derive(Clone, Debug, Default)]
//! struct ListState {
//!     rows: Vec<Row>,
//!     is_busy: bool,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum ListAction {
//!     Load,
//!     Loaded { rows: Vec<Row> },
//! }
//!
//! impl Reducer for ListReducer {
//!     type State = ListState;
//!     type Action = ListAction;
//!     type Environment = ListEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut ListState,
//!         action: ListAction,
//!         env: &ListEnvironment,
//!     ) -> SmallVec<[Effect<ListAction>; 4]> {
//!         match action {
//!             ListAction::Load => {
//!                 state.is_busy = true;
//!                 let api = env.api.clone();
//!                 smallvec![async_effect! {
//!                     api.rows().await.ok().map(|rows| ListAction::Loaded { rows })
//!                 }]
//!             }
//!             ListAction::Loaded { rows } => {
//!                 state.rows = rows;
//!                 state.is_busy = false;
//!                 smallvec![Effect::None]
//!             }
//!         }
//!     }
//! }
//! ```

pub use smallvec::{smallvec, SmallVec};

/// Declarative macros for building effects
pub mod effect_macros;

/// Reducer module - The core trait for screen logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all state transitions and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Updates state in place
        /// 2. Returns effect descriptions to be executed
        ///
        /// Most actions produce zero or one effect, hence the inline capacity of 4.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values, not execution.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Returns true for `Effect::None`
        #[must_use]
        pub const fn is_noop(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

// Re-export the two types every reducer touches
pub use effect::Effect;
pub use reducer::Reducer;
