//! Goal tracking engine.
//!
//! The engine owns the goal, transaction and user stores (sea-orm entities)
//! and the completion [`estimator`]. Every lookup is scoped by an optional
//! owner: `Some(user_id)` sees that user's goals, `None` sees the goals
//! without an owner.

pub use error::EngineError;
pub use estimator::{Deposit, Estimate};
pub use goals::{Goal, GoalProgress};
pub use ops::{DepositCmd, DepositOutcome, Engine, EngineBuilder};
pub use transactions::Transaction;
pub use users::User;

pub mod estimator;

mod error;
mod goals;
mod ops;
mod transactions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
