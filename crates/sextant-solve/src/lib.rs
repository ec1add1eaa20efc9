//! Constraint solving for path-directed test-input generation.
//!
//! Given the declared parameters of a target function and a set of boolean
//! path conditions over them, this crate compiles the conditions into an
//! SMT query, solves it, and extracts one concrete input vector that drives
//! the target down the chosen path. One conjunction per call, one model or
//! none; path exploration itself lives outside this crate.

pub mod engine;
pub mod session;
pub mod term;
pub mod translate;

pub use engine::{get_model, try_get_model, EngineError, Solution};
pub use session::{SessionError, SolveSession};
pub use translate::{translate, TranslateError};
