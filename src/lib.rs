//! jswitch-rs: constant evaluation and switch lowering core for a
//! Java-like compiler
//!
//! This library folds literal and constant-qualified expressions into
//! typed [`ConstantValue`]s, validates switch statements against the
//! published diagnostic vocabulary, and lowers each switch to a
//! [`DispatchPlan`] (dense index table, linear chain, or hashed
//! two-phase dispatch for strings) for the embedding code emitter.

pub mod analysis;
pub mod ast;
pub mod constant;
pub mod diagnostics;
pub mod error;
pub mod lowering;
pub mod trivia;

pub use analysis::{SelectorKind, SwitchAnalysis, SwitchAnalyzer};
pub use constant::ConstantValue;
pub use error::{Error, Result};
pub use lowering::{DispatchOutcome, DispatchPlan, DispatchStrategy};
