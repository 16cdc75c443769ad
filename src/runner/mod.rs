//! Revision loop controller.
//!
//! This module provides:
//! - RevisionLoop, the compose/critique/revise state machine
//! - LoopState and LoopPhase for the per-run state
//! - LoopResult carrying the final draft and how the loop ended

mod revision_loop;

pub(crate) use revision_loop::call_with_timeout;
pub use revision_loop::{
    DEFAULT_MAX_ATTEMPTS, LoopPhase, LoopResult, LoopState, RevisionLoop, RevisionLoopConfig,
};
