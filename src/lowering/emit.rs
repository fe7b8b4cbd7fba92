//! Code emitter interface
//!
//! The real emitter lives in the embedding back end; it consumes the
//! dispatch plan (null-guard flag included) and encodes the actual
//! instructions. A recording implementation ships for tests and
//! inspection tooling.

use crate::error::Result;

use super::DispatchPlan;

/// Consumer of lowering decisions
pub trait CodeEmitter {
    fn emit_switch(&mut self, plan: &DispatchPlan) -> Result<()>;
}

/// Emitter that records every plan it is handed
#[derive(Debug, Default)]
pub struct RecordingEmitter {
    pub plans: Vec<DispatchPlan>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodeEmitter for RecordingEmitter {
    fn emit_switch(&mut self, plan: &DispatchPlan) -> Result<()> {
        self.plans.push(plan.clone());
        Ok(())
    }
}
