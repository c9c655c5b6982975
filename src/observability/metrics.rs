//! Metrics collection.
//!
//! # Metrics
//! - `middleware_stack_dispatch_total` (counter): dispatches by outcome
//!   (`response`, `pass`, `error`)
//! - `middleware_stack_rewrites_total` (counter): URIs rewritten before
//!   forwarding

use metrics::counter;

/// How a dispatch through the layer ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A pipe produced a response.
    Response,
    /// No pipe produced a response; forwarded to the inner service.
    Pass,
    /// A predicate or handler failed.
    Error,
}

impl DispatchOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            DispatchOutcome::Response => "response",
            DispatchOutcome::Pass => "pass",
            DispatchOutcome::Error => "error",
        }
    }
}

pub fn record_dispatch(outcome: DispatchOutcome) {
    counter!("middleware_stack_dispatch_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_rewrite() {
    counter!("middleware_stack_rewrites_total").increment(1);
}
