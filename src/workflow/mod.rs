pub mod plan_ctx;
pub mod test_flow;

pub use plan_ctx::PlanCtx;
pub use test_flow::{GenerationOutcome, GenerationReport, TestFlow};
