//! 编排层（Orchestration Layer）
//!
//! ```text
//! batch_processor (处理 Vec<TestPlan>)
//!     ↓
//! plan_processor (处理单个 TestPlan)
//!     ↓
//! workflow::TestFlow (分配 → 抽题 → 保存)
//!     ↓
//! services (能力层：question_bank / sampler / test_store / shortfall_writer)
//!     ↓
//! distribution (纯函数：权重分配)
//! ```
//!
//! 编排层只做调度和统计，不做具体业务判断。

pub mod batch_processor;
pub mod plan_processor;

pub use batch_processor::{App, ProcessingStats};
pub use plan_processor::{process_plan, PlanStatus};
