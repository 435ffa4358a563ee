//! # Weightage Test Builder
//!
//! 按科目 / 章节权重自动组卷的工具
//!
//! ## 架构设计
//!
//! ### ① 算法层（Distribution）
//! - `distribution/` - 纯函数，把总题数按两级权重拆到每个章节
//!
//! ### ② 业务能力层（Services）
//! - `QuestionBank` - 按科目 / 章节 / 筛选条件查询题库（本地 JSON 或远程 API）
//! - `Sampler` - 无放回随机抽题，报告题量缺口
//! - `TestStore` - 保存试卷并分配试卷编号
//! - `ShortfallWriter` - 写题量不足报告
//!
//! ### ③ 流程层（Workflow）
//! - `TestFlow` - 一份计划的完整流程（分配 → 抽题 → 保存）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量处理计划，控制并发
//! - `orchestrator/plan_processor` - 单个计划的日志、统计和归档

pub mod config;
pub mod distribution;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use distribution::{distribute, distribute_chapterwise, DistributionError};
pub use error::{AppError, AppResult};
pub use models::{DistributionResult, LessonWeightConfig, SubjectWeightConfig, TestPlan};
pub use orchestrator::{App, ProcessingStats};
pub use workflow::{GenerationOutcome, GenerationReport, PlanCtx, TestFlow};
