//! 单个计划处理器 - 编排层
//!
//! 委托 TestFlow 完成组卷，负责单个计划的日志、统计和文件归档

use crate::models::test_plan::TestPlan;
use crate::services::{QuestionBank, TestStore};
use crate::workflow::{GenerationOutcome, PlanCtx, TestFlow};
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

/// 单个计划的最终状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStatus {
    /// 题量充足并已保存
    Complete,
    /// 已保存，但题数少于期望
    Partial,
    /// 未保存（没有科目配置或保存失败）
    NotSaved,
}

/// 处理单个计划
///
/// # 参数
/// - `flow`: 组卷流程
/// - `plan`: 计划数据
/// - `plan_index`: 计划索引（用于日志）
/// - `archive`: 成功保存后是否把计划文件重命名为 *.done
pub async fn process_plan<B, S>(
    flow: &TestFlow<B, S>,
    plan: &TestPlan,
    plan_index: usize,
    archive: bool,
) -> Result<PlanStatus>
where
    B: QuestionBank + Sync,
    S: TestStore + Sync,
{
    let ctx = PlanCtx::new(plan_index, plan.name.clone());
    log_plan_start(&ctx, plan);

    let report = flow
        .run(plan, &ctx)
        .await
        .with_context(|| format!("计划 {} 组卷失败", plan.name))?;

    let saved = report.save.as_ref().is_some_and(|s| s.success);
    let status = match (&report.outcome, saved) {
        (_, false) => PlanStatus::NotSaved,
        (GenerationOutcome::Complete { .. }, true) => PlanStatus::Complete,
        (GenerationOutcome::PartialFulfillment { .. }, true) => PlanStatus::Partial,
    };

    if saved && archive {
        archive_file(plan.file_path.as_deref(), &ctx).await?;
    }

    log_plan_complete(&ctx, &report.outcome, report.test_code());

    Ok(status)
}

/// 归档已处理的计划文件
async fn archive_file(file_path: Option<&str>, ctx: &PlanCtx) -> Result<()> {
    let Some(file_path) = file_path else {
        warn!("{} ⚠️ 文件路径未设置", ctx);
        return Ok(());
    };

    let path = Path::new(file_path);
    if !path.exists() {
        warn!("{} ⚠️ 文件不存在: {}", ctx, file_path);
        return Ok(());
    }

    let archived = path.with_extension("toml.done");
    fs::rename(path, &archived)
        .await
        .with_context(|| format!("无法归档文件: {}", file_path))?;
    info!(
        "{} 🗂️ 计划文件已归档: {}",
        ctx,
        archived.file_name().unwrap_or_default().to_string_lossy()
    );

    Ok(())
}

// ========== 日志辅助函数 ==========

fn log_plan_start(ctx: &PlanCtx, plan: &TestPlan) {
    info!("{} 开始处理", ctx);
    info!("{} 类型: {}", ctx, plan.kind);
    info!("{} 科目数: {}", ctx, plan.subjects.len());
    info!("{} 期望题数: {}", ctx, plan.total_questions);
}

fn log_plan_complete(ctx: &PlanCtx, outcome: &GenerationOutcome, test_code: Option<&str>) {
    match outcome {
        GenerationOutcome::Complete { delivered } => {
            info!("{} 题目统计: 共 {} 题", ctx, delivered);
        }
        GenerationOutcome::PartialFulfillment {
            requested,
            delivered,
            shortfalls,
        } => {
            warn!(
                "{} 题目统计: {}/{} 题, {} 个章节题量不足",
                ctx,
                delivered,
                requested,
                shortfalls.len()
            );
        }
    }
    info!("{} ✅ 处理完成 (试卷编号: {})\n", ctx, test_code.unwrap_or("未保存"));
}
