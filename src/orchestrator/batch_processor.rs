//! 批量计划处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量组卷和资源管理。
//!
//! 1. **应用初始化**：写日志文件头、打开题库、创建试卷存储
//! 2. **批量加载**：扫描并加载所有组卷计划（`Vec<TestPlan>`）
//! 3. **并发控制**：使用 Semaphore 限制同时处理的计划数量
//! 4. **分批处理**：每批完成后再开始下一批
//! 5. **全局统计**：汇总所有计划的处理结果

use crate::config::Config;
use crate::models::test_plan::TestPlan;
use crate::orchestrator::plan_processor::{self, PlanStatus};
use crate::services::{JsonTestStore, QuestionBankSource};
use crate::utils::logging::{
    init_log_file, log_batch_complete, log_batch_start, log_plans_loaded, log_startup,
    print_final_stats,
};
use crate::workflow::TestFlow;
use anyhow::Result;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    flow: TestFlow<QuestionBankSource, JsonTestStore>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(config.max_concurrent_plans);

        let bank = QuestionBankSource::from_config(&config).await?;
        match &bank {
            QuestionBankSource::Local(local) if local.is_empty() => warn!("⚠️ 本地题库为空，所有试卷都将题量不足"),
            QuestionBankSource::Local(local) => info!("📚 使用本地题库 ({} 道题)", local.len()),
            QuestionBankSource::Remote(_) => info!("🌐 使用远程题库"),
        }

        let store = JsonTestStore::new(&config.output_folder);
        let flow = TestFlow::new(bank, store, &config);

        Ok(Self { config, flow })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        let all_plans = self.load_plans().await?;

        if all_plans.is_empty() {
            warn!("⚠️ 没有找到待处理的组卷计划，程序结束");
            return Ok(ProcessingStats::default());
        }

        log_plans_loaded(all_plans.len(), self.config.max_concurrent_plans);

        let stats = self.process_all_plans(&all_plans).await;

        print_final_stats(
            stats.complete,
            stats.partial,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    async fn load_plans(&self) -> Result<Vec<TestPlan>> {
        info!("\n📁 正在扫描组卷计划...");
        crate::models::load_all_plans(&self.config.plan_folder).await
    }

    async fn process_all_plans(&self, all_plans: &[TestPlan]) -> ProcessingStats {
        let batch_size = self.config.max_concurrent_plans.max(1);
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total_plans = all_plans.len();
        let total_batches = total_plans.div_ceil(batch_size);
        let mut stats = ProcessingStats {
            total: total_plans,
            ..Default::default()
        };

        for (batch_idx, batch) in all_plans.chunks(batch_size).enumerate() {
            let batch_start = batch_idx * batch_size;
            let batch_num = batch_idx + 1;
            log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_start + batch.len(),
                total_plans,
            );

            let batch_result = self.process_batch(batch, batch_start, semaphore.clone()).await;
            log_batch_complete(batch_num, batch_result.succeeded(), batch.len());
            stats.merge(&batch_result);
        }

        stats
    }

    async fn process_batch(
        &self,
        batch: &[TestPlan],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> ProcessingStats {
        let tasks = batch.iter().enumerate().map(|(idx, plan)| {
            let plan_index = batch_start + idx + 1;
            let semaphore = semaphore.clone();
            async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        error!("[计划 {}] 无法获取并发许可: {}", plan_index, e);
                        return None;
                    }
                };
                match plan_processor::process_plan(
                    &self.flow,
                    plan,
                    plan_index,
                    self.config.archive_processed_plans,
                )
                .await
                {
                    Ok(status) => Some(status),
                    Err(e) => {
                        error!("[计划 {}] ❌ 处理过程中发生错误: {:#}", plan_index, e);
                        None
                    }
                }
            }
        });

        let mut result = ProcessingStats {
            total: batch.len(),
            ..Default::default()
        };
        for status in join_all(tasks).await {
            match status {
                Some(PlanStatus::Complete) => result.complete += 1,
                Some(PlanStatus::Partial) => result.partial += 1,
                Some(PlanStatus::NotSaved) | None => result.failed += 1,
            }
        }
        result
    }
}

/// 处理统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub complete: usize,
    pub partial: usize,
    pub failed: usize,
    pub total: usize,
}

impl ProcessingStats {
    /// 已保存的计划数（含题量不足）
    pub fn succeeded(&self) -> usize {
        self.complete + self.partial
    }

    fn merge(&mut self, other: &ProcessingStats) {
        self.complete += other.complete;
        self.partial += other.partial;
        self.failed += other.failed;
    }
}
