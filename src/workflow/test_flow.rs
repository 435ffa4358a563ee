//! 组卷流程 - 流程层
//!
//! 核心职责：定义「一份组卷计划」的完整处理流程
//!
//! 流程顺序：
//! 1. 按权重分配每个科目 / 章节的题数
//! 2. 逐个章节查询题库并无放回抽题
//! 3. 组装试卷定义并保存
//! 4. 题量不足时写入报告（兜底）

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::distribution::{distribute, distribute_chapterwise};
use crate::error::AppResult;
use crate::models::question::QuestionBankItem;
use crate::models::test_plan::{TestDefinition, TestKind, TestPlan, TestQuestionRef};
use crate::models::weightage::DistributionResult;
use crate::services::{QuestionBank, SaveResponse, Sampler, Shortfall, ShortfallWriter, TestStore};
use crate::workflow::plan_ctx::PlanCtx;

/// 抽题结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// 所有章节都抽够了题
    Complete { delivered: usize },
    /// 部分章节题量不足，试卷题数少于期望
    PartialFulfillment {
        requested: usize,
        delivered: usize,
        shortfalls: Vec<Shortfall>,
    },
}

impl GenerationOutcome {
    pub fn delivered(&self) -> usize {
        match self {
            GenerationOutcome::Complete { delivered } => *delivered,
            GenerationOutcome::PartialFulfillment { delivered, .. } => *delivered,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, GenerationOutcome::Complete { .. })
    }
}

/// 单个计划的处理报告
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub definition: TestDefinition,
    pub outcome: GenerationOutcome,
    /// 计划没有配置任何科目时不会保存，此处为 `None`
    pub save: Option<SaveResponse>,
}

impl GenerationReport {
    pub fn test_code(&self) -> Option<&str> {
        self.save.as_ref().and_then(|s| s.test_code.as_deref())
    }
}

/// 组卷流程
///
/// - 不持有任何计划数据
/// - 只依赖业务能力（题库、存储、报告）
pub struct TestFlow<B, S> {
    bank: B,
    store: S,
    shortfall_writer: ShortfallWriter,
    sampling_seed: Option<u64>,
    verbose_logging: bool,
}

impl<B: QuestionBank + Sync, S: TestStore + Sync> TestFlow<B, S> {
    pub fn new(bank: B, store: S, config: &Config) -> Self {
        Self {
            bank,
            store,
            shortfall_writer: ShortfallWriter::with_path(config.shortfall_report.clone()),
            sampling_seed: config.sampling_seed,
            verbose_logging: config.verbose_logging,
        }
    }

    pub async fn run(&self, plan: &TestPlan, ctx: &PlanCtx) -> AppResult<GenerationReport> {
        info!("{} 📐 开始分配题数 ({}, 共 {} 题)", ctx, plan.kind, plan.total_questions);

        let distribution = match plan.kind {
            TestKind::FullLength => distribute(plan.total_questions, &plan.subjects)?,
            TestKind::Chapterwise => distribute_chapterwise(plan.total_questions, &plan.subjects)?,
        };
        let requested = plan.total_questions as usize;

        if distribution.is_empty() {
            warn!("{} ⚠️ 未配置任何科目，生成 0 道题", ctx);
            let definition = self.assemble(plan, distribution, Vec::new());
            let outcome = outcome_for(requested, 0, Vec::new());
            return Ok(GenerationReport {
                definition,
                outcome,
                save: None,
            });
        }

        if self.verbose_logging {
            self.log_distribution(ctx, &distribution);
        }

        // ========== 逐章节抽题 ==========
        let filters = plan.filters();
        let mut sampler = Sampler::new(self.sampling_seed);
        let mut questions = Vec::new();
        let mut shortfalls = Vec::new();

        for subject in &distribution {
            if subject.question_count == 0 {
                debug!("{} 科目 {} 分配为 0 题，跳过", ctx, subject.subject_name);
                continue;
            }

            if subject.lessons.is_empty() {
                // 未配置章节：从整个科目抽
                let pool = self
                    .bank
                    .questions_for_lesson(&subject.subject_name, None, &filters)
                    .await?;
                let result = sampler.sample(&subject.subject_name, None, pool, subject.question_count);
                self.log_selected(ctx, &result.selected);
                collect(&mut questions, &mut shortfalls, &subject.subject_name, None, result);
                continue;
            }

            for lesson in &subject.lessons {
                if lesson.question_count == 0 {
                    continue;
                }
                let pool = self
                    .bank
                    .questions_for_lesson(&subject.subject_name, Some(&lesson.lesson_name), &filters)
                    .await?;
                let result = sampler.sample(
                    &subject.subject_name,
                    Some(&lesson.lesson_name),
                    pool,
                    lesson.question_count,
                );
                self.log_selected(ctx, &result.selected);
                collect(
                    &mut questions,
                    &mut shortfalls,
                    &subject.subject_name,
                    Some(&lesson.lesson_name),
                    result,
                );
            }
        }

        for shortfall in &shortfalls {
            warn!("{} ⚠️ 题量不足: {}", ctx, shortfall);
        }
        if !shortfalls.is_empty() {
            self.shortfall_writer.write(&plan.name, &shortfalls).await?;
            warn!("{} ⚠️ 已写入 {}", ctx, self.shortfall_writer.path());
        }

        let definition = self.assemble(plan, distribution, questions);
        let delivered = definition.delivered_questions();
        let outcome = outcome_for(requested, delivered, shortfalls);

        // ========== 保存 ==========
        info!("{} 📤 正在保存试卷 ({}/{} 题)...", ctx, delivered, requested);
        let save = self.store.save_generated_test(&definition).await?;

        if save.success {
            info!(
                "{} ✓ 试卷保存成功: {}",
                ctx,
                save.test_code.as_deref().unwrap_or("-")
            );
        } else {
            warn!(
                "{} ⚠️ 试卷保存失败: {}",
                ctx,
                save.message.as_deref().unwrap_or("未知原因")
            );
        }

        Ok(GenerationReport {
            definition,
            outcome,
            save: Some(save),
        })
    }

    fn assemble(
        &self,
        plan: &TestPlan,
        distribution: Vec<DistributionResult>,
        questions: Vec<TestQuestionRef>,
    ) -> TestDefinition {
        TestDefinition {
            test_code: None,
            name: plan.name.clone(),
            kind: plan.kind,
            filters: plan.filters(),
            requested_questions: plan.total_questions.max(0) as usize,
            distribution,
            questions,
            created_at: chrono::Local::now().to_rfc3339(),
        }
    }

    /// 详细日志：显示抽中的题目预览
    fn log_selected(&self, ctx: &PlanCtx, selected: &[QuestionBankItem]) {
        if !self.verbose_logging {
            return;
        }
        for item in selected {
            info!("{}   ✓ {}", ctx, item);
        }
    }

    fn log_distribution(&self, ctx: &PlanCtx, distribution: &[DistributionResult]) {
        for subject in distribution {
            info!("{}   {}", ctx, subject);
        }
    }
}

fn collect(
    questions: &mut Vec<TestQuestionRef>,
    shortfalls: &mut Vec<Shortfall>,
    subject: &str,
    lesson: Option<&str>,
    result: crate::services::SampleResult,
) {
    questions.extend(result.selected.into_iter().map(|item| TestQuestionRef {
        question_id: item.id,
        subject: subject.to_string(),
        lesson: lesson.map(str::to_string),
    }));
    shortfalls.extend(result.shortfall);
}

fn outcome_for(requested: usize, delivered: usize, shortfalls: Vec<Shortfall>) -> GenerationOutcome {
    if shortfalls.is_empty() && delivered == requested {
        GenerationOutcome::Complete { delivered }
    } else {
        GenerationOutcome::PartialFulfillment {
            requested,
            delivered,
            shortfalls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shortfall() -> Shortfall {
        Shortfall {
            subject: "Physics".to_string(),
            lesson: Some("Optics".to_string()),
            requested: 4,
            available: 1,
        }
    }

    #[test]
    fn complete_when_everything_delivered() {
        let outcome = outcome_for(10, 10, Vec::new());
        assert_eq!(outcome, GenerationOutcome::Complete { delivered: 10 });
        assert!(outcome.is_complete());
    }

    #[test]
    fn partial_when_any_shortfall() {
        let outcome = outcome_for(10, 7, vec![shortfall()]);
        assert!(!outcome.is_complete());
        assert_eq!(outcome.delivered(), 7);
    }

    #[test]
    fn empty_configuration_with_positive_total_is_partial() {
        let outcome = outcome_for(5, 0, Vec::new());
        assert_eq!(
            outcome,
            GenerationOutcome::PartialFulfillment {
                requested: 5,
                delivered: 0,
                shortfalls: vec![]
            }
        );
    }
}
