//! 权重配置与分配结果
//!
//! 字段命名与前端表单保持一致（camelCase），同时兼容 TOML 中的 snake_case 写法

use serde::{Deserialize, Serialize};

/// 单个章节的权重配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonWeightConfig {
    #[serde(alias = "lesson_name")]
    pub lesson_name: String,
    /// 章节在所属科目内的权重百分比（0-100）
    #[serde(default, alias = "weight_percent")]
    pub weight_percent: f64,
}

impl LessonWeightConfig {
    pub fn new(lesson_name: impl Into<String>, weight_percent: f64) -> Self {
        Self {
            lesson_name: lesson_name.into(),
            weight_percent,
        }
    }
}

/// 单个科目的权重配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectWeightConfig {
    #[serde(alias = "subject_name")]
    pub subject_name: String,
    /// 科目在整套试卷中的权重百分比（0-100）
    #[serde(default, alias = "total_weight_percent")]
    pub total_weight_percent: f64,
    #[serde(default)]
    pub lessons: Vec<LessonWeightConfig>,
}

impl SubjectWeightConfig {
    pub fn new(subject_name: impl Into<String>, total_weight_percent: f64) -> Self {
        Self {
            subject_name: subject_name.into(),
            total_weight_percent,
            lessons: Vec::new(),
        }
    }

    pub fn with_lessons(mut self, lessons: Vec<LessonWeightConfig>) -> Self {
        self.lessons = lessons;
        self
    }
}

/// 章节分配到的题目数量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDistribution {
    pub lesson_name: String,
    pub question_count: usize,
}

/// 科目分配结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionResult {
    pub subject_name: String,
    pub question_count: usize,
    pub lessons: Vec<LessonDistribution>,
}

impl DistributionResult {
    /// 章节题数之和（没有章节时为 0）
    pub fn lesson_total(&self) -> usize {
        self.lessons.iter().map(|l| l.question_count).sum()
    }
}

impl std::fmt::Display for DistributionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} 题)", self.subject_name, self.question_count)?;
        for lesson in &self.lessons {
            write!(f, " | {}: {}", lesson.lesson_name, lesson.question_count)?;
        }
        Ok(())
    }
}
