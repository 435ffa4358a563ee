use crate::models::question::{Difficulty, QuestionFilters};
use crate::models::weightage::{DistributionResult, SubjectWeightConfig};
use serde::{Deserialize, Serialize};

/// 试卷类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// 章节练习：单科目，若干章节
    Chapterwise,
    /// 全真模拟：多科目，按科目权重分配
    FullLength,
}

impl TestKind {
    /// 试卷编号前缀
    pub fn code_prefix(self) -> &'static str {
        match self {
            TestKind::Chapterwise => "CW",
            TestKind::FullLength => "FL",
        }
    }
}

impl std::fmt::Display for TestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestKind::Chapterwise => write!(f, "章节练习"),
            TestKind::FullLength => write!(f, "全真模拟"),
        }
    }
}

/// 组卷计划（从 TOML 加载）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestPlan {
    pub name: String,
    pub kind: TestKind,
    /// 期望题目总数，负数会在分配前被拒绝
    pub total_questions: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub subjects: Vec<SubjectWeightConfig>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl TestPlan {
    pub fn filters(&self) -> QuestionFilters {
        QuestionFilters {
            exam: self.exam.clone(),
            difficulty: self.difficulty,
        }
    }

    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }
}

/// 试卷中的一道题（只保存引用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestQuestionRef {
    pub question_id: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson: Option<String>,
}

/// 生成好的试卷定义，交给存储服务保存
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_code: Option<String>,
    pub name: String,
    pub kind: TestKind,
    pub filters: QuestionFilters,
    pub requested_questions: usize,
    pub distribution: Vec<DistributionResult>,
    pub questions: Vec<TestQuestionRef>,
    pub created_at: String,
}

impl TestDefinition {
    pub fn delivered_questions(&self) -> usize {
        self.questions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_length_plan_from_toml() {
        let content = r#"
name = "JEE Mock 1"
kind = "full_length"
total_questions = 30
exam = "JEE"
difficulty = "medium"

[[subjects]]
subjectName = "Physics"
totalWeightPercent = 60

[[subjects.lessons]]
lesson_name = "Optics"
weight_percent = 50

[[subjects.lessons]]
lesson_name = "Waves"
weight_percent = 50

[[subjects]]
subject_name = "Chemistry"
total_weight_percent = 40
"#;
        let plan: TestPlan = toml::from_str(content).unwrap();
        assert_eq!(plan.kind, TestKind::FullLength);
        assert_eq!(plan.total_questions, 30);
        assert_eq!(plan.subjects.len(), 2);
        assert_eq!(plan.subjects[0].lessons.len(), 2);
        assert_eq!(plan.subjects[1].subject_name, "Chemistry");
        assert!(plan.subjects[1].lessons.is_empty());
        assert_eq!(plan.filters().difficulty, Some(Difficulty::Medium));
        assert!(plan.file_path.is_none());
    }

    #[test]
    fn code_prefix_by_kind() {
        assert_eq!(TestKind::Chapterwise.code_prefix(), "CW");
        assert_eq!(TestKind::FullLength.code_prefix(), "FL");
    }
}
