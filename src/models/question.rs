use serde::{Deserialize, Serialize};

/// 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 题库中的一道题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBankItem {
    pub id: String,
    pub subject: String,
    pub lesson: String,
    /// 适用考试（如 JEE、NEET），为空表示通用
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(alias = "question_text")]
    pub question_text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

impl std::fmt::Display for QuestionBankItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let preview = crate::utils::text::preview(&self.question_text, 60);
        write!(f, "[{}] {} / {}: {}", self.id, self.subject, self.lesson, preview)
    }
}

/// 题库查询条件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl QuestionFilters {
    /// 判断题目是否满足筛选条件
    ///
    /// 考试名称不区分大小写；题目未标注考试时视为通用题，任何考试都可使用
    pub fn matches(&self, item: &QuestionBankItem) -> bool {
        let exam_ok = match (&self.exam, &item.exam) {
            (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
            _ => true,
        };
        let difficulty_ok = match self.difficulty {
            Some(wanted) => item.difficulty == Some(wanted),
            None => true,
        };
        exam_ok && difficulty_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(exam: Option<&str>, difficulty: Option<Difficulty>) -> QuestionBankItem {
        QuestionBankItem {
            id: "q1".to_string(),
            subject: "Physics".to_string(),
            lesson: "Optics".to_string(),
            exam: exam.map(str::to_string),
            difficulty,
            question_text: "A ray of light ...".to_string(),
            options: vec![],
            correct_answer: None,
        }
    }

    #[test]
    fn empty_filters_match_everything() {
        assert!(QuestionFilters::default().matches(&item(Some("JEE"), Some(Difficulty::Hard))));
    }

    #[test]
    fn exam_filter_is_case_insensitive_and_accepts_untagged() {
        let filters = QuestionFilters {
            exam: Some("jee".to_string()),
            difficulty: None,
        };
        assert!(filters.matches(&item(Some("JEE"), None)));
        assert!(filters.matches(&item(None, None)));
        assert!(!filters.matches(&item(Some("NEET"), None)));
    }

    #[test]
    fn difficulty_filter_requires_tag() {
        let filters = QuestionFilters {
            exam: None,
            difficulty: Some(Difficulty::Easy),
        };
        assert!(filters.matches(&item(None, Some(Difficulty::Easy))));
        assert!(!filters.matches(&item(None, None)));
    }

    #[test]
    fn display_shows_plain_text_preview() {
        let mut q = item(None, None);
        q.question_text = "<p>Find \\(x^2\\) when <b>x</b> = 2</p>".to_string();
        assert_eq!(q.to_string(), "[q1] Physics / Optics: Find x^2 when x = 2");
    }

    #[test]
    fn deserializes_camel_case_json() {
        let json = r#"{"id":"p-1","subject":"Physics","lesson":"Optics","difficulty":"medium","questionText":"?","options":["a","b"],"correctAnswer":"a"}"#;
        let parsed: QuestionBankItem = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.difficulty, Some(Difficulty::Medium));
        assert_eq!(parsed.correct_answer.as_deref(), Some("a"));
        assert!(parsed.exam.is_none());
    }
}
