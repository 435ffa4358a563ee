//! 题库查询服务 - 业务能力层
//!
//! 只负责「按科目 / 章节 / 筛选条件取出候选题目」，不关心抽多少道

use crate::config::Config;
use crate::error::{AppError, AppResult, BankError, ConfigError};
use crate::models::question::{QuestionBankItem, QuestionFilters};
use std::future::Future;
use std::path::Path;
use tracing::debug;

/// 题库查询能力
pub trait QuestionBank {
    /// 查询某个科目（可选某个章节）下满足筛选条件的全部题目
    ///
    /// `lesson` 为 `None` 时返回整个科目的题目
    fn questions_for_lesson(
        &self,
        subject: &str,
        lesson: Option<&str>,
        filters: &QuestionFilters,
    ) -> impl Future<Output = AppResult<Vec<QuestionBankItem>>> + Send;
}

/// 本地 JSON 题库（全部加载到内存）
#[derive(Debug, Clone, Default)]
pub struct JsonQuestionBank {
    items: Vec<QuestionBankItem>,
}

impl JsonQuestionBank {
    pub fn new(items: Vec<QuestionBankItem>) -> Self {
        Self { items }
    }

    /// 从 JSON 文件加载
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let items = crate::models::load_question_bank(path).await?;
        Ok(Self::new(items))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn query(&self, subject: &str, lesson: Option<&str>, filters: &QuestionFilters) -> Vec<QuestionBankItem> {
        self.items
            .iter()
            .filter(|item| same_name(&item.subject, subject))
            .filter(|item| lesson.map_or(true, |l| same_name(&item.lesson, l)))
            .filter(|item| filters.matches(item))
            .cloned()
            .collect()
    }
}

impl QuestionBank for JsonQuestionBank {
    async fn questions_for_lesson(
        &self,
        subject: &str,
        lesson: Option<&str>,
        filters: &QuestionFilters,
    ) -> AppResult<Vec<QuestionBankItem>> {
        let items = self.query(subject, lesson, filters);
        debug!(
            "本地题库查询: {} / {} -> {} 道题",
            subject,
            lesson.unwrap_or("*"),
            items.len()
        );
        Ok(items)
    }
}

/// 远程题库 API 客户端
///
/// `GET {base_url}/questions?subject=..&lesson=..&exam=..&difficulty=..`，返回题目数组
#[derive(Debug, Clone)]
pub struct HttpQuestionBank {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQuestionBank {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/questions", self.base_url)
    }
}

impl QuestionBank for HttpQuestionBank {
    async fn questions_for_lesson(
        &self,
        subject: &str,
        lesson: Option<&str>,
        filters: &QuestionFilters,
    ) -> AppResult<Vec<QuestionBankItem>> {
        let endpoint = self.endpoint();

        let mut query: Vec<(&str, String)> = vec![("subject", subject.to_string())];
        if let Some(lesson) = lesson {
            query.push(("lesson", lesson.to_string()));
        }
        if let Some(exam) = &filters.exam {
            query.push(("exam", exam.clone()));
        }
        if let Some(difficulty) = filters.difficulty {
            query.push(("difficulty", difficulty.name().to_string()));
        }

        debug!("远程题库查询: {} {:?}", endpoint, query);

        let response = self
            .client
            .get(&endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|e| AppError::bank_request_failed(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BankError::BadResponse {
                endpoint,
                status: status.as_u16(),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::bank_request_failed(&endpoint, e))?;
        let items: Vec<QuestionBankItem> = serde_json::from_str(&body)?;
        Ok(items)
    }
}

/// 运行时选择的题库来源
#[derive(Debug, Clone)]
pub enum QuestionBankSource {
    Local(JsonQuestionBank),
    Remote(HttpQuestionBank),
}

impl QuestionBankSource {
    /// 按配置创建题库：本地文件存在时优先使用本地题库
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        if let Some(path) = config.question_bank_path.as_deref() {
            let path = Path::new(path);
            if path.exists() {
                return Ok(Self::Local(JsonQuestionBank::load(path).await?));
            }
            tracing::warn!("⚠️ 本地题库不存在: {}", path.display());
        }

        match config.question_bank_url.as_deref() {
            Some(url) => Ok(Self::Remote(HttpQuestionBank::new(url))),
            None => Err(AppError::from(ConfigError::MissingQuestionBank).into()),
        }
    }
}

impl QuestionBank for QuestionBankSource {
    async fn questions_for_lesson(
        &self,
        subject: &str,
        lesson: Option<&str>,
        filters: &QuestionFilters,
    ) -> AppResult<Vec<QuestionBankItem>> {
        match self {
            Self::Local(bank) => bank.questions_for_lesson(subject, lesson, filters).await,
            Self::Remote(bank) => bank.questions_for_lesson(subject, lesson, filters).await,
        }
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Difficulty;

    fn item(id: &str, subject: &str, lesson: &str, difficulty: Option<Difficulty>) -> QuestionBankItem {
        QuestionBankItem {
            id: id.to_string(),
            subject: subject.to_string(),
            lesson: lesson.to_string(),
            exam: None,
            difficulty,
            question_text: format!("question {id}"),
            options: vec![],
            correct_answer: None,
        }
    }

    fn bank() -> JsonQuestionBank {
        JsonQuestionBank::new(vec![
            item("p1", "Physics", "Optics", Some(Difficulty::Easy)),
            item("p2", "Physics", "Optics", Some(Difficulty::Hard)),
            item("p3", "Physics", "Waves", None),
            item("c1", "Chemistry", "Organic", None),
        ])
    }

    #[tokio::test]
    async fn filters_by_subject_and_lesson() {
        let items = bank()
            .questions_for_lesson("physics", Some(" optics "), &QuestionFilters::default())
            .await
            .unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn whole_subject_when_lesson_absent() {
        let items = bank()
            .questions_for_lesson("Physics", None, &QuestionFilters::default())
            .await
            .unwrap();
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn applies_difficulty_filter() {
        let filters = QuestionFilters {
            exam: None,
            difficulty: Some(Difficulty::Hard),
        };
        let items = tokio_test::block_on(bank().questions_for_lesson("Physics", Some("Optics"), &filters)).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "p2");
    }

    /// 直连本地服务，不经过环境变量中的代理
    fn local_bank(base_url: &str) -> HttpQuestionBank {
        HttpQuestionBank {
            client: reqwest::Client::builder().no_proxy().build().unwrap(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 本地单次应答的 HTTP 服务，返回 (base_url, 收到的请求行)
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::sync::oneshot::Receiver<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let text = String::from_utf8_lossy(&request);
            let request_line = text.lines().next().unwrap_or_default().to_string();
            let _ = tx.send(request_line);

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        (format!("http://{}/api/", addr), rx)
    }

    #[tokio::test]
    async fn http_bank_sends_filters_and_parses_items() {
        let body = r#"[{"id":"p9","subject":"Physics","lesson":"Optics","exam":"JEE","difficulty":"hard","questionText":"?"}]"#;
        let (base_url, request_line) = serve_once("200 OK", body).await;

        let filters = QuestionFilters {
            exam: Some("JEE".to_string()),
            difficulty: Some(Difficulty::Hard),
        };
        let items = local_bank(&base_url)
            .questions_for_lesson("Physics", Some("Optics"), &filters)
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "p9");
        assert_eq!(items[0].difficulty, Some(Difficulty::Hard));

        let request_line = request_line.await.unwrap();
        assert!(request_line.starts_with("GET /api/questions?"), "{request_line}");
        assert!(request_line.contains("subject=Physics"));
        assert!(request_line.contains("lesson=Optics"));
        assert!(request_line.contains("exam=JEE"));
        assert!(request_line.contains("difficulty=hard"));
    }

    #[tokio::test]
    async fn http_bank_omits_absent_filters() {
        let (base_url, request_line) = serve_once("200 OK", "[]").await;

        let items = local_bank(&base_url)
            .questions_for_lesson("Chemistry", None, &QuestionFilters::default())
            .await
            .unwrap();
        assert!(items.is_empty());

        let request_line = request_line.await.unwrap();
        assert!(request_line.contains("subject=Chemistry"));
        assert!(!request_line.contains("lesson="));
        assert!(!request_line.contains("exam="));
        assert!(!request_line.contains("difficulty="));
    }

    #[tokio::test]
    async fn http_bank_reports_error_status() {
        let (base_url, _request_line) = serve_once("500 Internal Server Error", "{}").await;

        let err = local_bank(&base_url)
            .questions_for_lesson("Physics", None, &QuestionFilters::default())
            .await
            .unwrap_err();
        match err {
            AppError::Bank(BankError::BadResponse { status, endpoint }) => {
                assert_eq!(status, 500);
                assert!(endpoint.ends_with("/api/questions"));
            }
            other => panic!("错误类型不符: {:?}", other),
        }
    }

    #[tokio::test]
    async fn http_bank_reports_malformed_body() {
        let (base_url, _request_line) = serve_once("200 OK", r#"{"not":"an array"}"#).await;

        let err = local_bank(&base_url)
            .questions_for_lesson("Physics", None, &QuestionFilters::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Bank(BankError::JsonParseFailed(_))));
    }

    #[test]
    fn http_bank_trims_trailing_slash() {
        let bank = HttpQuestionBank::new("http://localhost:8080/api/");
        assert_eq!(bank.endpoint(), "http://localhost:8080/api/questions");
    }
}
