//! 随机抽题 - 业务能力层
//!
//! 从候选题目中无放回抽取指定数量，题量不足时返回 [`Shortfall`]

use crate::models::question::QuestionBankItem;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashSet;

/// 某个章节（或整个科目）题量不足
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortfall {
    pub subject: String,
    pub lesson: Option<String>,
    pub requested: usize,
    pub available: usize,
}

impl Shortfall {
    pub fn missing(&self) -> usize {
        self.requested.saturating_sub(self.available)
    }
}

impl std::fmt::Display for Shortfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} / {}: 需要 {} 题, 仅有 {} 题",
            self.subject,
            self.lesson.as_deref().unwrap_or("全部章节"),
            self.requested,
            self.available
        )
    }
}

/// 单次抽题结果
#[derive(Debug, Clone)]
pub struct SampleResult {
    pub selected: Vec<QuestionBankItem>,
    pub shortfall: Option<Shortfall>,
}

/// 抽题器
///
/// 持有随机数生成器和已选题目 ID，保证同一套试卷内不重复
pub struct Sampler {
    rng: StdRng,
    used_ids: HashSet<String>,
}

impl Sampler {
    /// 指定种子时结果可复现
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            used_ids: HashSet::new(),
        }
    }

    /// 从 `pool` 中抽取 `count` 道题
    ///
    /// 已经被本套试卷选过的题目不会再被选中；可用题目不足时尽量多抽并返回缺口
    pub fn sample(
        &mut self,
        subject: &str,
        lesson: Option<&str>,
        mut pool: Vec<QuestionBankItem>,
        count: usize,
    ) -> SampleResult {
        pool.retain(|item| !self.used_ids.contains(&item.id));
        let mut seen = HashSet::new();
        pool.retain(|item| seen.insert(item.id.clone()));

        let available = pool.len();
        pool.shuffle(&mut self.rng);
        pool.truncate(count);

        for item in &pool {
            self.used_ids.insert(item.id.clone());
        }

        let shortfall = (available < count).then(|| Shortfall {
            subject: subject.to_string(),
            lesson: lesson.map(str::to_string),
            requested: count,
            available,
        });

        SampleResult {
            selected: pool,
            shortfall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(ids: &[&str]) -> Vec<QuestionBankItem> {
        ids.iter()
            .map(|id| QuestionBankItem {
                id: id.to_string(),
                subject: "Physics".to_string(),
                lesson: "Optics".to_string(),
                exam: None,
                difficulty: None,
                question_text: String::new(),
                options: vec![],
                correct_answer: None,
            })
            .collect()
    }

    #[test]
    fn samples_requested_count_without_replacement() {
        let mut sampler = Sampler::new(Some(7));
        let result = sampler.sample("Physics", Some("Optics"), pool(&["a", "b", "c", "d", "e"]), 3);
        assert_eq!(result.selected.len(), 3);
        assert!(result.shortfall.is_none());

        let ids: HashSet<&str> = result.selected.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn reports_shortfall_and_returns_what_is_available() {
        let mut sampler = Sampler::new(Some(1));
        let result = sampler.sample("Physics", Some("Optics"), pool(&["a", "b"]), 5);
        assert_eq!(result.selected.len(), 2);
        let shortfall = result.shortfall.unwrap();
        assert_eq!(shortfall.requested, 5);
        assert_eq!(shortfall.available, 2);
        assert_eq!(shortfall.missing(), 3);
    }

    #[test]
    fn never_reuses_questions_across_calls() {
        let mut sampler = Sampler::new(Some(3));
        let first = sampler.sample("Physics", None, pool(&["a", "b", "c"]), 2);
        let second = sampler.sample("Physics", None, pool(&["a", "b", "c"]), 2);

        assert_eq!(second.selected.len(), 1);
        assert!(!first.selected.iter().any(|i| i.id == second.selected[0].id));
        assert_eq!(second.shortfall.unwrap().available, 1);
    }

    #[test]
    fn duplicate_ids_in_pool_count_once() {
        let mut sampler = Sampler::new(Some(5));
        let result = sampler.sample("Physics", None, pool(&["a", "a", "b"]), 3);
        assert_eq!(result.selected.len(), 2);
        assert_eq!(result.shortfall.unwrap().available, 2);
    }

    #[test]
    fn same_seed_gives_same_selection() {
        let ids = ["a", "b", "c", "d", "e", "f", "g"];
        let first = Sampler::new(Some(42)).sample("Physics", None, pool(&ids), 4);
        let second = Sampler::new(Some(42)).sample("Physics", None, pool(&ids), 4);
        assert_eq!(first.selected, second.selected);
    }

    #[test]
    fn zero_count_selects_nothing() {
        let mut sampler = Sampler::new(None);
        let result = sampler.sample("Physics", None, pool(&["a"]), 0);
        assert!(result.selected.is_empty());
        assert!(result.shortfall.is_none());
    }
}
