//! 权重分配算法
//!
//! 给定总题数和「科目 → 章节」两级权重树，计算每个科目、每个章节应抽取的题目数量。
//!
//! ## 规则
//!
//! 1. 权重之和大于 0 时，按 `round(total * w / Σw)` 四舍五入（0.5 向上）计算份额；
//!    权重为 0 的项得到 0 题，但仍保留在结果中
//! 2. 权重全部为 0 时平均分配：每项 `total / n`，余数依次分给前 `total % n` 项
//! 3. 四舍五入造成的差额全部记到最后一项上
//! 4. 如果最后一项被扣成负数，则置 0，剩余的超额从倒数第二项开始依次向前扣除，
//!    保证各项之和始终等于总数
//!
//! 同样的规则先作用于科目，再作用于每个科目下的章节。整个过程是纯函数，没有副作用。

use crate::models::weightage::{DistributionResult, LessonDistribution, SubjectWeightConfig};
use thiserror::Error;

/// 分配输入校验错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DistributionError {
    #[error("总题数不能为负数: {0}")]
    NegativeTotal(i64),

    #[error("科目 {subject} 的权重无效: {value}")]
    InvalidSubjectWeight { subject: String, value: f64 },

    #[error("科目 {subject} 下章节 {lesson} 的权重无效: {value}")]
    InvalidLessonWeight {
        subject: String,
        lesson: String,
        value: f64,
    },

    #[error("章节练习只能包含一个科目，实际为 {0} 个")]
    ChapterwiseSubjectCount(usize),
}

/// 按两级权重分配题目数量
///
/// `subjects` 为空时返回空结果（即生成 0 道题），由调用方决定如何提示。
pub fn distribute(
    total: i64,
    subjects: &[SubjectWeightConfig],
) -> Result<Vec<DistributionResult>, DistributionError> {
    let total = validate(total, subjects)?;

    let subject_weights: Vec<f64> = subjects.iter().map(|s| s.total_weight_percent).collect();
    let subject_counts = split_count(total, &subject_weights);

    Ok(subjects
        .iter()
        .zip(subject_counts)
        .map(|(subject, count)| distribute_lessons(subject, count))
        .collect())
}

/// 章节练习：只有一个科目，总题数全部落在该科目上，再按章节权重分配
pub fn distribute_chapterwise(
    total: i64,
    subjects: &[SubjectWeightConfig],
) -> Result<Vec<DistributionResult>, DistributionError> {
    if subjects.len() > 1 {
        return Err(DistributionError::ChapterwiseSubjectCount(subjects.len()));
    }
    let total = validate(total, subjects)?;

    Ok(subjects
        .iter()
        .map(|subject| distribute_lessons(subject, total))
        .collect())
}

/// 单层分配：把 `total` 按 `weights` 拆成若干份，返回值与 `weights` 一一对应
pub fn split_count(total: usize, weights: &[f64]) -> Vec<usize> {
    let n = weights.len();
    if n == 0 {
        return Vec::new();
    }

    let weight_sum: f64 = weights.iter().sum();
    if weight_sum <= 0.0 {
        return even_split(total, n);
    }

    let mut counts: Vec<i64> = weights
        .iter()
        .map(|&w| {
            if w > 0.0 {
                round_half_up(total as f64 * w / weight_sum)
            } else {
                0
            }
        })
        .collect();

    let distributed: i64 = counts.iter().sum();
    let diff = total as i64 - distributed;
    let last = n - 1;
    counts[last] += diff;

    if counts[last] < 0 {
        let mut overflow = -counts[last];
        counts[last] = 0;
        for count in counts[..last].iter_mut().rev() {
            if overflow == 0 {
                break;
            }
            let taken = overflow.min(*count);
            *count -= taken;
            overflow -= taken;
        }
    }

    counts.into_iter().map(|c| c.max(0) as usize).collect()
}

fn distribute_lessons(subject: &SubjectWeightConfig, count: usize) -> DistributionResult {
    let lesson_weights: Vec<f64> = subject.lessons.iter().map(|l| l.weight_percent).collect();
    let lessons = subject
        .lessons
        .iter()
        .zip(split_count(count, &lesson_weights))
        .map(|(lesson, question_count)| LessonDistribution {
            lesson_name: lesson.lesson_name.clone(),
            question_count,
        })
        .collect();

    DistributionResult {
        subject_name: subject.subject_name.clone(),
        question_count: count,
        lessons,
    }
}

fn even_split(total: usize, n: usize) -> Vec<usize> {
    let base = total / n;
    let remainder = total % n;
    (0..n)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn validate(total: i64, subjects: &[SubjectWeightConfig]) -> Result<usize, DistributionError> {
    if total < 0 {
        return Err(DistributionError::NegativeTotal(total));
    }

    for subject in subjects {
        if !is_valid_weight(subject.total_weight_percent) {
            return Err(DistributionError::InvalidSubjectWeight {
                subject: subject.subject_name.clone(),
                value: subject.total_weight_percent,
            });
        }
        for lesson in &subject.lessons {
            if !is_valid_weight(lesson.weight_percent) {
                return Err(DistributionError::InvalidLessonWeight {
                    subject: subject.subject_name.clone(),
                    lesson: lesson.lesson_name.clone(),
                    value: lesson.weight_percent,
                });
            }
        }
    }

    Ok(total as usize)
}

fn is_valid_weight(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
