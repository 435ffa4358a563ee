//! 组卷上下文
//!
//! 封装「我正在处理第几个计划、叫什么名字」这一信息，只用于日志

use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct PlanCtx {
    /// 计划索引（从1开始）
    pub plan_index: usize,
    pub plan_name: String,
}

impl PlanCtx {
    pub fn new(plan_index: usize, plan_name: impl Into<String>) -> Self {
        Self {
            plan_index,
            plan_name: plan_name.into(),
        }
    }
}

impl Display for PlanCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[计划 {} {}]", self.plan_index, self.plan_name)
    }
}
