//! 文本辅助函数

use regex::Regex;
use std::sync::OnceLock;

fn markup_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // HTML 标签和 MathJax 定界符 \( \) \[ \]
    PATTERN.get_or_init(|| Regex::new(r"<[^>]+>|\\[()\[\]]").expect("valid markup pattern"))
}

/// 去掉题干中的标记，压缩空白
pub fn strip_markup(text: &str) -> String {
    let stripped = markup_pattern().replace_all(text, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

/// 题干预览：去标记后截断
pub fn preview(text: &str, max_len: usize) -> String {
    truncate_text(&strip_markup(text), max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_html_and_mathjax_delimiters() {
        assert_eq!(
            strip_markup("<p>Find \\(x^2\\) when <b>x</b> = 2</p>"),
            "Find x^2 when x = 2"
        );
    }

    #[test]
    fn truncates_by_chars() {
        assert_eq!(truncate_text("物理化学生物", 2), "物理...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}
