//! 实用工具模块
//!
//! 提供日志初始化和例句高亮标记等辅助功能

// 本地模块导入
use crate::models::HighlightSpan;

/// 初始化日志系统
pub fn init_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// 用*字符标记例句中的全部高亮区间
///
/// 区间偏移按字符计数；从最后一个区间开始倒序插入，避免前面的
/// 插入使后面的偏移失真。区间本身互不重叠且从左到右排列。
pub fn highlight_with_markers(text: &str, spans: &[HighlightSpan]) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    for span in spans.iter().rev() {
        chars.insert(span.end, '*');
        chars.insert(span.start, '*');
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_basic() {
        let spans = vec![HighlightSpan::new(0, 4), HighlightSpan::new(8, 16)];
        assert_eq!(
            highlight_with_markers("This is a sample string", &spans),
            "*This* is *a sample* string"
        );
    }

    #[test]
    fn test_markers_empty_spans() {
        assert_eq!(highlight_with_markers("unchanged", &[]), "unchanged");
    }

    #[test]
    fn test_markers_multibyte_text() {
        let spans = vec![HighlightSpan::new(0, 3)];
        assert_eq!(highlight_with_markers("Гитхаб", &spans), "*Гит*хаб");
    }

    #[test]
    fn test_markers_span_to_end() {
        let spans = vec![HighlightSpan::new(5, 9)];
        assert_eq!(highlight_with_markers("full text", &spans), "full *text*");
    }
}
