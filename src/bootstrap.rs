//! 语言发现模块
//!
//! 从Context落地页的两个语言选择区域提取支持的源/目标语言代码。
//! 客户端构造时调用一次；区域缺失或没有任何代码都视为发现失败，
//! 绝不带着空语言集合静默继续。

// 标准库导入
use std::collections::BTreeSet;

// 第三方crate导入
use markup5ever_rcdom::Handle;
use tracing::debug;

// 本地模块导入
use crate::api_constants::{context_config, is_lang_code};
use crate::dom;
use crate::error::Result;
use crate::models::SupportedLanguages;
use crate::reverso_error;
use crate::transport::Transport;

/// 抓取落地页并解析支持的语言集合
pub async fn fetch_supported_languages<T: Transport>(transport: &T) -> Result<SupportedLanguages> {
    let html = transport.get_text(context_config::LANDING_URL).await?;
    let languages = parse_supported_languages(&html)?;
    debug!(
        "🌐 语言发现完成: 源 {} 种 / 目标 {} 种",
        languages.source_codes().len(),
        languages.target_codes().len()
    );
    Ok(languages)
}

/// 从落地页HTML解析支持的语言集合
pub fn parse_supported_languages(html: &str) -> Result<SupportedLanguages> {
    let dom = dom::parse_html(html)
        .map_err(|e| reverso_error!(bootstrap, format!("落地页解析失败: {}", e)))?;

    let source = picker_codes(&dom.document, context_config::SOURCE_PICKER_ID)?;
    let target = picker_codes(&dom.document, context_config::TARGET_PICKER_ID)?;

    Ok(SupportedLanguages::new(source, target))
}

/// 提取一个语言选择区域内的全部两位语言代码
fn picker_codes(root: &Handle, picker_id: &str) -> Result<BTreeSet<String>> {
    let region = dom::find_element_by_id(root, picker_id).ok_or_else(|| {
        reverso_error!(bootstrap, format!("语言选择区域 #{} 缺失", picker_id))
    })?;

    let mut codes = BTreeSet::new();
    dom::walk(&region, &mut |node| {
        if let Some(value) = dom::attr_value(node, context_config::LANG_CODE_ATTR) {
            if is_lang_code(&value) {
                codes.insert(value);
            }
        }
    });

    if codes.is_empty() {
        return Err(reverso_error!(
            bootstrap,
            format!("语言选择区域 #{} 未包含任何语言代码", picker_id)
        ));
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReversoError;

    const LANDING: &str = r#"
        <html><body>
          <div id="src-sel">
            <span class="option" data-value="en">English</span>
            <span class="option" data-value="ru">Russian</span>
            <span class="option" data-value="de">German</span>
          </div>
          <div id="trg-sel">
            <span class="option" data-value="en">English</span>
            <span class="option" data-value="fr">French</span>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_landing_page() {
        let languages = parse_supported_languages(LANDING).unwrap();
        assert!(languages.is_source_supported("en"));
        assert!(languages.is_source_supported("de"));
        assert!(!languages.is_source_supported("fr"));
        assert!(languages.is_target_supported("fr"));
        assert!(!languages.is_target_supported("ru"));
    }

    #[test]
    fn test_missing_picker_region() {
        let html = r#"<html><body><div id="src-sel">
            <span data-value="en"></span></div></body></html>"#;
        let result = parse_supported_languages(html);
        assert!(matches!(result, Err(ReversoError::BootstrapFailed { .. })));
    }

    #[test]
    fn test_empty_picker_region() {
        let html = r#"<html><body>
            <div id="src-sel"><span data-value="en"></span></div>
            <div id="trg-sel"><span>no codes here</span></div>
        </body></html>"#;
        let result = parse_supported_languages(html);
        assert!(matches!(result, Err(ReversoError::BootstrapFailed { .. })));
    }

    #[test]
    fn test_non_code_values_filtered() {
        // 区域内非两位小写字母的data-value不会被当作语言代码
        let html = r#"<html><body>
            <div id="src-sel"><span data-value="en"></span><span data-value="all"></span></div>
            <div id="trg-sel"><span data-value="ru"></span><span data-value="XX"></span></div>
        </body></html>"#;
        let languages = parse_supported_languages(html).unwrap();
        assert_eq!(languages.source_codes().len(), 1);
        assert_eq!(languages.target_codes().len(), 1);
    }
}
