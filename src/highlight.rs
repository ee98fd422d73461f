//! 高亮区间提取模块
//!
//! 服务端返回的例句是内嵌高亮标签的HTML片段，本模块把片段还原为
//! 纯文本，并给出被高亮标签包裹部分在纯文本中的字符偏移区间。
//! 提取是纯函数，不做任何I/O。

// 第三方crate导入
use markup5ever_rcdom::{Handle, NodeData};

// 本地模块导入
use crate::dom;
use crate::error::Result;
use crate::models::HighlightSpan;
use crate::reverso_error;

/// 提取HTML片段中被高亮标签包裹的字符区间
///
/// 返回去除全部标记后的纯文本，以及按文档顺序排列、互不重叠的
/// 高亮区间。游标在所有文本节点的拼接上推进，只有直接父元素是
/// 高亮标签的文本节点才会记录区间。
///
/// 高亮标签出现嵌套视为服务端响应异常，直接报错而不是猜测合并策略。
///
/// # Examples
///
/// ```rust
/// use reverso_api::highlight::extract_spans;
/// use reverso_api::models::HighlightSpan;
///
/// let (text, spans) = extract_spans("<em>This</em> is <em>a sample</em> string", "em").unwrap();
/// assert_eq!(text, "This is a sample string");
/// assert_eq!(spans, vec![HighlightSpan::new(0, 4), HighlightSpan::new(8, 16)]);
/// ```
pub fn extract_spans(fragment: &str, highlight_tag: &str) -> Result<(String, Vec<HighlightSpan>)> {
    let dom = dom::parse_html(fragment)?;

    let mut text = String::new();
    let mut cursor = 0usize;
    let mut spans = Vec::new();
    collect(
        &dom.document,
        None,
        0,
        highlight_tag,
        &mut text,
        &mut cursor,
        &mut spans,
    )?;

    Ok((text, spans))
}

/// 文档顺序递归收集文本和高亮区间
///
/// `parent_tag`是当前节点直接父元素的标签名，`highlight_depth`
/// 统计祖先链上高亮标签的层数，用于发现嵌套。
fn collect(
    node: &Handle,
    parent_tag: Option<&str>,
    highlight_depth: usize,
    highlight_tag: &str,
    text: &mut String,
    cursor: &mut usize,
    spans: &mut Vec<HighlightSpan>,
) -> Result<()> {
    match &node.data {
        NodeData::Text { contents } => {
            let content = contents.borrow();
            let char_len = content.chars().count();
            if parent_tag == Some(highlight_tag) && char_len > 0 {
                spans.push(HighlightSpan::new(*cursor, *cursor + char_len));
            }
            // 游标无论是否在高亮标签内都要推进
            text.push_str(&content);
            *cursor += char_len;
        }
        NodeData::Element { name, .. } => {
            let local = name.local.as_ref();
            let depth = if local == highlight_tag {
                if highlight_depth > 0 {
                    return Err(reverso_error!(
                        malformed,
                        highlight_tag,
                        format!("高亮标签 <{}> 出现嵌套", highlight_tag)
                    ));
                }
                highlight_depth + 1
            } else {
                highlight_depth
            };
            for child in node.children.borrow().iter() {
                collect(
                    child,
                    Some(local),
                    depth,
                    highlight_tag,
                    text,
                    cursor,
                    spans,
                )?;
            }
        }
        _ => {
            for child in node.children.borrow().iter() {
                collect(
                    child,
                    parent_tag,
                    highlight_depth,
                    highlight_tag,
                    text,
                    cursor,
                    spans,
                )?;
            }
        }
    }
    Ok(())
}
