//! DOM辅助模块
//!
//! 封装html5ever的解析入口和rcdom节点树的常用查询操作。
//! 遍历一律按文档顺序进行，高亮偏移和变位表解析都依赖这个顺序。

// 第三方crate导入
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

// 本地模块导入
use crate::error::Result;
use crate::reverso_error;

/// 将HTML字符串解析为节点树
///
/// 片段和完整页面走同一个入口，html5ever会自动补全html/body外壳，
/// 文本节点的文档顺序不受影响。
pub fn parse_html(html: &str) -> Result<RcDom> {
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| reverso_error!(malformed, "html", format!("HTML解析失败: {:?}", e)))
}

/// 按文档顺序遍历子树中的所有节点（含根节点）
pub fn walk<F: FnMut(&Handle)>(node: &Handle, visit: &mut F) {
    visit(node);
    for child in node.children.borrow().iter() {
        walk(child, visit);
    }
}

/// 获取元素节点的标签名，非元素节点返回None
pub fn element_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref().to_string()),
        _ => None,
    }
}

/// 获取元素节点上指定属性的值
pub fn attr_value(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref() == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// 检查元素的class属性是否包含指定class
pub fn has_class(node: &Handle, class: &str) -> bool {
    attr_value(node, "class")
        .map(|value| value.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// 按id查找第一个匹配的元素
pub fn find_element_by_id(root: &Handle, id: &str) -> Option<Handle> {
    let mut found: Option<Handle> = None;
    walk(root, &mut |node| {
        if found.is_none() && attr_value(node, "id").as_deref() == Some(id) {
            found = Some(node.clone());
        }
    });
    found
}

/// 收集子树中所有带指定class的元素，文档顺序
pub fn elements_by_class(root: &Handle, class: &str) -> Vec<Handle> {
    let mut elements = Vec::new();
    walk(root, &mut |node| {
        if has_class(node, class) {
            elements.push(node.clone());
        }
    });
    elements
}

/// 收集子树中所有指定标签名的元素，文档顺序
pub fn elements_by_tag(root: &Handle, tag: &str) -> Vec<Handle> {
    let mut elements = Vec::new();
    walk(root, &mut |node| {
        if element_name(node).as_deref() == Some(tag) {
            elements.push(node.clone());
        }
    });
    elements
}

/// 拼接子树中所有文本节点的内容，文档顺序
pub fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    walk(node, &mut |n| {
        if let NodeData::Text { contents } = &n.data {
            text.push_str(&contents.borrow());
        }
    });
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_text_content() {
        let dom = parse_html("<div>Hello <b>world</b>!</div>").unwrap();
        assert_eq!(text_content(&dom.document), "Hello world!");
    }

    #[test]
    fn test_find_element_by_id() {
        let dom = parse_html(r#"<div id="outer"><span id="inner">x</span></div>"#).unwrap();
        let inner = find_element_by_id(&dom.document, "inner").unwrap();
        assert_eq!(element_name(&inner).as_deref(), Some("span"));
        assert_eq!(text_content(&inner), "x");
        assert!(find_element_by_id(&dom.document, "missing").is_none());
    }

    #[test]
    fn test_elements_by_class_order() {
        let dom = parse_html(
            r#"<ul><li class="item">a</li><li class="item other">b</li><li>c</li></ul>"#,
        )
        .unwrap();
        let items = elements_by_class(&dom.document, "item");
        assert_eq!(items.len(), 2);
        assert_eq!(text_content(&items[0]), "a");
        assert_eq!(text_content(&items[1]), "b");
    }

    #[test]
    fn test_attr_value() {
        let dom = parse_html(r#"<div data-value="en">English</div>"#).unwrap();
        let div = elements_by_tag(&dom.document, "div")[0].clone();
        assert_eq!(attr_value(&div, "data-value").as_deref(), Some("en"));
        assert_eq!(attr_value(&div, "missing"), None);
    }
}
