//! 动词变位模块
//!
//! 封装变位服务：从落地页发现支持的语言，按语言和动词抓取变位页面，
//! 以文档顺序还原出语式、时态和每个变位形式（含人称代词等助词部分）。

// 第三方crate导入
use markup5ever_rcdom::Handle;
use regex::Regex;

// 本地模块导入
use crate::api_constants::{conjugation_config, conjugation_page_url};
use crate::dom;
use crate::error::Result;
use crate::models::Conjugation;
use crate::reverso_error;
use crate::transport::{HttpTransport, Transport};

/// 动词变位客户端
///
/// 语言列表在构造时抓取一次；设置语言时只做本地校验。
pub struct ReversoConjugationClient<T: Transport = HttpTransport> {
    transport: T,
    verb: String,
    lang: String,
    supported_langs: Vec<String>,
}

impl ReversoConjugationClient<HttpTransport> {
    /// 使用默认HTTP传输构造变位客户端
    pub async fn new(verb: &str, lang: &str) -> Result<Self> {
        Self::with_transport(HttpTransport::new()?, verb, lang).await
    }
}

impl<T: Transport> ReversoConjugationClient<T> {
    /// 使用指定传输实现构造变位客户端
    pub async fn with_transport(transport: T, verb: &str, lang: &str) -> Result<Self> {
        let html = transport
            .get_text(conjugation_config::LANDING_URL)
            .await?;
        let supported_langs = parse_supported_langs(&html)?;

        if !supported_langs.iter().any(|l| l == lang) {
            return Err(reverso_error!(invalid_lang, lang, "lang"));
        }

        Ok(Self {
            transport,
            verb: verb.to_string(),
            lang: lang.to_string(),
            supported_langs,
        })
    }

    /// 当前动词
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// 当前语言
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// 支持的语言名称列表（只读）
    pub fn supported_langs(&self) -> &[String] {
        &self.supported_langs
    }

    /// 设置要变位的动词
    pub fn set_verb(&mut self, verb: &str) {
        self.verb = verb.to_string();
    }

    /// 设置语言，必须在支持的语言列表中
    pub fn set_lang(&mut self, lang: &str) -> Result<()> {
        if !self.supported_langs.iter().any(|l| l == lang) {
            return Err(reverso_error!(invalid_lang, lang, "lang"));
        }
        self.lang = lang.to_string();
        Ok(())
    }

    /// 抓取当前动词的全部变位条目
    pub async fn get_conjugations(&self) -> Result<Vec<Conjugation>> {
        let url = conjugation_page_url(&self.lang, &self.verb);
        let html = self.transport.get_text(&url).await?;
        parse_conjugations(&html)
    }
}

/// 从落地页HTML解析支持的语言名称
pub fn parse_supported_langs(html: &str) -> Result<Vec<String>> {
    let dom = dom::parse_html(html)
        .map_err(|e| reverso_error!(bootstrap, format!("变位落地页解析失败: {}", e)))?;

    let picker = dom::elements_by_class(&dom.document, conjugation_config::LANG_PICKER_CLASS)
        .into_iter()
        .next()
        .ok_or_else(|| {
            reverso_error!(
                bootstrap,
                format!("语言选择区域 .{} 缺失", conjugation_config::LANG_PICKER_CLASS)
            )
        })?;
    let dropdown = dom::elements_by_class(&picker, conjugation_config::LANG_LIST_CLASS)
        .into_iter()
        .next()
        .ok_or_else(|| {
            reverso_error!(
                bootstrap,
                format!("语言下拉列表 .{} 缺失", conjugation_config::LANG_LIST_CLASS)
            )
        })?;

    let langs: Vec<String> = dom::elements_by_tag(&dropdown, "li")
        .iter()
        .map(|li| dom::text_content(li).trim().to_string())
        .filter(|lang| !lang.is_empty())
        .collect();

    if langs.is_empty() {
        return Err(reverso_error!(bootstrap, "语言下拉列表未包含任何语言"));
    }
    Ok(langs)
}

/// 从变位页面HTML解析全部变位条目
pub fn parse_conjugations(html: &str) -> Result<Vec<Conjugation>> {
    let dom = dom::parse_html(html)?;

    let verb_node = dom::elements_by_class(&dom.document, conjugation_config::VERB_TITLE_CLASS)
        .into_iter()
        .next()
        .ok_or_else(|| {
            reverso_error!(
                malformed,
                conjugation_config::VERB_TITLE_CLASS,
                "变位页面缺少动词标题"
            )
        })?;
    let verb = dom::text_content(&verb_node).trim().to_string();

    let contraction = Regex::new(r"' ([aeiou])")
        .map_err(|e| reverso_error!(malformed, "conjugation", format!("正则编译失败: {}", e)))?;

    let mut conjugations = Vec::new();
    let mut mode = String::new();
    walk_sections(
        &dom.document,
        &verb,
        &contraction,
        &mut mode,
        &mut conjugations,
    );
    Ok(conjugations)
}

/// 文档顺序遍历页面：语式标题在前，其后的变位列表都归属该语式
///
/// 每个变位列表的时态取它前面最近的非空兄弟节点文本。
fn walk_sections(
    node: &Handle,
    verb: &str,
    contraction: &Regex,
    mode: &mut String,
    out: &mut Vec<Conjugation>,
) {
    let children = node.children.borrow();
    for (idx, child) in children.iter().enumerate() {
        if dom::has_class(child, conjugation_config::MODE_TITLE_CLASS) {
            if let Some(h4) = dom::elements_by_tag(child, "h4").into_iter().next() {
                *mode = dom::text_content(&h4).trim().to_string();
            }
        }

        if dom::has_class(child, conjugation_config::TENSE_LISTING_CLASS) {
            let tense = preceding_sibling_text(&children, idx);
            collect_forms(child, verb, &tense, mode, contraction, out);
            continue;
        }

        walk_sections(child, verb, contraction, mode, out);
    }
}

/// 向前查找最近的非空兄弟节点文本
fn preceding_sibling_text(children: &[Handle], idx: usize) -> String {
    children[..idx]
        .iter()
        .rev()
        .map(|sibling| dom::text_content(sibling).trim().to_string())
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// 收集一个变位列表中的全部条目
fn collect_forms(
    listing: &Handle,
    verb: &str,
    tense: &str,
    mode: &str,
    contraction: &Regex,
    out: &mut Vec<Conjugation>,
) {
    for li in dom::elements_by_tag(listing, "li") {
        let children = li.children.borrow();

        // 动词本体是 <i class="verbtxt">，它前面的节点是助词部分
        let Some(pos) = children.iter().position(|c| {
            dom::element_name(c).as_deref() == Some("i")
                && dom::has_class(c, conjugation_config::FORM_TEXT_CLASS)
        }) else {
            continue;
        };

        let conjugated = dom::text_content(&children[pos]).trim().to_string();
        let extra_parts: Vec<String> = children[..pos]
            .iter()
            .map(|n| dom::text_content(n).trim().to_string())
            .filter(|part| !part.is_empty())
            .collect();
        let extra = contraction
            .replace_all(&extra_parts.join(" "), "'$1")
            .to_string();

        out.push(Conjugation {
            verb: verb.to_string(),
            conjugation: conjugated,
            extra,
            tense: tense.to_string(),
            mode: mode.to_string(),
        });
    }
}
