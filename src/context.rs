//! Context上下文翻译客户端模块
//!
//! 驱动上下文查询服务的分页例句流和词典翻译查询。客户端独占持有
//! 查询状态、支持的语言集合和页数缓存；例句流是可重启的惰性序列，
//! 每次调用都返回新的流，按页码严格升序逐页请求，同一时刻最多
//! 一个在途请求，消费者停止后不再发起后续请求。

// 标准库导入
use std::collections::VecDeque;

// 第三方crate导入
use futures::{stream, Stream};
use serde_json::Value;
use tracing::debug;

// 本地模块导入
use crate::api_constants::context_config;
use crate::bootstrap;
use crate::error::Result;
use crate::highlight::extract_spans;
use crate::models::{InflectedForm, SupportedLanguages, Translation, UsageExample};
use crate::query::{PageCache, Query};
use crate::reverso_error;
use crate::transport::{HttpTransport, Transport};

/// 例句对：源语言一侧和目标语言一侧
pub type ExamplePair = (UsageExample, UsageExample);

/// Context上下文翻译客户端
///
/// 构造时从落地页发现支持的语言并校验初始查询；之后所有语言
/// 变更只做本地校验，不发起网络请求。
pub struct ReversoContextClient<T: Transport = HttpTransport> {
    transport: T,
    query: Query,
    supported: SupportedLanguages,
    page_cache: PageCache,
}

impl ReversoContextClient<HttpTransport> {
    /// 使用默认HTTP传输构造客户端
    pub async fn new(
        source_text: &str,
        target_text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Self> {
        Self::with_transport(
            HttpTransport::new()?,
            source_text,
            target_text,
            source_lang,
            target_lang,
        )
        .await
    }
}

impl<T: Transport> ReversoContextClient<T> {
    /// 使用指定传输实现构造客户端
    pub async fn with_transport(
        transport: T,
        source_text: &str,
        target_text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Self> {
        let supported = bootstrap::fetch_supported_languages(&transport).await?;
        validate_pair(&supported, source_lang, target_lang)?;

        Ok(Self {
            transport,
            query: Query::new(source_text, target_text, source_lang, target_lang),
            supported,
            page_cache: PageCache::Stale,
        })
    }

    /// 当前查询（只读）
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// 支持的语言集合（只读）
    pub fn supported_languages(&self) -> &SupportedLanguages {
        &self.supported
    }

    /// 显式刷新支持的语言集合
    pub async fn refresh_supported_languages(&mut self) -> Result<()> {
        self.supported = bootstrap::fetch_supported_languages(&self.transport).await?;
        Ok(())
    }

    /// 设置源文本
    pub fn set_source_text(&mut self, text: &str) {
        self.query.source_text = text.to_string();
        self.touch();
    }

    /// 设置目标文本（空串表示未指定）
    pub fn set_target_text(&mut self, text: &str) {
        self.query.target_text = text.to_string();
        self.touch();
    }

    /// 设置源语言代码
    ///
    /// 校验失败时查询保持原状，不会发起任何网络请求。
    pub fn set_source_lang(&mut self, code: &str) -> Result<()> {
        if !self.supported.is_source_supported(code) {
            return Err(reverso_error!(invalid_lang, code, "source_lang"));
        }
        if code == self.query.target_lang() {
            return Err(reverso_error!(invalid_query, "源语言与目标语言不能相同"));
        }
        self.query.source_lang = code.to_string();
        self.touch();
        Ok(())
    }

    /// 设置目标语言代码
    pub fn set_target_lang(&mut self, code: &str) -> Result<()> {
        if !self.supported.is_target_supported(code) {
            return Err(reverso_error!(invalid_lang, code, "target_lang"));
        }
        if code == self.query.source_lang() {
            return Err(reverso_error!(invalid_query, "源语言与目标语言不能相同"));
        }
        self.query.target_lang = code.to_string();
        self.touch();
        Ok(())
    }

    /// 原子交换源/目标语言
    ///
    /// 交换作为单次变更处理：先整体校验，再一次性写入并标记失效。
    pub fn swap_languages(&mut self) -> Result<()> {
        let new_source = self.query.target_lang().to_string();
        let new_target = self.query.source_lang().to_string();

        if !self.supported.is_source_supported(&new_source) {
            return Err(reverso_error!(invalid_lang, new_source, "source_lang"));
        }
        if !self.supported.is_target_supported(&new_target) {
            return Err(reverso_error!(invalid_lang, new_target, "target_lang"));
        }

        self.query.source_lang = new_source;
        self.query.target_lang = new_target;
        self.touch();
        Ok(())
    }

    /// 集中的变更通知路径：任何被接受的查询变更都经过这里
    fn touch(&mut self) {
        self.page_cache.mark_stale();
    }

    /// 当前查询的总页数
    ///
    /// 缓存有效时直接返回；失效时发起一次页码1的查询读取npages，
    /// 成功后缓存直到下次查询变更。
    pub async fn total_pages(&mut self) -> Result<u64> {
        if let Some(total) = self.page_cache.cached() {
            return Ok(total);
        }

        let body = self.query.to_request_body(1);
        let response = self
            .transport
            .post_json(context_config::QUERY_SERVICE_URL, &body)
            .await?;
        let total = non_negative_int(response.get("npages"), "npages")?;

        self.page_cache.store(total);
        debug!("📄 总页数重算完成: {} 页", total);
        Ok(total)
    }

    /// 返回一条新的惰性例句流
    ///
    /// 每次调用都是独立的流：重新推导总页数（缓存失效则重算），
    /// 然后从页码1开始严格升序逐页请求。页内记录顺序和页间顺序
    /// 都保持服务端给出的顺序；消费者停止消费后不再请求后续页。
    pub async fn get_examples(
        &mut self,
    ) -> Result<impl Stream<Item = Result<ExamplePair>> + '_> {
        let total_pages = self.total_pages().await?;
        let transport = &self.transport;
        let query = self.query.clone();

        let state = PageState {
            next_page: 1,
            total_pages,
            pending: VecDeque::new(),
        };

        Ok(stream::try_unfold(state, move |mut state| {
            let query = query.clone();
            async move {
                if let Some(pair) = state.pending.pop_front() {
                    return Ok(Some((pair, state)));
                }

                // 空页直接跳过，继续请求下一页
                while state.next_page <= state.total_pages && state.pending.is_empty() {
                    let body = query.to_request_body(state.next_page);
                    debug!("📖 请求第 {}/{} 页", state.next_page, state.total_pages);
                    let response = transport
                        .post_json(context_config::QUERY_SERVICE_URL, &body)
                        .await?;
                    state.pending = parse_example_page(&response)?;
                    state.next_page += 1;
                }

                Ok(state.pending.pop_front().map(|pair| (pair, state)))
            }
        }))
    }

    /// 获取词典翻译条目
    ///
    /// 单次请求，与分页无关。空条目列表是正常结果，不是错误。
    pub async fn get_translations(&self) -> Result<Vec<Translation>> {
        let body = self.query.to_request_body(1);
        let response = self
            .transport
            .post_json(context_config::QUERY_SERVICE_URL, &body)
            .await?;

        let entries = response
            .get("dictionary_entry_list")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                reverso_error!(malformed, "dictionary_entry_list", "字段缺失或不是数组")
            })?;

        let mut translations = Vec::with_capacity(entries.len());
        for entry in entries {
            translations.push(parse_dictionary_entry(self.query.source_text(), entry)?);
        }
        Ok(translations)
    }
}

/// 例句流的内部游标状态
struct PageState {
    next_page: u64,
    total_pages: u64,
    pending: VecDeque<ExamplePair>,
}

/// 校验语言对：两侧都在对应集合中，且互不相同
fn validate_pair(
    supported: &SupportedLanguages,
    source_lang: &str,
    target_lang: &str,
) -> Result<()> {
    if !supported.is_source_supported(source_lang) {
        return Err(reverso_error!(invalid_lang, source_lang, "source_lang"));
    }
    if !supported.is_target_supported(target_lang) {
        return Err(reverso_error!(invalid_lang, target_lang, "target_lang"));
    }
    if source_lang == target_lang {
        return Err(reverso_error!(invalid_query, "源语言与目标语言不能相同"));
    }
    Ok(())
}

/// 把一页响应的记录列表映射为例句对队列
fn parse_example_page(response: &Value) -> Result<VecDeque<ExamplePair>> {
    let list = response
        .get("list")
        .and_then(Value::as_array)
        .ok_or_else(|| reverso_error!(malformed, "list", "字段缺失或不是数组"))?;

    let mut pairs = VecDeque::with_capacity(list.len());
    for record in list {
        let source_markup = record
            .get("s_text")
            .and_then(Value::as_str)
            .ok_or_else(|| reverso_error!(malformed, "s_text", "字段缺失或不是字符串"))?;
        let target_markup = record
            .get("t_text")
            .and_then(Value::as_str)
            .ok_or_else(|| reverso_error!(malformed, "t_text", "字段缺失或不是字符串"))?;

        let (source_text, source_spans) =
            extract_spans(source_markup, context_config::HIGHLIGHT_TAG)?;
        let (target_text, target_spans) =
            extract_spans(target_markup, context_config::HIGHLIGHT_TAG)?;

        pairs.push_back((
            UsageExample {
                text: source_text,
                highlighted: source_spans,
            },
            UsageExample {
                text: target_text,
                highlighted: target_spans,
            },
        ));
    }
    Ok(pairs)
}

/// 把一条词典条目映射为Translation
fn parse_dictionary_entry(source_word: &str, entry: &Value) -> Result<Translation> {
    let term = entry
        .get("term")
        .and_then(Value::as_str)
        .ok_or_else(|| reverso_error!(malformed, "term", "字段缺失或不是字符串"))?;
    let frequency = non_negative_int(entry.get("alignFreq"), "alignFreq")?;

    let part_of_speech = entry
        .get("pos")
        .and_then(Value::as_str)
        .filter(|pos| !pos.is_empty())
        .map(|pos| pos.to_string());

    let raw_forms = entry
        .get("inflectedForms")
        .and_then(Value::as_array)
        .ok_or_else(|| reverso_error!(malformed, "inflectedForms", "字段缺失或不是数组"))?;

    let mut inflected_forms = Vec::with_capacity(raw_forms.len());
    for form in raw_forms {
        let form_term = form
            .get("term")
            .and_then(Value::as_str)
            .ok_or_else(|| reverso_error!(malformed, "inflectedForms.term", "字段缺失"))?;
        inflected_forms.push(InflectedForm {
            term: form_term.to_string(),
            frequency: non_negative_int(form.get("alignFreq"), "inflectedForms.alignFreq")?,
        });
    }

    Ok(Translation {
        source_word: source_word.to_string(),
        translation: term.to_string(),
        frequency,
        part_of_speech,
        inflected_forms,
    })
}

/// 读取必须为非负整数的字段
fn non_negative_int(value: Option<&Value>, field: &str) -> Result<u64> {
    let raw = value.ok_or_else(|| reverso_error!(malformed, field, "字段缺失"))?;
    let parsed = raw
        .as_i64()
        .ok_or_else(|| reverso_error!(malformed, field, format!("不是整数: {}", raw)))?;
    if parsed < 0 {
        return Err(reverso_error!(malformed, field, format!("出现负值: {}", parsed)));
    }
    Ok(parsed as u64)
}
