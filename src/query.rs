//! 查询配置模块
//!
//! 保存上下文查询的可变状态（源文本、目标文本、语言对），并提供
//! 页数缓存的显式状态机。任何被接受的查询变更都会使缓存失效，
//! 失效与重算的转换集中在一个通知路径上，不在各处散落布尔标志。

// 第三方crate导入
use serde_json::{json, Value};

/// 上下文查询的字段集合
///
/// 字段相等性为结构化比较。校验逻辑（语言集合成员、源目标不同）
/// 由持有查询的客户端负责，这里只承载状态和请求体构造。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub(crate) source_text: String,
    pub(crate) target_text: String,
    pub(crate) source_lang: String,
    pub(crate) target_lang: String,
}

impl Query {
    pub fn new(source_text: &str, target_text: &str, source_lang: &str, target_lang: &str) -> Self {
        Self {
            source_text: source_text.to_string(),
            target_text: target_text.to_string(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
        }
    }

    /// 查询的源文本
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// 查询的目标文本（空串表示未指定）
    pub fn target_text(&self) -> &str {
        &self.target_text
    }

    /// 源语言代码
    pub fn source_lang(&self) -> &str {
        &self.source_lang
    }

    /// 目标语言代码
    pub fn target_lang(&self) -> &str {
        &self.target_lang
    }

    /// 构造指定页码的查询服务请求体
    pub fn to_request_body(&self, npage: u64) -> Value {
        json!({
            "source_text": self.source_text,
            "target_text": self.target_text,
            "source_lang": self.source_lang,
            "target_lang": self.target_lang,
            "npage": npage,
        })
    }
}

/// 页数缓存状态机
///
/// 查询变更后进入Stale，成功重算后回到Fresh。页数只在Stale状态下
/// 重新请求，保证每次变更后恰好重算一次。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCache {
    /// 缓存失效，下次读取页数时需要重新请求
    Stale,
    /// 缓存有效，保存总页数
    Fresh(u64),
}

impl PageCache {
    /// 查询变更通知：使缓存失效
    pub fn mark_stale(&mut self) {
        *self = PageCache::Stale;
    }

    /// 重算成功后写入总页数
    pub fn store(&mut self, total_pages: u64) {
        *self = PageCache::Fresh(total_pages);
    }

    /// 读取缓存的总页数，Stale状态返回None
    pub fn cached(&self) -> Option<u64> {
        match self {
            PageCache::Fresh(total) => Some(*total),
            PageCache::Stale => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_fields() {
        let query = Query::new("Github", "", "en", "ru");
        let body = query.to_request_body(3);

        assert_eq!(body["source_text"], "Github");
        assert_eq!(body["target_text"], "");
        assert_eq!(body["source_lang"], "en");
        assert_eq!(body["target_lang"], "ru");
        assert_eq!(body["npage"], 3);
    }

    #[test]
    fn test_structural_equality() {
        let a = Query::new("кошка", "", "ru", "en");
        let b = Query::new("кошка", "", "ru", "en");
        let c = Query::new("кошка", "", "ru", "de");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_page_cache_transitions() {
        let mut cache = PageCache::Stale;
        assert_eq!(cache.cached(), None);

        cache.store(7);
        assert_eq!(cache.cached(), Some(7));

        cache.mark_stale();
        assert_eq!(cache.cached(), None);
        assert_eq!(cache, PageCache::Stale);
    }
}
