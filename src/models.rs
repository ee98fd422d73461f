//! 数据模型模块
//!
//! 定义客户端对外暴露的类型化结果：高亮区间、例句、词典翻译、
//! 支持的语言集合、语音与动词变位条目。

// 标准库导入
use std::collections::BTreeSet;

/// 高亮区间，针对去除标记后纯文本的字符偏移，半开区间 [start, end)
///
/// 偏移按字符计数而不是字节计数，保证多字节文本（如西里尔字母）
/// 的区间不会落在字符中间。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    /// 起始字符偏移（含）
    pub start: usize,
    /// 结束字符偏移（不含）
    pub end: usize,
}

impl HighlightSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// 一侧的用法例句：纯文本加按文档顺序排列的高亮区间
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageExample {
    /// 去除标记后的例句文本
    pub text: String,
    /// 服务端高亮的命中区间，从左到右且互不重叠
    pub highlighted: Vec<HighlightSpan>,
}

/// 词典翻译条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// 查询的源词
    pub source_word: String,
    /// 翻译结果
    pub translation: String,
    /// 频率（包含该词的例句数量）
    pub frequency: u64,
    /// 词性（服务端可能不提供）
    pub part_of_speech: Option<String>,
    /// 变形形式，保持服务端给出的顺序
    pub inflected_forms: Vec<InflectedForm>,
}

/// 翻译的变形形式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InflectedForm {
    /// 变形后的词
    pub term: String,
    /// 频率
    pub frequency: u64,
}

/// 支持的语言代码集合，构造时从落地页抓取，之后只读
///
/// 源语言和目标语言各自独立成集；只能整体显式刷新，不会被隐式更新。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportedLanguages {
    source: BTreeSet<String>,
    target: BTreeSet<String>,
}

impl SupportedLanguages {
    pub fn new(source: BTreeSet<String>, target: BTreeSet<String>) -> Self {
        Self { source, target }
    }

    /// 检查代码是否为合法的源语言
    pub fn is_source_supported(&self, code: &str) -> bool {
        self.source.contains(code)
    }

    /// 检查代码是否为合法的目标语言
    pub fn is_target_supported(&self, code: &str) -> bool {
        self.target.contains(code)
    }

    /// 全部源语言代码（只读视图）
    pub fn source_codes(&self) -> &BTreeSet<String> {
        &self.source
    }

    /// 全部目标语言代码（只读视图）
    pub fn target_codes(&self) -> &BTreeSet<String> {
        &self.target
    }
}

/// 可用语音条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// 语音名称（请求语音流时使用）
    pub name: String,
    /// 语言名称
    pub language: String,
    /// 服务端语言编号
    pub lang_code: u32,
    /// 音色性别
    pub gender: String,
}

/// 动词变位条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conjugation {
    /// 页面展示的动词
    pub verb: String,
    /// 变位后的动词形式
    pub conjugation: String,
    /// 动词前的助词部分（如人称代词、助动词）
    pub extra: String,
    /// 时态
    pub tense: String,
    /// 语式
    pub mode: String,
}
