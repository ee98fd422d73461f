//! Reverso.net API 客户端库
//!
//! 这个库封装了Reverso翻译服务的内部端点，提供上下文例句查询、
//! 词典翻译、动词变位和语音接口的类型化结果。

pub mod api_constants;
pub mod bootstrap;
pub mod conjugation;
pub mod context;
pub mod dom;
pub mod error;
pub mod highlight;
pub mod models;
pub mod query;
pub mod transport;
pub mod utils;
pub mod voice;

pub use context::ReversoContextClient;
pub use error::{ReversoError, Result};
pub use models::{
    Conjugation, HighlightSpan, InflectedForm, SupportedLanguages, Translation, UsageExample,
    Voice,
};
