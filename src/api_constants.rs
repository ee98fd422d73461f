/// Reverso服务端点配置常量
///
/// 该文件定义了所有Reverso服务相关的常量配置，方便统一管理和维护

/// Context上下文翻译服务配置
pub mod context_config {
    /// 上下文查询服务地址（例句分页与词典翻译共用）
    pub const QUERY_SERVICE_URL: &str = "https://context.reverso.net/bst-query-service";

    /// Context落地页地址（用于发现支持的语言代码）
    pub const LANDING_URL: &str = "https://context.reverso.net/translation/";

    /// 落地页源语言选择区域的元素id
    pub const SOURCE_PICKER_ID: &str = "src-sel";

    /// 落地页目标语言选择区域的元素id
    pub const TARGET_PICKER_ID: &str = "trg-sel";

    /// 选择区域内承载语言代码的属性名
    pub const LANG_CODE_ATTR: &str = "data-value";

    /// 服务端用于标记命中词的高亮标签
    pub const HIGHLIGHT_TAG: &str = "em";
}

/// 语音服务配置
pub mod voice_config {
    /// 语音REST服务基础地址
    pub const BASE_URL: &str = "https://voice.reverso.net/RestPronunciation.svc/v1/output=json/";

    /// 可用语音列表路径
    pub const VOICES_PATH: &str = "GetAvailableVoices";

    /// 默认语速
    pub const DEFAULT_SPEED: u32 = 100;

    /// 最小语速
    pub const MIN_SPEED: u32 = 30;

    /// 最大语速
    pub const MAX_SPEED: u32 = 300;
}

/// 动词变位服务配置
pub mod conjugation_config {
    /// 变位服务基础地址
    pub const BASE_URL: &str = "https://conjugator.reverso.net/";

    /// 变位服务落地页（用于发现支持的语言）
    pub const LANDING_URL: &str = "https://conjugator.reverso.net/conjugation-english.html";

    /// 语言选择区域的class
    pub const LANG_PICKER_CLASS: &str = "select-wrap";

    /// 语言下拉列表的class
    pub const LANG_LIST_CLASS: &str = "dropdown";

    /// 变位页面中展示动词的class
    pub const VERB_TITLE_CLASS: &str = "targetted-word-transl";

    /// 语式标题区域的class
    pub const MODE_TITLE_CLASS: &str = "word-wrap-title";

    /// 时态变位列表的class
    pub const TENSE_LISTING_CLASS: &str = "wrap-verbs-listing";

    /// 列表项中动词本体的class
    pub const FORM_TEXT_CLASS: &str = "verbtxt";
}

/// HTTP请求配置
pub mod http_config {
    /// 请求User-Agent（服务端拒绝无UA的请求）
    pub const USER_AGENT: &str = "Mozilla/5.0";

    /// 请求Content-Type
    pub const CONTENT_TYPE: &str = "application/json; charset=UTF-8";

    /// 请求超时时间（秒）
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
}

/// 验证语言代码格式是否合法（两位ASCII小写字母）
pub fn is_lang_code(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|c| c.is_ascii_lowercase())
}

/// 获取可用语音列表的完整地址
pub fn voices_url() -> String {
    format!("{}{}", voice_config::BASE_URL, voice_config::VOICES_PATH)
}

/// 拼接动词变位页面地址
pub fn conjugation_page_url(lang: &str, verb: &str) -> String {
    format!(
        "{}conjugation-{}-verb-{}.html",
        conjugation_config::BASE_URL,
        lang.to_lowercase(),
        verb
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_code_validation() {
        assert!(is_lang_code("en"));
        assert!(is_lang_code("ru"));
        assert!(!is_lang_code("EN"));
        assert!(!is_lang_code("eng"));
        assert!(!is_lang_code("e"));
        assert!(!is_lang_code("z1"));
    }

    #[test]
    fn test_voices_url() {
        assert_eq!(
            voices_url(),
            "https://voice.reverso.net/RestPronunciation.svc/v1/output=json/GetAvailableVoices"
        );
    }

    #[test]
    fn test_conjugation_page_url() {
        assert_eq!(
            conjugation_page_url("French", "parler"),
            "https://conjugator.reverso.net/conjugation-french-verb-parler.html"
        );
    }
}
