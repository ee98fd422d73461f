//! 统一错误处理模块
//!
//! 提供Reverso API客户端的统一错误类型定义和处理机制

// 标准库导入
use std::fmt;

/// Reverso API 统一错误类型
///
/// 定义了客户端中可能出现的所有错误类型，提供统一的错误处理接口
#[derive(Debug)]
pub enum ReversoError {
    /// 不支持的语言代码（本地校验，不会发起网络请求）
    InvalidLanguage {
        /// 被拒绝的语言代码
        code: String,
        /// 对应的查询字段（source_lang或target_lang）
        field: String,
    },

    /// 查询状态非法（如源语言与目标语言相同）
    InvalidQuery {
        /// 拒绝原因
        reason: String,
    },

    /// 语言发现失败（落地页缺少预期的选择区域或未找到任何语言代码）
    BootstrapFailed {
        /// 具体错误信息
        details: String,
    },

    /// 网络传输错误
    Transport {
        /// 错误消息
        message: String,
        /// HTTP状态码（如果适用）
        status_code: Option<u16>,
    },

    /// 服务端响应缺少预期字段或字段类型不符
    MalformedResponse {
        /// 出问题的字段
        field: String,
        /// 具体错误信息
        details: String,
    },

    /// 文件操作错误（语音数据写盘）
    FileOperation {
        /// 文件路径
        path: String,
        /// 底层错误信息
        source: String,
    },
}

impl fmt::Display for ReversoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReversoError::InvalidLanguage { code, field } => {
                write!(f, "不支持的语言代码 [{}]: {}", field, code)
            }
            ReversoError::InvalidQuery { reason } => {
                write!(f, "非法查询: {}", reason)
            }
            ReversoError::BootstrapFailed { details } => {
                write!(f, "语言发现失败: {}", details)
            }
            ReversoError::Transport {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "网络请求失败 [{}]: {}", code, message)
                } else {
                    write!(f, "网络请求失败: {}", message)
                }
            }
            ReversoError::MalformedResponse { field, details } => {
                write!(f, "响应格式异常 [{}]: {}", field, details)
            }
            ReversoError::FileOperation { path, source } => {
                write!(f, "文件写入失败 [{}]: {}", path, source)
            }
        }
    }
}

impl std::error::Error for ReversoError {}

/// Reverso API 结果类型别名
pub type Result<T> = std::result::Result<T, ReversoError>;

/// 便捷的错误创建宏
#[macro_export]
macro_rules! reverso_error {
    (invalid_lang, $code:expr, $field:expr) => {
        $crate::error::ReversoError::InvalidLanguage {
            code: $code.to_string(),
            field: $field.to_string(),
        }
    };
    (invalid_query, $reason:expr) => {
        $crate::error::ReversoError::InvalidQuery {
            reason: $reason.to_string(),
        }
    };
    (bootstrap, $details:expr) => {
        $crate::error::ReversoError::BootstrapFailed {
            details: $details.to_string(),
        }
    };
    (transport, $msg:expr) => {
        $crate::error::ReversoError::Transport {
            message: $msg.to_string(),
            status_code: None,
        }
    };
    (transport, $msg:expr, $code:expr) => {
        $crate::error::ReversoError::Transport {
            message: $msg.to_string(),
            status_code: Some($code),
        }
    };
    (malformed, $field:expr, $details:expr) => {
        $crate::error::ReversoError::MalformedResponse {
            field: $field.to_string(),
            details: $details.to_string(),
        }
    };
}

/// 从reqwest::Error转换为ReversoError
///
/// 响应体解码失败属于响应格式问题，其余一律视为传输错误
impl From<reqwest::Error> for ReversoError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ReversoError::MalformedResponse {
                field: "body".to_string(),
                details: error.to_string(),
            }
        } else {
            let status_code = error.status().map(|s| s.as_u16());
            ReversoError::Transport {
                message: error.to_string(),
                status_code,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReversoError::Transport {
            message: "Connection failed".to_string(),
            status_code: Some(500),
        };

        assert_eq!(format!("{}", err), "网络请求失败 [500]: Connection failed");
    }

    #[test]
    fn test_invalid_language_display() {
        let err = reverso_error!(invalid_lang, "xx", "source_lang");
        assert_eq!(format!("{}", err), "不支持的语言代码 [source_lang]: xx");
    }

    #[test]
    fn test_error_macro() {
        let err = reverso_error!(transport, "Test error", 404);
        match err {
            ReversoError::Transport {
                message,
                status_code,
            } => {
                assert_eq!(message, "Test error");
                assert_eq!(status_code, Some(404));
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_malformed_macro() {
        let err = reverso_error!(malformed, "npages", "字段缺失");
        match err {
            ReversoError::MalformedResponse { field, .. } => {
                assert_eq!(field, "npages");
            }
            _ => panic!("Wrong error type"),
        }
    }
}
