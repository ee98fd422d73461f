//! 网络传输模块
//!
//! 客户端核心只依赖这里定义的Transport接口：同步往返、非2xx即错误、
//! 不做重试。生产实现基于reqwest；测试中用可计数的桩实现替换，
//! 验证分页请求的次数和顺序。

// 标准库导入
use std::time::Duration;

// 第三方crate导入
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;

// 本地模块导入
use crate::api_constants::http_config;
use crate::error::Result;
use crate::reverso_error;

/// 核心消费的传输能力
///
/// 重试策略（如果需要）属于传输实现，核心不在内部重试。
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// POST JSON请求体，返回解析后的JSON响应
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value>;

    /// GET请求，返回响应体文本
    async fn get_text(&self, url: &str) -> Result<String>;

    /// GET请求，返回原始字节（语音数据）
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// 基于reqwest的生产传输实现
///
/// 构造时设置请求超时和服务端要求的默认请求头。
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(http_config::USER_AGENT));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static(http_config::CONTENT_TYPE),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(http_config::REQUEST_TIMEOUT_SECONDS))
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(reverso_error!(
                transport,
                format!("服务端返回错误状态: {}", status),
                status.as_u16()
            ));
        }
        Ok(response.json::<Value>().await?)
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(reverso_error!(
                transport,
                format!("服务端返回错误状态: {}", status),
                status.as_u16()
            ));
        }
        Ok(response.text().await?)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(reverso_error!(
                transport,
                format!("服务端返回错误状态: {}", status),
                status.as_u16()
            ));
        }
        Ok(response.bytes().await?.to_vec())
    }
}
