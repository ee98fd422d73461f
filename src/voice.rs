//! 语音服务模块
//!
//! 封装语音REST端点：查询可用语音列表，按文本/语音/语速获取MP3数据。
//! MP3数据与页数缓存遵循同一套失效约定：任何被接受的设置变更都会
//! 使缓存的数据失效，下次读取时重新请求。只负责获取和落盘，不做播放。

// 标准库导入
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

// 第三方crate导入
use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;
use tracing::debug;
use url::Url;

// 本地模块导入
use crate::api_constants::{voice_config, voices_url};
use crate::error::{ReversoError, Result};
use crate::models::Voice;
use crate::reverso_error;
use crate::transport::{HttpTransport, Transport};

/// 查询可用语音列表，按语言名称分组
pub async fn get_voices<T: Transport>(transport: &T) -> Result<BTreeMap<String, Vec<Voice>>> {
    let raw = transport.get_text(&voices_url()).await?;
    parse_voices(&raw)
}

/// 解析语音列表响应
pub fn parse_voices(raw: &str) -> Result<BTreeMap<String, Vec<Voice>>> {
    let payload: Value = serde_json::from_str(raw)
        .map_err(|e| reverso_error!(malformed, "Voices", format!("响应不是JSON: {}", e)))?;
    let entries = payload
        .get("Voices")
        .and_then(Value::as_array)
        .ok_or_else(|| reverso_error!(malformed, "Voices", "字段缺失或不是数组"))?;

    let mut catalog: BTreeMap<String, Vec<Voice>> = BTreeMap::new();
    for entry in entries {
        let name = string_field(entry, "Name")?;
        let language = string_field(entry, "Language")?;
        let gender = string_field(entry, "Gender")?;
        let lang_code = lang_code_field(entry)?;

        catalog.entry(language.clone()).or_default().push(Voice {
            name,
            language,
            lang_code,
            gender,
        });
    }
    Ok(catalog)
}

/// 语音客户端
///
/// 构造时抓取一次语音列表用于校验语音名称；文本、语音、语速的
/// 设置只做本地校验，MP3数据按需获取并缓存到下次变更。
pub struct ReversoVoiceClient<T: Transport = HttpTransport> {
    transport: T,
    voice_names: BTreeSet<String>,
    text: String,
    voice: String,
    speed: u32,
    mp3_cache: Option<Vec<u8>>,
}

impl ReversoVoiceClient<HttpTransport> {
    /// 使用默认HTTP传输构造语音客户端
    pub async fn new(text: &str, voice: &str, speed: u32) -> Result<Self> {
        Self::with_transport(HttpTransport::new()?, text, voice, speed).await
    }
}

impl<T: Transport> ReversoVoiceClient<T> {
    /// 使用指定传输实现构造语音客户端
    pub async fn with_transport(transport: T, text: &str, voice: &str, speed: u32) -> Result<Self> {
        let catalog = get_voices(&transport).await?;
        let voice_names: BTreeSet<String> = catalog
            .into_values()
            .flatten()
            .map(|v| v.name)
            .collect();

        validate_voice(&voice_names, voice)?;
        validate_speed(speed)?;

        Ok(Self {
            transport,
            voice_names,
            text: text.to_string(),
            voice: voice.to_string(),
            speed,
            mp3_cache: None,
        })
    }

    /// 当前文本
    pub fn text(&self) -> &str {
        &self.text
    }

    /// 当前语音名称
    pub fn voice(&self) -> &str {
        &self.voice
    }

    /// 当前语速
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// 设置要朗读的文本
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.touch();
    }

    /// 设置语音名称，必须存在于已抓取的语音列表中
    pub fn set_voice(&mut self, voice: &str) -> Result<()> {
        validate_voice(&self.voice_names, voice)?;
        self.voice = voice.to_string();
        self.touch();
        Ok(())
    }

    /// 设置语速，范围 [30, 300]
    pub fn set_speed(&mut self, speed: u32) -> Result<()> {
        validate_speed(speed)?;
        self.speed = speed;
        self.touch();
        Ok(())
    }

    /// 集中的变更通知路径：使缓存的MP3数据失效
    fn touch(&mut self) {
        self.mp3_cache = None;
    }

    /// 当前设置对应的MP3数据
    ///
    /// 缓存有效时直接返回；失效时请求一次语音流并缓存到下次变更。
    pub async fn mp3_data(&mut self) -> Result<&[u8]> {
        if self.mp3_cache.is_none() {
            let url = self.stream_url()?;
            debug!("🔊 请求语音流: voice={} speed={}", self.voice, self.speed);
            let data = self.transport.get_bytes(url.as_str()).await?;
            self.mp3_cache = Some(data);
        }
        Ok(self.mp3_cache.as_deref().unwrap_or_default())
    }

    /// 把MP3数据写入文件
    pub async fn write_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let data = self.mp3_data().await?.to_vec();
        std::fs::write(path, data).map_err(|e| ReversoError::FileOperation {
            path: path.display().to_string(),
            source: e.to_string(),
        })
    }

    /// 构造语音流请求地址，inputText以base64编码后再做URL转义
    fn stream_url(&self) -> Result<Url> {
        let encoded_text = general_purpose::STANDARD.encode(self.text.as_bytes());
        Url::parse_with_params(
            &format!(
                "{}GetVoiceStream/voiceName={}",
                voice_config::BASE_URL,
                self.voice
            ),
            &[
                ("voiceSpeed", self.speed.to_string()),
                ("inputText", encoded_text),
            ],
        )
        .map_err(|e| reverso_error!(invalid_query, format!("语音流地址构造失败: {}", e)))
    }
}

/// 校验语音名称存在于语音列表中
fn validate_voice(voice_names: &BTreeSet<String>, voice: &str) -> Result<()> {
    if !voice_names.contains(voice) {
        return Err(reverso_error!(
            invalid_query,
            format!("未知的语音名称: {}", voice)
        ));
    }
    Ok(())
}

/// 校验语速在服务端允许的范围内
fn validate_speed(speed: u32) -> Result<()> {
    if !(voice_config::MIN_SPEED..=voice_config::MAX_SPEED).contains(&speed) {
        return Err(reverso_error!(
            invalid_query,
            format!(
                "语速超出范围 [{}, {}]: {}",
                voice_config::MIN_SPEED,
                voice_config::MAX_SPEED,
                speed
            )
        ));
    }
    Ok(())
}

/// 读取条目中的字符串字段
fn string_field(entry: &Value, field: &str) -> Result<String> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .map(|s| s.to_string())
        .ok_or_else(|| reverso_error!(malformed, field, "字段缺失或不是字符串"))
}

/// 读取语言编号，服务端历史上既返回过数字也返回过字符串
fn lang_code_field(entry: &Value) -> Result<u32> {
    let raw = entry
        .get("LangCode")
        .ok_or_else(|| reverso_error!(malformed, "LangCode", "字段缺失"))?;
    match raw {
        Value::Number(n) => n
            .as_u64()
            .map(|n| n as u32)
            .ok_or_else(|| reverso_error!(malformed, "LangCode", format!("不是非负整数: {}", n))),
        Value::String(s) => s
            .parse::<u32>()
            .map_err(|_| reverso_error!(malformed, "LangCode", format!("无法解析: {}", s))),
        other => Err(reverso_error!(
            malformed,
            "LangCode",
            format!("类型不符: {}", other)
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    const VOICES: &str = r#"{
        "Voices": [
            {"Name": "Heather22k", "Language": "US English", "LangCode": "1", "Gender": "F"},
            {"Name": "Will22k", "Language": "US English", "LangCode": 1, "Gender": "M"},
            {"Name": "Alice22k", "Language": "Italian", "LangCode": "7", "Gender": "F"}
        ]
    }"#;

    #[derive(Clone)]
    struct StubTransport {
        mp3: Vec<u8>,
        gets: Arc<Mutex<Vec<String>>>,
    }

    impl StubTransport {
        fn new(mp3: Vec<u8>) -> Self {
            Self {
                mp3,
                gets: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn byte_fetch_count(&self) -> usize {
            self.gets.lock().unwrap().len()
        }
    }

    impl Transport for StubTransport {
        async fn post_json(&self, _url: &str, _body: &Value) -> Result<Value> {
            Ok(json!({}))
        }

        async fn get_text(&self, _url: &str) -> Result<String> {
            Ok(VOICES.to_string())
        }

        async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
            self.gets.lock().unwrap().push(url.to_string());
            Ok(self.mp3.clone())
        }
    }

    #[test]
    fn test_parse_voices_groups_by_language() {
        let catalog = parse_voices(VOICES).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog["US English"].len(), 2);
        assert_eq!(catalog["Italian"][0].name, "Alice22k");
        assert_eq!(catalog["Italian"][0].lang_code, 7);
        assert_eq!(catalog["US English"][1].lang_code, 1);
    }

    #[test]
    fn test_parse_voices_missing_field() {
        let raw = r#"{"Voices": [{"Name": "X", "LangCode": 1, "Gender": "F"}]}"#;
        assert!(matches!(
            parse_voices(raw).err(),
            Some(ReversoError::MalformedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_mp3_data_cached_until_mutation() {
        let stub = StubTransport::new(vec![1, 2, 3]);
        let mut client =
            ReversoVoiceClient::with_transport(stub.clone(), "hello", "Heather22k", 100)
                .await
                .unwrap();

        assert_eq!(client.mp3_data().await.unwrap(), &[1, 2, 3]);
        client.mp3_data().await.unwrap();
        assert_eq!(stub.byte_fetch_count(), 1);

        client.set_speed(150).unwrap();
        client.mp3_data().await.unwrap();
        assert_eq!(stub.byte_fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_voice_rejected() {
        let stub = StubTransport::new(Vec::new());
        let result =
            ReversoVoiceClient::with_transport(stub, "hello", "NoSuchVoice", 100).await;
        assert!(matches!(
            result.err(),
            Some(ReversoError::InvalidQuery { .. })
        ));
    }

    #[tokio::test]
    async fn test_speed_out_of_range_rejected() {
        let stub = StubTransport::new(Vec::new());
        let mut client =
            ReversoVoiceClient::with_transport(stub, "hello", "Heather22k", 100)
                .await
                .unwrap();

        assert!(client.set_speed(29).is_err());
        assert!(client.set_speed(301).is_err());
        assert!(client.set_speed(30).is_ok());
        assert!(client.set_speed(300).is_ok());
    }

    #[tokio::test]
    async fn test_stream_url_encodes_input_text() {
        let stub = StubTransport::new(Vec::new());
        let mut client =
            ReversoVoiceClient::with_transport(stub.clone(), "hello world", "Heather22k", 100)
                .await
                .unwrap();

        client.mp3_data().await.unwrap();
        let url = stub.gets.lock().unwrap()[0].clone();
        assert!(url.contains("GetVoiceStream/voiceName=Heather22k"));
        assert!(url.contains("voiceSpeed=100"));
        // base64("hello world") = aGVsbG8gd29ybGQ=，等号会被转义
        assert!(url.contains("inputText=aGVsbG8gd29ybGQ"));
    }
}
