//! 机器翻译提供者模块
//!
//! 翻译引擎只依赖 `MachineTranslator` 接口：输入原文，返回译文。
//! 具体提供者可以互换，并通过 `ProviderDescriptor` 声明支持的词表和语言。

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::HttpTranslatorConfig;
use crate::error::Result;
use crate::translation_error;

/// 翻译提供者描述信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// 提供者标识，同时用作目录名和文件名前缀
    pub identifier: String,
    /// 支持的目标语言代码
    pub languages: BTreeSet<String>,
    /// 支持的词表名称
    pub vocabularies: BTreeSet<String>,
}

impl ProviderDescriptor {
    pub fn new<L, V>(identifier: &str, languages: L, vocabularies: V) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            identifier: identifier.to_string(),
            languages: languages.into_iter().map(Into::into).collect(),
            vocabularies: vocabularies.into_iter().map(Into::into).collect(),
        }
    }

    /// 是否支持该词表+语言组合
    pub fn supports(&self, vocabulary: &str, language: &str) -> bool {
        self.vocabularies.contains(vocabulary) && self.languages.contains(language)
    }
}

/// 机器翻译能力接口
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// 提供者描述信息
    fn descriptor(&self) -> &ProviderDescriptor;

    /// 翻译一段文本
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String>;
}

/// 基于HTTP JSON接口（DeepLX兼容）的翻译提供者
pub struct HttpTranslator {
    client: Client,
    api_url: String,
    descriptor: ProviderDescriptor,
}

impl HttpTranslator {
    /// 创建翻译提供者，并按配置设置请求超时
    pub fn new(config: &HttpTranslatorConfig) -> Result<Self> {
        if config.api_url().is_empty() {
            return Err(translation_error!(config, "api_url", "翻译API地址不能为空"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs()))
            .build()
            .map_err(|e| translation_error!(config, "http_client", format!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url().to_string(),
            descriptor: ProviderDescriptor::new(
                config.identifier(),
                config.languages().iter().cloned(),
                config.vocabularies().iter().cloned(),
            ),
        })
    }
}

#[async_trait]
impl MachineTranslator for HttpTranslator {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        debug!("发送翻译请求: {} 字符 ({} -> {})", text.chars().count(), source_lang, target_lang);

        let response = self
            .client
            .post(&self.api_url)
            .json(&json!({
                "text": text,
                "source_lang": source_lang,
                "target_lang": target_lang
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("❌ 翻译API返回错误状态: {}", status);
            return Err(translation_error!(
                translation_api,
                status.as_u16(),
                format!("翻译API返回错误状态: {}", status),
                self.api_url
            ));
        }

        let response_text = response.text().await?;
        extract_translated_text(&response_text).ok_or_else(|| {
            translation_error!(translation_api, status.as_u16(), "翻译结果为空", self.api_url)
        })
    }
}

/// 从响应体中提取译文
///
/// 依次尝试 `data`、`text`、`result` 字段；无法解析为JSON时直接使用响应文本。
pub fn extract_translated_text(response_text: &str) -> Option<String> {
    let translated =
        if let Ok(json_val) = serde_json::from_str::<serde_json::Value>(response_text) {
            json_val
                .get("data")
                .or_else(|| json_val.get("text"))
                .or_else(|| json_val.get("result"))
                .and_then(|v| v.as_str())
                .unwrap_or(response_text)
                .to_string()
        } else {
            response_text.to_string()
        };

    let translated = translated.trim();
    if translated.is_empty() {
        None
    } else {
        Some(translated.to_string())
    }
}
