//! 配置管理模块
//!
//! 提供CLI参数解析、翻译解析器配置和HTTP翻译提供者配置

// 标准库导入
use std::path::{Path, PathBuf};

// 第三方crate导入
use clap::Parser;

// 本地模块导入
use crate::api_constants::{api_config, service_config, storage_config};
use crate::error::Result;
use crate::translation_error;

/// 翻译解析器配置
///
/// 支持Builder模式进行链式配置。
///
/// # Examples
///
/// ```rust
/// use vocab_translation::config::ResolverConfig;
///
/// let config = ResolverConfig::new()
///     .with_translations_root("/var/lib/phenotips/vocabulary_translations")
///     .with_seed_dir("resources/seeds")
///     .with_source_language("en");
/// assert_eq!(config.source_language(), "en");
/// ```
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// 翻译记忆根目录
    translations_root: PathBuf,
    /// 种子文件目录
    seed_dir: PathBuf,
    /// 人工翻译资源目录
    resources_dir: PathBuf,
    /// 源语言代码
    source_language: String,
}

impl ResolverConfig {
    /// 创建新的配置实例
    ///
    /// 返回具有默认值的配置实例：
    /// - 翻译记忆根目录: ./vocabulary_translations
    /// - 种子目录: resources/seeds
    /// - 人工翻译目录: resources/human
    /// - 源语言: 英文 ("en")
    pub fn new() -> Self {
        Self {
            translations_root: PathBuf::from(storage_config::TRANSLATIONS_DIR_NAME),
            seed_dir: PathBuf::from(storage_config::DEFAULT_SEED_DIR),
            resources_dir: PathBuf::from(storage_config::DEFAULT_RESOURCES_DIR),
            source_language: service_config::DEFAULT_SOURCE_LANG.to_string(),
        }
    }

    pub fn translations_root(&self) -> &Path {
        &self.translations_root
    }

    pub fn seed_dir(&self) -> &Path {
        &self.seed_dir
    }

    pub fn resources_dir(&self) -> &Path {
        &self.resources_dir
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn with_translations_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.translations_root = path.into();
        self
    }

    pub fn with_seed_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.seed_dir = path.into();
        self
    }

    pub fn with_resources_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.resources_dir = path.into();
        self
    }

    pub fn with_source_language(mut self, lang: &str) -> Self {
        self.source_language = lang.to_string();
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP翻译提供者配置
#[derive(Debug, Clone)]
pub struct HttpTranslatorConfig {
    /// 提供者标识
    identifier: String,
    /// 翻译API服务地址
    api_url: String,
    /// 请求超时（秒）
    timeout_secs: u64,
    /// 支持的语言
    languages: Vec<String>,
    /// 支持的词表
    vocabularies: Vec<String>,
}

impl HttpTranslatorConfig {
    /// 创建新的配置实例（本地DeepLX服务，支持 hpo/es）
    pub fn new() -> Self {
        Self {
            identifier: api_config::DEFAULT_PROVIDER_ID.to_string(),
            api_url: api_config::DEFAULT_API_URL.to_string(),
            timeout_secs: api_config::REQUEST_TIMEOUT_SECONDS,
            languages: vec![service_config::DEFAULT_TARGET_LANG.to_string()],
            vocabularies: vec!["hpo".to_string()],
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn vocabularies(&self) -> &[String] {
        &self.vocabularies
    }

    pub fn with_identifier(mut self, identifier: &str) -> Self {
        self.identifier = identifier.to_string();
        self
    }

    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.to_string();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_languages(mut self, languages: &[&str]) -> Self {
        self.languages = languages.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn with_vocabularies(mut self, vocabularies: &[&str]) -> Self {
        self.vocabularies = vocabularies.iter().map(|v| v.to_string()).collect();
        self
    }
}

impl Default for HttpTranslatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// CLI参数结构
#[derive(Parser, Debug)]
#[command(author, version, about = "词表术语翻译工具 - 人工翻译、翻译记忆与机器翻译三级解析", long_about = None)]
pub struct Cli {
    /// 输入术语JSON文件（术语对象数组）
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// 输出文件路径 (可选，默认为输入文件名+语言代码)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// 词表名称 (如: hpo)
    #[arg(long, default_value = "hpo")]
    pub vocabulary: String,

    /// 目标语言代码 (如: es, fr, de)
    #[arg(short, long, default_value = service_config::DEFAULT_TARGET_LANG)]
    pub lang: String,

    /// 源语言代码
    #[arg(long, default_value = service_config::DEFAULT_SOURCE_LANG)]
    pub source_lang: String,

    /// 需要翻译的字段，逗号分隔
    #[arg(short, long, value_delimiter = ',', default_value = "name,def")]
    pub fields: Vec<String>,

    /// 翻译API地址
    #[arg(short, long, default_value = api_config::DEFAULT_API_URL)]
    pub api: String,

    /// 翻译提供者标识
    #[arg(long, default_value = api_config::DEFAULT_PROVIDER_ID)]
    pub provider_id: String,

    /// 翻译记忆根目录
    #[arg(long, default_value = storage_config::TRANSLATIONS_DIR_NAME)]
    pub translations_root: PathBuf,

    /// 种子文件目录
    #[arg(long, default_value = storage_config::DEFAULT_SEED_DIR)]
    pub seed_dir: PathBuf,

    /// 人工翻译资源目录
    #[arg(long, default_value = storage_config::DEFAULT_RESOURCES_DIR)]
    pub resources_dir: PathBuf,

    /// 翻译请求超时时间（秒）
    #[arg(long, default_value_t = api_config::REQUEST_TIMEOUT_SECONDS)]
    pub timeout: u64,

    /// 并发处理的术语数量
    #[arg(long, default_value_t = service_config::DEFAULT_CONCURRENT_TERMS)]
    pub concurrent_terms: usize,

    /// 仅估算需要提交给机器翻译的字符数，不调用翻译API、不写入翻译记忆
    #[arg(long)]
    pub dry_run: bool,

    /// 详细输出模式
    #[arg(short, long)]
    pub verbose: bool,

    /// 静默模式 (仅输出错误)
    #[arg(short, long)]
    pub quiet: bool,

    /// 显示解析统计
    #[arg(long)]
    pub stats: bool,
}

impl Cli {
    /// 校验参数组合
    pub fn validate(&self) -> Result<()> {
        if self.concurrent_terms == 0 {
            return Err(translation_error!(config, "concurrent_terms", "必须大于0"));
        }
        if self.fields.iter().all(|f| f.trim().is_empty()) {
            return Err(translation_error!(config, "fields", "至少需要一个字段"));
        }
        if self.lang == self.source_lang {
            return Err(translation_error!(config, "lang", "目标语言不能与源语言相同"));
        }
        Ok(())
    }

    /// 去除空白后的字段列表
    pub fn field_list(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect()
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::new()
            .with_translations_root(&self.translations_root)
            .with_seed_dir(&self.seed_dir)
            .with_resources_dir(&self.resources_dir)
            .with_source_language(&self.source_lang)
    }

    pub fn translator_config(&self) -> HttpTranslatorConfig {
        HttpTranslatorConfig::new()
            .with_identifier(&self.provider_id)
            .with_api_url(&self.api)
            .with_timeout_secs(self.timeout)
            .with_languages(&[self.lang.as_str()])
            .with_vocabularies(&[self.vocabulary.as_str()])
    }
}
