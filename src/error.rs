//! 统一错误处理模块
//!
//! 提供术语翻译解析引擎的统一错误类型定义和处理机制

// 标准库导入
use std::fmt;

// 第三方crate导入
use anyhow::Error as AnyhowError;

/// 术语翻译统一错误类型
///
/// 定义了翻译解析过程中可能出现的所有错误类型，提供统一的错误处理接口
#[derive(Debug)]
pub enum TranslationError {
    /// 网络请求相关错误
    Network {
        /// 错误消息
        message: String,
        /// HTTP状态码（如果适用）
        status_code: Option<u16>,
    },

    /// XLIFF/XML解析相关错误
    XmlParse {
        /// 来源文件或资源
        path: String,
        /// 具体错误信息
        details: String,
    },

    /// 文件操作相关错误
    FileOperation {
        /// 文件路径
        path: String,
        /// 操作类型（读取、写入、创建等）
        operation: String,
        /// 底层错误信息
        source: String,
    },

    /// 翻译API相关错误
    TranslationApi {
        /// API响应状态码
        status_code: u16,
        /// 错误消息
        message: String,
        /// API地址
        api_url: String,
    },

    /// 配置相关错误
    Configuration {
        /// 配置项名称
        field: String,
        /// 错误原因
        reason: String,
    },

    /// 词表未加载（状态错误）
    VocabularyNotLoaded {
        /// 词表名称
        vocabulary: String,
        /// 语言代码
        language: String,
    },

    /// 不支持的操作（例如翻译多值字段）
    UnsupportedOperation {
        /// 错误详情
        details: String,
    },

    /// 翻译提供者不支持的词表/语言组合
    UnsupportedPair {
        /// 提供者标识
        provider: String,
        /// 词表名称
        vocabulary: String,
        /// 语言代码
        language: String,
    },

    /// 种子资源初始化失败
    Bootstrap {
        /// 提供者标识
        provider: String,
        /// 错误详情
        details: String,
    },

    /// 内部处理错误（包装anyhow::Error）
    Internal {
        /// 包装的错误
        source: AnyhowError,
    },
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationError::Network { message, status_code } => {
                if let Some(code) = status_code {
                    write!(f, "网络请求失败 [{}]: {}", code, message)
                } else {
                    write!(f, "网络请求失败: {}", message)
                }
            }
            TranslationError::XmlParse { path, details } => {
                write!(f, "XLIFF解析失败 [{}]: {}", path, details)
            }
            TranslationError::FileOperation { path, operation, source } => {
                write!(f, "文件{}操作失败 [{}]: {}", operation, path, source)
            }
            TranslationError::TranslationApi { status_code, message, api_url } => {
                write!(f, "翻译API错误 [{}] {}: {}", status_code, api_url, message)
            }
            TranslationError::Configuration { field, reason } => {
                write!(f, "配置错误 [{}]: {}", field, reason)
            }
            TranslationError::VocabularyNotLoaded { vocabulary, language } => {
                write!(f, "词表从未初始化 [{}/{}]: 请先调用 load", vocabulary, language)
            }
            TranslationError::UnsupportedOperation { details } => {
                write!(f, "不支持的操作: {}", details)
            }
            TranslationError::UnsupportedPair { provider, vocabulary, language } => {
                write!(f, "翻译提供者 {} 不支持 [{}/{}]", provider, vocabulary, language)
            }
            TranslationError::Bootstrap { provider, details } => {
                write!(f, "种子资源初始化失败 [{}]: {}", provider, details)
            }
            TranslationError::Internal { source } => {
                write!(f, "内部处理错误: {}", source)
            }
        }
    }
}

impl std::error::Error for TranslationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranslationError::Internal { source } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// 翻译结果类型别名
pub type Result<T> = std::result::Result<T, TranslationError>;

/// 便捷的错误创建宏
#[macro_export]
macro_rules! translation_error {
    (network, $msg:expr) => {
        $crate::error::TranslationError::Network {
            message: $msg.to_string(),
            status_code: None,
        }
    };
    (network, $msg:expr, $code:expr) => {
        $crate::error::TranslationError::Network {
            message: $msg.to_string(),
            status_code: Some($code),
        }
    };
    (xml_parse, $path:expr, $details:expr) => {
        $crate::error::TranslationError::XmlParse {
            path: $path.to_string(),
            details: $details.to_string(),
        }
    };
    (file_op, $path:expr, $op:expr, $source:expr) => {
        $crate::error::TranslationError::FileOperation {
            path: $path.to_string(),
            operation: $op.to_string(),
            source: $source.to_string(),
        }
    };
    (translation_api, $code:expr, $msg:expr, $url:expr) => {
        $crate::error::TranslationError::TranslationApi {
            status_code: $code,
            message: $msg.to_string(),
            api_url: $url.to_string(),
        }
    };
    (config, $field:expr, $reason:expr) => {
        $crate::error::TranslationError::Configuration {
            field: $field.to_string(),
            reason: $reason.to_string(),
        }
    };
    (not_loaded, $vocabulary:expr, $language:expr) => {
        $crate::error::TranslationError::VocabularyNotLoaded {
            vocabulary: $vocabulary.to_string(),
            language: $language.to_string(),
        }
    };
    (unsupported, $details:expr) => {
        $crate::error::TranslationError::UnsupportedOperation {
            details: $details.to_string(),
        }
    };
    (bootstrap, $provider:expr, $details:expr) => {
        $crate::error::TranslationError::Bootstrap {
            provider: $provider.to_string(),
            details: $details.to_string(),
        }
    };
}

/// 从anyhow::Error转换为TranslationError
impl From<AnyhowError> for TranslationError {
    fn from(error: AnyhowError) -> Self {
        TranslationError::Internal { source: error }
    }
}

/// 从reqwest::Error转换为TranslationError
impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        TranslationError::Network {
            message: error.to_string(),
            status_code,
        }
    }
}

/// 从std::io::Error转换为TranslationError
impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::FileOperation {
            path: "unknown".to_string(),
            operation: "io".to_string(),
            source: error.to_string(),
        }
    }
}

/// 从quick_xml::Error转换为TranslationError
impl From<quick_xml::Error> for TranslationError {
    fn from(error: quick_xml::Error) -> Self {
        TranslationError::XmlParse {
            path: "unknown".to_string(),
            details: error.to_string(),
        }
    }
}

impl TranslationError {
    /// 是否为词表未加载的状态错误
    pub fn is_state_error(&self) -> bool {
        matches!(self, TranslationError::VocabularyNotLoaded { .. })
    }

    /// 为文件/解析错误补充路径信息
    pub fn at_path(self, path: impl fmt::Display) -> Self {
        match self {
            TranslationError::XmlParse { details, .. } => TranslationError::XmlParse {
                path: path.to_string(),
                details,
            },
            TranslationError::FileOperation { operation, source, .. } => {
                TranslationError::FileOperation {
                    path: path.to_string(),
                    operation,
                    source,
                }
            }
            other => other,
        }
    }
}
