//! Vocabulary Translation - 词表术语分级翻译库
//!
//! 按 人工翻译 → 翻译记忆 → 机器翻译 的顺序为词表术语提供译文。
//! 翻译记忆以XLIFF 1.2格式按提供者、词表和语言分别持久化。

pub mod api_constants;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod human_index;
pub mod memory;
pub mod resolver;
pub mod stats;
pub mod term;
pub mod translator;
pub mod unit_store;
pub mod utils;

pub use config::{HttpTranslatorConfig, ResolverConfig};
pub use error::{Result, TranslationError};
pub use resolver::TranslationResolver;
pub use term::{FieldValue, JsonTerm, VocabularyTerm};
pub use translator::{HttpTranslator, MachineTranslator, ProviderDescriptor};
