//! 翻译记忆模块
//!
//! 按（词表, 语言）缓存机器翻译结果，持久化为XLIFF文件。
//!
//! 每个（词表, 语言）有独立的锁：
//! - `load`/`unload` 在整个文件操作期间持有锁，查询不会看到半加载状态
//! - 不同词表之间互不阻塞
//! - 除 `load` 外，所有操作在未加载时返回状态错误，不会自动加载

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::bootstrap::{seed_file_name, write_atomically};
use crate::error::{Result, TranslationError};
use crate::translation_error;
use crate::unit_store::{self, check_unit_key, DocumentInfo, TranslationUnit, UnitTable};

/// 单个（词表, 语言）的状态；`None` 表示未加载
#[derive(Debug, Default)]
struct Slot {
    units: Option<UnitTable>,
}

type SlotKey = (String, String);

/// 翻译记忆
#[derive(Debug)]
pub struct TranslationMemory {
    home: PathBuf,
    provider_id: String,
    source_language: String,
    slots: Mutex<HashMap<SlotKey, Arc<Mutex<Slot>>>>,
}

fn poisoned<T>(_: PoisonError<T>) -> TranslationError {
    anyhow::anyhow!("翻译记忆锁已损坏").into()
}

impl TranslationMemory {
    /// 创建翻译记忆，文件位于 `home` 目录下
    pub fn new(home: &Path, provider_id: &str, source_language: &str) -> Self {
        Self {
            home: home.to_path_buf(),
            provider_id: provider_id.to_string(),
            source_language: source_language.to_string(),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// 某个词表+语言的持久化文件路径
    pub fn file_path(&self, vocabulary: &str, language: &str) -> PathBuf {
        self.home.join(seed_file_name(&self.provider_id, vocabulary, language))
    }

    fn slot(&self, vocabulary: &str, language: &str) -> Result<Arc<Mutex<Slot>>> {
        let mut slots = self.slots.lock().map_err(poisoned)?;
        let slot = slots
            .entry((vocabulary.to_string(), language.to_string()))
            .or_default();
        Ok(Arc::clone(slot))
    }

    fn with_loaded<R>(
        &self,
        vocabulary: &str,
        language: &str,
        f: impl FnOnce(&mut UnitTable) -> R,
    ) -> Result<R> {
        let slot = self.slot(vocabulary, language)?;
        let mut guard: MutexGuard<'_, Slot> = slot.lock().map_err(poisoned)?;
        let units = guard
            .units
            .as_mut()
            .ok_or_else(|| translation_error!(not_loaded, vocabulary, language))?;
        Ok(f(units))
    }

    /// 加载翻译记忆，替换内存中已有的状态
    ///
    /// 文件不存在时以空表开始。读取或解析失败时保留原有状态并返回错误。
    pub fn load(&self, vocabulary: &str, language: &str) -> Result<usize> {
        let slot = self.slot(vocabulary, language)?;
        let mut guard = slot.lock().map_err(poisoned)?;

        let path = self.file_path(vocabulary, language);
        let units = match unit_store::read_units(&path)? {
            Some(units) => units,
            None => {
                debug!("翻译记忆文件不存在，以空表开始: {}", path.display());
                UnitTable::new()
            }
        };

        let count = units.len();
        guard.units = Some(units);
        info!("📥 翻译记忆已加载: {}/{} ({} 个单元)", vocabulary, language, count);
        Ok(count)
    }

    /// 写出翻译记忆并释放内存状态
    ///
    /// 写出失败时保留内存状态，可以重试。
    pub fn unload(&self, vocabulary: &str, language: &str) -> Result<usize> {
        let slot = self.slot(vocabulary, language)?;
        let mut guard = slot.lock().map_err(poisoned)?;

        let units = guard
            .units
            .as_ref()
            .ok_or_else(|| translation_error!(not_loaded, vocabulary, language))?;

        let info = DocumentInfo {
            vocabulary: vocabulary.to_string(),
            source_language: self.source_language.clone(),
            target_language: language.to_string(),
        };
        let content = unit_store::write_units(units, &info)?;
        let path = self.file_path(vocabulary, language);
        write_atomically(&path, &content)?;

        let count = units.len();
        guard.units = None;
        info!("💾 翻译记忆已写出: {} ({} 个单元)", path.display(), count);
        Ok(count)
    }

    /// 是否已加载
    pub fn is_loaded(&self, vocabulary: &str, language: &str) -> Result<bool> {
        let slot = self.slot(vocabulary, language)?;
        let guard = slot.lock().map_err(poisoned)?;
        Ok(guard.units.is_some())
    }

    /// 未加载时返回状态错误
    pub fn ensure_loaded(&self, vocabulary: &str, language: &str) -> Result<()> {
        self.with_loaded(vocabulary, language, |_| ())
    }

    /// 查询翻译单元
    pub fn lookup(
        &self,
        vocabulary: &str,
        language: &str,
        term_id: &str,
        field: &str,
    ) -> Result<Option<TranslationUnit>> {
        self.with_loaded(vocabulary, language, |units| units.get(term_id, field).cloned())
    }

    /// 插入或覆盖翻译单元
    ///
    /// 术语ID必须能编码为可读回的翻译单元ID，否则拒绝写入。
    pub fn put(
        &self,
        vocabulary: &str,
        language: &str,
        term_id: &str,
        field: &str,
        source: &str,
        target: &str,
    ) -> Result<()> {
        check_unit_key(term_id, field)?;
        self.with_loaded(vocabulary, language, |units| {
            units.insert(term_id, field, source, target)
        })
    }

    /// 已加载的翻译单元数量
    pub fn len(&self, vocabulary: &str, language: &str) -> Result<usize> {
        self.with_loaded(vocabulary, language, |units| units.len())
    }
}
