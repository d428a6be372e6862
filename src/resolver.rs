//! 翻译解析器
//!
//! 按 人工翻译 → 翻译记忆 → 机器翻译 的顺序为术语字段提供译文，
//! 机器翻译结果写回翻译记忆，并返回本次实际提交给翻译提供者的字符数。

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::api_constants::term_fields;
use crate::bootstrap::SeedBootstrapper;
use crate::config::ResolverConfig;
use crate::error::{Result, TranslationError};
use crate::human_index::{self, HumanTranslationTable};
use crate::memory::TranslationMemory;
use crate::stats::{ResolutionStats, StatsCounter};
use crate::term::{target_field, FieldValue, VocabularyTerm};
use crate::translation_error;
use crate::translator::MachineTranslator;
use crate::unit_store::check_unit_key;

type TableKey = (String, String);

/// 单个字段的解析计划
enum Step {
    /// 人工翻译命中
    Human { target: String, text: String },
    /// 翻译记忆命中
    Memory { target: String, text: String },
    /// 需要调用机器翻译
    Provider { field: String, target: String, source: String },
}

fn poisoned<T>(_: PoisonError<T>) -> TranslationError {
    anyhow::anyhow!("人工翻译索引锁已损坏").into()
}

/// 原文长度（按字符计）
fn cost_of(text: &str) -> u64 {
    text.chars().count() as u64
}

/// 分级翻译解析器
pub struct TranslationResolver {
    provider: Arc<dyn MachineTranslator>,
    memory: TranslationMemory,
    human: RwLock<HashMap<TableKey, Arc<HumanTranslationTable>>>,
    config: ResolverConfig,
    stats: StatsCounter,
}

impl TranslationResolver {
    /// 创建解析器，并确保翻译提供者的种子翻译记忆已就绪
    ///
    /// 种子初始化失败时返回错误，解析器不可用。
    pub fn new(provider: Arc<dyn MachineTranslator>, config: ResolverConfig) -> Result<Self> {
        let descriptor = provider.descriptor();
        let outcome =
            SeedBootstrapper::new(descriptor, config.translations_root(), config.seed_dir()).run()?;

        let memory = TranslationMemory::new(
            outcome.home(),
            &descriptor.identifier,
            config.source_language(),
        );

        info!("🚀 翻译解析器已就绪: 提供者 {}", descriptor.identifier);
        Ok(Self {
            provider,
            memory,
            human: RwLock::new(HashMap::new()),
            config,
            stats: StatsCounter::default(),
        })
    }

    /// 翻译记忆
    pub fn memory(&self) -> &TranslationMemory {
        &self.memory
    }

    /// 统计快照
    pub fn stats(&self) -> ResolutionStats {
        self.stats.snapshot()
    }

    /// 加载词表的翻译记忆
    pub fn load_vocabulary(&self, vocabulary: &str, language: &str) -> Result<usize> {
        self.memory.load(vocabulary, language)
    }

    /// 写出词表的翻译记忆并释放
    pub fn unload_vocabulary(&self, vocabulary: &str, language: &str) -> Result<usize> {
        self.memory.unload(vocabulary, language)
    }

    /// 索引开始：解析人工翻译资源
    ///
    /// 不会自动加载翻译记忆，调用方需要先调用 `load_vocabulary`。
    pub fn indexing_started(&self, vocabulary: &str, language: &str) -> Result<usize> {
        let table = human_index::load(self.config.resources_dir(), vocabulary, language)?;
        let count = table.len();
        self.human
            .write()
            .map_err(poisoned)?
            .insert((vocabulary.to_string(), language.to_string()), Arc::new(table));
        Ok(count)
    }

    /// 索引结束：丢弃人工翻译表，不涉及持久化
    pub fn indexing_ended(&self, vocabulary: &str, language: &str) -> Result<()> {
        self.human
            .write()
            .map_err(poisoned)?
            .remove(&(vocabulary.to_string(), language.to_string()));
        Ok(())
    }

    fn human_table(&self, vocabulary: &str, language: &str) -> Result<Option<Arc<HumanTranslationTable>>> {
        let tables = self.human.read().map_err(poisoned)?;
        Ok(tables
            .get(&(vocabulary.to_string(), language.to_string()))
            .cloned())
    }

    /// 用人工翻译扩展术语：`label` 写入名称译文字段，`definition` 写入定义译文字段
    ///
    /// 不经过翻译记忆。返回是否写入了任何字段。
    pub fn extend_term<T>(&self, term: &mut T, vocabulary: &str, language: &str) -> Result<bool>
    where
        T: VocabularyTerm + ?Sized,
    {
        let Some(table) = self.human_table(vocabulary, language)? else {
            return Ok(false);
        };
        let Some(entry) = table.entry(term.id()) else {
            return Ok(false);
        };

        let mut extended = false;
        let mapping = [
            (term_fields::LABEL_ATTR, term_fields::NAME_FIELD),
            (term_fields::DEFINITION_ATTR, term_fields::DEFINITION_FIELD),
        ];
        for (attribute, field) in mapping {
            if let Some(text) = entry.get(attribute) {
                term.set(&target_field(field, language), FieldValue::Text(text.clone()));
                extended = true;
            }
        }

        if extended {
            self.stats.term_extended();
        }
        Ok(extended)
    }

    /// 前两级（人工翻译、翻译记忆）查询
    fn cached(
        &self,
        human: Option<&HumanTranslationTable>,
        vocabulary: &str,
        language: &str,
        term_id: &str,
        field: &str,
    ) -> Result<Option<Step>> {
        let target = target_field(field, language);
        if let Some(text) = human.and_then(|table| table.get_field(term_id, field)) {
            return Ok(Some(Step::Human {
                target,
                text: text.to_string(),
            }));
        }
        if let Some(unit) = self.memory.lookup(vocabulary, language, term_id, field)? {
            return Ok(Some(Step::Memory {
                target,
                text: unit.target,
            }));
        }
        Ok(None)
    }

    /// 翻译术语字段，返回提交给机器翻译的字符数
    ///
    /// 先为全部字段制定计划，计划阶段不修改术语和翻译记忆；遇到需要机器翻译的多值字段，
    /// 或术语ID无法写入翻译记忆时整体失败。机器翻译调用期间不持有翻译记忆锁。
    pub async fn translate<T, S>(
        &self,
        vocabulary: &str,
        language: &str,
        term: &mut T,
        fields: &[S],
    ) -> Result<u64>
    where
        T: VocabularyTerm + ?Sized,
        S: AsRef<str>,
    {
        self.memory.ensure_loaded(vocabulary, language)?;
        let human = self.human_table(vocabulary, language)?;
        let term_id = term.id().to_string();

        let mut seen = HashSet::new();
        let mut plan = Vec::with_capacity(fields.len());
        for field in fields {
            let field = field.as_ref();
            if !seen.insert(field) {
                continue;
            }
            if let Some(step) = self.cached(human.as_deref(), vocabulary, language, &term_id, field)? {
                plan.push(step);
                continue;
            }
            match term.get(field) {
                Some(FieldValue::Text(source)) => {
                    check_unit_key(&term_id, field)?;
                    plan.push(Step::Provider {
                        field: field.to_string(),
                        target: target_field(field, language),
                        source,
                    });
                }
                Some(FieldValue::List(_)) => {
                    return Err(translation_error!(
                        unsupported,
                        format!("暂不支持翻译多值字段: {} ({})", field, term_id)
                    ));
                }
                None => debug!("术语 {} 没有字段 {}，跳过", term_id, field),
            }
        }

        let descriptor = self.provider.descriptor();
        let needs_provider = plan.iter().any(|step| matches!(step, Step::Provider { .. }));
        if needs_provider && !descriptor.supports(vocabulary, language) {
            return Err(TranslationError::UnsupportedPair {
                provider: descriptor.identifier.clone(),
                vocabulary: vocabulary.to_string(),
                language: language.to_string(),
            });
        }

        let mut cost = 0;
        for step in plan {
            match step {
                Step::Human { target, text } => {
                    term.set(&target, FieldValue::Text(text));
                    self.stats.human_hit();
                }
                Step::Memory { target, text } => {
                    term.set(&target, FieldValue::Text(text));
                    self.stats.memory_hit();
                }
                Step::Provider { field, target, source } => {
                    let translated = self
                        .provider
                        .translate(&source, self.config.source_language(), language)
                        .await?;
                    self.memory
                        .put(vocabulary, language, &term_id, &field, &source, &translated)?;
                    term.set(&target, FieldValue::Text(translated));

                    let chars = cost_of(&source);
                    self.stats.provider_call(chars);
                    cost += chars;
                    debug!("机器翻译完成: {}/{} ({} 字符)", term_id, field, chars);
                }
            }
        }

        Ok(cost)
    }

    /// 估算翻译这些字段需要提交给机器翻译的字符数
    ///
    /// 不修改术语和翻译记忆，也不调用翻译提供者。多值字段不计入。
    pub fn get_missing_characters<T, S>(
        &self,
        vocabulary: &str,
        language: &str,
        term: &T,
        fields: &[S],
    ) -> Result<u64>
    where
        T: VocabularyTerm + ?Sized,
        S: AsRef<str>,
    {
        self.memory.ensure_loaded(vocabulary, language)?;
        let human = self.human_table(vocabulary, language)?;

        let mut seen = HashSet::new();
        let mut count = 0;
        for field in fields {
            let field = field.as_ref();
            if !seen.insert(field) {
                continue;
            }
            if self
                .cached(human.as_deref(), vocabulary, language, term.id(), field)?
                .is_some()
            {
                continue;
            }
            if let Some(FieldValue::Text(source)) = term.get(field) {
                count += cost_of(&source);
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::JsonTerm;
    use crate::translator::ProviderDescriptor;
    use async_trait::async_trait;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    const VOC: &str = "dummy";
    const LANG: &str = "es";

    const SEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="1.2">
  <file original="dummy" source-language="en" target-language="es" datatype="plaintext">
    <body>
      <trans-unit id="DUM_0001_name">
        <source>Dummy</source>
        <target>El Dummy</target>
      </trans-unit>
    </body>
  </file>
</xliff>
"#;

    const HUMAN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="1.2">
  <file original="dummy" source-language="en" target-language="es" datatype="plaintext">
    <body>
      <trans-unit id="DUM_0003_label">
        <source>Third</source>
        <target>Tercero revisado</target>
      </trans-unit>
      <trans-unit id="DUM_0003_definition">
        <source>The third one.</source>
        <target>El tercero.</target>
      </trans-unit>
    </body>
  </file>
</xliff>
"#;

    /// 测试用翻译提供者：在原文前加 "El "，并记录调用次数
    struct DummyTranslator {
        descriptor: ProviderDescriptor,
        calls: AtomicUsize,
        fail: bool,
    }

    impl DummyTranslator {
        fn new() -> Self {
            Self {
                descriptor: ProviderDescriptor::new("dummy", [LANG], [VOC]),
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MachineTranslator for DummyTranslator {
        fn descriptor(&self) -> &ProviderDescriptor {
            &self.descriptor
        }

        async fn translate(&self, text: &str, _source_lang: &str, _target_lang: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(translation_error!(network, "connection refused"));
            }
            Ok(format!("El {}", text))
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        provider: Arc<DummyTranslator>,
        resolver: TranslationResolver,
    }

    fn config_in(root: &Path) -> ResolverConfig {
        let seeds = root.join("seeds");
        let human = root.join("human");
        fs::create_dir_all(&seeds).unwrap();
        fs::create_dir_all(&human).unwrap();
        fs::write(seeds.join("dummy_dummy_es.xliff"), SEED).unwrap();
        fs::write(human.join("dummy_es.xliff"), HUMAN).unwrap();

        ResolverConfig::new()
            .with_translations_root(root.join("translations"))
            .with_seed_dir(seeds)
            .with_resources_dir(human)
    }

    fn fixture_with(provider: DummyTranslator) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(provider);
        let resolver = TranslationResolver::new(provider.clone(), config_in(dir.path())).unwrap();
        resolver.load_vocabulary(VOC, LANG).unwrap();
        Fixture {
            _dir: dir,
            provider,
            resolver,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(DummyTranslator::new())
    }

    fn term1() -> JsonTerm {
        JsonTerm::new("DUM:0001").with("name", "Dummy")
    }

    fn term2() -> JsonTerm {
        JsonTerm::new("DUM:0002").with("name", "Whatever")
    }

    #[tokio::test]
    async fn test_no_retranslate_of_seeded_unit() {
        let f = fixture();
        let mut term = term1();

        let cost = f.resolver.translate(VOC, LANG, &mut term, &["name"]).await.unwrap();

        assert_eq!(cost, 0);
        assert_eq!(f.provider.calls(), 0);
        assert_eq!(term.get("name_es"), Some(FieldValue::from("El Dummy")));
    }

    #[tokio::test]
    async fn test_translate_charges_source_length() {
        let f = fixture();
        let mut term = term2();

        let cost = f.resolver.translate(VOC, LANG, &mut term, &["name"]).await.unwrap();

        assert_eq!(cost, 8);
        assert_eq!(f.provider.calls(), 1);
        assert_eq!(term.get("name_es"), Some(FieldValue::from("El Whatever")));
        let unit = f.resolver.memory().lookup(VOC, LANG, "DUM:0002", "name").unwrap().unwrap();
        assert_eq!(unit.source, "Whatever");
        assert_eq!(unit.target, "El Whatever");
    }

    #[tokio::test]
    async fn test_translate_is_idempotent() {
        let f = fixture();
        let mut term = term2();

        f.resolver.translate(VOC, LANG, &mut term, &["name"]).await.unwrap();
        let cost = f.resolver.translate(VOC, LANG, &mut term, &["name"]).await.unwrap();

        assert_eq!(cost, 0);
        assert_eq!(f.provider.calls(), 1);
        assert_eq!(term.get("name_es"), Some(FieldValue::from("El Whatever")));
    }

    #[tokio::test]
    async fn test_translations_persist_across_reload() {
        let f = fixture();
        let mut term = term2();

        f.resolver.translate(VOC, LANG, &mut term, &["name"]).await.unwrap();
        f.resolver.unload_vocabulary(VOC, LANG).unwrap();
        f.resolver.load_vocabulary(VOC, LANG).unwrap();
        let mut fresh = term2();
        let cost = f.resolver.translate(VOC, LANG, &mut fresh, &["name"]).await.unwrap();

        assert_eq!(cost, 0);
        assert_eq!(f.provider.calls(), 1);
        assert_eq!(fresh.get("name_es"), Some(FieldValue::from("El Whatever")));
    }

    #[tokio::test]
    async fn test_persisted_translations_survive_new_resolver() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let first = Arc::new(DummyTranslator::new());
        let resolver = TranslationResolver::new(first.clone(), config.clone()).unwrap();
        resolver.load_vocabulary(VOC, LANG).unwrap();
        resolver.translate(VOC, LANG, &mut term2(), &["name"]).await.unwrap();
        resolver.unload_vocabulary(VOC, LANG).unwrap();

        let second = Arc::new(DummyTranslator::new());
        let resolver = TranslationResolver::new(second.clone(), config).unwrap();
        resolver.load_vocabulary(VOC, LANG).unwrap();
        let cost = resolver.translate(VOC, LANG, &mut term2(), &["name"]).await.unwrap();

        assert_eq!(cost, 0);
        assert_eq!(first.calls() + second.calls(), 1);
    }

    #[tokio::test]
    async fn test_human_translation_takes_precedence() {
        let f = fixture();
        f.resolver.indexing_started(VOC, LANG).unwrap();
        f.resolver
            .memory()
            .put(VOC, LANG, "DUM:0003", "name", "Third", "Tercero automático")
            .unwrap();
        let mut term = JsonTerm::new("DUM:0003").with("name", "Third");

        let cost = f.resolver.translate(VOC, LANG, &mut term, &["name"]).await.unwrap();

        assert_eq!(cost, 0);
        assert_eq!(f.provider.calls(), 0);
        assert_eq!(term.get("name_es"), Some(FieldValue::from("Tercero revisado")));
        let unit = f.resolver.memory().lookup(VOC, LANG, "DUM:0003", "name").unwrap().unwrap();
        assert_eq!(unit.target, "Tercero automático");
    }

    #[tokio::test]
    async fn test_human_table_discarded_after_indexing_ended() {
        let f = fixture();
        f.resolver.indexing_started(VOC, LANG).unwrap();
        f.resolver.indexing_ended(VOC, LANG).unwrap();
        let mut term = JsonTerm::new("DUM:0003").with("name", "Third");

        let cost = f.resolver.translate(VOC, LANG, &mut term, &["name"]).await.unwrap();

        assert_eq!(cost, 5);
        assert_eq!(term.get("name_es"), Some(FieldValue::from("El Third")));
    }

    #[test]
    fn test_extend_term_writes_name_and_definition() {
        let f = fixture();
        assert_eq!(f.resolver.indexing_started(VOC, LANG).unwrap(), 1);
        let mut term = JsonTerm::new("DUM:0003").with("name", "Third");

        assert!(f.resolver.extend_term(&mut term, VOC, LANG).unwrap());
        assert_eq!(term.get("name_es"), Some(FieldValue::from("Tercero revisado")));
        assert_eq!(term.get("def_es"), Some(FieldValue::from("El tercero.")));
        assert_eq!(term.get("name"), Some(FieldValue::from("Third")));
        assert_eq!(f.resolver.memory().lookup(VOC, LANG, "DUM:0003", "name").unwrap(), None);

        let mut other = term2();
        assert!(!f.resolver.extend_term(&mut other, VOC, LANG).unwrap());
        assert_eq!(other.get("name_es"), None);
    }

    #[test]
    fn test_extend_term_without_indexing_is_noop() {
        let f = fixture();
        let mut term = JsonTerm::new("DUM:0003");
        assert!(!f.resolver.extend_term(&mut term, VOC, LANG).unwrap());
    }

    #[tokio::test]
    async fn test_dry_run_does_not_mutate() {
        let f = fixture();
        let term = term2();

        let estimate = f.resolver.get_missing_characters(VOC, LANG, &term, &["name"]).unwrap();

        assert_eq!(estimate, 8);
        assert_eq!(term, term2());
        assert_eq!(f.resolver.memory().lookup(VOC, LANG, "DUM:0002", "name").unwrap(), None);
        assert_eq!(f.provider.calls(), 0);

        let mut term = term;
        let cost = f.resolver.translate(VOC, LANG, &mut term, &["name"]).await.unwrap();
        assert_eq!(cost, estimate);
    }

    #[test]
    fn test_dry_run_skips_cached_and_multivalued() {
        let f = fixture();
        f.resolver.indexing_started(VOC, LANG).unwrap();
        let term = JsonTerm::new("DUM:0001")
            .with("name", "Dummy")
            .with("def", "Ñandú")
            .with("synonym", vec!["A".to_string(), "B".to_string()]);

        let estimate = f
            .resolver
            .get_missing_characters(VOC, LANG, &term, &["name", "def", "synonym", "missing"])
            .unwrap();

        assert_eq!(estimate, 5);
    }

    #[tokio::test]
    async fn test_state_enforcement() {
        let f = fixture();
        f.resolver.unload_vocabulary(VOC, LANG).unwrap();
        let mut term = term1();

        let err = f.resolver.translate(VOC, LANG, &mut term, &["name"]).await.unwrap_err();
        assert!(err.is_state_error());
        let err = f.resolver.get_missing_characters(VOC, LANG, &term, &["name"]).unwrap_err();
        assert!(err.is_state_error());
        let err = f.resolver.translate("never", LANG, &mut term, &["name"]).await.unwrap_err();
        assert!(err.is_state_error());

        f.resolver.load_vocabulary(VOC, LANG).unwrap();
        assert_eq!(f.resolver.translate(VOC, LANG, &mut term, &["name"]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_multivalued_field_is_unsupported() {
        let f = fixture();
        let mut term = term2().with("synonym", vec!["One".to_string(), "Two".to_string()]);

        let err = f
            .resolver
            .translate(VOC, LANG, &mut term, &["name", "synonym"])
            .await
            .unwrap_err();

        assert!(matches!(err, TranslationError::UnsupportedOperation { .. }));
        assert_eq!(f.provider.calls(), 0);
        assert_eq!(term.get("name_es"), None);
        assert_eq!(f.resolver.memory().len(VOC, LANG).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unencodable_term_id_rejected_before_provider_call() {
        let f = fixture();
        let mut term = JsonTerm::new("DUM:0002:extra").with("name", "Whatever");

        let err = f.resolver.translate(VOC, LANG, &mut term, &["name"]).await.unwrap_err();

        assert!(matches!(err, TranslationError::UnsupportedOperation { .. }));
        assert_eq!(f.provider.calls(), 0);
        assert_eq!(term.get("name_es"), None);
    }

    #[tokio::test]
    async fn test_alphanumeric_term_id_not_retranslated_after_reload() {
        let f = fixture();
        let mut term = JsonTerm::new("DUM:PS0002").with("name", "Series");

        assert_eq!(f.resolver.translate(VOC, LANG, &mut term, &["name"]).await.unwrap(), 6);
        f.resolver.unload_vocabulary(VOC, LANG).unwrap();
        f.resolver.load_vocabulary(VOC, LANG).unwrap();
        let mut fresh = JsonTerm::new("DUM:PS0002").with("name", "Series");

        assert_eq!(f.resolver.translate(VOC, LANG, &mut fresh, &["name"]).await.unwrap(), 0);
        assert_eq!(f.provider.calls(), 1);
        assert_eq!(fresh.get("name_es"), Some(FieldValue::from("El Series")));
    }

    #[tokio::test]
    async fn test_provider_failure_leaves_memory_untouched() {
        let f = fixture_with(DummyTranslator::failing());
        let mut term = term2();

        let err = f.resolver.translate(VOC, LANG, &mut term, &["name"]).await.unwrap_err();

        assert!(matches!(err, TranslationError::Network { .. }));
        assert_eq!(term.get("name_es"), None);
        assert_eq!(f.resolver.memory().lookup(VOC, LANG, "DUM:0002", "name").unwrap(), None);
        assert_eq!(f.resolver.get_missing_characters(VOC, LANG, &term, &["name"]).unwrap(), 8);
    }

    #[tokio::test]
    async fn test_unsupported_pair_rejected_before_provider_call() {
        let f = fixture();
        f.resolver.load_vocabulary(VOC, "fr").unwrap();
        let mut term = term2();

        let err = f.resolver.translate(VOC, "fr", &mut term, &["name"]).await.unwrap_err();

        assert!(matches!(err, TranslationError::UnsupportedPair { .. }));
        assert_eq!(f.provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_stats_track_tiers() {
        let f = fixture();
        f.resolver.indexing_started(VOC, LANG).unwrap();

        f.resolver.translate(VOC, LANG, &mut term1(), &["name"]).await.unwrap();
        f.resolver.translate(VOC, LANG, &mut term2(), &["name", "name"]).await.unwrap();
        let mut third = JsonTerm::new("DUM:0003").with("name", "Third");
        f.resolver.translate(VOC, LANG, &mut third, &["name"]).await.unwrap();

        let stats = f.resolver.stats();
        assert_eq!(stats.memory_hits, 1);
        assert_eq!(stats.provider_calls, 1);
        assert_eq!(stats.human_hits, 1);
        assert_eq!(stats.characters_submitted, 8);
    }

    #[test]
    fn test_bootstrap_failure_prevents_construction() {
        let dir = tempfile::tempdir().unwrap();
        let config = ResolverConfig::new()
            .with_translations_root(dir.path().join("translations"))
            .with_seed_dir(dir.path().join("no-seeds"));

        let result = TranslationResolver::new(Arc::new(DummyTranslator::new()), config);

        assert!(matches!(result, Err(TranslationError::Bootstrap { .. })));
    }

    /// 翻译提供者阻塞期间，同一词表的查询不应被阻塞
    struct GatedTranslator {
        descriptor: ProviderDescriptor,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl MachineTranslator for GatedTranslator {
        fn descriptor(&self) -> &ProviderDescriptor {
            &self.descriptor
        }

        async fn translate(&self, text: &str, _source_lang: &str, _target_lang: &str) -> Result<String> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(format!("El {}", text))
        }
    }

    #[tokio::test]
    async fn test_memory_not_locked_during_provider_call() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(GatedTranslator {
            descriptor: ProviderDescriptor::new("dummy", [LANG], [VOC]),
            entered: Notify::new(),
            release: Notify::new(),
        });
        let resolver = Arc::new(TranslationResolver::new(provider.clone(), config_in(dir.path())).unwrap());
        resolver.load_vocabulary(VOC, LANG).unwrap();

        let worker = {
            let resolver = Arc::clone(&resolver);
            tokio::spawn(async move {
                let mut term = term2();
                resolver.translate(VOC, LANG, &mut term, &["name"]).await
            })
        };

        provider.entered.notified().await;
        let unit = resolver.memory().lookup(VOC, LANG, "DUM:0001", "name").unwrap();
        assert_eq!(unit.map(|u| u.target), Some("El Dummy".to_string()));
        resolver.memory().put(VOC, LANG, "DUM:0009", "name", "Other", "Otro").unwrap();

        provider.release.notify_one();
        assert_eq!(worker.await.unwrap().unwrap(), 8);
        assert_eq!(resolver.memory().len(VOC, LANG).unwrap(), 3);
    }
}
