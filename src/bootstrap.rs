//! 种子资源初始化模块
//!
//! 此模块负责：
//! - 首次启用翻译提供者时创建其专属目录
//! - 为每个受支持的（词表 × 语言）复制随包分发的种子翻译记忆文件
//! - 以“先写临时文件再替换”的方式原子地写出翻译记忆文件

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::api_constants::storage_config;
use crate::error::Result;
use crate::translation_error;
use crate::translator::ProviderDescriptor;

/// 翻译记忆文件名：`{provider}_{vocabulary}_{language}.xliff`
pub fn seed_file_name(provider_id: &str, vocabulary: &str, language: &str) -> String {
    format!(
        "{}_{}_{}.{}",
        provider_id,
        vocabulary,
        language,
        storage_config::XLIFF_EXTENSION
    )
}

/// 提供者专属目录：`{translations_root}/{provider}`
pub fn provider_home(translations_root: &Path, provider_id: &str) -> PathBuf {
    translations_root.join(provider_id)
}

/// 初始化结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// 目录已存在，跳过初始化
    AlreadyPresent(PathBuf),
    /// 新建目录并复制了种子文件
    Seeded { home: PathBuf, files: usize },
}

impl BootstrapOutcome {
    /// 提供者专属目录
    pub fn home(&self) -> &Path {
        match self {
            BootstrapOutcome::AlreadyPresent(home) => home,
            BootstrapOutcome::Seeded { home, .. } => home,
        }
    }
}

/// 种子资源初始化器
pub struct SeedBootstrapper<'a> {
    descriptor: &'a ProviderDescriptor,
    translations_root: PathBuf,
    seed_dir: PathBuf,
}

impl<'a> SeedBootstrapper<'a> {
    pub fn new(descriptor: &'a ProviderDescriptor, translations_root: &Path, seed_dir: &Path) -> Self {
        Self {
            descriptor,
            translations_root: translations_root.to_path_buf(),
            seed_dir: seed_dir.to_path_buf(),
        }
    }

    /// 提供者专属目录
    pub fn home(&self) -> PathBuf {
        provider_home(&self.translations_root, &self.descriptor.identifier)
    }

    /// 执行初始化
    ///
    /// 目录存在即视为已完成初始化，不再逐个检查文件。任何种子文件复制失败都是致命错误，
    /// 此时会删除新建的目录，避免下次启动把不完整的目录当作已初始化。
    pub fn run(&self) -> Result<BootstrapOutcome> {
        let home = self.home();
        if home.exists() {
            debug!("翻译记忆目录已存在，跳过初始化: {}", home.display());
            return Ok(BootstrapOutcome::AlreadyPresent(home));
        }

        fs::create_dir_all(&home).map_err(|e| {
            translation_error!(
                bootstrap,
                self.descriptor.identifier,
                format!("创建目录失败 {}: {}", home.display(), e)
            )
        })?;

        match self.copy_seeds(&home) {
            Ok(files) => {
                info!("📁 翻译记忆目录已初始化: {} ({} 个种子文件)", home.display(), files);
                Ok(BootstrapOutcome::Seeded { home, files })
            }
            Err(e) => {
                if let Err(cleanup) = fs::remove_dir_all(&home) {
                    warn!("清理未完成的翻译记忆目录失败 {}: {}", home.display(), cleanup);
                }
                Err(e)
            }
        }
    }

    fn copy_seeds(&self, home: &Path) -> Result<usize> {
        let mut copied = 0;
        for vocabulary in &self.descriptor.vocabularies {
            for language in &self.descriptor.languages {
                let name = seed_file_name(&self.descriptor.identifier, vocabulary, language);
                let source = self.seed_dir.join(&name);
                let target = home.join(&name);

                fs::copy(&source, &target).map_err(|e| {
                    translation_error!(
                        bootstrap,
                        self.descriptor.identifier,
                        format!("复制种子文件失败 {} -> {}: {}", source.display(), target.display(), e)
                    )
                })?;

                debug!("复制种子文件: {} -> {}", source.display(), target.display());
                copied += 1;
            }
        }
        Ok(copied)
    }
}

/// 原子地写出文件：先写入同目录下的临时文件，再替换目标文件
pub fn write_atomically(path: &Path, content: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| translation_error!(file_op, path.display(), "写入", "缺少父目录"))?;

    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|e| translation_error!(file_op, path.display(), "创建临时文件", e))?;
    temp.write_all(content)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| translation_error!(file_op, path.display(), "写入", e))?;
    temp.persist(path)
        .map_err(|e| translation_error!(file_op, path.display(), "替换", e.error))?;

    debug!("写出文件完成: {} ({} 字节)", path.display(), content.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn descriptor() -> ProviderDescriptor {
        ProviderDescriptor {
            identifier: "dummy".to_string(),
            languages: BTreeSet::from(["es".to_string(), "fr".to_string()]),
            vocabularies: BTreeSet::from(["hpo".to_string()]),
        }
    }

    fn seed_dir_with(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            fs::write(dir.path().join(name), format!("<xliff>{}</xliff>", name)).unwrap();
        }
        dir
    }

    #[test]
    fn test_seed_file_name() {
        assert_eq!(seed_file_name("microsoft", "hpo", "es"), "microsoft_hpo_es.xliff");
    }

    #[test]
    fn test_bootstrap_copies_every_pair() {
        let seeds = seed_dir_with(&["dummy_hpo_es.xliff", "dummy_hpo_fr.xliff"]);
        let root = tempfile::tempdir().unwrap();
        let descriptor = descriptor();

        let outcome = SeedBootstrapper::new(&descriptor, root.path(), seeds.path())
            .run()
            .unwrap();

        let home = root.path().join("dummy");
        assert_eq!(outcome, BootstrapOutcome::Seeded { home: home.clone(), files: 2 });
        assert_eq!(
            fs::read_to_string(home.join("dummy_hpo_fr.xliff")).unwrap(),
            "<xliff>dummy_hpo_fr.xliff</xliff>"
        );
    }

    #[test]
    fn test_bootstrap_skips_existing_directory() {
        let seeds = seed_dir_with(&[]);
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("dummy")).unwrap();
        let descriptor = descriptor();

        let outcome = SeedBootstrapper::new(&descriptor, root.path(), seeds.path())
            .run()
            .unwrap();

        assert!(matches!(outcome, BootstrapOutcome::AlreadyPresent(_)));
        assert!(!root.path().join("dummy").join("dummy_hpo_es.xliff").exists());
    }

    #[test]
    fn test_missing_seed_is_fatal_and_cleans_up() {
        let seeds = seed_dir_with(&["dummy_hpo_es.xliff"]);
        let root = tempfile::tempdir().unwrap();
        let descriptor = descriptor();

        let err = SeedBootstrapper::new(&descriptor, root.path(), seeds.path())
            .run()
            .unwrap_err();

        assert!(format!("{}", err).contains("dummy_hpo_fr.xliff"));
        assert!(!root.path().join("dummy").exists());
    }

    #[test]
    fn test_write_atomically_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.xliff");
        fs::write(&path, "old").unwrap();

        write_atomically(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomically_missing_directory_keeps_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("memory.xliff");
        assert!(write_atomically(&path, b"data").is_err());
        assert!(!path.exists());
    }
}
