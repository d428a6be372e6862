use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::term::JsonTerm;

/// 初始化日志系统
pub fn init_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// 验证输入文件
pub fn validate_input_file(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("输入文件不存在: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("输入路径不是文件: {}", path.display());
    }

    if let Some(ext) = path.extension() {
        if ext != "json" {
            warn!("⚠️  文件扩展名不是JSON: {}", ext.to_string_lossy());
        }
    }

    Ok(())
}

/// 生成输出文件路径
pub fn generate_output_path(input: &Path, output: Option<&Path>, lang: &str) -> PathBuf {
    if let Some(output_path) = output {
        return output_path.to_path_buf();
    }

    // 自动生成输出路径: terms_es.json
    let stem = input.file_stem().unwrap_or_default();
    let extension = input.extension().unwrap_or_default();

    let output_name = format!(
        "{}_{}.{}",
        stem.to_string_lossy(),
        lang,
        extension.to_string_lossy()
    );

    match input.parent() {
        Some(parent) => parent.join(output_name),
        None => PathBuf::from(output_name),
    }
}

/// 读取术语文件（JSON对象数组，每个对象必须有字符串 `id`）
pub fn read_terms(path: &Path) -> Result<Vec<JsonTerm>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("读取文件失败: {}", path.display()))?;
    parse_terms(&content).with_context(|| format!("解析术语文件失败: {}", path.display()))
}

fn parse_terms(content: &str) -> Result<Vec<JsonTerm>> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(items) = value else {
        anyhow::bail!("术语文件必须是JSON数组");
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            JsonTerm::from_value(item)
                .with_context(|| format!("第 {} 个术语缺少字符串id或不是对象", index + 1))
        })
        .collect()
}

/// 汇总各术语的解析结果：返回成功部分的字符数之和，以及全部失败
pub fn tally_results<E>(results: Vec<std::result::Result<u64, E>>) -> (u64, Vec<E>) {
    let mut cost = 0;
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(chars) => cost += chars,
            Err(e) => failures.push(e),
        }
    }
    (cost, failures)
}

/// 写出术语文件
pub fn write_terms(path: &Path, terms: Vec<JsonTerm>) -> Result<()> {
    let values: Vec<Value> = terms.into_iter().map(JsonTerm::into_value).collect();
    let content = serde_json::to_string_pretty(&values)?;
    std::fs::write(path, content).with_context(|| format!("写入文件失败: {}", path.display()))
}
