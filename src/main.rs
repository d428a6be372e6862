use anyhow::{Context, Result};
use clap::Parser;
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use vocab_translation::config::Cli;
use vocab_translation::stats::{format_duration, print_resolution_stats, ResolutionStats, RunSummary};
use vocab_translation::utils::{
    generate_output_path, init_logging, read_terms, tally_results, validate_input_file,
    write_terms,
};
use vocab_translation::{HttpTranslator, JsonTerm, TranslationResolver, VocabularyTerm};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    init_logging(cli.verbose, cli.quiet);

    cli.validate()?;
    validate_input_file(&cli.input)?;

    // 生成输出文件路径
    let output_path = generate_output_path(&cli.input, cli.output.as_deref(), &cli.lang);

    if !cli.quiet {
        info!("🚀 启动术语翻译");
        info!("📂 输入文件: {}", cli.input.display());
        info!("📄 输出文件: {}", output_path.display());
        info!("📚 词表: {} ({} -> {})", cli.vocabulary, cli.source_lang, cli.lang);
        if cli.dry_run {
            info!("🧪 估算模式: 不调用翻译API，不写入翻译记忆");
        }
    }

    let total_start = Instant::now();

    match run(&cli, &output_path).await {
        Ok((summary, stats)) => {
            let total_duration = total_start.elapsed();

            if !cli.quiet {
                info!(
                    "✅ 翻译完成！{} 项术语，{} 字符，总耗时: {}",
                    summary.terms_processed,
                    summary.cost,
                    format_duration(total_duration)
                );
            }

            if cli.stats || cli.verbose {
                print_resolution_stats(&summary, &stats, total_duration);
            }
        }
        Err(e) => {
            error!("❌ 翻译失败: {:#}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// 翻译术语文件核心函数
async fn run(
    cli: &Cli,
    output_path: &Path,
) -> Result<(RunSummary, ResolutionStats)> {
    let fields = cli.field_list();
    let vocabulary = cli.vocabulary.as_str();
    let lang = cli.lang.as_str();

    // 创建翻译提供者和解析器
    let load_start = Instant::now();
    let provider = Arc::new(
        HttpTranslator::new(&cli.translator_config()).context("创建翻译提供者失败")?,
    );
    let resolver =
        TranslationResolver::new(provider, cli.resolver_config()).context("初始化翻译解析器失败")?;

    let units = resolver
        .load_vocabulary(vocabulary, lang)
        .context("加载翻译记忆失败")?;
    let human = resolver
        .indexing_started(vocabulary, lang)
        .context("加载人工翻译失败")?;
    debug!("翻译记忆 {} 个单元，人工翻译 {} 项术语", units, human);

    let mut terms = read_terms(&cli.input)?;
    let load_time = load_start.elapsed();

    // 并发解析术语
    let resolve_start = Instant::now();
    let results: Vec<_> = stream::iter(terms.iter_mut())
        .map(|term| resolve_term(&resolver, term, vocabulary, lang, &fields, cli.dry_run))
        .buffer_unordered(cli.concurrent_terms)
        .collect()
        .await;
    let resolve_time = resolve_start.elapsed();

    resolver.indexing_ended(vocabulary, lang)?;

    // 部分术语失败时，仍写出翻译记忆和已完成的术语
    let persist_start = Instant::now();
    if !cli.dry_run {
        resolver
            .unload_vocabulary(vocabulary, lang)
            .context("写出翻译记忆失败")?;
    }

    let terms_processed = terms.len();
    let (cost, failures) = tally_results(results);
    for failure in &failures {
        error!("❌ {:#}", failure);
    }

    if !cli.dry_run {
        write_terms(output_path, terms)?;
    }
    let persist_time = persist_start.elapsed();

    if !failures.is_empty() {
        anyhow::bail!(
            "{} / {} 项术语解析失败，其余结果已写出",
            failures.len(),
            terms_processed
        );
    }

    let summary = RunSummary {
        terms_processed,
        cost,
        dry_run: cli.dry_run,
        load_time,
        resolve_time,
        persist_time,
    };
    Ok((summary, resolver.stats()))
}

/// 解析单个术语：先用人工翻译扩展，再按字段分级翻译
async fn resolve_term(
    resolver: &TranslationResolver,
    term: &mut JsonTerm,
    vocabulary: &str,
    lang: &str,
    fields: &[String],
    dry_run: bool,
) -> Result<u64> {
    if dry_run {
        return resolver
            .get_missing_characters(vocabulary, lang, &*term, fields)
            .with_context(|| format!("估算术语失败: {}", term.id()));
    }

    resolver.extend_term(term, vocabulary, lang)?;
    resolver
        .translate(vocabulary, lang, term, fields)
        .await
        .with_context(|| format!("翻译术语失败: {}", term.id()))
}
