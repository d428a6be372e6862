use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// 解析统计快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    pub terms_extended: u64,
    pub human_hits: u64,
    pub memory_hits: u64,
    pub provider_calls: u64,
    pub characters_submitted: u64,
}

impl ResolutionStats {
    /// 由人工翻译或翻译记忆直接命中的字段比例
    pub fn hit_rate(&self) -> Option<f64> {
        let hits = self.human_hits + self.memory_hits;
        let total = hits + self.provider_calls;
        if total == 0 {
            None
        } else {
            Some(hits as f64 / total as f64)
        }
    }
}

/// 并发安全的统计计数器
#[derive(Debug, Default)]
pub(crate) struct StatsCounter {
    terms_extended: AtomicU64,
    human_hits: AtomicU64,
    memory_hits: AtomicU64,
    provider_calls: AtomicU64,
    characters_submitted: AtomicU64,
}

impl StatsCounter {
    pub(crate) fn term_extended(&self) {
        self.terms_extended.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn human_hit(&self) {
        self.human_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn memory_hit(&self) {
        self.memory_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn provider_call(&self, characters: u64) {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
        self.characters_submitted.fetch_add(characters, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ResolutionStats {
        ResolutionStats {
            terms_extended: self.terms_extended.load(Ordering::Relaxed),
            human_hits: self.human_hits.load(Ordering::Relaxed),
            memory_hits: self.memory_hits.load(Ordering::Relaxed),
            provider_calls: self.provider_calls.load(Ordering::Relaxed),
            characters_submitted: self.characters_submitted.load(Ordering::Relaxed),
        }
    }
}

/// 单次运行的汇总
#[derive(Debug)]
pub struct RunSummary {
    pub terms_processed: usize,
    pub cost: u64,
    pub dry_run: bool,
    pub load_time: Duration,
    pub resolve_time: Duration,
    pub persist_time: Duration,
}

/// 打印解析统计
pub fn print_resolution_stats(summary: &RunSummary, stats: &ResolutionStats, total_duration: Duration) {
    println!("\n📊 翻译解析统计报告:");
    println!("═══════════════════════════════════════");

    // 时间分解
    println!("⏱️  时间分解:");
    println!("   加载翻译资源: {}", format_duration(summary.load_time));
    println!("   解析术语: {}", format_duration(summary.resolve_time));
    println!("   写出翻译记忆: {}", format_duration(summary.persist_time));
    println!("   总耗时: {}", format_duration(total_duration));

    // 术语统计
    println!("\n🔤 术语统计:");
    println!("   处理术语: {} 项", summary.terms_processed);
    println!("   人工翻译扩展: {} 项", stats.terms_extended);

    // 命中统计
    println!("\n💾 分级命中:");
    println!("   人工翻译命中: {} 次", stats.human_hits);
    println!("   翻译记忆命中: {} 次", stats.memory_hits);
    println!("   机器翻译调用: {} 次", stats.provider_calls);
    if let Some(rate) = stats.hit_rate() {
        println!("   命中率: {:.1}%", rate * 100.0);
    }

    // 费用
    if summary.dry_run {
        println!("\n💰 预计提交字符数: {}", summary.cost);
    } else {
        println!("\n💰 实际提交字符数: {}", summary.cost);
    }
}

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.3}s", duration.as_secs_f64())
    }
}
