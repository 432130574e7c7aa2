//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use kwcache_core::{CachedKeyword, Category, KeywordRecord, NetworkStats, SnapshotView};
use kwcache_sync::SyncSummary;

/// Print the outcome of a successful sync run.
pub fn print_summary(summary: &SyncSummary) {
    println!();
    println!("{} {}", "Sync complete".green().bold(), format!("({})", summary.run_id).dimmed());
    println!("{}", "─".repeat(50));
    println!("  Synced at:    {}", summary.synced_at);
    println!("  Keywords:     {}", summary.total_keywords.to_string().bold());
    println!("  Active:       {}", summary.active_keywords);
    println!("  Connections:  {}", summary.total_connections);
    println!("  Density:      {:.2}", summary.network_density);
    print_distribution(|c| summary.category_distribution.get(&c).copied().unwrap_or(0));

    if summary.rejected > 0 {
        let ids: Vec<String> = summary.rejected_ids.iter().map(|id| id.to_string()).collect();
        println!(
            "  {} {} ({})",
            "Rejected:".yellow(),
            summary.rejected.to_string().yellow().bold(),
            ids.join(", ").dimmed()
        );
    }

    println!("{}", "─".repeat(50));
    println!("  {} {}ms", "Duration:".dimmed(), summary.duration_ms);
}

/// Print a snapshot as a consumer would see it.
pub fn print_snapshot(view: &SnapshotView) {
    if view.is_fallback() {
        println!("{}", "No snapshot cached; serving fallback data.".yellow());
        println!();
    }

    println!("{}", "Keyword Snapshot".bold());
    println!("{}", "─".repeat(50));
    match view.last_sync.as_deref() {
        Some(time) => println!("  Last sync:    {}", time.green()),
        None => println!("  Last sync:    {}", "never".dimmed()),
    }
    print_stats(&view.stats);
    println!("{}", "─".repeat(50));
}

fn print_stats(stats: &NetworkStats) {
    println!("  Source:       {}", stats.data_source.cyan());
    println!("  Keywords:     {}", stats.total_keywords.to_string().bold());
    println!("  Active:       {}", stats.active_keywords);
    println!("  Connections:  {}", stats.total_connections);
    println!("  Density:      {:.2}", stats.network_density);
    print_distribution(|c| stats.category_count(c));
}

fn print_distribution(count: impl Fn(Category) -> usize) {
    let parts: Vec<String> = Category::ALL
        .iter()
        .map(|c| format!("{}={}", category_label(*c), count(*c)))
        .collect();
    println!("  Categories:   {}", parts.join("  "));
}

/// Print cached keywords as a table.
pub fn print_cached_keywords(keywords: &[CachedKeyword]) {
    if keywords.is_empty() {
        println!("{}", "No keywords cached.".dimmed());
        return;
    }

    println!("{:<6} {:<28} {:<4} {:<24} {:>6} {:>6}", "ID", "Name", "Cat", "Subcategory", "Weight", "Conn");
    println!("{}", "-".repeat(80));

    for kw in keywords {
        println!(
            "{:<6} {:<28} {:<4} {:<24} {:>6.2} {:>6}",
            kw.id,
            truncate(&kw.name, 28),
            category_label(kw.category),
            truncate(&kw.subcategory_name, 24),
            kw.weight,
            kw.connections
        );
    }
}

/// Print source records as a table.
pub fn print_records(records: &[KeywordRecord]) {
    if records.is_empty() {
        println!("{}", "No active keywords found.".dimmed());
        return;
    }

    println!("{:<6} {:<28} {:<4} {:<24} {:>6}", "ID", "Text", "Cat", "Subcategory", "Conn");
    println!("{}", "-".repeat(72));

    for record in records {
        let category = match Category::from_letter(&record.category) {
            Some(c) => category_label(c),
            None => record.category.red(),
        };
        println!(
            "{:<6} {:<28} {:<4} {:<24} {:>6}",
            record.id,
            truncate(&record.text, 28),
            category,
            truncate(&record.subcategory_name, 24),
            record.connections
        );
    }

    println!();
    println!("{} active keywords", records.len().to_string().bold());
}

fn category_label(category: Category) -> ColoredString {
    match category {
        Category::A => "A".blue(),
        Category::B => "B".magenta(),
        Category::C => "C".yellow(),
    }
}

/// Truncate on character boundaries, appending "..." when cut.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate("tokio", 10), "tokio");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("ação rápida demais", 8), "ação ...");
    }
}
