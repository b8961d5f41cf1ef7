use std::fmt::Write;

use crate::tracking::{categories::{Category, CategoryList}, ledger::DayUsage, weekly::WeeklySummary};

pub const TODAY_LIMIT: usize = 50;
const BAR_WIDTH: usize = 20;

/// Formats seconds the way people read durations, e.g. `1h 05m 09s`.
pub fn format_seconds(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = seconds % 3600 / 60;
    let seconds = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

fn percentage(value: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.
    } else {
        value as f64 / whole as f64 * 100.
    }
}

/// Domains used today, longest first. Only the first [TODAY_LIMIT] are listed, the total still
/// covers all of them.
pub fn render_today(usage: &DayUsage) -> String {
    if usage.is_empty() {
        return "Nothing recorded today\n".into();
    }
    let total = usage.total();
    let mut rows = usage.iter().collect::<Vec<_>>();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let hidden = rows.len().saturating_sub(TODAY_LIMIT);
    rows.truncate(TODAY_LIMIT);

    let mut out = String::new();
    for (domain, seconds) in rows {
        let _ = writeln!(
            out,
            "{:>12} {:>5.1}%  {domain}",
            format_seconds(seconds),
            percentage(seconds, total)
        );
    }
    if hidden > 0 {
        let _ = writeln!(out, "{:>12}         and {hidden} more", "...");
    }
    let _ = writeln!(out, "{:>12}         total", format_seconds(total));
    out
}

/// Horizontal bar scaled against the largest value, the way the weekly categories are compared.
fn bar(value: u64, max: u64) -> String {
    let filled = if max == 0 {
        0
    } else {
        (value as f64 / max as f64 * BAR_WIDTH as f64).round() as usize
    };
    format!("[{}{}]", "#".repeat(filled), " ".repeat(BAR_WIDTH - filled))
}

pub fn render_weekly(summary: &WeeklySummary) -> String {
    let total = summary
        .productive
        .saturating_add(summary.unproductive)
        .saturating_add(summary.neutral);
    let categories = [Category::Productive, Category::Unproductive, Category::Neutral];
    let max = categories
        .iter()
        .map(|category| summary.total(*category))
        .max()
        .unwrap_or_default();
    let mut out = String::new();
    for category in categories {
        let seconds = summary.total(category);
        let _ = writeln!(
            out,
            "{:<13}{:>12} {:>5.1}% {}",
            category.to_string(),
            format_seconds(seconds),
            percentage(seconds, total),
            bar(seconds, max)
        );
    }

    let mut domains = summary.domains.iter().collect::<Vec<_>>();
    domains.sort_by(|a, b| b.1.seconds.cmp(&a.1.seconds).then_with(|| a.0.cmp(b.0)));
    if !domains.is_empty() {
        out.push('\n');
    }
    for (domain, total) in domains {
        let _ = writeln!(
            out,
            "{:>12}  {:<13}{domain}",
            format_seconds(total.seconds),
            total.category.to_string()
        );
    }
    out
}

pub fn render_categories(categories: &CategoryList) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "productive:   {}", categories.productive.join(", "));
    let _ = writeln!(out, "unproductive: {}", categories.unproductive.join(", "));
    out
}
