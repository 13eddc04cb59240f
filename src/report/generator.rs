//! Rendering of one-shot analysis results.
//!
//! Markdown is meant for people; JSON matches the bus response payload.

use crate::models::{FrequencyResult, WordCount};
use anyhow::{Context, Result};
use std::path::Path;

/// Generate a Markdown report for a result.
pub fn generate_markdown_report(result: &FrequencyResult, top_n: i64) -> String {
    let mut output = String::new();

    output.push_str("# Word Frequency Report\n\n");

    if let Some(ref error) = result.error {
        output.push_str(&format!("**Error:** {}\n", error));
        return output;
    }

    output.push_str(&generate_summary_section(result, top_n));
    output.push_str(&generate_ranking_section(result));

    output
}

/// Generate the summary section.
fn generate_summary_section(result: &FrequencyResult, top_n: i64) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str(&format!("- **Total Words:** {}\n", result.total_words));
    section.push_str(&format!("- **Requested Top N:** {}\n", top_n));
    section.push_str(&format!("- **Words Ranked:** {}\n", result.len()));

    let covered: usize = result.ranked_words.iter().map(|wc| wc.count).sum();
    if result.total_words > 0 {
        section.push_str(&format!(
            "- **Coverage:** {}\n",
            share(covered, result.total_words)
        ));
    }
    section.push('\n');

    section
}

/// Generate the ranking table.
fn generate_ranking_section(result: &FrequencyResult) -> String {
    let mut section = String::new();

    section.push_str("## Top Words\n\n");

    if result.is_empty() {
        section.push_str("No words found in the input.\n");
        return section;
    }

    section.push_str("| Rank | Word | Count | Share |\n");
    section.push_str("|:---:|:---|:---:|:---:|\n");

    for (i, wc) in result.ranked_words.iter().enumerate() {
        section.push_str(&generate_row(i + 1, wc, result.total_words));
    }
    section.push('\n');

    section
}

fn generate_row(rank: usize, wc: &WordCount, total: usize) -> String {
    format!(
        "| {} | `{}` | {} | {} |\n",
        rank,
        wc.word,
        wc.count,
        share(wc.count, total)
    )
}

fn share(count: usize, total: usize) -> String {
    format!("{:.1}%", count as f64 * 100.0 / total as f64)
}

/// Generate a JSON report.
pub fn generate_json_report(result: &FrequencyResult) -> Result<String> {
    serde_json::to_string_pretty(result).map_err(Into::into)
}

/// Write a rendered report to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
