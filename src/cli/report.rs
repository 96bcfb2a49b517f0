//! Report formatting and printing utilities.
//!
//! Issues are printed cargo-style; command summaries as short colored blocks.
//! Everything writes to a caller-provided writer so output can be tested.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    CommandResult, CommandSummary, DiffCounts, DiffSummary, ExportSummary, ExtractSummary,
    GlossarySummary, InitSummary, LanguageSync, LanguageTranslate, ReviewSummary, StatusSummary,
};
use crate::core::store::{MergeReport, Status, StatusCounts};
use crate::issues::{Issue, Report, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Maximum number of ids listed per diff bucket.
const MAX_IDS_DISPLAY: usize = 5;

/// Print issues in cargo-style format to stdout.
pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    for issue in &sorted {
        print_issue(issue, writer);
    }

    print_summary(&sorted, writer);
}

pub fn print(result: &CommandResult, verbose: bool) {
    let mut out = io::stdout().lock();
    print_to(result, verbose, &mut out);
}

pub fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    print_command_output(&result.summary, verbose, writer);
    report_to(&result.issues, writer);
}

// ============================================================
// Issues
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W) {
    let severity_str = match issue.severity() {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.rule().to_string().dimmed().cyan()
    );
    let _ = writeln!(writer, "  {} {}", "-->".blue(), issue.location());

    if let Some(details) = issue.details() {
        let _ = writeln!(writer, "  {} {} {}", "=".blue(), "note:".bold(), details);
    }
    if let Some(hint) = issue.hint() {
        let _ = writeln!(writer, "  {} {} {}", "=".blue(), "hint:".bold().cyan(), hint);
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    let total_warnings = issues.len() - total_errors;

    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {})",
        FAILURE_MARK.red(),
        issues.len(),
        total_errors,
        if total_errors == 1 { "error" } else { "errors" }.red(),
        total_warnings,
        if total_warnings == 1 {
            "warning"
        } else {
            "warnings"
        }
        .yellow()
    );
}

// ============================================================
// Command Summaries
// ============================================================

fn print_command_output<W: Write>(summary: &CommandSummary, verbose: bool, writer: &mut W) {
    match summary {
        CommandSummary::Init(summary) => print_init(summary, writer),
        CommandSummary::Extract(summary) => print_extract(summary, verbose, writer),
        CommandSummary::Diff(summary) => print_diff(summary, verbose, writer),
        CommandSummary::Sync(rows) => print_sync(rows, writer),
        CommandSummary::Translate(rows) => print_translate(rows, writer),
        CommandSummary::Export(summary) => print_export(summary, writer),
        CommandSummary::Status(summary) => print_status(summary, writer),
        CommandSummary::Review(summary) => print_review(summary, writer),
        CommandSummary::Glossary(summary) => print_glossary(summary, writer),
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    match &summary.error {
        Some(error) => {
            let _ = writeln!(writer, "{} {}", FAILURE_MARK.red(), error.red());
        }
        None => {
            let _ = writeln!(
                writer,
                "{} {}",
                SUCCESS_MARK.green(),
                format!("Created {}", summary.path.display()).green()
            );
        }
    }
}

fn print_extract<W: Write>(summary: &ExtractSummary, verbose: bool, writer: &mut W) {
    if summary.aborted {
        let _ = writeln!(
            writer,
            "{} Catalog not written: identifier collision",
            FAILURE_MARK.red()
        );
        return;
    }

    let verb = if summary.is_dry_run { "Would write" } else { "Wrote" };
    let _ = writeln!(
        writer,
        "{} {} catalog {} ({}, {}, {} in {})",
        SUCCESS_MARK.green(),
        verb.green().bold(),
        summary.version,
        plural(summary.strings, "string", "strings"),
        plural(summary.chars, "char", "chars"),
        plural(summary.sections, "section", "sections"),
        plural(summary.files - summary.failed_files, "file", "files"),
    );
    if !summary.is_dry_run {
        let _ = writeln!(writer, "  {}", summary.catalog_path.display());
    }
    if summary.skipped_paths > 0 {
        let _ = writeln!(
            writer,
            "{} {} could not be accessed",
            "warning:".bold().yellow(),
            plural(summary.skipped_paths, "path", "paths")
        );
    }

    match &summary.previous_version {
        Some(previous) => {
            let _ = writeln!(writer, "Changes since {}:", previous);
            print_diff_counts(&summary.diff, verbose, writer);
        }
        None => {
            let _ = writeln!(writer, "First catalog generation.");
        }
    }
}

fn print_diff<W: Write>(summary: &DiffSummary, verbose: bool, writer: &mut W) {
    let from = summary.from.as_deref().unwrap_or("(nothing)");
    let _ = writeln!(writer, "{} {} {}", from, "->".blue(), summary.to);
    print_diff_counts(&summary.diff, verbose || summary.list_all, writer);
}

fn print_diff_counts<W: Write>(diff: &DiffCounts, list_all: bool, writer: &mut W) {
    let buckets = [
        ("added", "+".green(), &diff.added),
        ("changed", "~".yellow(), &diff.changed),
        ("removed", "-".red(), &diff.removed),
    ];
    for (label, mark, ids) in buckets {
        let _ = writeln!(writer, "  {:<9}{}", label, ids.len());
        let shown = if list_all { ids.len() } else { ids.len().min(MAX_IDS_DISPLAY) };
        for id in ids.iter().take(shown) {
            let _ = writeln!(writer, "    {} {}", mark, id);
        }
        if shown < ids.len() {
            let more = format!("(and {} more)", ids.len() - shown);
            let _ = writeln!(writer, "    {}", more.dimmed());
        }
    }
    let _ = writeln!(writer, "  {:<9}{}", "unchanged", diff.unchanged);
}

fn merge_line(report: &MergeReport) -> String {
    let mut parts = Vec::new();
    let counts = [
        (report.created.len(), "new"),
        (report.downgraded.len(), "need review again"),
        (report.stale_suggestions.len(), "stale suggestions"),
        (report.orphaned.len(), "orphaned"),
        (report.restored.len(), "restored"),
        (report.unverified.len(), "unverified"),
    ];
    for (count, label) in counts {
        if count > 0 {
            parts.push(format!("{} {}", count, label));
        }
    }
    if parts.is_empty() {
        "up to date".to_string()
    } else {
        parts.join(", ")
    }
}

fn print_sync<W: Write>(rows: &[LanguageSync], writer: &mut W) {
    for row in rows {
        let _ = writeln!(
            writer,
            "{} {} {} {}: {}",
            SUCCESS_MARK.green(),
            row.language.bold(),
            row.previous_version.as_deref().unwrap_or("(new)"),
            "->".blue(),
            row.version
        );
        let _ = writeln!(writer, "  strings:  {}", merge_line(&row.report));
        if let Some(glossary) = &row.glossary_report {
            let _ = writeln!(writer, "  glossary: {}", merge_line(glossary));
        }
    }
}

fn print_translate<W: Write>(rows: &[LanguageTranslate], writer: &mut W) {
    for row in rows {
        let mark = if row.failed == 0 {
            SUCCESS_MARK.green()
        } else {
            FAILURE_MARK.yellow()
        };
        let _ = writeln!(
            writer,
            "{} {}: {} requested, {} need review, {} suggestion only, {} failed",
            mark,
            row.language.bold(),
            row.requested,
            row.needs_review,
            row.suggestion_only,
            row.failed
        );
        if row.deferred > 0 {
            let _ = writeln!(
                writer,
                "  {} left for a later run (--limit)",
                plural(row.deferred, "string", "strings")
            );
        }
    }
}

fn print_export<W: Write>(summary: &ExportSummary, writer: &mut W) {
    let verb = if summary.is_dry_run { "Would write" } else { "Wrote" };
    for file in &summary.files {
        let _ = writeln!(
            writer,
            "{} {} {} ({}, {}) {}",
            SUCCESS_MARK.green(),
            verb.green().bold(),
            file.nested.display(),
            file.project,
            plural(file.exported, "string", "strings"),
            if file.withheld > 0 {
                format!("{} withheld", file.withheld).red().to_string()
            } else {
                String::new()
            }
        );
    }
    let _ = writeln!(writer, "Threshold: {}", summary.threshold);
}

/// Left-align `text` to `width` terminal columns.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{}{}", text, " ".repeat(fill))
}

fn status_cells(counts: &StatusCounts, threshold: Status) -> Vec<String> {
    let mut cells: Vec<String> = Status::ALL
        .into_iter()
        .map(|s| counts.get(s).to_string())
        .collect();
    cells.push(counts.orphaned.to_string());
    cells.push(counts.at_least(threshold).to_string());
    cells
}

fn print_status<W: Write>(summary: &StatusSummary, writer: &mut W) {
    match &summary.catalog_version {
        Some(version) => {
            let _ = writeln!(
                writer,
                "Catalog {} ({})",
                version,
                plural(summary.catalog_strings, "string", "strings")
            );
        }
        None => {
            let _ = writeln!(writer, "No catalog yet (run `transcat extract`)");
        }
    }

    let mut header: Vec<String> = vec!["lang".into(), "name".into()];
    header.extend(Status::ALL.into_iter().map(|s| s.to_string()));
    header.push("orphaned".into());
    header.push(format!(">= {}", summary.threshold));

    let rows: Vec<Vec<String>> = summary
        .languages
        .iter()
        .map(|lang| {
            let mut row = vec![lang.language.clone(), lang.name.clone()];
            row.extend(status_cells(&lang.counts, summary.threshold));
            row
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            std::iter::once(&header)
                .chain(&rows)
                .map(|r| UnicodeWidthStr::width(r[col].as_str()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c, *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    let _ = writeln!(writer, "{}", line(&header).bold());
    for row in &rows {
        let _ = writeln!(writer, "{}", line(row));
    }

    for lang in &summary.languages {
        if lang.behind || lang.unsynced > 0 {
            let _ = writeln!(
                writer,
                "{} {} is behind the catalog ({} without entry, run `transcat sync`)",
                "warning:".bold().yellow(),
                lang.language,
                plural(lang.unsynced, "string", "strings")
            );
        }
        if lang.glossary.live() + lang.glossary.orphaned > 0 {
            let _ = writeln!(
                writer,
                "  {} glossary: {} of {} terms at or above {}",
                lang.language,
                lang.glossary.at_least(summary.threshold),
                lang.glossary.live(),
                summary.threshold
            );
        }
    }
}

fn print_review<W: Write>(summary: &ReviewSummary, writer: &mut W) {
    if !summary.applied {
        let _ = writeln!(
            writer,
            "{} {} {} unchanged ({})",
            FAILURE_MARK.red(),
            summary.language,
            summary.id,
            summary.from
        );
        return;
    }
    let _ = writeln!(
        writer,
        "{} {} {}: {} {} {}",
        SUCCESS_MARK.green(),
        summary.language,
        summary.id,
        summary.from,
        "->".blue(),
        summary.to.to_string().green()
    );
}

fn print_glossary<W: Write>(summary: &GlossarySummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {} {} ({} used, {} unused)",
        SUCCESS_MARK.green(),
        "Wrote".green().bold(),
        summary.path.display(),
        summary.total_terms - summary.unused_terms.len(),
        summary.unused_terms.len()
    );
    let width = summary
        .top_terms
        .iter()
        .map(|(t, _)| UnicodeWidthStr::width(t.as_str()))
        .max()
        .unwrap_or(0);
    for (term, occurrences) in &summary.top_terms {
        let _ = writeln!(writer, "  {}  {}", pad(term, width), occurrences);
    }
    if !summary.unused_terms.is_empty() {
        let _ = writeln!(
            writer,
            "  {} {}",
            "unused:".dimmed(),
            summary.unused_terms.join(", ")
        );
    }
}
