//! Human-readable and JSON reports for `compass` subcommands.
//!
//! Text output comes in two styles: ANSI-styled terminal text and
//! markdown. JSON output mirrors the same content as plain data.

use compass_core::{Destination, KnowledgeBase, RuleCatalog, RuleId};
use compass_eval::{
    status_labels, DestinationScore, EvidenceStore, Recommendation, RuleSet, RuleStatistics,
};
use serde_json::{json, Value};

/// Output style for text reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Terminal,
    Markdown,
}

// ─── Recommendation report ───────────────────────────────────────────────────

pub fn render_recommendation(
    rec: &Recommendation,
    kb: &KnowledgeBase,
    catalog: &RuleCatalog,
    format: ReportFormat,
    show_trace: bool,
) -> String {
    let mut out = String::new();

    heading(&mut out, format, "RANKED DESTINATIONS");
    for (pos, entry) in rec.ranking.iter().enumerate() {
        section_destination(&mut out, format, rec, pos + 1, entry);
    }

    section_flags(&mut out, format, &rec.store);
    section_final(&mut out, format, &rec.store, kb);

    if show_trace {
        out.push_str(&render_trace(&rec.store, catalog, format));
    }
    out
}

fn section_destination(
    out: &mut String,
    format: ReportFormat,
    rec: &Recommendation,
    rank: usize,
    entry: &DestinationScore,
) {
    let badges: Vec<&str> = status_labels(&rec.store, &entry.destination)
        .into_iter()
        .map(|s| s.as_str())
        .collect();
    emit_line(
        out,
        format,
        &format!(
            "{}. {} (score {}) [{}]",
            rank,
            styled_name(format, &humanize(&entry.destination)),
            entry.score,
            badges.join(", ")
        ),
    );

    if let Some(explanation) = rec.explanation(&entry.destination) {
        for text in &explanation.positives {
            emit_reason(out, format, true, text);
        }
        for text in &explanation.negatives {
            emit_reason(out, format, false, text);
        }
    }
    out.push('\n');
}

fn section_flags(out: &mut String, format: ReportFormat, store: &EvidenceStore) {
    if store.flags().is_empty() {
        return;
    }
    heading(out, format, "FLAGS");
    for flag in store.flags() {
        emit_warning(out, format, flag.as_str());
    }
    out.push('\n');
}

fn section_final(out: &mut String, format: ReportFormat, store: &EvidenceStore, kb: &KnowledgeBase) {
    heading(out, format, "FINAL RECOMMENDATION");
    if store.final_recommendation().is_empty() {
        emit_line(out, format, "No destination is strongly recommended for this profile.");
        out.push('\n');
        return;
    }
    for destination in store.final_recommendation() {
        emit_line(out, format, &styled_name(format, &humanize(destination)));
        for tip in kb.tips(destination) {
            emit_line(out, format, &format!("{}- {}", indent(1), tip));
        }
        out.push('\n');
    }
}

pub fn recommendation_json(
    rec: &Recommendation,
    kb: &KnowledgeBase,
    catalog: &RuleCatalog,
    show_trace: bool,
) -> Value {
    let ranking: Vec<Value> = rec
        .ranking
        .iter()
        .map(|entry| {
            let explanation = rec.explanation(&entry.destination);
            json!({
                "destination": entry.destination,
                "score": entry.score,
                "status": status_labels(&rec.store, &entry.destination),
                "positives": explanation.map(|e| e.positives.clone()).unwrap_or_default(),
                "negatives": explanation.map(|e| e.negatives.clone()).unwrap_or_default(),
            })
        })
        .collect();

    let finals: Vec<Value> = rec
        .store
        .final_recommendation()
        .iter()
        .map(|d| json!({ "destination": d, "tips": kb.tips(d) }))
        .collect();

    let mut report = json!({
        "kb_etag": kb.etag(),
        "ranking": ranking,
        "flags": rec.store.flags(),
        "final_recommendation": finals,
    });
    if show_trace {
        report["trace"] = Value::Array(trace_entries(&rec.store, catalog));
    }
    report
}

// ─── Reasoning trace ─────────────────────────────────────────────────────────

pub fn render_trace(store: &EvidenceStore, catalog: &RuleCatalog, format: ReportFormat) -> String {
    let mut out = String::new();
    heading(&mut out, format, "REASONING TRACE");
    if store.trace().is_empty() {
        emit_line(&mut out, format, "No rules fired.");
    }
    for (n, entry) in store.trace().iter().enumerate() {
        let line = entry.render(catalog);
        match format {
            ReportFormat::Terminal => emit_line(&mut out, format, &format!("{:>3}. {}", n + 1, line)),
            ReportFormat::Markdown => emit_line(&mut out, format, &format!("{}. {}", n + 1, line)),
        }
    }
    out.push('\n');
    out
}

/// Trace entries with their rendered `text`, shared by every JSON report
/// that carries a trace.
fn trace_entries(store: &EvidenceStore, catalog: &RuleCatalog) -> Vec<Value> {
    store
        .trace()
        .iter()
        .map(|entry| {
            let mut v = json!(entry);
            v["text"] = json!(entry.render(catalog));
            v
        })
        .collect()
}

pub fn trace_json(store: &EvidenceStore, catalog: &RuleCatalog) -> Value {
    json!({ "trace": trace_entries(store, catalog) })
}

// ─── Rule statistics ─────────────────────────────────────────────────────────

pub fn render_stats(stats: &RuleStatistics, format: ReportFormat) -> String {
    let mut out = String::new();

    heading(&mut out, format, "RULE FREQUENCY");
    if stats.frequency.is_empty() {
        emit_line(&mut out, format, "No rules fired.");
    }
    let width = stats
        .frequency
        .keys()
        .map(|r| r.as_str().len())
        .max()
        .unwrap_or(0);
    for (rule, count) in &stats.frequency {
        emit_line(
            &mut out,
            format,
            &format!("{:<width$}  {}", rule.as_str(), count, width = width),
        );
    }
    out.push('\n');

    heading(&mut out, format, "CATEGORY CONTRIBUTIONS");
    for entry in &stats.categories {
        emit_line(
            &mut out,
            format,
            &format!("{:<12}{}", entry.category, count_bar(format, entry.count)),
        );
    }
    out.push('\n');

    heading(&mut out, format, "EVIDENCE BY CATEGORY");
    let matrix = &stats.matrix;
    let mut header = vec!["Destination".to_string()];
    header.extend(matrix.categories.iter().cloned());
    let rows: Vec<Vec<String>> = matrix
        .destinations
        .iter()
        .zip(matrix.positive.iter().zip(&matrix.negative))
        .map(|(d, (pos, neg))| {
            let mut row = vec![humanize(d)];
            row.extend(
                pos.iter()
                    .zip(neg)
                    .map(|(p, n)| format!("+{}/-{}", p, n)),
            );
            row
        })
        .collect();
    emit_table(&mut out, format, &header, &rows);
    out
}

fn count_bar(format: ReportFormat, count: usize) -> String {
    match format {
        ReportFormat::Terminal => format!("{} {}", "\u{2588}".repeat(count), count),
        ReportFormat::Markdown => count.to_string(),
    }
}

// ─── Rule table ──────────────────────────────────────────────────────────────

pub fn render_rules(rules: &RuleSet, catalog: &RuleCatalog, format: ReportFormat) -> String {
    let mut out = String::new();
    heading(&mut out, format, "RULES");
    for rule in rules.rules() {
        let id = rule.id();
        emit_line(
            &mut out,
            format,
            &format!(
                "{} [tier {}, {}]",
                styled_name(format, id.as_str()),
                rule.tier().number(),
                catalog.category(id)
            ),
        );
        if let Some(logic) = catalog.logic(id) {
            emit_line(&mut out, format, &format!("{}{}", indent(1), logic));
        }
    }
    out.push('\n');
    out
}

pub fn rules_json(rules: &RuleSet, catalog: &RuleCatalog) -> Value {
    let entries: Vec<Value> = rules
        .rules()
        .iter()
        .map(|rule| {
            let id: RuleId = rule.id();
            json!({
                "id": id,
                "tier": rule.tier().number(),
                "conclusion": rule.conclusion().as_str(),
                "category": catalog.category(id),
                "logic": catalog.logic(id),
                "explanation": catalog.explanation(id),
            })
        })
        .collect();
    json!({ "rules": entries })
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn heading(out: &mut String, format: ReportFormat, title: &str) {
    match format {
        ReportFormat::Terminal => {
            out.push_str(&format!("\x1b[1m{}\x1b[0m\n", title));
            out.push_str(&"\u{2550}".repeat(title.len()));
            out.push('\n');
        }
        ReportFormat::Markdown => {
            out.push_str(&format!("## {}\n\n", title));
        }
    }
}

fn emit_line(out: &mut String, _format: ReportFormat, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn emit_reason(out: &mut String, format: ReportFormat, positive: bool, text: &str) {
    match (format, positive) {
        (ReportFormat::Terminal, true) => {
            out.push_str(&format!("  \x1b[32m[+]\x1b[0m {}\n", text));
        }
        (ReportFormat::Terminal, false) => {
            out.push_str(&format!("  \x1b[31m[-]\x1b[0m {}\n", text));
        }
        (ReportFormat::Markdown, true) => out.push_str(&format!("- (+) {}\n", text)),
        (ReportFormat::Markdown, false) => out.push_str(&format!("- (-) {}\n", text)),
    }
}

fn emit_warning(out: &mut String, format: ReportFormat, text: &str) {
    match format {
        ReportFormat::Terminal => {
            out.push_str(&format!("  \x1b[33m[!!]\x1b[0m {}\n", text));
        }
        ReportFormat::Markdown => {
            out.push_str(&format!("- WARNING: {}\n", text));
        }
    }
}

fn emit_table(out: &mut String, format: ReportFormat, header: &[String], rows: &[Vec<String>]) {
    match format {
        ReportFormat::Markdown => {
            out.push_str(&format!("| {} |\n", header.join(" | ")));
            out.push_str(&format!("|{}\n", "---|".repeat(header.len())));
            for row in rows {
                out.push_str(&format!("| {} |\n", row.join(" | ")));
            }
        }
        ReportFormat::Terminal => {
            let widths: Vec<usize> = (0..header.len())
                .map(|col| {
                    std::iter::once(&header[col])
                        .chain(rows.iter().filter_map(|r| r.get(col)))
                        .map(|cell| cell.chars().count())
                        .max()
                        .unwrap_or(0)
                })
                .collect();
            let line = |cells: &[String]| -> String {
                cells
                    .iter()
                    .zip(&widths)
                    .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
                    .collect::<Vec<_>>()
                    .join("  ")
            };
            out.push_str(line(header).trim_end());
            out.push('\n');
            for row in rows {
                out.push_str(line(row).trim_end());
                out.push('\n');
            }
        }
    }
}

fn styled_name(format: ReportFormat, name: &str) -> String {
    match format {
        ReportFormat::Terminal => format!("\x1b[36m{}\x1b[0m", name),
        ReportFormat::Markdown => format!("`{}`", name),
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn humanize(destination: &Destination) -> String {
    destination.as_str().replace('_', " ")
}
