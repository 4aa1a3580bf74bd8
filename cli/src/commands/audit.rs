use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use indicatif::ProgressStyle;
use listguard_common::config::{Config, ReasonCode};
use listguard_common::error::EngineError;
use listguard_common::models::{AuditReport, ConfidenceTier, Listing, RiskTier};
use listguard_core::{AuditEngine, enforcement};
use serde::Serialize;
use tracing::{info_span, warn};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::commands::Inputs;
use crate::loader;
use crate::mprint;
use crate::terminal::{colors, print};

type Detail = (String, ColoredString);

const TITLE_WIDTH: usize = 56;

/// One line of the JSON output.
#[derive(Serialize)]
struct AuditRecord<'a> {
    id: &'a str,
    title: &'a str,
    #[serde(flatten)]
    report: &'a AuditReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    enforcement: Option<Complaint<'a>>,
}

#[derive(Serialize)]
struct Complaint<'a> {
    code: &'a str,
    reason: &'a str,
    comment: String,
}

impl<'a> Complaint<'a> {
    fn new(report: &AuditReport, reason: &'a ReasonCode) -> Self {
        Self {
            code: &reason.code,
            reason: &reason.text,
            comment: enforcement::complaint_comment(report, reason),
        }
    }
}

pub fn audit(inputs: &Inputs, output: Option<&Path>, cfg: &Config) -> anyhow::Result<()> {
    let engine: AuditEngine = loader::build_engine(inputs)?;
    let (ids, listings): (Vec<String>, Vec<Listing>) = loader::load_listings(&inputs.listings)?;

    let start_time: Instant = Instant::now();
    let results: Vec<Result<AuditReport, EngineError>> = run_batch(&engine, &listings)?;
    let total_time: Duration = start_time.elapsed();

    let mut audited: Vec<(usize, AuditReport)> = Vec::with_capacity(results.len());
    for (idx, result) in results.into_iter().enumerate() {
        match result {
            Ok(report) => audited.push((idx, report)),
            Err(err) => warn!("skipped listing {}: {err}", ids[idx]),
        }
    }

    if cfg.quiet == 0 {
        print::header("audit results", cfg.quiet);
        print_reports(&engine, &ids, &listings, &audited);
    }

    if let Some(path) = output {
        write_json(&engine, path, &ids, &listings, &audited)?;
    }

    print_summary(&audited, listings.len(), total_time, cfg);
    Ok(())
}

fn run_batch(engine: &AuditEngine, listings: &[Listing]) -> anyhow::Result<Vec<Result<AuditReport, EngineError>>> {
    let span = info_span!("audit", indicatif.pb_show = true);
    span.pb_set_style(&ProgressStyle::with_template("{spinner:.blue} {pos}/{len} listings {wide_bar:.green/black}")?);
    span.pb_set_length(listings.len() as u64);
    let guard = span.enter();

    let on_audited = |_count: usize| span.pb_inc(1);
    let results: Vec<Result<AuditReport, EngineError>> = engine.audit_batch(listings, Some(&on_audited));

    drop(guard);
    Ok(results)
}

fn print_reports(engine: &AuditEngine, ids: &[String], listings: &[Listing], audited: &[(usize, AuditReport)]) {
    for (pos, (idx, report)) in audited.iter().enumerate() {
        print::tree_head(&ids[*idx], &print::truncate(&listings[*idx].title, TITLE_WIDTH));
        print::as_tree_one_level(report_details(engine, report));
        if pos + 1 != audited.len() {
            mprint!();
        }
    }
}

fn report_details(engine: &AuditEngine, report: &AuditReport) -> Vec<Detail> {
    let mut details: Vec<Detail> = Vec::new();

    let matched: ColoredString = match &report.catalog_id {
        Some(id) => format!(
            "{} {}",
            id.color(colors::CATALOG_ID),
            format!("({} {:.1})", report.confidence, report.match_score).color(colors::SEPARATOR)
        )
        .normal(),
        None => report.confidence.to_string().color(colors::UNMATCHED),
    };
    details.push(("Match".to_string(), matched));

    details.push((
        "Risk".to_string(),
        format!("{} {}", report.fraud_score, report.risk_tier).color(risk_color(report.risk_tier)).bold(),
    ));

    if !report.violation_details.is_empty() {
        let flags: String = report
            .violation_details
            .kinds()
            .map(|kind| kind.as_str())
            .collect::<Vec<&str>>()
            .join(", ");
        details.push(("Flags".to_string(), flags.normal()));
    }

    details.push(("Read".to_string(), report.detected.describe().normal()));

    if let Some(reason) = engine.enforcement_reason(report) {
        details.push((
            "Report".to_string(),
            format!("{} {}", reason.code, reason.text).color(colors::RISK_HIGH),
        ));
    }

    details
}

fn risk_color(tier: RiskTier) -> Color {
    match tier {
        RiskTier::Low => colors::RISK_LOW,
        RiskTier::Medium => colors::RISK_MEDIUM,
        RiskTier::High => colors::RISK_HIGH,
    }
}

fn write_json(
    engine: &AuditEngine,
    path: &Path,
    ids: &[String],
    listings: &[Listing],
    audited: &[(usize, AuditReport)],
) -> anyhow::Result<()> {
    let records: Vec<AuditRecord<'_>> = audited
        .iter()
        .map(|(idx, report)| AuditRecord {
            id: &ids[*idx],
            title: &listings[*idx].title,
            report,
            enforcement: engine.enforcement_reason(report).map(|reason| Complaint::new(report, reason)),
        })
        .collect();

    let file: File = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &records)
        .with_context(|| format!("cannot write reports to {}", path.display()))?;
    Ok(())
}

fn print_summary(audited: &[(usize, AuditReport)], total: usize, total_time: Duration, cfg: &Config) {
    if cfg.quiet >= 2 {
        return;
    }

    let mut by_confidence: BTreeMap<ConfidenceTier, usize> = BTreeMap::new();
    let mut by_risk: BTreeMap<RiskTier, usize> = BTreeMap::new();
    for (_, report) in audited {
        *by_confidence.entry(report.confidence).or_default() += 1;
        *by_risk.entry(report.risk_tier).or_default() += 1;
    }

    print::header("summary", 0);
    let keys: Vec<String> = by_confidence
        .keys()
        .map(|tier| tier.to_string())
        .chain(["High risk".to_string(), "Medium risk".to_string(), "Skipped".to_string()])
        .collect();
    print::set_key_width(keys.iter().map(String::as_str));

    for (tier, count) in &by_confidence {
        print::aligned_line(&tier.to_string(), count.to_string());
    }
    let high: usize = by_risk.get(&RiskTier::High).copied().unwrap_or(0);
    let medium: usize = by_risk.get(&RiskTier::Medium).copied().unwrap_or(0);
    print::aligned_line("High risk", high.to_string().color(colors::RISK_HIGH).bold());
    print::aligned_line("Medium risk", medium.to_string().color(colors::RISK_MEDIUM));
    print::aligned_line("Skipped", (total - audited.len()).to_string());

    let audited_count: ColoredString = format!("{} listings", audited.len()).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString =
        format!("Audit Complete: {audited_count} audited in {total_time}").color(colors::TEXT_DEFAULT);

    print::fat_separator();
    print::centerln(&output.to_string());
}
