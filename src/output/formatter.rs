use std::fmt::Write;

use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::domain::{RiskLevel, Severity, Violation};
use crate::output::report::{ListingReport, ViolationStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
    Csv,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" | "term" | "tty" => Ok(Self::Terminal),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => Err(format!(
                "Unknown format: {s}. Valid options: terminal, json, csv, markdown"
            )),
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    listings: &'a [ListingReport],
    summary: ViolationStats,
}

#[must_use]
pub fn format_output(reports: &[ListingReport], format: OutputFormat, ci_mode: bool) -> String {
    match format {
        OutputFormat::Terminal => format_terminal(reports),
        OutputFormat::Json => format_json(reports),
        OutputFormat::Csv => format_csv(reports),
        OutputFormat::Markdown => format_markdown(reports, ci_mode),
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    let label = severity.as_str().to_uppercase();
    match severity {
        Severity::Critical => label.on_red().white().bold(),
        Severity::High => label.red().bold(),
        Severity::Medium => label.yellow().bold(),
        Severity::Low => label.bright_black().bold(),
    }
}

fn risk_label(risk: RiskLevel) -> ColoredString {
    match risk {
        RiskLevel::Safe => risk.as_str().green().bold(),
        RiskLevel::MediumRisk => risk.as_str().yellow().bold(),
        RiskLevel::HighRisk => risk.as_str().red().bold(),
    }
}

fn format_terminal(reports: &[ListingReport]) -> String {
    let mut output = String::new();

    for report in reports {
        let result = &report.result;
        let _ = writeln!(
            output,
            "\n▸ {}  {} {}",
            report.title.bright_cyan().bold(),
            format!("{}/100", result.compliance_score).bright_white().bold(),
            risk_label(result.risk_level)
        );
        if let Some(semantic) = &report.semantic {
            let _ = writeln!(
                output,
                "  {} {} {}",
                "analysis:".dimmed(),
                semantic.explanation,
                format!(
                    "(impact {}, confidence {:.0}%)",
                    semantic.impact_score,
                    semantic.confidence * 100.0
                )
                .dimmed()
            );
        }

        if result.is_clean() {
            let _ = writeln!(output, "  {}", "No violations found.".green());
            continue;
        }

        for v in result.ranked() {
            write_terminal_violation(&mut output, v);
        }
    }

    let stats = ViolationStats::from_results(reports.iter().map(|r| &r.result));
    let _ = writeln!(
        output,
        "\n{}",
        "═══════════════════════════════════════════════════════════".bright_black()
    );
    let _ = writeln!(
        output,
        "{} listing{}, {} violation{}, average score {:.1}",
        stats.listings,
        if stats.listings == 1 { "" } else { "s" },
        stats.total_violations,
        if stats.total_violations == 1 { "" } else { "s" },
        stats.avg_score
    );
    let _ = writeln!(
        output,
        "{} {}  {} {}  {} {}",
        risk_label(RiskLevel::HighRisk),
        stats.count_with_risk(RiskLevel::HighRisk),
        risk_label(RiskLevel::MediumRisk),
        stats.count_with_risk(RiskLevel::MediumRisk),
        risk_label(RiskLevel::Safe),
        stats.count_with_risk(RiskLevel::Safe)
    );

    output
}

fn write_terminal_violation(output: &mut String, v: &Violation) {
    let _ = writeln!(
        output,
        "  [{}] {} - {} {}",
        severity_label(v.severity()),
        v.kind().bright_white(),
        v.description(),
        format!(
            "(impact {}, confidence {:.0}%)",
            v.impact_score(),
            v.confidence() * 100.0
        )
        .dimmed()
    );
    let _ = writeln!(output, "      {} {}", "evidence:".dimmed(), v.evidence());
    if let Some(regulation) = v.regulation_mapping() {
        let _ = writeln!(output, "      {} {}", "regulation:".dimmed(), regulation);
    }
    if let Some(fix) = v.suggested_fix() {
        let _ = writeln!(output, "      {} {}", "fix:".dimmed(), fix.green());
    }
}

fn format_json(reports: &[ListingReport]) -> String {
    let output = JsonOutput {
        listings: reports,
        summary: ViolationStats::from_results(reports.iter().map(|r| &r.result)),
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

fn format_csv(reports: &[ListingReport]) -> String {
    let mut wtr = csv::Writer::from_writer(vec![]);

    if wtr
        .write_record([
            "Listing",
            "Score",
            "Risk",
            "Type",
            "Severity",
            "Confidence",
            "Impact",
            "Description",
            "Evidence",
            "Regulation",
        ])
        .is_err()
    {
        return String::new();
    }

    for report in reports {
        let score = report.result.compliance_score.to_string();
        if report.result.is_clean() {
            let mut row = vec![""; 10];
            row[0] = report.title.as_str();
            row[1] = score.as_str();
            row[2] = report.result.risk_level.as_str();
            if wtr.write_record(&row).is_err() {
                break;
            }
            continue;
        }
        for v in report.result.ranked() {
            let confidence = format!("{:.2}", v.confidence());
            let impact = v.impact_score().to_string();
            let regulation = v
                .regulation_mapping()
                .map(ToString::to_string)
                .unwrap_or_default();
            if wtr
                .write_record([
                    report.title.as_str(),
                    score.as_str(),
                    report.result.risk_level.as_str(),
                    v.kind(),
                    v.severity().as_str(),
                    confidence.as_str(),
                    impact.as_str(),
                    v.description(),
                    v.evidence(),
                    regulation.as_str(),
                ])
                .is_err()
            {
                break;
            }
        }
    }

    wtr.into_inner()
        .ok()
        .and_then(|v| String::from_utf8(v).ok())
        .unwrap_or_default()
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn format_markdown(reports: &[ListingReport], ci_mode: bool) -> String {
    let mut md = String::from("# Shelfwatch Compliance Report\n\n");
    let stats = ViolationStats::from_results(reports.iter().map(|r| &r.result));

    let _ = writeln!(
        md,
        "**Summary:** {} listings, {} violations, average score {:.1} ({} High Risk, {} Medium Risk, {} Safe)\n",
        stats.listings,
        stats.total_violations,
        stats.avg_score,
        stats.count_with_risk(RiskLevel::HighRisk),
        stats.count_with_risk(RiskLevel::MediumRisk),
        stats.count_with_risk(RiskLevel::Safe)
    );

    for report in reports {
        let result = &report.result;
        let badge = if ci_mode {
            format!("[{}]", result.risk_level.as_str().to_uppercase())
        } else {
            let icon = match result.risk_level {
                RiskLevel::Safe => "🟢",
                RiskLevel::MediumRisk => "🟡",
                RiskLevel::HighRisk => "🔴",
            };
            format!("{icon} {}", result.risk_level)
        };
        let _ = writeln!(
            md,
            "## {}\n\nScore: **{}/100** {badge}\n",
            escape_cell(&report.title),
            result.compliance_score
        );
        if let Some(semantic) = &report.semantic {
            let _ = writeln!(
                md,
                "> Semantic analysis: {} (impact {}, confidence {:.0}%)\n",
                escape_cell(&semantic.explanation),
                semantic.impact_score,
                semantic.confidence * 100.0
            );
        }

        if result.is_clean() {
            md.push_str("No violations found.\n\n");
            continue;
        }

        md.push_str("| Severity | Type | Impact | Description | Suggested fix |\n");
        md.push_str("|----------|------|--------|-------------|---------------|\n");
        for v in result.ranked() {
            let _ = writeln!(
                md,
                "| {} | `{}` | {} | {} | {} |",
                v.severity(),
                v.kind(),
                v.impact_score(),
                escape_cell(v.description()),
                escape_cell(v.suggested_fix().unwrap_or("-"))
            );
        }
        md.push('\n');
    }

    md
}
