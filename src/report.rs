//! Terminal rendering of an analysis result for `finguard check`.

use console::{style, StyledObject};
use finguard_core::analysis::{AnalysisResponse, RiskScore, MAX_DISPLAYED_STEPS};
use std::fmt::Write as _;

use crate::i18n::Localizer;

/// The coloured `Risk: High` badge.
pub fn risk_badge(score: RiskScore, l10n: &Localizer) -> StyledObject<String> {
    let text = format!(" {}: {} ", l10n.t("risk"), l10n.risk_label(score));
    let badge = style(text).bold();
    match score {
        RiskScore::High => badge.white().on_red(),
        RiskScore::Medium => badge.black().on_yellow(),
        RiskScore::Low => badge.black().on_green(),
    }
}

fn numbered(out: &mut String, steps: &[String]) {
    for (i, step) in steps.iter().take(MAX_DISPLAYED_STEPS).enumerate() {
        let _ = writeln!(out, "  {}. {step}", i + 1);
    }
}

/// Render the full report. Chrome strings come from `l10n`; the substantive
/// text is shown as the backend wrote it.
pub fn render(resp: &AnalysisResponse, l10n: &Localizer) -> String {
    let mut out = String::new();

    let _ = write!(out, "{}", risk_badge(resp.risk_score, l10n));
    if !resp.scam_type.is_empty() {
        let _ = write!(out, "  {}", style(&resp.scam_type).dim());
    }
    out.push_str("\n\n");

    let _ = writeln!(out, "{}", style(l10n.t("why_scam")).bold());
    let _ = writeln!(out, "{}", resp.explanation);

    let steps = resp.displayed_steps();
    if !steps.is_empty() {
        let _ = writeln!(out, "\n{}", style(l10n.t("what_you_can_do")).bold());
        numbered(&mut out, steps);
    }

    if let Some(tr) = &resp.translation {
        let _ = writeln!(
            out,
            "\n{} ({})",
            style(l10n.t("translation")).bold(),
            tr.language
        );
        let _ = writeln!(out, "{}", tr.explanation);
        numbered(&mut out, &tr.steps);
    }

    if let Some(contact) = &resp.contact {
        let _ = writeln!(out, "\n{}", style(l10n.t("report_help")).bold());
        let _ = writeln!(out, "{contact}");
    }

    let _ = write!(out, "\n{}", style(l10n.t("disclaimer")).dim().italic());
    out
}
