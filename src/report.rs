// =============================================================================
// Report Formatting — Human-readable evaluation summary
// =============================================================================
//
// Renders one `Analysis` as the multi-line text pushed to the console and to
// the notification sink. The sink speaks Telegram HTML, so the headline
// fields carry <b> tags; everything else is plain text.

use crate::engine::Analysis;

/// Format an analysis as a multi-line report.
pub fn format_report(analysis: &Analysis) -> String {
    let f = &analysis.features;
    let sig = &analysis.signal;

    let reasons = if sig.reasons.is_empty() {
        "- No strong factors".to_string()
    } else {
        sig.reasons
            .iter()
            .map(|r| format!("- {r}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let lines = [
        format!(
            "<b>{}</b>  tf {}  @ {}",
            analysis.symbol,
            analysis.timeframe,
            analysis.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        format!(
            "Spot: {:.4} | Fut: {:.4} | Basis: {:.4} (z={:.2})",
            f.spot_last, f.fut_last, f.basis, f.basis_z
        ),
        format!(
            "RSI: {:.1} | MFI: {:.1} | Funding: {:.5} | OI: {:.0}",
            f.rsi, f.mfi, f.funding, f.open_interest
        ),
        format!("Vol spike: {}", if f.vol_spike { "Yes" } else { "No" }),
        format!("<b>Signal: {}</b> (score {:+.2})", sig.action, sig.score),
        reasons,
    ];

    lines.join("\n")
}
