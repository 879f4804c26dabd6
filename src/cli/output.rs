//! Output formatting for CLI results

use crate::core::decision::{OverrideFlag, Verdict};
use crate::core::screener::Screening;
use colorful::Colorful;

/// Format one screening for terminal output.
pub fn format_report(file: &str, screening: &Screening, verbose: bool) -> String {
    let mut out = String::new();

    let header = match screening.result {
        Verdict::Normal => format!("{} {}", "✓".green(), file.to_string().cyan()),
        Verdict::Abnormal => format!("{} {}", "✗".red(), file.to_string().cyan()),
    };
    out.push_str(&header);
    out.push('\n');

    let verdict = match screening.result {
        Verdict::Normal => "normal".to_string().green().to_string(),
        Verdict::Abnormal => "abnormal".to_string().red().to_string(),
    };
    out.push_str(&format!(
        "  {}: error {:.3e} vs threshold {:.3e}\n",
        verdict, screening.reconstruction_error, screening.threshold
    ));

    if !screening.flags.is_empty() {
        let names: Vec<&str> = screening
            .flags
            .iter()
            .map(|f| match f {
                OverrideFlag::Amp => "AMP",
                OverrideFlag::Ac => "AC",
            })
            .collect();
        out.push_str(&format!(
            "  overrides fired: {}\n",
            names.join(", ").yellow()
        ));
    }

    if verbose {
        out.push_str(&format!(
            "  windows: {} | samples: {} | format: {} | hybrid: {} | md5: {}\n",
            screening.windows,
            screening.samples_processed,
            screening.file_format.name(),
            screening.hybrid,
            screening.payload_md5
        ));
    }

    out
}

/// Screening as a pretty-printed JSON report.
pub fn format_json(screening: &Screening) -> String {
    serde_json::to_string_pretty(screening)
        .unwrap_or_else(|e| format!(r#"{{"error": "report serialization failed: {e}"}}"#))
}

/// One-line batch summary.
pub fn summary_line(screened: usize, abnormal: usize, failed: usize) -> String {
    let mut parts = vec![format!("{screened} screened")];
    if abnormal > 0 {
        parts.push(format!("{abnormal} abnormal").red().to_string());
    } else if screened > 0 {
        parts.push("all normal".to_string().green().to_string());
    }
    if failed > 0 {
        parts.push(format!("{failed} failed").yellow().to_string());
    }
    parts.join(", ")
}
