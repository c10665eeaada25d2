//! Text recommendations for ranked files

use crate::ranking::RankedEntry;

/// Uncovered blocks listed per file before the rest are summarized.
pub const MAX_LISTED_BLOCKS: usize = 5;

/// Recommendation tier for a coverage percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Critical,
    Low,
    Moderate,
    High,
}

impl Tier {
    pub fn from_percent(percent: f64) -> Self {
        if percent < 50.0 {
            Tier::Critical
        } else if percent < 70.0 {
            Tier::Low
        } else if percent < 80.0 {
            Tier::Moderate
        } else {
            Tier::High
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Tier::Critical => "🔴 Critical Coverage: Prioritize adding comprehensive unit tests for all major functionalities and edge cases.",
            Tier::Low => "🟠 Low Coverage: Review existing tests and add tests for uncovered functions and error handling paths.",
            Tier::Moderate => "🟡 Moderate Coverage: Add additional unit tests focusing on less-covered code paths and edge cases.",
            Tier::High => "🟢 High Coverage: Maintain existing tests and consider adding tests for any remaining uncovered blocks.",
        }
    }
}

/// Render the full report. An empty `entries` means every file passed.
pub fn render(entries: &[RankedEntry], threshold: f64, top_n: usize) -> String {
    if entries.is_empty() {
        return format!(
            "✅ All files have coverage above {}%. Great job!\n",
            format_threshold(threshold)
        );
    }

    let mut output = String::new();
    output.push_str(&format!(
        "📉 Top {} Most Impactful Files with Coverage below {}%:\n",
        top_n,
        format_threshold(threshold)
    ));
    output.push_str(&format!("{}\n", "-".repeat(61)));

    for (idx, entry) in entries.iter().enumerate() {
        output.push_str(&format!(
            "\n### {}. {}: {:.2}% Coverage\n",
            idx + 1,
            entry.path,
            entry.percent
        ));
        output.push_str(&recommendations(entry.percent, &entry.uncovered_blocks));
        output.push('\n');
    }

    output
}

/// Tier message plus the uncovered block listing, one item per line.
pub fn recommendations(percent: f64, uncovered_blocks: &[String]) -> String {
    let mut lines = vec![Tier::from_percent(percent).message().to_string()];

    if !uncovered_blocks.is_empty() {
        lines.push(format!(
            "   - **Uncovered Code Blocks:** {} blocks not covered. Review the following locations:",
            uncovered_blocks.len()
        ));
        for block in uncovered_blocks.iter().take(MAX_LISTED_BLOCKS) {
            lines.push(format!("     - `{}`", block));
        }
        if uncovered_blocks.len() > MAX_LISTED_BLOCKS {
            lines.push(format!(
                "     - ...and {} more.",
                uncovered_blocks.len() - MAX_LISTED_BLOCKS
            ));
        }
    }

    lines.join("\n")
}

/// Shortest form that still shows a decimal point, e.g. `80.0` or `72.5`.
/// Shortest round-trip form with a decimal point; exponents carry a sign and
/// at least two digits (`80.0`, `1e+20`, `1e-05`).
fn format_threshold(threshold: f64) -> String {
    if threshold.is_nan() {
        return "nan".to_string();
    }
    if threshold.is_infinite() {
        return if threshold > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let repr = format!("{:?}", threshold);
    match repr.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}
