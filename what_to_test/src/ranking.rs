//! Impact scoring and ranking of under-covered files

use tracing::debug;

use crate::coverage::CoverageMap;

/// A file selected for the report.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub path: String,
    pub percent: f64,
    pub uncovered_blocks: Vec<String>,
    pub impact: f64,
}

/// `(100 - percent) * statements * uncovered blocks`. Large files whose gaps
/// are spread over many blocks rank first.
pub fn impact_score(percent: f64, total_statements: u64, uncovered_blocks: usize) -> f64 {
    (100.0 - percent) * total_statements as f64 * uncovered_blocks as f64
}

/// Files strictly below `threshold`, highest impact first, at most `top_n`.
///
/// `percentages` comes from [`crate::coverage::calculate`]; equal scores keep
/// its order.
pub fn rank(
    percentages: &[(&str, f64)],
    map: &CoverageMap,
    threshold: f64,
    top_n: usize,
) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = percentages
        .iter()
        .filter(|&&(_, percent)| percent < threshold)
        .filter_map(|&(path, percent)| {
            let file = map.get(path)?;
            Some(RankedEntry {
                path: path.to_string(),
                percent,
                uncovered_blocks: file.uncovered_blocks.clone(),
                impact: impact_score(percent, file.total, file.uncovered_blocks.len()),
            })
        })
        .collect();

    debug!(qualifying = entries.len(), threshold, "ranked files below threshold");

    entries.sort_by(|a, b| b.impact.total_cmp(&a.impact));
    entries.truncate(top_n);
    entries
}
