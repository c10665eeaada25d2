//! Coverage profile parser
//!
//! Reads the line-based profile written by `go test -coverprofile`:
//!
//! ```text
//! mode: set
//! example.com/pkg/file.go:12.34,14.2 3 1
//! ```
//!
//! Each block line is `<path>:<startLine>.<startCol>,<endLine>.<endCol>`
//! followed by the statement count and the hit count.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::coverage::{file_path_of, CoverageBlock, CoverageMap};
use crate::error::{AdvisorError, LineError, Result};
use crate::exclusion::ExclusionSet;

/// Prefix of the profile's header line.
pub const HEADER_PREFIX: &str = "mode:";

/// Parse a single block line.
pub fn parse_line(line: &str) -> std::result::Result<CoverageBlock, LineError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let location = tokens.first().ok_or(LineError::MissingRange)?;
    if !location.contains(':') {
        return Err(LineError::MissingRange);
    }
    if tokens.len() != 3 {
        return Err(LineError::TokenCount {
            found: tokens.len(),
        });
    }

    Ok(CoverageBlock {
        location: location.to_string(),
        statements: parse_count("statement", tokens[1])?,
        hits: parse_count("hit", tokens[2])?,
    })
}

fn parse_count(field: &'static str, value: &str) -> std::result::Result<u64, LineError> {
    value.parse().map_err(|_| LineError::InvalidCount {
        field,
        value: value.to_string(),
    })
}

/// Parse a profile from disk.
pub fn parse_profile(path: &Path, exclusions: &ExclusionSet) -> Result<CoverageMap> {
    let file = File::open(path).map_err(|e| AdvisorError::io(path, e))?;
    parse_reader(BufReader::new(file), exclusions).map_err(|e| match e {
        AdvisorError::Io { source, .. } => AdvisorError::io(path, source),
        other => other,
    })
}

/// Parse a profile from any buffered reader.
///
/// Excluded files are dropped before their counts are validated. Malformed
/// lines are logged and skipped; only read failures are returned.
pub fn parse_reader<R: BufRead>(reader: R, exclusions: &ExclusionSet) -> Result<CoverageMap> {
    let mut map = CoverageMap::new();
    let mut excluded = 0usize;
    let mut blocks = 0usize;

    for line in reader.lines() {
        let line = line.map_err(|e| AdvisorError::io("<profile>", e))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with(HEADER_PREFIX) {
            continue;
        }

        let file_path = line
            .split_whitespace()
            .next()
            .map(file_path_of)
            .unwrap_or_default();
        if exclusions.is_excluded(file_path) {
            excluded += 1;
            continue;
        }

        match parse_line(line).and_then(|block| map.record(&block)) {
            Ok(()) => blocks += 1,
            Err(reason) => warn!("Skipping malformed line: {} ({})", line, reason),
        }
    }

    debug!(
        blocks,
        excluded,
        files = map.len(),
        "parsed coverage profile"
    );
    Ok(map)
}
