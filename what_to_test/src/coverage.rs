//! Per-file coverage aggregation

use std::collections::HashMap;

use crate::error::LineError;

/// One block line of a coverage profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageBlock {
    /// `path:startLine.startCol,endLine.endCol`
    pub location: String,
    pub statements: u64,
    pub hits: u64,
}

impl CoverageBlock {
    /// Everything before the first colon of the location.
    pub fn file_path(&self) -> &str {
        file_path_of(&self.location)
    }

    pub fn is_covered(&self) -> bool {
        self.hits > 0
    }
}

pub(crate) fn file_path_of(location: &str) -> &str {
    location.split(':').next().unwrap_or(location)
}

/// Totals for one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCoverage {
    pub total: u64,
    pub covered: u64,
    /// Locations of blocks with zero hits, in profile order.
    pub uncovered_blocks: Vec<String>,
}

impl FileCoverage {
    /// Adds a block to the totals. A block that would overflow either counter
    /// is rejected and leaves the totals untouched.
    pub fn record(&mut self, block: &CoverageBlock) -> Result<(), LineError> {
        let total = self
            .total
            .checked_add(block.statements)
            .ok_or(LineError::CountOverflow)?;
        if block.is_covered() {
            self.covered = self
                .covered
                .checked_add(block.statements)
                .ok_or(LineError::CountOverflow)?;
        } else {
            self.uncovered_blocks.push(block.location.clone());
        }
        self.total = total;
        Ok(())
    }
}

/// Percentage of covered statements. A file without statements counts as
/// fully covered.
pub fn coverage_percent(file: &FileCoverage) -> f64 {
    if file.total == 0 {
        100.0
    } else {
        (file.covered as f64 / file.total as f64) * 100.0
    }
}

/// File path to totals, iterated in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct CoverageMap {
    files: Vec<(String, FileCoverage)>,
    index: HashMap<String, usize>,
}

impl CoverageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `path`, creating an empty one on first use.
    pub fn entry_mut(&mut self, path: &str) -> &mut FileCoverage {
        let slot = match self.index.get(path) {
            Some(&slot) => slot,
            None => {
                let slot = self.files.len();
                self.files.push((path.to_string(), FileCoverage::default()));
                self.index.insert(path.to_string(), slot);
                slot
            }
        };
        &mut self.files[slot].1
    }

    pub fn record(&mut self, block: &CoverageBlock) -> Result<(), LineError> {
        self.entry_mut(block.file_path()).record(block)
    }

    pub fn get(&self, path: &str) -> Option<&FileCoverage> {
        self.index.get(path).map(|&slot| &self.files[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileCoverage)> {
        self.files.iter().map(|(path, file)| (path.as_str(), file))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Coverage percentage of every file, in map order.
pub fn calculate(map: &CoverageMap) -> Vec<(&str, f64)> {
    map.iter()
        .map(|(path, file)| (path, coverage_percent(file)))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use proptest::prelude::*;

    use super::*;

    fn block(location: &str, statements: u64, hits: u64) -> CoverageBlock {
        CoverageBlock {
            location: location.to_string(),
            statements,
            hits,
        }
    }

    #[test]
    fn file_path__range_location__then_prefix_before_colon() {
        let b = block("pkg/a.go:1.1,2.2", 1, 0);
        assert_eq!(b.file_path(), "pkg/a.go");
    }

    #[test]
    fn coverage_percent__zero_total__then_fully_covered() {
        let file = FileCoverage::default();
        assert_eq!(coverage_percent(&file), 100.0);

        let odd = FileCoverage {
            total: 0,
            covered: 7,
            uncovered_blocks: Vec::new(),
        };
        assert_eq!(coverage_percent(&odd), 100.0);
    }

    #[test]
    fn coverage_percent__partial__then_ratio_times_hundred() {
        let file = FileCoverage {
            total: 3,
            covered: 1,
            uncovered_blocks: vec!["a.go:1.1,2.2".to_string()],
        };
        assert!((coverage_percent(&file) - 33.333_333_333_333_336).abs() < 1e-9);
    }

    #[test]
    fn record__mixed_hits__then_covered_within_total() {
        let mut map = CoverageMap::new();
        map.record(&block("a.go:1.1,2.2", 4, 3)).unwrap();
        map.record(&block("a.go:3.1,4.2", 6, 0)).unwrap();
        map.record(&block("a.go:5.1,6.2", 0, 0)).unwrap();

        let file = map.get("a.go").unwrap();
        assert_eq!(file.total, 10);
        assert_eq!(file.covered, 4);
        assert!(file.covered <= file.total);
        assert_eq!(
            file.uncovered_blocks,
            vec!["a.go:3.1,4.2".to_string(), "a.go:5.1,6.2".to_string()]
        );
    }

    #[test]
    fn iter__interleaved_files__then_first_seen_order() {
        let mut map = CoverageMap::new();
        map.record(&block("b.go:1.1,1.2", 1, 1)).unwrap();
        map.record(&block("a.go:1.1,1.2", 1, 1)).unwrap();
        map.record(&block("b.go:2.1,2.2", 1, 0)).unwrap();

        let paths: Vec<&str> = map.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["b.go", "a.go"]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn is_empty__before_and_after_record__then_tracks_files() {
        let mut map = CoverageMap::new();
        assert!(map.is_empty());
        map.record(&block("a.go:1.1,1.2", 1, 0)).unwrap();
        assert!(!map.is_empty());
    }

    #[test]
    fn calculate__two_files__then_percent_per_file() {
        let mut map = CoverageMap::new();
        map.record(&block("a.go:1.1,1.2", 2, 0)).unwrap();
        map.record(&block("b.go:1.1,1.2", 2, 5)).unwrap();

        assert_eq!(calculate(&map), vec![("a.go", 0.0), ("b.go", 100.0)]);
    }

    #[test]
    fn record__total_would_overflow__then_rejected_and_totals_kept() {
        let mut map = CoverageMap::new();
        map.record(&block("a.go:1.1,2.2", u64::MAX, 1)).unwrap();

        let err = map.record(&block("a.go:3.1,4.2", 1, 0)).unwrap_err();
        assert_eq!(err, LineError::CountOverflow);

        let file = map.get("a.go").unwrap();
        assert_eq!(file.total, u64::MAX);
        assert_eq!(file.covered, u64::MAX);
        assert!(file.uncovered_blocks.is_empty());
    }

    proptest! {
        /// Any covered count reports 100% when no statements are tracked.
        #[test]
        fn coverage_percent__zero_total_any_covered__then_hundred(covered in any::<u64>()) {
            let file = FileCoverage {
                total: 0,
                covered,
                uncovered_blocks: Vec::new(),
            };
            prop_assert_eq!(coverage_percent(&file), 100.0);
        }
    }
}
