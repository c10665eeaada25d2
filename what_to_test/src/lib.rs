//! Coverage-driven test recommendations for Go modules.
//!
//! The pipeline runs `go test -coverprofile`, parses the profile into per-file
//! totals, drops generated and vendored files, ranks the files below a
//! coverage threshold by impact and renders a text report.

pub mod app;
pub mod coverage;
pub mod error;
pub mod exclusion;
pub mod generator;
pub mod parser;
pub mod ranking;
pub mod report;

pub use coverage::{CoverageBlock, CoverageMap, FileCoverage};
pub use error::{AdvisorError, LineError};
pub use ranking::RankedEntry;
