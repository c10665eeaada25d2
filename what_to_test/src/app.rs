use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::{
    coverage::{self, CoverageMap},
    exclusion::{self, ExclusionSet},
    generator::ProfileGenerator,
    parser, ranking, report,
};

/// Identify the least-tested files of a Go module and recommend where to add tests.
#[derive(Parser, Debug, Clone)]
#[command(name = "what-to-test", author, version, about, long_about = None)]
pub struct Args {
    /// Coverage threshold percentage
    #[arg(short, long, default_value_t = 80.0)]
    pub threshold: f64,

    /// Number of top impactful files to display
    #[arg(short = 'n', long = "top", default_value_t = 5)]
    pub top: usize,

    /// Glob patterns to exclude from analysis (e.g. 'svc/gen/go/*' 'mock_*.go')
    #[arg(short, long, num_args = 0.., value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Coverage profile written by the test runner
    #[arg(
        short,
        long,
        value_name = "PATH",
        env = "WHAT_TO_TEST_PROFILE",
        default_value = "coverage"
    )]
    pub profile: PathBuf,

    /// Test runner binary
    #[arg(long, value_name = "PROGRAM", env = "WHAT_TO_TEST_GO", default_value = "go")]
    pub go: String,

    /// Analyze an existing profile instead of running the tests
    #[arg(long)]
    pub no_generate: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub threshold: f64,
    pub top_n: usize,
    /// Defaults first, then user patterns.
    pub exclude_patterns: Vec<String>,
    pub profile: PathBuf,
    pub runner: String,
    pub generate: bool,
}

impl From<Args> for AppConfig {
    fn from(value: Args) -> Self {
        Self {
            threshold: value.threshold,
            top_n: value.top,
            exclude_patterns: exclusion::merge_patterns(&value.exclude),
            profile: value.profile,
            runner: value.go,
            generate: !value.no_generate,
        }
    }
}

pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(config: &AppConfig) -> Result<()> {
    let exclusions = ExclusionSet::new(config.exclude_patterns.as_slice())?;
    debug!(patterns = exclusions.len(), "compiled exclusion patterns");

    if config.generate {
        ProfileGenerator::new(config.runner.clone(), config.profile.clone()).generate()?;
    }

    let map = parser::parse_profile(&config.profile, &exclusions)?;
    if map.is_empty() {
        debug!(profile = %config.profile.display(), "no files left to rank");
    }
    print!("{}", analyze(&map, config.threshold, config.top_n));
    Ok(())
}

/// Percentages, ranking and rendering for an already parsed profile.
pub fn analyze(map: &CoverageMap, threshold: f64, top_n: usize) -> String {
    let percentages = coverage::calculate(map);
    let ranked = ranking::rank(&percentages, map, threshold, top_n);
    report::render(&ranked, threshold, top_n)
}
