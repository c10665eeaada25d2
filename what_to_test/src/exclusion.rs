//! File exclusion by glob pattern
//!
//! Patterns are matched against the whole file path of a block with shell
//! `fnmatch` rules: `*` also crosses `/`, so `*/cmd/*` drops every file below
//! any `cmd` directory, `**` means the same as `*`, and a `[` without a
//! closing `]` is an ordinary character.

use glob::Pattern;
use tracing::debug;

use crate::error::{AdvisorError, Result};

/// Patterns that are always excluded: generated code, mocks, sqlc output,
/// protobuf output and command entrypoints.
pub const DEFAULT_EXCLUSIONS: [&str; 5] = [
    "*/gen/go/*",
    "*mock_*.go",
    "*.sql.go",
    "*.pb.go",
    "*/cmd/*",
];

/// Default patterns followed by the user's, in that order.
pub fn merge_patterns(user: &[String]) -> Vec<String> {
    DEFAULT_EXCLUSIONS
        .iter()
        .map(|p| p.to_string())
        .chain(user.iter().cloned())
        .collect()
}

/// A compiled set of exclusion patterns.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    patterns: Vec<Pattern>,
}

impl ExclusionSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| compile(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_excluded(&self, file_path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(file_path))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn compile(pattern: &str) -> Result<Pattern> {
    let normalized = to_glob_syntax(pattern);
    Pattern::new(&normalized)
        .or_else(|err| {
            debug!(pattern, %err, "matching exclusion pattern literally");
            Pattern::new(&Pattern::escape(pattern))
        })
        .map_err(|source| AdvisorError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Rewrites an `fnmatch` pattern into `glob` syntax: runs of `*` collapse to
/// one and an unterminated `[` becomes the literal class `[[]`.
fn to_glob_syntax(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                out.push('*');
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
            }
            '[' => {
                let mut j = i + 1;
                if chars.get(j) == Some(&'!') {
                    j += 1;
                }
                // `]` right after the opening bracket is part of the class
                if chars.get(j) == Some(&']') {
                    j += 1;
                }
                match chars[j.min(chars.len())..].iter().position(|&c| c == ']') {
                    Some(offset) => {
                        let end = j + offset;
                        out.extend(&chars[i..=end]);
                        i = end;
                    }
                    None => out.push_str("[[]"),
                }
            }
            c => out.push(c),
        }
        i += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    fn defaults() -> ExclusionSet {
        ExclusionSet::new(&DEFAULT_EXCLUSIONS).unwrap()
    }

    #[test]
    fn merge_patterns__user_patterns__then_appended_after_defaults() {
        let merged = merge_patterns(&["vendor/*".to_string()]);
        assert_eq!(merged.len(), 6);
        assert_eq!(merged[0], "*/gen/go/*");
        assert_eq!(merged[5], "vendor/*");
    }

    #[test]
    fn is_excluded__generated_files__then_excluded() {
        let set = defaults();
        assert!(set.is_excluded("example.com/svc/gen/go/api/v1/api.go"));
        assert!(set.is_excluded("example.com/svc/internal/mock_store.go"));
        assert!(set.is_excluded("example.com/svc/db/queries.sql.go"));
        assert!(set.is_excluded("example.com/svc/api/service.pb.go"));
        assert!(set.is_excluded("example.com/svc/cmd/server/main.go"));
    }

    #[test]
    fn is_excluded__plain_source__then_kept() {
        let set = defaults();
        assert!(!set.is_excluded("example.com/svc/internal/store.go"));
        assert!(!set.is_excluded("example.com/svc/command/run.go"));
    }

    #[test]
    fn is_excluded__star_crosses_separator__then_matches_nested_path() {
        let set = ExclusionSet::new(&["vendor/*"]).unwrap();
        assert!(set.is_excluded("vendor/github.com/pkg/errors/errors.go"));
    }

    #[test]
    fn is_excluded__case_differs__then_kept() {
        let set = ExclusionSet::new(&["*.PB.go"]).unwrap();
        assert!(!set.is_excluded("api/service.pb.go"));
    }

    #[test]
    fn new__unclosed_bracket__then_bracket_matched_literally() {
        let set = ExclusionSet::new(&["src/[abc*"]).unwrap();
        assert!(set.is_excluded("src/[abc/lib.go"));
        assert!(!set.is_excluded("src/a/lib.go"));
    }

    #[test]
    fn new__double_star__then_same_as_single_star() {
        let set = ExclusionSet::new(&["vendor**", "a**b.go"]).unwrap();
        assert!(set.is_excluded("vendor/github.com/pkg/errors/errors.go"));
        assert!(set.is_excluded("a/x/b.go"));
        assert!(!set.is_excluded("internal/vendor.go"));
    }

    #[test]
    fn is_excluded__double_star_slash_prefix__then_requires_separator() {
        let set = ExclusionSet::new(&["**/mock_*.go"]).unwrap();
        assert!(!set.is_excluded("mock_a.go"));
        assert!(set.is_excluded("svc/mock_a.go"));
    }

    #[test]
    fn is_excluded__character_class__then_matches_members() {
        let set = ExclusionSet::new(&["*_[ab].go", "*[!x]_gen.go"]).unwrap();
        assert!(set.is_excluded("pkg/file_a.go"));
        assert!(!set.is_excluded("pkg/file_c.go"));
        assert!(set.is_excluded("pkg/y_gen.go"));
        assert!(!set.is_excluded("pkg/x_gen.go"));
    }

    #[test]
    fn to_glob_syntax__fnmatch_forms__then_rewritten() {
        assert_eq!(to_glob_syntax("a***b"), "a*b");
        assert_eq!(to_glob_syntax("src/[abc"), "src/[[]abc");
        assert_eq!(to_glob_syntax("[]]x"), "[]]x");
        assert_eq!(to_glob_syntax("[!]a]*"), "[!]a]*");
        assert_eq!(to_glob_syntax("x["), "x[[]");
    }

    #[test]
    fn new__empty_list__then_excludes_nothing() {
        let set = ExclusionSet::new::<&str>(&[]).unwrap();
        assert!(set.is_empty());
        assert!(!set.is_excluded("a.go"));
    }
}
