use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

/// Replacement text for lines matched under [`FilterAction::Redact`].
pub const REDACTED_MARKER: &str = "[REDACTED]";

/// What happens to a history line once one of the configured patterns
/// matches it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterAction {
    /// Replace the line with [`REDACTED_MARKER`], keeping its position.
    #[default]
    Redact,
    /// Drop the line from the sequence entirely.
    Block,
}

/// Decision for a single line, as produced by [`SecretFilter::filter_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineVerdict {
    /// No pattern matched; the line passes through unchanged.
    Pass,
    /// A pattern matched; the caller replaces the line with the marker.
    Redact,
    /// A pattern matched; the caller drops the line.
    Block,
}

/// An ordered set of compiled secret patterns sharing a single action.
///
/// Built once at startup and shared read-only across sync cycles. There is
/// no partially valid filter: if any pattern fails to compile, construction
/// fails and the caller has no filter at all.
#[derive(Debug)]
pub struct SecretFilter {
    patterns: Vec<Regex>,
    action: FilterAction,
}

impl SecretFilter {
    /// Compiles `patterns` into a filter with the given action.
    ///
    /// Fails on the first pattern that is not a valid regular expression,
    /// naming the offending pattern in the error.
    pub fn new(patterns: &[String], action: FilterAction) -> Result<Self> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let regex = Regex::new(pattern)
                .with_context(|| format!("invalid filter pattern '{pattern}'"))?;
            compiled.push(regex);
        }

        Ok(SecretFilter {
            patterns: compiled,
            action,
        })
    }

    /// Decides what happens to one history line.
    ///
    /// Patterns are tried in configured order and the first match wins;
    /// later patterns are not evaluated.
    pub fn filter_line(&self, line: &str) -> LineVerdict {
        for regex in &self.patterns {
            if regex.is_match(line) {
                return match self.action {
                    FilterAction::Redact => LineVerdict::Redact,
                    FilterAction::Block => LineVerdict::Block,
                };
            }
        }
        LineVerdict::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unmatched_line_passes_through() {
        let filter = SecretFilter::new(&patterns(&["secret"]), FilterAction::Redact).unwrap();
        assert_eq!(filter.filter_line("ls -la"), LineVerdict::Pass);
    }

    #[test]
    fn test_redact_action() {
        let filter = SecretFilter::new(&patterns(&["password"]), FilterAction::Redact).unwrap();
        assert_eq!(
            filter.filter_line("mysql -u root --password=hunter2"),
            LineVerdict::Redact
        );
    }

    #[test]
    fn test_block_action() {
        let filter = SecretFilter::new(&patterns(&["rm -rf"]), FilterAction::Block).unwrap();
        assert_eq!(filter.filter_line("rm -rf /tmp/x"), LineVerdict::Block);
    }

    #[test]
    fn test_patterns_are_regular_expressions() {
        let filter =
            SecretFilter::new(&patterns(&["(?i)aws_secret"]), FilterAction::Block).unwrap();
        assert_eq!(
            filter.filter_line("export AWS_SECRET_ACCESS_KEY=abc"),
            LineVerdict::Block
        );
    }

    #[test]
    fn test_first_match_wins() {
        // Both patterns match; evaluation must stop at the first one.
        let filter =
            SecretFilter::new(&patterns(&["token", "tok"]), FilterAction::Redact).unwrap();
        assert_eq!(filter.filter_line("export token=abc"), LineVerdict::Redact);
    }

    #[test]
    fn test_invalid_pattern_fails_construction() {
        let result = SecretFilter::new(&patterns(&["valid", "[unclosed"]), FilterAction::Block);
        let err = result.err().expect("construction should fail");
        assert!(err.to_string().contains("[unclosed"));
    }

    #[test]
    fn test_empty_pattern_list_never_matches() {
        let filter = SecretFilter::new(&[], FilterAction::Block).unwrap();
        assert_eq!(filter.filter_line("anything"), LineVerdict::Pass);
    }

    #[test]
    fn test_action_parses_from_config_keyword() {
        let action: FilterAction = serde_yaml::from_str("block").unwrap();
        assert_eq!(action, FilterAction::Block);

        let action: FilterAction = serde_yaml::from_str("redact").unwrap();
        assert_eq!(action, FilterAction::Redact);

        assert!(serde_yaml::from_str::<FilterAction>("purge").is_err());
    }
}
