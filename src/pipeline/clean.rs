//! Boilerplate cleanup: strip recurring publisher artefacts from extracted text.
//!
//! ## Why is cleanup necessary?
//!
//! Both extraction paths faithfully reproduce things nobody wants in a plain
//! text dump — bare page numbers, copyright lines, database access notices,
//! running headers repeated on every page. These artefacts are *line shaped*:
//! each occupies a line of its own, so removal is a per-line decision and
//! never touches content embedded mid-paragraph.
//!
//! ## Rule model
//!
//! The rule set is an ordered list of independent predicates over a single
//! line: the fixed built-ins first, caller-supplied additions appended after.
//! A line is removed when ANY rule matches — rules are removal-only, so the
//! order carries no precedence and the outcome is order-independent. Every
//! pattern is matched case-insensitively from the start of the
//! whitespace-stripped line.
//!
//! ## Blank-line handling
//!
//! The line pass keeps at most one blank line between kept content and
//! suppresses leading blanks; a trailing trim removes edge blanks; and a
//! final regex pass caps any remaining run of 4+ line breaks at exactly 3.
//! The regex pass is the authoritative cap — the line pass stays naive on
//! purpose. The whole transformation is idempotent.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::error::ExtractError;

/// Built-in removal patterns, common academic/journal boilerplate.
///
/// Each is a fragment anchored at the start of the stripped line at compile
/// time; caller-supplied patterns get identical treatment and equal removal
/// authority.
const BUILT_IN_PATTERNS: [&str; 6] = [
    r"\s*\d{1,3}\s*$",              // standalone page numbers
    r"Copyright\s*[©®]?\s*\d{4}",   // copyright lines with a year
    r"\s*Access\s+provided\s+by",   // library access notices
    r"DOI:\s*10\.",                 // DOI lines
    r"http://muse\.jhu\.edu",       // Project MUSE footer URLs
    r"Published by .* Press",       // publisher imprints
];

static RE_EXCESS_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

/// A compiled rule set for the boilerplate filter.
#[derive(Debug)]
pub struct CleanRules {
    rules: Vec<Regex>,
}

impl CleanRules {
    /// Compile the built-in rules plus caller-supplied additions.
    ///
    /// An invalid caller pattern fails the whole compilation with
    /// [`ExtractError::InvalidConfig`] — better to refuse up front than to
    /// silently skip a rule the caller asked for.
    pub fn new(extra: &[String]) -> Result<Self, ExtractError> {
        let mut rules = Vec::with_capacity(BUILT_IN_PATTERNS.len() + extra.len());
        for pattern in BUILT_IN_PATTERNS
            .iter()
            .copied()
            .chain(extra.iter().map(String::as_str))
        {
            let re = RegexBuilder::new(&format!("^(?:{pattern})"))
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    ExtractError::InvalidConfig(format!("invalid removal pattern '{pattern}': {e}"))
                })?;
            rules.push(re);
        }
        Ok(Self { rules })
    }

    /// True if any rule removes this (already stripped) line.
    fn matches(&self, stripped: &str) -> bool {
        self.rules.iter().any(|re| re.is_match(stripped))
    }

    /// Apply the filter to `text`, returning the cleaned result.
    ///
    /// Non-blank lines that survive are kept verbatim — original interior
    /// spacing included — and never reordered or merged.
    pub fn clean(&self, text: &str) -> String {
        let mut kept: Vec<&str> = Vec::new();

        for line in text.split('\n') {
            let stripped = line.trim();

            // Blank lines: keep a single one between content, drop the rest.
            if stripped.is_empty() {
                if !kept.is_empty() && !kept.last().is_some_and(|last| last.is_empty()) {
                    kept.push("");
                }
                continue;
            }

            if !self.matches(stripped) {
                kept.push(line);
            }
        }

        // Removals can leave a blank line at the end; the front is already
        // clean because leading blanks were never emitted.
        while kept.last().is_some_and(|last| last.is_empty()) {
            kept.pop();
        }

        let joined = kept.join("\n");

        // Authoritative cap on blank runs: 4+ breaks collapse to exactly 3.
        RE_EXCESS_BREAKS.replace_all(&joined, "\n\n\n").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> CleanRules {
        CleanRules::new(&[]).unwrap()
    }

    #[test]
    fn removes_standalone_page_numbers() {
        assert_eq!(rules().clean("intro\n42\noutro"), "intro\noutro");
        assert_eq!(rules().clean("intro\n  7  \noutro"), "intro\noutro");
        // Four digits is no longer a page number.
        assert_eq!(rules().clean("intro\n1984\noutro"), "intro\n1984\noutro");
    }

    #[test]
    fn removes_copyright_lines_case_insensitively() {
        let text = "Title\nCOPYRIGHT © 2021 Example University Press\nBody";
        assert_eq!(rules().clean(text), "Title\nBody");
    }

    #[test]
    fn removes_doi_and_muse_lines() {
        let text = "Body\nDOI: 10.1353/xyz.2020.0001\nhttp://muse.jhu.edu/article/123\nMore";
        assert_eq!(rules().clean(text), "Body\nMore");
    }

    #[test]
    fn removal_requires_line_start() {
        // "Copyright" mid-line must not trigger removal.
        let text = "See the Copyright © 2020 notice above";
        assert_eq!(rules().clean(text), text);
    }

    #[test]
    fn kept_lines_are_verbatim() {
        let text = "  indented   with   spacing  \nnext";
        assert_eq!(rules().clean(text), text);
    }

    #[test]
    fn custom_patterns_have_equal_authority() {
        let rules = CleanRules::new(&["RUNNING HEADER".to_string()]).unwrap();
        let text = "Running Header: Chapter One\nreal text";
        assert_eq!(rules.clean(text), "real text");
    }

    #[test]
    fn invalid_custom_pattern_is_rejected() {
        let err = CleanRules::new(&["(unclosed".to_string()]).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidConfig(_)));
    }

    #[test]
    fn leading_and_trailing_blanks_are_trimmed() {
        assert_eq!(rules().clean("\n\n\nbody\n\n\n"), "body");
    }

    #[test]
    fn blank_runs_cap_at_two_blank_lines() {
        let cleaned = rules().clean("a\n\n\n\n\n\nb");
        assert_eq!(cleaned, "a\n\nb");
        assert!(!cleaned.contains("\n\n\n\n"));
    }

    #[test]
    fn scenario_copyright_and_page_number() {
        // End-to-end filter scenario from the tool's reference behaviour.
        let input = "Page 1\n\nCopyright © 2020 Some Press\nReal content here.\n\n\n\n42\nMore content.";
        assert_eq!(
            rules().clean(input),
            "Page 1\n\nReal content here.\n\nMore content."
        );
    }

    #[test]
    fn cleaning_is_idempotent() {
        let inputs = [
            "Page 1\n\nCopyright © 2020 Some Press\nReal content here.\n\n\n\n42\nMore content.",
            "\n\n\nLeading\n\n\n\nand trailing\n\n",
            "plain\ntext\nwith\n\nbreaks",
        ];
        for input in inputs {
            let once = rules().clean(input);
            let twice = rules().clean(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn preserves_line_order() {
        let text = "alpha\nbeta\n123\ngamma";
        assert_eq!(rules().clean(text), "alpha\nbeta\ngamma");
    }

    #[test]
    fn output_never_starts_or_ends_blank() {
        let cleaned = rules().clean("\n\nAccess provided by Some Library\n\ncontent\n\n99\n\n");
        assert_eq!(cleaned.lines().next(), Some("content"));
        assert!(!cleaned.ends_with('\n'));
    }
}
