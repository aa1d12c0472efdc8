//! Whole-word, case-insensitive keyword matching

use crate::error::ScanError;
use regex::{Regex, RegexBuilder};

/// A compiled set of keyword patterns.
///
/// Each pattern is a regular-expression fragment. The set matches a text when
/// at least one pattern occurs as a whole word anywhere in it, ignoring case.
/// `.` also matches line breaks so a pattern can span lines of a page.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    patterns: Vec<String>,
    regex: Option<Regex>,
}

impl KeywordSet {
    /// Compile a set of patterns.
    ///
    /// Duplicates are dropped, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::MalformedPattern` naming the first pattern that
    /// does not compile.
    ///
    /// # Examples
    ///
    /// ```
    /// use claimscan_scanner::KeywordSet;
    ///
    /// let set = KeywordSet::new(["pool", r"hot( |\n|)tub"]).unwrap();
    /// assert!(set.matches("Replace POOL pump"));
    /// assert!(set.matches("hot\ntub cover"));
    /// assert!(!set.matches("carpool receipt"));
    /// ```
    pub fn new<I, S>(patterns: I) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for pattern in patterns {
            let pattern = pattern.into();
            if !unique.contains(&pattern) {
                unique.push(pattern);
            }
        }

        for pattern in &unique {
            build(&whole_word(pattern)).map_err(|source| ScanError::MalformedPattern {
                pattern: pattern.clone(),
                source,
            })?;
        }

        if unique.is_empty() {
            return Ok(Self::empty());
        }

        let combined = unique
            .iter()
            .map(|p| whole_word(p))
            .collect::<Vec<_>>()
            .join("|");
        let regex = build(&combined).map_err(|source| ScanError::MalformedPattern {
            pattern: combined.clone(),
            source,
        })?;

        Ok(Self {
            patterns: unique,
            regex: Some(regex),
        })
    }

    /// A set that never matches
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            regex: None,
        }
    }

    /// Whether at least one pattern occurs in `text` as a whole word
    pub fn matches(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// The patterns in the set
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Number of distinct patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the set has no patterns
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn whole_word(pattern: &str) -> String {
    format!(r"\b(?:{})\b", pattern)
}

fn build(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word_only() {
        let set = KeywordSet::new(["patio"]).unwrap();
        assert!(set.matches("Rear patio pavers"));
        assert!(set.matches("patio."));
        assert!(!set.matches("patios"));
        assert!(!set.matches("impatiomatic"));
    }

    #[test]
    fn test_case_insensitive() {
        let set = KeywordSet::new(["coverage g"]).unwrap();
        assert!(set.matches("COVERAGE G - POOL REPAIR"));
        assert!(!set.matches("coverage general"));
    }

    #[test]
    fn test_pattern_spans_lines() {
        let set = KeywordSet::new([r"shed.*rcv", r"rcv.*shed"]).unwrap();
        assert!(set.matches("Storage shed\nRCV 1,200.00"));
        assert!(set.matches("RCV total\n...\nmetal shed"));
        assert!(!set.matches("shed only"));
    }

    #[test]
    fn test_upper_cabinets_pattern() {
        let set = KeywordSet::new([
            r"(cabinets|cabinetry)[^a-zA-Z]*upper",
            r"upper[^a-zA-Z]*(cabinets|cabinetry)",
        ])
        .unwrap();
        assert!(set.matches("Upper - Cabinets 12 LF"));
        assert!(set.matches("cabinetry (upper)"));
        assert!(!set.matches("lower cabinets"));
    }

    #[test]
    fn test_empty_set_never_matches() {
        let set = KeywordSet::new(Vec::<String>::new()).unwrap();
        assert!(set.is_empty());
        assert!(!set.matches("anything at all"));
        assert!(!KeywordSet::empty().matches(""));
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let set = KeywordSet::new(["pool", "patio", "pool"]).unwrap();
        assert_eq!(set.patterns(), &["pool".to_string(), "patio".to_string()]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_malformed_pattern_is_reported() {
        let err = KeywordSet::new(["pool", "(unclosed"]).unwrap_err();
        match err {
            ScanError::MalformedPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("unexpected error: {}", other),
        }
    }
}
