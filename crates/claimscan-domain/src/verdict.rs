//! Reply contract of a classification call
//!
//! The classifier is instructed to answer either `NONE` or `YES:` followed by
//! a short justification. Anything else is a malformed reply: it is not
//! evidence of compliance and must not be read as `NoViolation`.

/// Marker that opens a violation reply
pub const YES_DELIMITER: &str = "YES:";

/// Marker of a compliant reply
pub const NONE_MARKER: &str = "NONE";

/// Parsed outcome of one classification call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The page does not claim any of the checked items
    NoViolation,

    /// The page claims a checked item; carries the justification
    Violation(String),
}

impl Verdict {
    /// Parse a raw model reply.
    ///
    /// Leading whitespace and quoting characters are ignored. For a `YES:`
    /// reply the reason is the text after the last delimiter, trimmed.
    ///
    /// # Examples
    ///
    /// ```
    /// use claimscan_domain::Verdict;
    ///
    /// assert_eq!(Verdict::parse("NONE").unwrap(), Verdict::NoViolation);
    /// assert_eq!(
    ///     Verdict::parse("YES: Page 2 claims a pool heater.").unwrap(),
    ///     Verdict::Violation("Page 2 claims a pool heater.".to_string())
    /// );
    /// assert!(Verdict::parse("I am not sure").is_err());
    /// ```
    pub fn parse(reply: &str) -> Result<Self, String> {
        let trimmed = reply.trim_start_matches(|c: char| c.is_whitespace() || is_quote(c));

        if trimmed.starts_with(YES_DELIMITER) {
            let reason = trimmed
                .rsplit(YES_DELIMITER)
                .next()
                .unwrap_or_default()
                .trim_matches(|c: char| c.is_whitespace() || is_quote(c));

            if reason.is_empty() {
                return Err("violation reply carries no reason".to_string());
            }
            return Ok(Verdict::Violation(reason.to_string()));
        }

        if is_none_marker(trimmed) {
            return Ok(Verdict::NoViolation);
        }

        Err(format!("unrecognized reply: {}", preview(reply)))
    }

    /// The justification, if this is a violation
    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::NoViolation => None,
            Verdict::Violation(reason) => Some(reason),
        }
    }

    /// Convert into the optional reason
    pub fn into_reason(self) -> Option<String> {
        match self {
            Verdict::NoViolation => None,
            Verdict::Violation(reason) => Some(reason),
        }
    }
}

/// `NONE` in any case, as a whole word
fn is_none_marker(text: &str) -> bool {
    let Some(head) = text.get(..NONE_MARKER.len()) else {
        return false;
    };
    let rest = &text[NONE_MARKER.len()..];
    head.eq_ignore_ascii_case(NONE_MARKER) && !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_')
}

fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '"' | '`')
}

fn preview(reply: &str) -> String {
    const MAX: usize = 80;
    let flat = reply.trim().replace('\n', " ");
    if flat.chars().count() <= MAX {
        return flat;
    }
    let cut: String = flat.chars().take(MAX).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_variants() {
        assert_eq!(Verdict::parse("NONE").unwrap(), Verdict::NoViolation);
        assert_eq!(Verdict::parse("  none.").unwrap(), Verdict::NoViolation);
        assert_eq!(Verdict::parse("'NONE'").unwrap(), Verdict::NoViolation);
        assert_eq!(Verdict::parse("NONE: nothing relevant").unwrap(), Verdict::NoViolation);
        assert_eq!(Verdict::parse("None\n").unwrap(), Verdict::NoViolation);
    }

    #[test]
    fn test_violation_reason_is_trimmed() {
        let verdict = Verdict::parse("YES:   The page claims a patio.  \n").unwrap();
        assert_eq!(verdict.reason(), Some("The page claims a patio."));
    }

    #[test]
    fn test_violation_uses_text_after_last_delimiter() {
        let verdict = Verdict::parse("YES: first YES: second").unwrap();
        assert_eq!(verdict.into_reason(), Some("second".to_string()));
    }

    #[test]
    fn test_empty_reason_is_malformed() {
        assert!(Verdict::parse("YES:").is_err());
        assert!(Verdict::parse("YES:   ").is_err());
    }

    #[test]
    fn test_unrecognized_reply_is_malformed() {
        assert!(Verdict::parse("").is_err());
        assert!(Verdict::parse("Maybe, the page mentions a pool").is_err());
        // lowercase delimiter is not the contract
        assert!(Verdict::parse("yes: pool").is_err());
        // NONE must stand alone
        assert!(Verdict::parse("Nonetheless, the page claims a pool heater for 1,200 RCV.").is_err());
        assert!(Verdict::parse("NONEXISTENT format").is_err());
        assert!(Verdict::parse("none_found").is_err());
        assert!(Verdict::parse("Noné").is_err());
    }

    #[test]
    fn test_long_reply_preview_is_truncated() {
        let err = Verdict::parse(&"x".repeat(500)).unwrap_err();
        assert!(err.ends_with("..."));
        assert!(err.len() < 120);
    }
}
