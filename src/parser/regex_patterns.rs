// Static regex pattern management for latency phrases and noise lines
use super::generated::{VALIDATED_PATTERNS, pattern_index};
use super::regex_error::{FallbackStrategy, RegexError};
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// Literal fragment of a load balancer health check access line.
pub const HEALTH_CHECK_MARKER: &str = "\"GET / HTTP/1.1\" 200";

/// Lazily compiled static regex pattern set
pub struct StaticRegexSet {
    patterns: &'static [(&'static str, &'static str)], // (pattern, name)
    compiled: OnceLock<Result<Vec<Regex>, RegexError>>,
}

impl StaticRegexSet {
    pub const fn new(patterns: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            patterns,
            compiled: OnceLock::new(),
        }
    }

    pub fn get(&self, index: usize) -> Result<&Regex, RegexError> {
        let compiled = self.compiled.get_or_init(|| {
            let mut regexes = Vec::with_capacity(self.patterns.len());

            for (pattern, name) in self.patterns {
                match Regex::new(pattern) {
                    Ok(regex) => regexes.push(regex),
                    Err(e) => {
                        return Err(RegexError::CompilationFailed {
                            pattern: (*pattern).to_string(),
                            name: (*name).to_string(),
                            source: e,
                        });
                    }
                }
            }

            Ok(regexes)
        });

        match compiled {
            Ok(regexes) => regexes.get(index).ok_or(RegexError::IndexOutOfBounds {
                index,
                max: regexes.len(),
            }),
            Err(e) => Err(e.clone()),
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn pattern_names(&self) -> Vec<&'static str> {
        self.patterns.iter().map(|(_, name)| *name).collect()
    }
}

/// Extract the numeric token of a legacy `Took <value><unit>` phrase.
///
/// The unit suffix is dropped without conversion.
pub fn took_latency(text: &str) -> Option<&str> {
    match VALIDATED_PATTERNS.get(pattern_index::TOOK_LATENCY) {
        Ok(regex) => regex
            .captures(text)
            .and_then(|captures| captures.name("value"))
            .map(|m| m.as_str()),
        Err(e) => match e.fallback_strategy() {
            FallbackStrategy::UseSimpleParser => {
                warn!(error = %e, "latency regex unavailable, using simple parser");
                SimplePatternParser.took_latency(text)
            }
            FallbackStrategy::SkipMatch => None,
        },
    }
}

/// Whether a raw line is a plain HTTP health-check access line.
pub fn is_health_check(line: &str) -> bool {
    match VALIDATED_PATTERNS.get(pattern_index::HEALTH_CHECK_ACCESS) {
        Ok(regex) => regex.is_match(line),
        Err(_) => line.contains(HEALTH_CHECK_MARKER),
    }
}

/// Simple fallback parser for when regex patterns fail
#[derive(Debug, Default, Clone, Copy)]
pub struct SimplePatternParser;

impl SimplePatternParser {
    /// Whitespace-token parse: the token after `Took`, minus trailing unit letters.
    pub fn took_latency<'a>(&self, text: &'a str) -> Option<&'a str> {
        let mut tokens = text.split_whitespace();
        tokens.by_ref().find(|token| *token == "Took")?;
        let token = tokens.next()?;
        let value = token.trim_end_matches(|c: char| c.is_ascii_alphabetic());
        if value.parse::<f64>().is_ok() {
            Some(value)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_regex_set_compilation() {
        static TEST_PATTERNS: StaticRegexSet = StaticRegexSet::new(&[
            (r"Took\s+(\d+)", "took"),
            (r"GRPC Request", "grpc_request"),
        ]);

        for i in 0..TEST_PATTERNS.len() {
            assert!(
                TEST_PATTERNS.get(i).is_ok(),
                "Pattern at index {i} should compile"
            );
        }
        assert_eq!(TEST_PATTERNS.pattern_names(), vec!["took", "grpc_request"]);
    }

    #[test]
    fn test_invalid_regex_compilation() {
        static INVALID_PATTERNS: StaticRegexSet =
            StaticRegexSet::new(&[(r"[invalid regex pattern", "invalid_pattern")]);

        let result = INVALID_PATTERNS.get(0);
        if let Err(RegexError::CompilationFailed { pattern, name, .. }) = result {
            assert_eq!(pattern, "[invalid regex pattern");
            assert_eq!(name, "invalid_pattern");
        } else {
            panic!("Expected CompilationFailed error");
        }
    }

    #[test]
    fn test_took_latency_extracts_value_without_unit() {
        assert_eq!(took_latency(" Took 0.42s"), Some("0.42"));
        assert_eq!(took_latency("GetRoomRate done. Took 12ms"), Some("12"));
        assert_eq!(took_latency("Took 1.5e-3s"), Some("1.5e-3"));
        assert_eq!(took_latency("no timing here"), None);
    }

    #[test]
    fn test_simple_parser_matches_regex_for_common_phrases() {
        let parser = SimplePatternParser;
        assert_eq!(parser.took_latency("Took 0.42s"), Some("0.42"));
        assert_eq!(parser.took_latency("call finished. Took 3s"), Some("3"));
        assert_eq!(parser.took_latency("Took forever"), None);
    }

    #[test]
    fn test_health_check_detection() {
        let health_check = r#"10.0.1.12 - - [01/Jan/2024:00:00:00 +0000] "GET / HTTP/1.1" 200 2 "-" "ELB-HealthChecker/2.0""#;
        assert!(is_health_check(health_check));
        assert!(!is_health_check(r#""GET /rates HTTP/1.1" 200"#));
    }
}
