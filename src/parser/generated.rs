// Include build-time validated regex patterns
include!(concat!(env!("OUT_DIR"), "/validated_regexes.rs"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_patterns_exist() {
        assert!(!VALIDATED_PATTERNS.is_empty());

        let pattern_names = VALIDATED_PATTERNS.pattern_names();
        assert!(pattern_names.contains(&"took_latency"));
        assert!(pattern_names.contains(&"health_check_access"));
    }

    #[test]
    fn test_pattern_index_constants() {
        assert_eq!(
            get_pattern_name(pattern_index::TOOK_LATENCY),
            Some("took_latency")
        );
        assert_eq!(
            get_pattern_name(pattern_index::HEALTH_CHECK_ACCESS),
            Some("health_check_access")
        );
        assert_eq!(get_pattern_name(VALIDATED_PATTERNS.len()), None);
    }

    #[test]
    fn test_pattern_compilation() {
        for i in 0..VALIDATED_PATTERNS.len() {
            let result = VALIDATED_PATTERNS.get(i);
            assert!(result.is_ok(), "Pattern at index {i} should compile successfully");
        }
    }
}
