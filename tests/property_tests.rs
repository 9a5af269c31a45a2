//! Property-based tests for rust_token_logger using proptest

use proptest::prelude::*;
use rust_token_logger::prelude::*;
use rust_token_logger::{FormatNode, FormatToken, TokenParser};
use std::sync::Arc;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(LogLevel::ALL.to_vec())
}

fn any_token() -> impl Strategy<Value = FormatToken> {
    prop::sample::select(FormatToken::ALL.to_vec())
}

fn formatter(format: &str) -> TokenizedFormatter {
    let config: Arc<dyn LogConfiguration> = Arc::new(DefaultLogConfiguration::default());
    TokenizedFormatter::with_format(config, format)
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Labels parse back to their level, in any case
    #[test]
    fn test_log_level_label_roundtrip(level in any_level(), lower in any::<bool>()) {
        let label = if lower { level.label().to_lowercase() } else { level.label().to_string() };
        let parsed: LogLevel = label.parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Level ordering matches severity ordering
    #[test]
    fn test_log_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a <= b, a.severity() <= b.severity());
        prop_assert_eq!(a.cmp(&b), a.severity().cmp(&b.severity()));
    }

    /// An entry is enabled exactly when its level is at or above the threshold's severity
    #[test]
    fn test_threshold_decision(threshold in any_level(), level in any_level()) {
        let config = DefaultLogConfiguration::new(threshold);
        prop_assert_eq!(
            config.logging_enabled(level, &LogCategory::GENERAL),
            level.severity() <= threshold.severity()
        );
    }
}

// ============================================================================
// Format Tests
// ============================================================================

proptest! {
    /// A format with no token syntax renders unchanged
    #[test]
    fn test_format_without_tokens_is_unchanged(format in "[^(%]{0,64}", message in ".{0,32}") {
        let rendered = formatter(&format).format(&LogEntry::new(LogLevel::Error, &message)).unwrap();
        prop_assert_eq!(rendered, format);
    }

    /// Names outside the token table come through verbatim
    #[test]
    fn test_unknown_tokens_are_verbatim(name in "zz[a-z0-9_]{1,12}", prefix in "[a-z ]{0,10}") {
        let format = format!("{}(%{})", prefix, name);
        let rendered = formatter(&format).format(&LogEntry::new(LogLevel::Warn, "ignored")).unwrap();
        prop_assert_eq!(rendered, format);
    }

    /// Rendering the same entry twice gives the same text
    #[test]
    fn test_rendering_is_deterministic(
        tokens in prop::collection::vec(any_token(), 0..8),
        message in ".{0,32}",
        level in any_level(),
    ) {
        let format: String = tokens.iter().map(|t| format!("{} ", t)).collect();
        let formatter = formatter(&format);
        let entry = LogEntry::new(level, &message).with_location("f", "src/lib.rs", 7);

        prop_assert_eq!(formatter.format(&entry), formatter.format(&entry));
    }

    /// Adjacent tokens compile to adjacent token nodes with no empty text between
    #[test]
    fn test_adjacent_tokens(tokens in prop::collection::vec(any_token(), 1..8)) {
        let format: String = tokens.iter().map(ToString::to_string).collect();
        let compiled = TokenParser::default().compile(&format);

        let expected: Vec<FormatNode> = tokens.into_iter().map(FormatNode::Token).collect();
        prop_assert_eq!(compiled.nodes(), expected.as_slice());
    }

    /// Rendered messages never contain line breaks
    #[test]
    fn test_message_is_single_line(message in "[a-z\r\n ]{0,40}") {
        let rendered = formatter("(%message)").format(&LogEntry::new(LogLevel::Error, &message)).unwrap();
        prop_assert!(!rendered.contains('\n'));
        prop_assert!(!rendered.contains('\r'));
    }
}
