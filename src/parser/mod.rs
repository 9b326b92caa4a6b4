pub mod braces;
pub mod decoder;
pub mod error;
pub mod extractor;
pub mod generated;
pub mod literal;
pub mod regex_error;
pub mod regex_patterns;

pub use braces::{BraceScanError, BraceSpan, find_object};
pub use decoder::{LogFormat, MessageDecoder};
pub use error::{DecodeError, MalformedPayloadError};
pub use extractor::PayloadExtractor;
pub use literal::{LiteralError, parse_literal};
pub use regex_error::{FallbackStrategy, RegexError};
pub use regex_patterns::{SimplePatternParser, StaticRegexSet, is_health_check, took_latency};
