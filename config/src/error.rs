use thiserror::Error;

/// Errors raised while loading or validating a [`crate::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed as TOML.
    #[error("error parsing config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be read from disk.
    #[error("error reading config file: {0}")]
    Io(#[from] std::io::Error),
    /// A set of percentages that must sum to 100 did not (spec §4.6, §6).
    #[error("{branch} reward percentages must sum to 100, got {sum}")]
    PercentagesDoNotSumTo100 {
        /// Which branch failed ("slash" or "keep").
        branch: &'static str,
        /// The sum actually observed.
        sum: u16,
    },
    /// A field outside of its documented valid range.
    #[error("field {field} is out of its valid range")]
    OutOfRange {
        /// Dotted path of the offending field.
        field: &'static str,
    },
}
