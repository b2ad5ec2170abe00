#[derive(thiserror::Error, Debug)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Trading pair '{pair}' not found or not available on any exchange.")]
    PairNotFound { pair: String },

    #[error("Insufficient quotes for pair '{pair}'. Required: {required}, Actual: {actual}.")]
    InsufficientQuotes {
        pair: String,
        required: usize,
        actual: usize,
    },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AggregatorError {
    /// Process exit status for the CLI; typed lookup failures get their own codes.
    pub fn exit_code(&self) -> i32 {
        match self {
            AggregatorError::PairNotFound { .. } => 2,
            AggregatorError::InsufficientQuotes { .. } => 3,
            AggregatorError::Config(_) | AggregatorError::Io(_) | AggregatorError::Toml(_) => 4,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_failures_render_pair_and_counts() {
        let err = AggregatorError::InsufficientQuotes {
            pair: "BTC/USDT".to_string(),
            required: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient quotes for pair 'BTC/USDT'. Required: 2, Actual: 1."
        );

        let err = AggregatorError::PairNotFound {
            pair: "FOO/BAR".to_string(),
        };
        assert!(err.to_string().contains("'FOO/BAR'"));
    }

    #[test]
    fn exit_codes_are_distinct_per_kind() {
        let not_found = AggregatorError::PairNotFound {
            pair: "X/Y".to_string(),
        };
        let insufficient = AggregatorError::InsufficientQuotes {
            pair: "X/Y".to_string(),
            required: 2,
            actual: 0,
        };
        let config = AggregatorError::Config("bad".to_string());
        let api = AggregatorError::ApiError("boom".to_string());

        assert_eq!(not_found.exit_code(), 2);
        assert_eq!(insufficient.exit_code(), 3);
        assert_eq!(config.exit_code(), 4);
        assert_eq!(api.exit_code(), 1);
    }
}
