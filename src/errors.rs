use thiserror::Error;

/// Stage of a provider fetch at which a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    /// Request could not be sent or the transport failed
    Request,
    /// Provider answered with a non-success HTTP status
    Status,
    /// Response body was not the JSON shape we expect
    Decode,
    /// Embedded page payload could not be located or unescaped
    Extract,
    /// A record was missing a field or carried an unparseable one
    Record,
}

impl std::fmt::Display for FetchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FetchStage {
    pub fn display_name(&self) -> &'static str {
        match self {
            FetchStage::Request => "Request",
            FetchStage::Status => "HTTP Status",
            FetchStage::Decode => "Response Decoding",
            FetchStage::Extract => "Page Extraction",
            FetchStage::Record => "Record Validation",
        }
    }

    /// Get actionable suggestion for fixing the issue at this stage
    pub fn suggestion(&self) -> &'static str {
        match self {
            FetchStage::Request => {
                "Understat could not be reached. Check the connection or raise `timeout_secs` in the config."
            }
            FetchStage::Status => {
                "Understat rejected the request. Check the league tag and season, then try again later."
            }
            FetchStage::Decode => {
                "The response shape changed. Try `--page-mode` to scrape the HTML pages instead."
            }
            FetchStage::Extract => {
                "The page no longer embeds the expected data. Try the default API mode."
            }
            FetchStage::Record => {
                "The provider returned an incomplete record. This is usually transient."
            }
        }
    }
}

/// Errors raised by the shot pipeline
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShotError {
    /// Invalid or empty input parameters
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider unreachable, malformed records, or a per-match fetch failure
    #[error("Data source error at {stage} for {target}: {message}")]
    DataSource {
        stage: FetchStage,
        target: String,
        message: String,
    },

    /// Numeric coercion failed during normalization
    #[error("Data format error in row {row}, column {column}: {value:?} is not numeric")]
    DataFormat {
        row: usize,
        column: String,
        value: String,
    },

    /// Writing the output artifact failed
    #[error("IO error: {0}")]
    Io(String),
}

impl ShotError {
    pub fn config(message: impl Into<String>) -> Self {
        ShotError::Configuration(message.into())
    }

    pub fn data_source(stage: FetchStage, target: impl Into<String>, message: impl ToString) -> Self {
        ShotError::DataSource {
            stage,
            target: target.into(),
            message: message.to_string(),
        }
    }

    /// Get detailed diagnostic information about the error
    pub fn diagnostics(&self) -> String {
        match self {
            ShotError::Configuration(message) => {
                format!("Configuration Error\nReason: {}\nSuggestion: Check the league tags and season in config.json or on the command line", message)
            }
            ShotError::DataSource { stage, target, message } => {
                format!(
                    "Data Source Error at {}\nTarget: {}\nError: {}\nSuggestion: {}",
                    stage.display_name(),
                    target,
                    message,
                    stage.suggestion()
                )
            }
            ShotError::DataFormat { row, column, value } => {
                format!("Data Format Error\nRow: {}\nColumn: {}\nValue: {:?}\nSuggestion: The provider emitted a non-numeric coordinate; rerun once the match data is corrected", row, column, value)
            }
            ShotError::Io(message) => {
                format!("IO Error\nError: {}\nSuggestion: Check that the output directory exists and is writable", message)
            }
        }
    }
}

impl From<std::io::Error> for ShotError {
    fn from(err: std::io::Error) -> Self {
        ShotError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_source_display_names_stage() {
        let err = ShotError::data_source(FetchStage::Status, "getMatchData/1", "404 Not Found");
        assert_eq!(
            err.to_string(),
            "Data source error at HTTP Status for getMatchData/1: 404 Not Found"
        );
    }

    #[test]
    fn test_diagnostics_carry_suggestion() {
        let err = ShotError::data_source(FetchStage::Decode, "x", "bad json");
        assert!(err.diagnostics().contains(FetchStage::Decode.suggestion()));
    }
}
