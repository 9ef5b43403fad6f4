use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("No keywords configured")]
    EmptyKeywords,

    #[error("No input path pattern configured")]
    EmptyPattern,

    #[error("Invalid path pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Failed to write report {path}: {source}")]
    ReportWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Configuration problems are detected before any file is opened.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ScanError::Config { .. }
                | ScanError::EmptyKeywords
                | ScanError::EmptyPattern
                | ScanError::InvalidPattern { .. }
        )
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ScanError {
    fn user_message(&self) -> String {
        match self {
            ScanError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ScanError::EmptyKeywords => "Please enter keywords in list".to_string(),
            ScanError::EmptyPattern => {
                "Please enter directory of files to parse".to_string()
            }
            ScanError::InvalidPattern { pattern, message } => {
                format!("Invalid path pattern '{}': {}", pattern, message)
            }
            ScanError::ReportWrite { path, source } => {
                format!("Could not write report file {}: {}", path, source)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ScanError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            ScanError::EmptyKeywords => Some(
                "Pass keywords with --keywords (e.g., --keywords rust,cargo), --keywords-file, or set `keywords` under [scan] in the configuration file.".to_string()
            ),
            ScanError::EmptyPattern => Some(
                "Pass a path pattern as the first argument (e.g., \"papers/**/*.pdf\") or set `pattern` under [scan] in the configuration file.".to_string()
            ),
            ScanError::InvalidPattern { .. } => Some(
                "Supported wildcards are *, ?, [abc], [!abc] and ** as a whole path component.".to_string()
            ),
            ScanError::ReportWrite { .. } => Some(
                "Ensure the report files are writable, or choose other locations with --match-file, --no-match-file and --error-file.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ScanError {
    fn from(error: toml::de::Error) -> Self {
        ScanError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
