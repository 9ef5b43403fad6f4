use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Path glob selecting the files to process; `**` recurses.
    pub pattern: String,
    pub keywords: Vec<String>,
    pub include_hidden: bool,
    pub follow_links: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub match_file: PathBuf,
    pub no_match_file: PathBuf,
    pub error_file: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            keywords: Vec::new(),
            include_hidden: false,
            follow_links: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            match_file: PathBuf::from("./pdf_match.txt"),
            no_match_file: PathBuf::from("./pdf_no_match.txt"),
            error_file: PathBuf::from("./errors.txt"),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ScanError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ScanError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ScanError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = [
                    "pdfkeywords.toml",
                    "pdfkeywords.config.toml",
                    ".pdfkeywords.toml",
                ];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref pattern) = cli_args.pattern {
            self.scan.pattern = pattern.clone();
        }

        if let Some(ref keywords) = cli_args.keywords {
            self.scan.keywords = keywords.clone();
        }

        if let Some(ref match_file) = cli_args.match_file {
            self.output.match_file = match_file.clone();
        }

        if let Some(ref no_match_file) = cli_args.no_match_file {
            self.output.no_match_file = no_match_file.clone();
        }

        if let Some(ref error_file) = cli_args.error_file {
            self.output.error_file = error_file.clone();
        }

        if cli_args.include_hidden {
            self.scan.include_hidden = true;
        }

        if cli_args.follow_links {
            self.scan.follow_links = true;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ScanError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| ScanError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    /// Checked before any input file is opened or any report is created.
    pub fn validate(&self) -> Result<()> {
        if self.scan.keywords.is_empty() {
            return Err(ScanError::EmptyKeywords);
        }

        if let Some(index) = self.scan.keywords.iter().position(|k| k.trim().is_empty()) {
            return Err(ScanError::Config {
                message: format!("Keyword #{} is blank", index + 1),
            });
        }

        if self.scan.pattern.trim().is_empty() {
            return Err(ScanError::EmptyPattern);
        }

        let sinks = [
            ("match_file", &self.output.match_file),
            ("no_match_file", &self.output.no_match_file),
            ("error_file", &self.output.error_file),
        ];

        for (name, path) in &sinks {
            if path.as_os_str().is_empty() {
                return Err(ScanError::Config {
                    message: format!("Output path `{}` must not be empty", name),
                });
            }
            if path.is_dir() {
                return Err(ScanError::Config {
                    message: format!("Output path `{}` is a directory: {}", name, path.display()),
                });
            }
        }

        if sinks[0].1 == sinks[1].1 || sinks[0].1 == sinks[2].1 || sinks[1].1 == sinks[2].1 {
            return Err(ScanError::Config {
                message: "Match, no-match and error reports must be distinct files".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let mut sample_config = Self::default();
        sample_config.scan.pattern = "./papers/**/*.pdf".to_string();
        sample_config.scan.keywords = vec!["Rust".to_string(), "C++".to_string()];
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

/// Reads one keyword per line, skipping blank lines and `#` comments.
pub fn load_keywords_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ScanError::Config {
        message: format!("Failed to read keywords file {}: {}", path.display(), e),
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub pattern: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub match_file: Option<PathBuf>,
    pub no_match_file: Option<PathBuf>,
    pub error_file: Option<PathBuf>,
    pub include_hidden: bool,
    pub follow_links: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pattern(mut self, pattern: Option<String>) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_keywords(mut self, keywords: Option<Vec<String>>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_match_file(mut self, path: Option<PathBuf>) -> Self {
        self.match_file = path;
        self
    }

    pub fn with_no_match_file(mut self, path: Option<PathBuf>) -> Self {
        self.no_match_file = path;
        self
    }

    pub fn with_error_file(mut self, path: Option<PathBuf>) -> Self {
        self.error_file = path;
        self
    }

    pub fn with_include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }
}
