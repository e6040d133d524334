use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default model for inline per-line review; overridable via OPENAI_MODEL.
const DEFAULT_INLINE_MODEL: &str = "gpt-4o";
/// Cheaper fixed model for the one-shot architectural summary.
const SUMMARY_MODEL: &str = "gpt-4o-mini";

const DEFAULT_MAX_COMMENTS_PER_FILE: usize = 5;
const DEFAULT_API_DELAY_SECS: f64 = 2.0;

/// Built-in filename patterns excluded from review: binaries, generated
/// files and everything else a line-by-line reviewer has no business in.
/// Matched as substrings against the full path.
const EXCLUDE_PATTERNS: &[&str] = &[
    // Xcode project files
    ".xcodeproj", ".xcworkspace", ".xcassets", ".pbxproj", ".xcuserstate",
    ".xcscheme", ".xcbkptlist", ".xcscmblueprint", ".xccheckout",
    // Interface Builder files
    ".storyboard", ".xib", ".nib",
    // Configuration and metadata
    ".plist", ".entitlements", ".mobileprovision", ".p12", ".cer",
    // Package management
    ".lock", "Package.resolved", "Package.pins",
    // Media files
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".pdf", ".ico", ".icns",
    ".mp3", ".mp4", ".m4v", ".mov", ".wav", ".aiff",
    // Documentation and text files
    ".md", ".txt", ".rtf",
    // Data files
    ".json", ".yaml", ".yml", ".xml", ".csv", ".sqlite", ".db",
    // Generated files
    "Generated", "Derived", "DerivedData", ".derived",
    "xcuserdata", "UserInterfaceState.xcuserstate",
    // Archive and compressed files
    ".zip", ".tar", ".gz", ".rar", ".7z",
    // Editor droppings
    ".swp", ".tmp", "~", ".bak",
    // Frameworks and libraries
    ".framework", ".dylib", ".a",
    // Build artifacts
    ".ipa", ".app", ".dSYM",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("GITHUB_REPOSITORY must be \"owner/repo\", got: {0}")]
    InvalidRepository(String),

    #[error("PR_NUMBER is not a valid number: {0}")]
    InvalidPrNumber(String),
}

/// Optional settings read from .swift-reviewer.toml. Secrets and PR
/// coordinates always come from the environment; the file only tunes
/// review knobs and the inline model.
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    openai: FileOpenAi,
    #[serde(default)]
    review: FileReview,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FileOpenAi {
    inline_model: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FileReview {
    max_comments_per_file: Option<usize>,
    api_delay_secs: Option<f64>,
    #[serde(default)]
    exclude: Vec<String>,
}

/// Resolved runtime configuration, built once at startup and passed into
/// each component. All required values are validated before any network call.
#[derive(Debug, Clone)]
pub struct Config {
    pub github: GithubSettings,
    pub openai: OpenAiSettings,
    pub review: ReviewSettings,
}

#[derive(Debug, Clone)]
pub struct GithubSettings {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
    pub commit_sha: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub inline_model: String,
    pub summary_model: String,
}

#[derive(Debug, Clone)]
pub struct ReviewSettings {
    pub max_comments_per_file: usize,
    pub api_delay: Duration,
    extra_exclude: Vec<String>,
}

impl ReviewSettings {
    /// Whether a changed file is excluded from review by the built-in or
    /// configured patterns.
    pub fn is_excluded(&self, filename: &str) -> bool {
        EXCLUDE_PATTERNS.iter().any(|p| filename.contains(p))
            || self.extra_exclude.iter().any(|p| filename.contains(p.as_str()))
    }

    #[cfg(test)]
    pub fn for_tests(max_comments_per_file: usize) -> Self {
        Self {
            max_comments_per_file,
            api_delay: Duration::ZERO,
            extra_exclude: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration: optional TOML file first, then required values
    /// from the environment. Missing env vars are fatal.
    pub fn load(config_path: Option<&Path>) -> Result<Config, ConfigError> {
        let default_path = Path::new(".swift-reviewer.toml");
        let file = match config_path {
            Some(path) => Self::read_file(path)?,
            None if default_path.exists() => Self::read_file(default_path)?,
            None => FileConfig::default(),
        };
        Self::resolve(file)
    }

    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    fn resolve(file: FileConfig) -> Result<Config, ConfigError> {
        let repository = require_env("GITHUB_REPOSITORY")?;
        let (owner, repo) = repository
            .split_once('/')
            .filter(|(o, r)| !o.is_empty() && !r.is_empty())
            .ok_or_else(|| ConfigError::InvalidRepository(repository.clone()))?;

        let pr_number = require_env("PR_NUMBER")?;
        let pr_number = pr_number
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidPrNumber(pr_number.clone()))?;

        let inline_model = std::env::var("OPENAI_MODEL")
            .ok()
            .filter(|v| !v.is_empty())
            .or(file.openai.inline_model)
            .unwrap_or_else(|| DEFAULT_INLINE_MODEL.to_string());

        Ok(Config {
            github: GithubSettings {
                token: require_env("GITHUB_TOKEN")?,
                owner: owner.to_string(),
                repo: repo.to_string(),
                pr_number,
                commit_sha: require_env("PR_HEAD_SHA")?,
            },
            openai: OpenAiSettings {
                api_key: require_env("OPENAI_API_KEY")?,
                inline_model,
                summary_model: SUMMARY_MODEL.to_string(),
            },
            review: ReviewSettings {
                max_comments_per_file: file
                    .review
                    .max_comments_per_file
                    .unwrap_or(DEFAULT_MAX_COMMENTS_PER_FILE),
                api_delay: Duration::from_secs_f64(
                    file.review.api_delay_secs.unwrap_or(DEFAULT_API_DELAY_SECS),
                ),
                extra_exclude: file.review.exclude,
            },
        })
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}
