use serde::Deserialize;

/// Main configuration structure for Bill-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub foundations: FoundationsConfig,
}

/// Legislature site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Origin of the legislature website; relative links resolve against it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Session label stamped on every harvested bill, e.g. "194th (2023-2024)"
    #[serde(rename = "session-label")]
    pub session_label: String,

    /// Search refinement label selecting the session, e.g. "194th (Current)"
    #[serde(rename = "session-filter")]
    pub session_filter: String,

    /// Prefix of session-qualified bill identifiers
    #[serde(default = "default_jurisdiction")]
    pub jurisdiction: String,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the harvester
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the harvester
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the harvester
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for harvester-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Harvest run configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// First search-results page to visit (1-based)
    #[serde(rename = "start-page")]
    pub start_page: u32,

    /// Last search-results page to visit (inclusive)
    #[serde(rename = "end-page")]
    pub end_page: u32,

    /// Pause after each listing and detail fetch (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Skip bills that already have a persisted record
    #[serde(rename = "skip-existing", default = "default_true")]
    pub skip_existing: bool,
}

/// Text extraction tuning
///
/// These values are tuned for one site's markup and are kept out of the code.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtractionConfig {
    /// Extracted text must be strictly longer than this to be accepted
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,

    /// Text exports are written only for texts strictly longer than this
    #[serde(default = "default_export_min_length")]
    pub export_min_length: usize,

    /// Content-region selectors tried in order
    #[serde(default = "default_content_selectors")]
    pub content_selectors: Vec<String>,

    /// Case-insensitive patterns removed from extracted text
    #[serde(default = "default_boilerplate_patterns")]
    pub boilerplate_patterns: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_length: default_min_text_length(),
            export_min_length: default_export_min_length(),
            content_selectors: default_content_selectors(),
            boilerplate_patterns: default_boilerplate_patterns(),
        }
    }
}

/// Column positions (0-based) of the search-results table
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListingConfig {
    #[serde(default = "default_number_column")]
    pub number_column: usize,

    #[serde(default = "default_sponsor_column")]
    pub sponsor_column: usize,

    #[serde(default = "default_title_column")]
    pub title_column: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            number_column: default_number_column(),
            sponsor_column: default_sponsor_column(),
            title_column: default_title_column(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root of the harvested data (records, text exports, progress log)
    #[serde(rename = "data-dir")]
    pub data_dir: String,
}

/// Dataset helper configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FoundationsConfig {
    /// Directory the dataset samples and reference documents are written to
    #[serde(default = "default_foundations_dir")]
    pub output_dir: String,

    /// Rows endpoint of the dataset server
    #[serde(default = "default_rows_endpoint")]
    pub rows_endpoint: String,

    #[serde(default = "default_datasets")]
    pub datasets: Vec<DatasetEntry>,
}

impl Default for FoundationsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_foundations_dir(),
            rows_endpoint: default_rows_endpoint(),
            datasets: default_datasets(),
        }
    }
}

/// One dataset slice to download
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DatasetEntry {
    /// Dataset name on the dataset server, e.g. "billsum"
    pub name: String,

    /// Dataset configuration (subset) name
    #[serde(default = "default_dataset_config")]
    pub config: String,

    #[serde(default = "default_split")]
    pub split: String,

    /// Number of leading rows to take
    pub limit: usize,

    pub kind: DatasetKind,

    /// File name written under the output directory
    pub output_file: String,

    /// Alternatives attempted, in order, when this dataset cannot be loaded
    #[serde(default)]
    pub fallbacks: Vec<DatasetEntry>,
}

/// How rows of a dataset are mapped into the written JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetKind {
    /// Congressional bill with text and summary
    BillSummary,
    /// Generic legal document
    LegalDocument,
}

fn default_jurisdiction() -> String {
    "MA".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_min_text_length() -> usize {
    500
}

fn default_export_min_length() -> usize {
    1000
}

fn default_content_selectors() -> Vec<String> {
    [
        ".billDocument",
        ".legislation",
        ".document-content",
        ".billText",
        ".legislation-text",
        "#billText",
        ".content",
        ".main-content",
        ".container",
        "body",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_boilerplate_patterns() -> Vec<String> {
    [
        r"Home\s*›.*?›\s*Bill",
        r"Massachusetts General Court",
        r"Search Bills",
        r"Print this page",
        r"Share this page",
        r"Back to Bill",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_number_column() -> usize {
    1
}

fn default_sponsor_column() -> usize {
    2
}

fn default_title_column() -> usize {
    3
}

fn default_foundations_dir() -> String {
    "data/federal_foundations".to_string()
}

fn default_rows_endpoint() -> String {
    "https://datasets-server.huggingface.co/rows".to_string()
}

fn default_dataset_config() -> String {
    "default".to_string()
}

fn default_split() -> String {
    "train".to_string()
}

fn default_datasets() -> Vec<DatasetEntry> {
    let legal = |name: &str, config: &str, limit: usize, output_file: &str| DatasetEntry {
        name: name.to_string(),
        config: config.to_string(),
        split: default_split(),
        limit,
        kind: DatasetKind::LegalDocument,
        output_file: output_file.to_string(),
        fallbacks: Vec::new(),
    };

    vec![
        DatasetEntry {
            name: "billsum".to_string(),
            config: default_dataset_config(),
            split: default_split(),
            limit: 100,
            kind: DatasetKind::BillSummary,
            output_file: "billsum_congressional.json".to_string(),
            fallbacks: Vec::new(),
        },
        DatasetEntry {
            fallbacks: vec![
                legal("pile-of-law/pile-of-law", "all", 100, "pile_of_law_sample.json"),
                legal(
                    "harvard-lil/legal-corpus",
                    "default",
                    100,
                    "harvard_legal_corpus.json",
                ),
            ],
            ..legal(
                "cornell-legal/legal_corpus",
                "default",
                500,
                "cornell_legal_corpus.json",
            )
        },
    ]
}
