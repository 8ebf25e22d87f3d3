use crate::config::types::{
    Config, DatasetEntry, ExtractionConfig, FoundationsConfig, OutputConfig, ScraperConfig,
    SiteConfig, UserAgentConfig,
};
use crate::url::parse_base_url;
use crate::ConfigError;
use regex::RegexBuilder;
use scraper::Selector;
use url::Url;

/// Smallest pause accepted between requests to the legislature site
const MIN_REQUEST_DELAY_MS: u64 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_scraper_config(&config.scraper)?;
    validate_extraction_config(&config.extraction)?;
    validate_output_config(&config.output)?;
    validate_foundations_config(&config.foundations)?;
    Ok(())
}

/// Validates site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    parse_base_url(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if config.session_label.trim().is_empty() {
        return Err(ConfigError::Validation(
            "session-label cannot be empty".to_string(),
        ));
    }

    if config.session_filter.trim().is_empty() {
        return Err(ConfigError::Validation(
            "session-filter cannot be empty".to_string(),
        ));
    }

    if config.jurisdiction.is_empty()
        || !config
            .jurisdiction
            .chars()
            .all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ConfigError::Validation(format!(
            "jurisdiction must be a non-empty alphanumeric code, got '{}'",
            config.jurisdiction
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates harvest run configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.start_page < 1 {
        return Err(ConfigError::Validation(
            "start-page must be >= 1".to_string(),
        ));
    }

    if config.end_page < config.start_page {
        return Err(ConfigError::Validation(format!(
            "end-page ({}) must not be before start-page ({})",
            config.end_page, config.start_page
        )));
    }

    if config.request_delay_ms < MIN_REQUEST_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "request-delay-ms must be >= {}ms, got {}ms",
            MIN_REQUEST_DELAY_MS, config.request_delay_ms
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates extraction tuning: every selector must parse, every pattern compile
fn validate_extraction_config(config: &ExtractionConfig) -> Result<(), ConfigError> {
    if config.min_text_length == 0 {
        return Err(ConfigError::Validation(
            "min-text-length must be >= 1".to_string(),
        ));
    }

    if config.content_selectors.is_empty() {
        return Err(ConfigError::Validation(
            "content-selectors cannot be empty".to_string(),
        ));
    }

    for selector in &config.content_selectors {
        Selector::parse(selector)
            .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))?;
    }

    for pattern in &config.boilerplate_patterns {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "data-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates dataset helper configuration
fn validate_foundations_config(config: &FoundationsConfig) -> Result<(), ConfigError> {
    if config.output_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "foundations output-dir cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.rows_endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid rows-endpoint: {}", e)))?;

    for dataset in &config.datasets {
        validate_dataset(dataset)?;
    }

    Ok(())
}

/// Validates one dataset entry and its fallbacks
fn validate_dataset(dataset: &DatasetEntry) -> Result<(), ConfigError> {
    if dataset.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "dataset name cannot be empty".to_string(),
        ));
    }

    if dataset.limit == 0 {
        return Err(ConfigError::Validation(format!(
            "dataset '{}' must take at least one row",
            dataset.name
        )));
    }

    if dataset.output_file.is_empty()
        || dataset.output_file.contains('/')
        || dataset.output_file.contains('\\')
    {
        return Err(ConfigError::Validation(format!(
            "dataset '{}' output-file must be a plain file name, got '{}'",
            dataset.name, dataset.output_file
        )));
    }

    for fallback in &dataset.fallbacks {
        validate_dataset(fallback)?;
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
