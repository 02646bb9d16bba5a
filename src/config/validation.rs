use crate::config::types::{
    CategoryEntry, Config, HarvesterConfig, OutputConfig, SiteConfig, UserAgentConfig,
};
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_harvester_config(&config.harvester)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_site_config(&config.site)?;
    validate_categories(&config.category)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates harvester configuration
fn validate_harvester_config(config: &HarvesterConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be between 1 and 10, got {}",
            config.max_attempts
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    for (name, range) in [
        ("politeness_delay_ms", &config.politeness_delay_ms),
        ("retry_backoff_ms", &config.retry_backoff_ms),
    ] {
        if range.min > range.max {
            return Err(ConfigError::Validation(format!(
                "{} min must be <= max, got min={} max={}",
                name, range.min, range.max
            )));
        }
    }

    if config.max_listing_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_listing_pages must be >= 1, got {}",
            config.max_listing_pages
        )));
    }

    // max_details_per_category = 0 is allowed: a listing-only run

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate harvester name: non-empty, alphanumeric + hyphens only
    if config.harvester_name.is_empty() {
        return Err(ConfigError::Validation(
            "harvester_name cannot be empty".to_string(),
        ));
    }

    if !config
        .harvester_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "harvester_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.harvester_name
        )));
    }

    // Validate contact URL
    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    // Validate contact email (basic validation)
    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base_url must use http or https, got '{}'",
            base.scheme()
        )));
    }

    if !config.content_path_prefix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "content_path_prefix must start with '/', got '{}'",
            config.content_path_prefix
        )));
    }

    if config.min_path_segments < 1 {
        return Err(ConfigError::Validation(format!(
            "min_path_segments must be >= 1, got {}",
            config.min_path_segments
        )));
    }

    if config.min_label_len < 1 {
        return Err(ConfigError::Validation(format!(
            "min_label_len must be >= 1, got {}",
            config.min_label_len
        )));
    }

    if config.pagination_param.is_empty()
        || !config.pagination_param.chars().all(|c| c.is_alphanumeric())
    {
        return Err(ConfigError::Validation(format!(
            "pagination_param must be non-empty and alphanumeric, got '{}'",
            config.pagination_param
        )));
    }

    // Regex compilation failures surface at startup, not per page
    Regex::new(&config.title_suffix_pattern).map_err(|e| {
        ConfigError::InvalidPattern(format!(
            "title_suffix_pattern does not compile: {}",
            e
        ))
    })?;

    Ok(())
}

/// Validates category entries
fn validate_categories(categories: &[CategoryEntry]) -> Result<(), ConfigError> {
    if categories.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[category]] entry is required".to_string(),
        ));
    }

    for entry in categories {
        if !entry.path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "category path must start with '/', got '{}'",
                entry.path
            )));
        }

        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' must have a non-empty name",
                entry.path
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
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

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    // Domain part should contain at least one dot
    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
