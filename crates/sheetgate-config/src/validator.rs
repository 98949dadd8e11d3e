//! Configuration validation.

use crate::schema::Config;

/// Quota above which range reads are likely to stall the page.
const LARGE_QUOTA_WARNING: u64 = 5_000;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_browser(config, &mut result);
        Self::validate_query(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let browser = &config.browser;

        if browser.url.trim().is_empty() {
            result.add_error(ValidationError::new("browser.url", "URL cannot be empty"));
        } else if !browser.url.starts_with("http://")
            && !browser.url.starts_with("https://")
            && !browser.url.starts_with("file://")
        {
            result.add_warning(ValidationWarning::new(
                "browser.url",
                format!("URL '{}' has no http(s) or file scheme", browser.url),
            ));
        }

        if browser.debug_port == 0 {
            result.add_error(ValidationError::new("browser.debug_port", "Port cannot be 0"));
        }

        if browser.api_global.trim().is_empty() {
            result.add_error(ValidationError::new(
                "browser.api_global",
                "Page-global API name cannot be empty",
            ));
        }

        if browser.ready_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "browser.ready_timeout_ms",
                "Ready timeout must be greater than 0",
            ));
        }

        if browser.ready_poll_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "browser.ready_poll_interval_ms",
                "Poll interval must be greater than 0",
            ));
        } else if browser.ready_poll_interval_ms > browser.ready_timeout_ms {
            result.add_warning(ValidationWarning::new(
                "browser.ready_poll_interval_ms",
                "Poll interval exceeds the ready timeout; readiness is checked once",
            ));
        }

        if browser.command_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "browser.command_timeout_ms",
                "Command timeout must be greater than 0",
            ));
        }

        if browser.viewport_width == 0 || browser.viewport_height == 0 {
            result.add_error(ValidationError::new(
                "browser.viewport",
                "Viewport dimensions must be greater than 0",
            ));
        }
    }

    fn validate_query(config: &Config, result: &mut ValidationResult) {
        let query = &config.query;

        if query.max_cells == 0 {
            result.add_error(ValidationError::new(
                "query.max_cells",
                "Cell quota must be greater than 0",
            ));
        } else if query.max_cells > LARGE_QUOTA_WARNING {
            result.add_warning(ValidationWarning::new(
                "query.max_cells",
                format!(
                    "Cell quota {} is very large; responses may exceed client context limits",
                    query.max_cells
                ),
            ));
        }

        if query.search_max_results == 0 {
            result.add_error(ValidationError::new(
                "query.search_max_results",
                "Search result cap must be greater than 0",
            ));
        }

        if query.search_max_cells == 0 {
            result.add_error(ValidationError::new(
                "query.search_max_cells",
                "Search scan budget must be greater than 0",
            ));
        } else if query.search_max_cells < query.max_cells {
            result.add_warning(ValidationWarning::new(
                "query.search_max_cells",
                "Search scan budget is below the cell quota; searches read one band at most",
            ));
        }

        if query.settle_delay_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "query.settle_delay_ms",
                "Zero settle delay; screenshots may show the grid mid-scroll",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        if config.logging.level.trim().is_empty() {
            result.add_error(ValidationError::new("logging.level", "Log level cannot be empty"));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
