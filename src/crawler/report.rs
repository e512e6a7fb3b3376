//! Result types produced by workers and the coordinator

/// Status reported for a failure that produced no HTTP response
pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// A URL that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UrlError {
    /// The page on which the link was found (the page itself for sitemap
    /// entries)
    pub page: String,

    /// The URL that failed
    pub url: String,

    /// HTTP status, when a response was received
    pub status: Option<u16>,

    /// Status text or error description
    pub reason: Option<String>,
}

impl UrlError {
    /// The status to display, falling back to a generic server error
    pub fn display_status(&self) -> u16 {
        self.status.unwrap_or(DEFAULT_ERROR_STATUS)
    }
}

/// What a single worker reports once its shard is done
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerResult {
    pub errors: Vec<UrlError>,
    pub passed: usize,
}

/// Aggregated outcome of a full run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Pages resolved from the sitemap
    pub pages: usize,

    /// Every failure from every worker
    pub errors: Vec<UrlError>,

    /// Total passing URLs across workers
    pub passed: usize,
}

impl RunReport {
    /// Folds one worker's result into the report
    pub fn absorb(&mut self, result: WorkerResult) {
        self.errors.extend(result.errors);
        self.passed += result.passed;
    }

    /// Number of URLs that were requested or rejected
    pub fn validated(&self) -> usize {
        self.passed + self.errors.len()
    }

    /// True when no errors were recorded
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Process exit status: 0 when everything passed, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(url: &str, status: Option<u16>) -> UrlError {
        UrlError {
            page: "https://example.com/".to_string(),
            url: url.to_string(),
            status,
            reason: None,
        }
    }

    #[test]
    fn test_absorb_and_exit_code() {
        let mut report = RunReport {
            pages: 4,
            ..RunReport::default()
        };
        assert_eq!(report.exit_code(), 0);

        report.absorb(WorkerResult {
            errors: vec![],
            passed: 2,
        });
        assert_eq!(report.exit_code(), 0);

        report.absorb(WorkerResult {
            errors: vec![error("https://example.com/gone", Some(404))],
            passed: 1,
        });

        assert_eq!(report.passed, 3);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.validated(), 4);
        assert!(!report.is_success());
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_display_status_defaults_to_500() {
        assert_eq!(error("https://a/", Some(404)).display_status(), 404);
        assert_eq!(error("https://a/", None).display_status(), 500);
    }
}
