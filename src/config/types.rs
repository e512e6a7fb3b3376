use serde::Deserialize;
use std::path::PathBuf;

/// Worker count used when neither the config file nor the CLI sets one
pub const DEFAULT_WORKERS: usize = 6;

/// Status patterns accepted when `successStatusCodes` is not configured:
/// any 2xx response, plus 403 which usually means a bot block rather than
/// a broken link
pub const DEFAULT_SUCCESS_STATUS_CODES: &[&str] = &["2xx", "403"];

/// Main configuration structure
///
/// Field names follow the `validationConfig.json` layout (camelCase). Every
/// worker receives its own clone; nothing mutates it after loading.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the site; `/sitemap.xml` is fetched from here and
    /// relative links are resolved against it
    #[serde(alias = "url")]
    pub site_url: String,

    /// Number of parallel workers
    #[serde(alias = "workerCount")]
    pub workers: usize,

    /// Status patterns (`200`, `2xx`, `40x`, ...) that count as a pass
    pub success_status_codes: Vec<String>,

    /// Ignore patterns (`exact`, `*suffix`, `prefix*`, `*contains*`)
    pub ignore_urls: Vec<String>,

    /// Optional report file (`.md` or `.csv`) listing broken links
    pub report: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: String::new(),
            workers: DEFAULT_WORKERS,
            success_status_codes: DEFAULT_SUCCESS_STATUS_CODES
                .iter()
                .map(|code| code.to_string())
                .collect(),
            ignore_urls: Vec::new(),
            report: None,
        }
    }
}

/// Values supplied on the command line, applied on top of the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub site_url: Option<String>,
    pub workers: Option<usize>,
    pub success_status_codes: Option<Vec<String>>,
    pub ignore_urls: Option<Vec<String>>,
    pub report: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Applies every override that is set, leaving the rest untouched
    pub fn apply(self, config: &mut Config) {
        if let Some(site_url) = self.site_url {
            config.site_url = site_url;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(codes) = self.success_status_codes {
            config.success_status_codes = codes;
        }
        if let Some(ignore_urls) = self.ignore_urls {
            config.ignore_urls = ignore_urls;
        }
        if let Some(report) = self.report {
            config.report = Some(report);
        }
    }
}
