use crate::config::types::DEFAULT_SUCCESS_STATUS_CODES;
use crate::ConfigError;

/// A single status pattern such as `200`, `2xx` or `40x`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StatusPattern([Option<u8>; 3]);

impl StatusPattern {
    fn parse(pattern: &str) -> Result<Self, ConfigError> {
        let trimmed = pattern.trim();
        let bytes = trimmed.as_bytes();

        if bytes.len() != 3 {
            return Err(ConfigError::InvalidPattern(format!(
                "Status pattern '{}' must be exactly three characters",
                pattern
            )));
        }

        let mut digits = [None; 3];
        for (slot, byte) in digits.iter_mut().zip(bytes.iter().copied()) {
            *slot = match byte {
                b'0'..=b'9' => Some(byte - b'0'),
                b'x' | b'X' => None,
                _ => {
                    return Err(ConfigError::InvalidPattern(format!(
                        "Status pattern '{}' may only contain digits and 'x'",
                        pattern
                    )))
                }
            };
        }

        if digits[0] == Some(0) {
            return Err(ConfigError::InvalidPattern(format!(
                "Status pattern '{}' does not describe an HTTP status",
                pattern
            )));
        }

        Ok(Self(digits))
    }

    fn matches(&self, status: u16) -> bool {
        if !(100..=999).contains(&status) {
            return false;
        }

        let actual = [
            (status / 100) as u8,
            ((status / 10) % 10) as u8,
            (status % 10) as u8,
        ];

        self.0
            .iter()
            .zip(actual)
            .all(|(expected, digit)| expected.map_or(true, |e| e == digit))
    }
}

/// Decides which HTTP statuses count as a passing link
///
/// Built from `successStatusCodes`; an empty list falls back to the default
/// rule of any 2xx response or 403.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMatcher {
    patterns: Vec<StatusPattern>,
}

impl StatusMatcher {
    /// Parses the configured patterns
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_link_validator::config::StatusMatcher;
    ///
    /// let matcher = StatusMatcher::new(&["2xx".to_string(), "301".to_string()]).unwrap();
    /// assert!(matcher.is_success(204));
    /// assert!(matcher.is_success(301));
    /// assert!(!matcher.is_success(302));
    /// ```
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let raw: Vec<&str> = if patterns.is_empty() {
            DEFAULT_SUCCESS_STATUS_CODES.to_vec()
        } else {
            patterns.iter().map(String::as_str).collect()
        };

        let patterns = raw
            .into_iter()
            .map(StatusPattern::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Returns true if `status` matches any configured pattern
    pub fn is_success(&self, status: u16) -> bool {
        self.patterns.iter().any(|p| p.matches(status))
    }
}

impl Default for StatusMatcher {
    fn default() -> Self {
        Self {
            patterns: vec![
                StatusPattern([Some(2), None, None]),
                StatusPattern([Some(4), Some(0), Some(3)]),
            ],
        }
    }
}
