use std::env;

use reqwest::Url;

use crate::error::ApiError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const API_URL_ENV: &str = "GAPS_API_URL";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// `GAPS_API_URL`, or the local development server.
    #[must_use]
    pub fn from_env() -> Self {
        env::var(API_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map_or_else(Self::default, Self::new)
    }

    /// Base URL with `segments` appended; each segment is percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the base URL cannot be parsed or
    /// cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(self.base_url.trim())
            .map_err(|err| ApiError::InvalidUrl(format!("{}: {err}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_and_encodes() {
        let config = ApiConfig::new("http://localhost:8000/api/");
        assert_eq!(
            config.endpoint(&["questions"]).unwrap().as_str(),
            "http://localhost:8000/api/questions"
        );
        assert_eq!(
            config.endpoint(&["student-detail", "s 1/2"]).unwrap().as_str(),
            "http://localhost:8000/api/student-detail/s%201%2F2"
        );
    }

    #[test]
    fn bad_base_url_is_reported() {
        let config = ApiConfig::new("not a url");
        assert!(matches!(
            config.endpoint(&["questions"]),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
