//! HTTP response types for the simPRO API client.

use std::collections::HashMap;

use crate::clients::errors::HttpError;

/// Header carrying the total page count of a paginated collection.
pub const RESULT_PAGES_HEADER: &str = "Result-Pages";

/// Header carrying the total item count of a paginated collection.
pub const RESULT_TOTAL_HEADER: &str = "Result-Total";

/// A decoded response from the simPRO API.
///
/// Header names are lowercased on construction so lookups are
/// case-insensitive; a header may carry multiple values.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers, keyed by lowercased name.
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body. A body that is not valid JSON is kept as
    /// a JSON string for diagnostics.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, lowercasing header names.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, values)| (name.to_lowercase(), values))
            .collect();
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }

    /// Returns the first value of the named header, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Parses the `Result-Pages` header.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::PaginationHeaderMissing`] when the header is
    /// absent or not an integer. Paginated responses must carry it; it is
    /// never defaulted.
    pub fn result_pages(&self) -> Result<u32, HttpError> {
        self.integer_header(RESULT_PAGES_HEADER)
    }

    /// Parses the `Result-Total` header.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::PaginationHeaderMissing`] when the header is
    /// absent or not an integer.
    pub fn result_total(&self) -> Result<u64, HttpError> {
        self.integer_header(RESULT_TOTAL_HEADER)
    }

    fn integer_header<N: std::str::FromStr>(&self, name: &'static str) -> Result<N, HttpError> {
        self.header(name)
            .and_then(|value| value.parse().ok())
            .ok_or(HttpError::PaginationHeaderMissing { header: name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers_with(name: &str, value: &str) -> HashMap<String, Vec<String>> {
        let mut headers = HashMap::new();
        headers.insert(name.to_string(), vec![value.to_string()]);
        headers
    }

    #[test]
    fn test_is_ok_for_2xx_only() {
        assert!(HttpResponse::new(200, HashMap::new(), json!([])).is_ok());
        assert!(HttpResponse::new(204, HashMap::new(), json!(null)).is_ok());
        assert!(!HttpResponse::new(304, HashMap::new(), json!(null)).is_ok());
        assert!(!HttpResponse::new(401, HashMap::new(), json!({})).is_ok());
        assert!(!HttpResponse::new(500, HashMap::new(), json!({})).is_ok());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = HttpResponse::new(200, headers_with("Result-Pages", "4"), json!([]));
        assert_eq!(response.header("result-pages"), Some("4"));
        assert_eq!(response.header("Result-Pages"), Some("4"));
    }

    #[test]
    fn test_result_pages_parses_integer() {
        let response = HttpResponse::new(200, headers_with("Result-Pages", "7"), json!([]));
        assert_eq!(response.result_pages().unwrap(), 7);
    }

    #[test]
    fn test_result_pages_missing_is_hard_error() {
        let response = HttpResponse::new(200, HashMap::new(), json!([]));
        assert!(matches!(
            response.result_pages(),
            Err(HttpError::PaginationHeaderMissing {
                header: "Result-Pages"
            })
        ));
    }

    #[test]
    fn test_result_total_rejects_non_integer() {
        let response = HttpResponse::new(200, headers_with("Result-Total", "lots"), json!([]));
        assert!(matches!(
            response.result_total(),
            Err(HttpError::PaginationHeaderMissing {
                header: "Result-Total"
            })
        ));
    }
}
