//! Utility types shared across the application.

mod secret;

pub use secret::SecretString;

use std::fmt::Display;

/// URL query string builder with percent-encoding of values.
///
/// ```ignore
/// let query = QueryBuilder::new().param("account_id", "acct 7").build();
/// assert_eq!(query, "?account_id=acct%207");
/// ```
#[derive(Default)]
pub struct QueryBuilder {
    params: Vec<(String, String)>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: &str, value: impl Display) -> Self {
        self.params.push((
            key.to_string(),
            urlencoding::encode(&value.to_string()).into_owned(),
        ));
        self
    }

    /// `""` when empty, otherwise `?k1=v1&k2=v2`
    pub fn build(self) -> String {
        if self.params.is_empty() {
            return String::new();
        }
        let pairs: Vec<String> = self
            .params
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("?{}", pairs.join("&"))
    }
}
