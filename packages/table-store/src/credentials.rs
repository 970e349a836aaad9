//! Project key handling.
//!
//! PostgREST expects the project key twice on every request: in the
//! `apikey` header and as a bearer token. [`AccessToken`] keeps the key in
//! a [`SecretString`] and only hands it out as header values marked
//! sensitive, so it stays out of logs and debug output.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};

use crate::error::{Result, StoreError};

const APIKEY: HeaderName = HeaderName::from_static("apikey");

/// A validated project key.
#[derive(Clone, Debug)]
pub struct AccessToken(SecretString);

impl AccessToken {
    /// Accept a project key. Blank keys and keys that cannot travel in an
    /// HTTP header are rejected here rather than on the first request.
    pub fn parse(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let key = key.trim();
        if key.is_empty() {
            return Err(StoreError::Config("access token is empty".into()));
        }

        let token = Self(SecretString::from(key));
        token.headers()?;
        Ok(token)
    }

    /// The `apikey` and `Authorization` headers for one request.
    pub fn headers(&self) -> Result<HeaderMap> {
        let key = self.0.expose_secret();
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(APIKEY, sensitive(key)?);
        headers.insert(AUTHORIZATION, sensitive(&format!("Bearer {key}"))?);
        Ok(headers)
    }
}

fn sensitive(value: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value).map_err(|_| {
        StoreError::Config("access token contains characters not allowed in a header".into())
    })?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_carry_the_key_twice() {
        let token = AccessToken::parse(" eyJ-key ").unwrap();
        let headers = token.headers().unwrap();

        assert_eq!(headers["apikey"], "eyJ-key");
        assert_eq!(headers[AUTHORIZATION], "Bearer eyJ-key");
        assert!(headers.values().all(HeaderValue::is_sensitive));
    }

    #[test]
    fn test_key_stays_out_of_debug_output() {
        let token = AccessToken::parse("eyJ-very-secret").unwrap();
        assert!(!format!("{token:?}").contains("eyJ-very-secret"));
        assert!(!format!("{:?}", token.headers().unwrap()).contains("eyJ-very-secret"));
    }

    #[test]
    fn test_rejects_unusable_keys() {
        assert!(matches!(AccessToken::parse("  "), Err(StoreError::Config(_))));
        assert!(matches!(
            AccessToken::parse("key\nwith-newline"),
            Err(StoreError::Config(_))
        ));
    }
}
