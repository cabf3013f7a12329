use std::fmt::{Debug, Formatter};

use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::errors::ErrorKind;

/// Identity of the caller on whose behalf the AMS is queried.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub user_id: String,
    pub org_id: String,
    /// Access token forwarded to the AMS as the `access` cookie.
    pub token: String,
}

impl Operator {
    pub fn new(user_id: impl Into<String>, org_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            org_id: org_id.into(),
            token: token.into(),
        }
    }

    /// Builds the authentication headers for a request.
    ///
    /// The operator token wins; without one the service-level `authorized_key` is sent as
    /// `Authorization`. With neither the request goes out unauthenticated.
    pub fn auth_headers(&self, authorized_key: Option<&str>) -> Result<HeaderMap, ErrorKind> {
        let mut headers = HeaderMap::new();
        if !self.token.is_empty() {
            let mut cookie = HeaderValue::from_str(&format!("access={}", self.token))?;
            cookie.set_sensitive(true);
            headers.insert(COOKIE, cookie);
        } else if let Some(key) = authorized_key.filter(|key| !key.is_empty()) {
            let mut value = HeaderValue::from_str(key)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

impl Debug for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operator")
            .field("user_id", &self.user_id)
            .field("org_id", &self.org_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_sent_as_access_cookie() {
        let headers = Operator::new("u1", "o1", "tok")
            .auth_headers(Some("service-key"))
            .unwrap();

        assert_eq!(headers.get(COOKIE).unwrap(), "access=tok");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn authorized_key_is_the_fallback() {
        let headers = Operator::new("u1", "o1", "").auth_headers(Some("service-key")).unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "service-key");
        assert!(headers.get(COOKIE).is_none());
        assert!(Operator::default().auth_headers(None).unwrap().is_empty());
    }

    #[test]
    fn invalid_token_is_rejected() {
        let result = Operator::new("u1", "o1", "bad\ntoken").auth_headers(None);

        assert!(matches!(result, Err(ErrorKind::InvalidHeader(_))));
    }

    #[test]
    fn debug_output_hides_token() {
        let rendered = format!("{:?}", Operator::new("u1", "o1", "secret"));

        assert!(rendered.contains("u1"));
        assert!(!rendered.contains("secret"));
    }
}
