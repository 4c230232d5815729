//! Canonical request targets.
//!
//! A [`RequestTarget`] is a resource path template plus an optional
//! identifier and query parameters. Resolving it against a
//! [`BaseEndpoint`] yields the fully-qualified URL:
//!
//! ```text
//! {baseEndpoint}/{resourcePath}[/{id}][?{query}]
//! ```
//!
//! Templates may contain a single `{id}` placeholder segment. When the
//! template has no placeholder and an identifier is supplied, the identifier
//! is appended as the last path segment.
//!
//! # Example
//!
//! ```rust
//! use digitalocean_api::BaseEndpoint;
//! use digitalocean_api::clients::RequestTarget;
//!
//! let base = BaseEndpoint::new("https://api.digitalocean.com/v2").unwrap();
//! let target = RequestTarget::new("droplets/{id}/actions")
//!     .with_identifier("42")
//!     .query_param("per_page", "200");
//!
//! let url = target.url(&base).unwrap();
//! assert_eq!(
//!     url.as_str(),
//!     "https://api.digitalocean.com/v2/droplets/42/actions?per_page=200"
//! );
//! ```

use url::Url;

use crate::clients::errors::InvalidHttpRequestError;
use crate::config::BaseEndpoint;

/// Placeholder segment substituted with the identifier.
pub const ID_PLACEHOLDER: &str = "{id}";

/// A resource path, identifier and query parameters for one request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestTarget {
    template: String,
    identifier: Option<String>,
    query: Vec<(String, String)>,
}

impl RequestTarget {
    /// Creates a target for the given path template.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            identifier: None,
            query: Vec::new(),
        }
    }

    /// Sets the resource identifier.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Sets an optional resource identifier.
    #[must_use]
    pub fn with_optional_identifier(mut self, identifier: Option<impl Into<String>>) -> Self {
        self.identifier = identifier.map(Into::into);
        self
    }

    /// Adds a single query parameter, replacing any previous value for `key`.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_query_param(key, value);
        self
    }

    /// Merges query parameters, replacing previous values for the same keys.
    #[must_use]
    pub fn with_query<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in params {
            self.set_query_param(key, value);
        }
        self
    }

    /// Sets a query parameter in place, replacing any previous value for `key`.
    pub fn set_query_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(existing) = self.query.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = value;
        } else {
            self.query.push((key, value));
        }
    }

    /// Returns the path template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the identifier, if any.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Returns the query parameters in insertion order.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Returns the value of one query parameter.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.template.split('/').filter(|s| !s.trim().is_empty())
    }

    /// Resolves the template into a relative path without leading slash.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::EmptyPath`] for an empty template and
    /// [`InvalidHttpRequestError::MissingIdentifier`] when the template has an
    /// `{id}` placeholder but no identifier was supplied.
    pub fn resolved_path(&self) -> Result<String, InvalidHttpRequestError> {
        let mut parts: Vec<String> = Vec::new();
        let mut substituted = false;

        for segment in self.segments() {
            if segment == ID_PLACEHOLDER {
                let id = self
                    .identifier
                    .as_deref()
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| InvalidHttpRequestError::MissingIdentifier {
                        template: self.template.clone(),
                    })?;
                parts.push(urlencoding::encode(id).into_owned());
                substituted = true;
            } else {
                parts.push(segment.to_string());
            }
        }

        if parts.is_empty() {
            return Err(InvalidHttpRequestError::EmptyPath);
        }

        if !substituted {
            if let Some(id) = self.identifier.as_deref().filter(|id| !id.is_empty()) {
                parts.push(urlencoding::encode(id).into_owned());
            }
        }

        Ok(parts.join("/"))
    }

    /// Returns the resource path used in request signatures: a leading slash
    /// followed by the template with its identifier placeholder removed.
    #[must_use]
    pub fn signing_path(&self) -> String {
        let path: Vec<&str> = self.segments().filter(|s| *s != ID_PLACEHOLDER).collect();
        format!("/{}", path.join("/"))
    }

    /// Builds the fully-qualified URL against `base`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the path cannot be resolved or
    /// the joined URL does not parse.
    pub fn url(&self, base: &BaseEndpoint) -> Result<Url, InvalidHttpRequestError> {
        let path = self.resolved_path()?;
        let joined = format!("{}/{path}", base.as_ref());
        let mut url = Url::parse(&joined).map_err(|e| InvalidHttpRequestError::InvalidUrl {
            url: joined.clone(),
            reason: e.to_string(),
        })?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BaseEndpoint {
        BaseEndpoint::new("https://api.example.com/v2/").unwrap()
    }

    #[test]
    fn test_substitutes_placeholder() {
        let target = RequestTarget::new("droplets/{id}").with_identifier("7");
        assert_eq!(target.resolved_path().unwrap(), "droplets/7");
    }

    #[test]
    fn test_appends_identifier_without_placeholder() {
        let target = RequestTarget::new("/account/keys/").with_identifier("512");
        assert_eq!(target.resolved_path().unwrap(), "account/keys/512");
    }

    #[test]
    fn test_collapses_duplicate_slashes() {
        let target = RequestTarget::new("//droplets//{id}///actions").with_identifier("9");
        let url = target.url(&base()).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v2/droplets/9/actions");
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let result = RequestTarget::new(" / ").resolved_path();
        assert_eq!(result, Err(InvalidHttpRequestError::EmptyPath));
    }

    #[test]
    fn test_missing_identifier_is_rejected() {
        let result = RequestTarget::new("images/{id}").resolved_path();
        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::MissingIdentifier { template }) if template == "images/{id}"
        ));
    }

    #[test]
    fn test_identifier_is_percent_encoded() {
        let target = RequestTarget::new("images/{id}").with_identifier("ubuntu 24/04");
        assert_eq!(
            target.resolved_path().unwrap(),
            "images/ubuntu%2024%2F04"
        );
    }

    #[test]
    fn test_query_is_encoded_and_not_duplicated() {
        let target = RequestTarget::new("droplets")
            .query_param("tag_name", "web & api")
            .query_param("page", "1")
            .query_param("page", "2");

        assert_eq!(target.query().len(), 2);
        assert_eq!(target.query_value("page"), Some("2"));

        let url = target.url(&base()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v2/droplets?tag_name=web+%26+api&page=2"
        );
    }

    #[test]
    fn test_signing_path_drops_placeholder() {
        let target = RequestTarget::new("droplets/{id}/actions").with_identifier("1");
        assert_eq!(target.signing_path(), "/droplets/actions");
        assert_eq!(RequestTarget::new("regions").signing_path(), "/regions");
    }
}
