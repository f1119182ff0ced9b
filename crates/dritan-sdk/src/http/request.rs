/*
[INPUT]:  Base URLs, path templates, query parameters and JSON bodies
[OUTPUT]: Absolute URLs and transport-agnostic HttpRequest values
[POS]:    HTTP layer - request construction shared by all clients
[UPDATE]: When changing URL joining, query encoding or request shape
*/

use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::http::endpoint::Endpoint;
use crate::http::{DritanError, Result};

/// Join a base URL and a path with exactly one separating slash
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Ordered query parameters; absent values are never serialized
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair, keeping any existing pairs with the same key
    pub fn append(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// Replace the first pair with this key (dropping later duplicates) or append
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter().position(|(k, _)| *k == key) {
            Some(index) => {
                self.pairs[index].1 = value;
                let mut seen = 0usize;
                self.pairs.retain(|(k, _)| {
                    if *k != key {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// `set` when the value is present, no-op otherwise
    pub fn set_opt<V: ToString>(&mut self, key: impl Into<String>, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.set(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Append every pair to the URL query string
    pub fn append_to(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        url.query_pairs_mut().extend_pairs(self.iter());
    }

    /// Merge into the URL with `set` semantics for each key
    pub fn merge_into(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        let mut merged: QueryParams = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), Some(v.into_owned())))
            .collect();
        for (key, value) in self.iter() {
            merged.set(key, value);
        }
        url.set_query(None);
        merged.append_to(url);
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for QueryParams
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            if let Some(value) = value {
                params.append(key, value);
            }
        }
        params
    }
}

/// Fill an endpoint path template under `base`, percent-encoding each parameter
pub fn endpoint_url(base: &str, endpoint: Endpoint, params: &[&str]) -> Result<Url> {
    let expected = endpoint.path_param_count();
    if params.len() != expected {
        return Err(DritanError::Config(format!(
            "{endpoint} expects {expected} path parameters, got {}",
            params.len()
        )));
    }

    let mut url = Url::parse(&join_url(base, ""))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| DritanError::Config(format!("base URL cannot carry a path: {base}")))?;
        segments.pop_if_empty();
        let mut values = params.iter();
        for part in endpoint.path_template().split('/').filter(|s| !s.is_empty()) {
            if part.starts_with('{') {
                // count checked above
                if let Some(value) = values.next() {
                    segments.push(value);
                }
            } else {
                segments.push(part);
            }
        }
    }
    Ok(url)
}

/// Reject empty or whitespace-only identifiers before any request is made
pub(crate) fn require_non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(DritanError::Validation(format!("{field} is required")));
    }
    Ok(value)
}

/// Transport-agnostic HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, params: &QueryParams) -> Self {
        params.append_to(&mut self.url);
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self.header("content-type", "application/json"))
    }

    /// Case-insensitive header lookup
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
