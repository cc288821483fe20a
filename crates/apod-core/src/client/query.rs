//! Request target construction.

use url::Url;

/// Query parameters for one request, in insertion order. Absent values are
/// skipped when the URL is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Params {
    pairs: Vec<(&'static str, Option<String>)>,
}

impl Params {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with<V: ToString>(mut self, key: &'static str, value: Option<V>) -> Self {
        self.pairs.push((key, value.map(|v| v.to_string())));
        self
    }
}

/// `base` + `api_key` + every present parameter, as query pairs.
pub(crate) fn build_url(base: &Url, api_key: &str, params: &Params) -> Url {
    let mut url = base.clone();
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("api_key", api_key);
        for (key, value) in &params.pairs {
            if let Some(value) = value {
                query.append_pair(key, value);
            }
        }
    }
    url
}
