use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TargetSpecError {
    #[error("target name is empty")]
    EmptyName,
    #[error("target has no urls")]
    NoUrls,
    #[error("target '{name}' pattern '{pattern}' is invalid: {source}")]
    BadPattern {
        name: String,
        pattern: String,
        source: regex::Error,
    },
}

/// Immutable description of one monitored product page, supplied by the
/// config layer.
#[derive(Debug, Clone)]
pub struct TargetSpec {
    /// Unique key; also the state-map key.
    pub name: String,
    /// Candidate URLs, tried in order until one yields a usable page.
    pub urls: Vec<String>,
    /// Sanity markers, lowercased at construction. A fetched page must
    /// contain at least one (case-insensitively) to count as a real order
    /// page rather than a block/CAPTCHA/error page. An empty set passes.
    pub must_contain_any: Vec<String>,
    /// A match anywhere in the page body is conclusive OUT evidence.
    pub out_of_stock_patterns: Vec<Regex>,
}

impl TargetSpec {
    /// Builds a spec from raw config strings, compiling the out-of-stock
    /// patterns and lowercasing the sanity markers.
    pub fn compile(
        name: impl Into<String>,
        urls: Vec<String>,
        must_contain_any: Vec<String>,
        out_of_stock_patterns: &[String],
    ) -> Result<Self, TargetSpecError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TargetSpecError::EmptyName);
        }
        if urls.is_empty() {
            return Err(TargetSpecError::NoUrls);
        }

        let mut compiled = Vec::with_capacity(out_of_stock_patterns.len());
        for pattern in out_of_stock_patterns {
            let regex = Regex::new(pattern).map_err(|source| TargetSpecError::BadPattern {
                name: name.clone(),
                pattern: pattern.clone(),
                source,
            })?;
            compiled.push(regex);
        }

        Ok(Self {
            name,
            urls,
            must_contain_any: must_contain_any
                .into_iter()
                .map(|marker| marker.to_lowercase())
                .collect(),
            out_of_stock_patterns: compiled,
        })
    }
}
