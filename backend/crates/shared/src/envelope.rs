//! Success envelope shared by every JSON response.
//!
//! ```json
//! { "status": "success", "results": 3, "data": { "documents": [...] } }
//! ```

use serde::Serialize;

pub const SUCCESS: &str = "success";

/// `{status: "success", results?, token?, data}`
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: SUCCESS,
            results: None,
            token: None,
            data,
        }
    }

    pub fn with_results(mut self, results: usize) -> Self {
        self.results = Some(results);
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// `data: {documents: [...]}` of a list response
#[derive(Debug, Clone, Serialize)]
pub struct Documents<T> {
    pub documents: Vec<T>,
}

/// `data: {data: ...}` of a single-document response
#[derive(Debug, Clone, Serialize)]
pub struct Single<T> {
    pub data: T,
}

/// Builds the list envelope; `results` is the number of documents returned.
pub fn documents<T>(documents: Vec<T>) -> Envelope<Documents<T>> {
    let count = documents.len();
    Envelope::new(Documents { documents }).with_results(count)
}

/// Builds the single-document envelope.
pub fn single<T>(data: T) -> Envelope<Single<T>> {
    Envelope::new(Single { data })
}
