use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub url: String,
}
