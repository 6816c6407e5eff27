use gloo_net::http::Request;
use mailwriter_core::GenerationRequest;
use mailwriter_engine::{GenerateError, ReplyGenerator};
use mailwriter_logging::mw_debug;

/// Generation client over the browser's `fetch`.
///
/// `fetch` exposes no connect timeout, so the request waits for as long as the
/// browser lets it.
pub(super) struct GlooReplyGenerator {
    endpoint: String,
}

impl GlooReplyGenerator {
    pub(super) fn new(endpoint: String) -> Self {
        Self { endpoint }
    }
}

#[async_trait::async_trait(?Send)]
impl ReplyGenerator for GlooReplyGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
        let body =
            serde_json::to_string(request).map_err(|err| GenerateError::Encode(err.to_string()))?;
        mw_debug!("POST {} tone={}", self.endpoint, request.tone);

        let response = Request::post(&self.endpoint)
            .header("content-type", "application/json")
            .body(body)
            .map_err(|err| GenerateError::Encode(err.to_string()))?
            .send()
            .await
            .map_err(|err| GenerateError::Network(err.to_string()))?;

        if !response.ok() {
            return Err(GenerateError::HttpStatus(response.status()));
        }
        response
            .text()
            .await
            .map_err(|err| GenerateError::Body(err.to_string()))
    }
}
