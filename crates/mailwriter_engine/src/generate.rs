use mailwriter_core::GenerationRequest;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("failed to encode request: {0}")]
    Encode(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("API request failed with status {0}")]
    HttpStatus(u16),
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// The remote text-generation service.
///
/// `?Send` because the browser implementation holds JS handles.
#[async_trait::async_trait(?Send)]
pub trait ReplyGenerator {
    /// One attempt, no retry. The plain-text body of a successful response
    /// is returned verbatim.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::ReqwestReplyGenerator;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::Duration;

    use mailwriter_core::GenerationRequest;
    use mailwriter_logging::mw_debug;
    use reqwest::header::CONTENT_TYPE;

    use super::{GenerateError, ReplyGenerator};

    #[derive(Debug, Clone)]
    pub struct ReqwestReplyGenerator {
        endpoint: String,
        client: reqwest::Client,
    }

    impl ReqwestReplyGenerator {
        /// Only connecting is bounded; once connected the request runs as
        /// long as the service takes.
        pub fn new(
            endpoint: impl Into<String>,
            connect_timeout: Duration,
        ) -> Result<Self, GenerateError> {
            let client = reqwest::Client::builder()
                .connect_timeout(connect_timeout)
                .build()
                .map_err(|err| GenerateError::Network(err.to_string()))?;
            Ok(Self {
                endpoint: endpoint.into(),
                client,
            })
        }

        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }
    }

    #[async_trait::async_trait(?Send)]
    impl ReplyGenerator for ReqwestReplyGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
            let body = serde_json::to_string(request)
                .map_err(|err| GenerateError::Encode(err.to_string()))?;
            mw_debug!(
                "POST {} email_len={} tone={}",
                self.endpoint,
                request.email_content.len(),
                request.tone
            );

            let response = self
                .client
                .post(&self.endpoint)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await
                .map_err(|err| GenerateError::Network(err.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(GenerateError::HttpStatus(status.as_u16()));
            }

            response
                .text()
                .await
                .map_err(|err| GenerateError::Body(err.to_string()))
        }
    }
}
