use std::time::Duration;

use chat_logging::chat_debug;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::prompt::build_prompt;
use crate::{FailureKind, FetchError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl FetchSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// `{base_url}/v1beta/models/{model}:generateContent?key={api_key}`
    fn endpoint(&self) -> Result<Url, FetchError> {
        let raw = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let mut url = Url::parse(&raw)
            .map_err(|err| FetchError::new(FailureKind::Network, format!("bad endpoint: {err}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

#[async_trait::async_trait]
pub trait AnswerFetcher: Send + Sync {
    /// Sends one query and returns the raw answer text. No retries.
    async fn fetch_answer(&self, query: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_answer(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Generative-language client over reqwest.
#[derive(Debug, Clone)]
pub struct GeminiFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl GeminiFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }
}

#[async_trait::async_trait]
impl AnswerFetcher for GeminiFetcher {
    async fn fetch_answer(&self, query: &str) -> Result<String, FetchError> {
        let endpoint = self.settings.endpoint()?;
        let prompt = build_prompt(query);
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: &prompt }],
            }],
        };
        // The query string holds the key; log the path only.
        chat_debug!("POST {} ({} prompt bytes)", endpoint.path(), prompt.len());

        let response = self
            .client
            .post(endpoint)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            chat_debug!("answer request failed with {}: {}", status, detail);
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let text = response.text().await.map_err(map_reqwest_error)?;
        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|err| FetchError::new(FailureKind::MalformedResponse, err.to_string()))?;
        parsed.into_answer().ok_or_else(|| {
            FetchError::new(
                FailureKind::MalformedResponse,
                "response has no candidate text",
            )
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
