//! Thin HTTP client over the API server's JSON routes.

use data_model_tkw::models::{
    CallbackResponse, GenerationRequest, ProjectListResponse, RequestListResponse, SubmitPayload, SubmitResponse,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Could not reach the API server: {0}")]
    Unreachable(#[source] reqwest::Error),
    #[error("API server answered {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Unexpected response from the API server: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    /// `path` is relative, so a path prefix on the base URL (`http://host/tkw/`) is kept.
    fn endpoint(&self, path: &str, search: Option<&str>) -> Result<Url, CliError> {
        let mut url = self.base.join(path)?;
        if let Some(term) = search {
            url.query_pairs_mut().append_pair("search", term);
        }
        Ok(url)
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CliError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CliError::Api {
                status: status.as_u16(),
                body,
            });
        }
        response.json().await.map_err(CliError::Decode)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, CliError> {
        let response = self.http.get(url).send().await.map_err(CliError::Unreachable)?;
        Self::read(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<T, CliError> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(CliError::Unreachable)?;
        Self::read(response).await
    }

    pub async fn submit(&self, payload: &SubmitPayload) -> Result<SubmitResponse, CliError> {
        self.post(self.endpoint("api/requests", None)?, payload).await
    }

    pub async fn history(&self, search: Option<&str>) -> Result<RequestListResponse, CliError> {
        self.get(self.endpoint("api/requests", search)?).await
    }

    pub async fn projects(&self, search: Option<&str>) -> Result<ProjectListResponse, CliError> {
        self.get(self.endpoint("api/projects", search)?).await
    }

    pub async fn show(&self, id: &str) -> Result<GenerationRequest, CliError> {
        let mut url = self.endpoint("api/requests", None)?;
        url.path_segments_mut()
            .map_err(|_| CliError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id);
        self.get(url).await
    }

    pub async fn callback(&self, body: &Value) -> Result<CallbackResponse, CliError> {
        self.post(self.endpoint("api/callback", None)?, body).await
    }
}
