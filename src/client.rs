//! Typed HTTP client for the media hub API
//!
//! Authentication state is an explicit [`Session`] returned by
//! [`ApiClient::signup`] and [`ApiClient::signin`]. Calls that need a signed-in
//! user take the session by reference, so the client itself holds no token.

use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    AuthResponse, ContentAnalysis, ContentItem, ContentType, ContentUpdate, LikeResponse,
    NewContent, ScoredItem, SearchPage, SigninRequest, SignupRequest, UserProfile, UserSummary,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// A signed-in user together with their bearer token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: UserSummary,
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Self {
            token: response.token,
            user: response.user,
        }
    }
}

/// Search filters accepted by [`ApiClient::search`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct ApiClient {
    http_client: HttpClient,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:3000`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn signup(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> ClientResult<Session> {
        let body = SignupRequest {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse =
            Self::send(self.http_client.post(self.url("/auth/signup")).json(&body)).await?;
        Ok(response.into())
    }

    pub async fn signin(&self, email: &str, password: &str) -> ClientResult<Session> {
        let body = SigninRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse =
            Self::send(self.http_client.post(self.url("/auth/signin")).json(&body)).await?;
        Ok(response.into())
    }

    pub async fn profile(&self, session: &Session) -> ClientResult<UserProfile> {
        Self::send(
            self.http_client
                .get(self.url("/auth/profile"))
                .bearer_auth(&session.token),
        )
        .await
    }

    pub async fn trending(&self, limit: u32) -> ClientResult<Vec<ContentItem>> {
        Self::send(
            self.http_client
                .get(self.url("/content/trending"))
                .query(&[("limit", limit)]),
        )
        .await
    }

    pub async fn search(&self, params: &SearchParams) -> ClientResult<SearchPage> {
        Self::send(
            self.http_client
                .get(self.url("/content/search"))
                .query(params),
        )
        .await
    }

    /// Fetches one item. The server counts this as a view.
    pub async fn get(&self, id: Uuid) -> ClientResult<ContentItem> {
        Self::send(self.http_client.get(self.url(&format!("/content/{}", id)))).await
    }

    /// Personalized when a session is given, trending otherwise
    pub async fn recommendations(
        &self,
        session: Option<&Session>,
        limit: u32,
    ) -> ClientResult<Vec<ScoredItem>> {
        let mut request = self
            .http_client
            .get(self.url("/content/recommendations"))
            .query(&[("limit", limit)]);
        if let Some(session) = session {
            request = request.bearer_auth(&session.token);
        }
        Self::send(request).await
    }

    pub async fn by_category(&self, category: &str, limit: u32) -> ClientResult<Vec<ContentItem>> {
        let mut url = reqwest::Url::parse(&self.url("/content/category"))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(category);
        }

        Self::send(self.http_client.get(url).query(&[("limit", limit)])).await
    }

    pub async fn create(&self, session: &Session, new: &NewContent) -> ClientResult<ContentItem> {
        Self::send(
            self.http_client
                .post(self.url("/content"))
                .bearer_auth(&session.token)
                .json(new),
        )
        .await
    }

    pub async fn update(
        &self,
        session: &Session,
        id: Uuid,
        update: &ContentUpdate,
    ) -> ClientResult<ContentItem> {
        Self::send(
            self.http_client
                .put(self.url(&format!("/content/{}", id)))
                .bearer_auth(&session.token)
                .json(update),
        )
        .await
    }

    pub async fn analyze(&self, session: &Session, id: Uuid) -> ClientResult<ContentAnalysis> {
        Self::send(
            self.http_client
                .post(self.url(&format!("/content/{}/analyze", id)))
                .bearer_auth(&session.token),
        )
        .await
    }

    pub async fn like(&self, id: Uuid) -> ClientResult<LikeResponse> {
        Self::send(self.http_client.post(self.url(&format!("/content/{}/like", id)))).await
    }
}
