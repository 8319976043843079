// ==================== USERS API CLIENT ====================
// Cliente HTTP de /api/users usado pelo console.

use crate::models::{UserFields, UserRecord};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Server responded {status}")]
    Server { status: u16, message: Option<String> },
}

impl ClientError {
    /// The `message` the server put in its error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Server { message, .. } => message.as_deref(),
            ClientError::Transport(_) => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn list(&self) -> Result<Vec<UserRecord>, ClientError>;
    async fn create(&self, fields: &UserFields) -> Result<UserRecord, ClientError>;
    async fn update(&self, id: &str, fields: &UserFields) -> Result<UserRecord, ClientError>;
    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}

#[derive(Deserialize)]
struct ErrorMessage {
    message: Option<String>,
}

pub struct HttpUsersApi {
    client: Client,
    base_url: String,
}

impl HttpUsersApi {
    /// `base_url` aponta para a coleção, ex.: http://localhost:5000/api/users
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(id))
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorMessage>()
            .await
            .ok()
            .and_then(|body| body.message);

        log::debug!("API error {}: {:?}", status, message);

        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    async fn list(&self) -> Result<Vec<UserRecord>, ClientError> {
        let response = self.client.get(&self.base_url).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create(&self, fields: &UserFields) -> Result<UserRecord, ClientError> {
        let response = self.client.post(&self.base_url).json(fields).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update(&self, id: &str, fields: &UserFields) -> Result<UserRecord, ClientError> {
        let response = self.client.put(self.item_url(id)).json(fields).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
