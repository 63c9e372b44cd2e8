use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    #[serde(rename = "faceData")]
    pub face_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}

/// Outcome of a register or login call. Failures arrive here too, with
/// `success == false`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Check whether the service is up.
    pub async fn status(&self) -> Result<StatusResponse, Box<dyn std::error::Error + Send + Sync>> {
        let resp = self
            .client
            .get(format!("{}/api/status", self.base_url))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(format!("Service returned error status {}: {}", status, text).into());
        }
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn register(
        &self,
        username: &str,
        face_data: &str,
    ) -> Result<AuthResponse, Box<dyn std::error::Error + Send + Sync>> {
        self.post_credentials("/api/register", username, face_data)
            .await
    }

    pub async fn login(
        &self,
        username: &str,
        face_data: &str,
    ) -> Result<AuthResponse, Box<dyn std::error::Error + Send + Sync>> {
        self.post_credentials("/api/login", username, face_data)
            .await
    }

    async fn post_credentials(
        &self,
        path: &str,
        username: &str,
        face_data: &str,
    ) -> Result<AuthResponse, Box<dyn std::error::Error + Send + Sync>> {
        let body = Credentials {
            username: username.to_string(),
            face_data: face_data.to_string(),
        };
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        // Envelopes are returned for 500s as well, so try them first.
        match serde_json::from_str::<AuthResponse>(&text) {
            Ok(auth) => Ok(auth),
            Err(_) => Err(format!("Service returned status {}: {}", status, text).into()),
        }
    }
}
