//! HTTP client for the KERIA identity agent's admin API.
//!
//! Carries OOBI resolution, connection acceptance, and contact queries to
//! the agent. Duck-typed contact payloads are resolved into the
//! `RemoteContact` variants here, at ingestion, and nowhere else.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{AgentError, ResolveOobiPolicy};
use crate::models::{
    ConnectionRecord, ConnectionRole, ConnectionState, OutOfBandRecord, RemoteContact,
};

/// HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct KeriaClient {
    http_client: reqwest::Client,
    base_url: String,
}

// Request/Response types for the agent admin API

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolveOobiRequest<'a> {
    url: &'a str,
    auto_accept_connection: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolveOobiResponse {
    id: String,
    #[serde(default)]
    alias: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    out_of_band_id: Option<String>,
}

#[derive(Serialize)]
struct ReceiveMessageRequest<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct CreateInvitationRequest<'a> {
    label: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContactDto {
    id: String,
    #[serde(default)]
    alias: Option<String>,
    #[serde(default)]
    oobi: Option<String>,
    #[serde(default)]
    group_id: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ContactDto {
    /// Resolve the loosely-typed contact payload into its source variant.
    fn into_remote_contact(self) -> RemoteContact {
        match self.group_id {
            Some(group_id) => RemoteContact::GroupMember {
                id: self.id,
                alias: self.alias,
                oobi: self.oobi,
                group_id,
            },
            None => RemoteContact::Peer {
                id: self.id,
                alias: self.alias,
                oobi: self.oobi,
            },
        }
    }
}

impl KeriaClient {
    pub fn new(base_url: &str) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        KeriaClient {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read the error message out of a non-success response.
    async fn error_from(response: reqwest::Response) -> AgentError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        AgentError::with_status(message, status)
    }

    pub async fn resolve_oobi(
        &self,
        url: &str,
        policy: &ResolveOobiPolicy,
    ) -> Result<ConnectionRecord, AgentError> {
        let response = self
            .http_client
            .post(self.endpoint("/oobis"))
            .json(&ResolveOobiRequest {
                url,
                auto_accept_connection: policy.auto_accept_connection,
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        let resolved: ResolveOobiResponse = response.json().await?;

        let state = resolved
            .state
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(ConnectionState::Completed);
        let role = resolved
            .role
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(ConnectionRole::Requester);

        Ok(ConnectionRecord {
            id: resolved.id,
            created_at: Utc::now(),
            label: resolved.alias,
            logo: resolved.image_url,
            oobi: Some(url.to_string()),
            state,
            role,
            auto_accept_connection: policy.auto_accept_connection,
            out_of_band_id: resolved.out_of_band_id,
            group_id: None,
        })
    }

    pub async fn accept_request(&self, connection_id: &str) -> Result<(), AgentError> {
        self.post_empty(&format!("/connections/{connection_id}/accept-request"))
            .await
    }

    pub async fn accept_response(&self, connection_id: &str) -> Result<(), AgentError> {
        self.post_empty(&format!("/connections/{connection_id}/accept-response"))
            .await
    }

    async fn post_empty(&self, path: &str) -> Result<(), AgentError> {
        let response = self.http_client.post(self.endpoint(path)).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    pub async fn receive_message(&self, message: &str) -> Result<(), AgentError> {
        let response = self
            .http_client
            .post(self.endpoint("/messages"))
            .json(&ReceiveMessageRequest { message })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    pub async fn create_invitation(&self, label: &str) -> Result<OutOfBandRecord, AgentError> {
        let response = self
            .http_client
            .post(self.endpoint("/oobi/invitations"))
            .json(&CreateInvitationRequest { label })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }

    pub async fn get_oob_record(
        &self,
        out_of_band_id: &str,
    ) -> Result<Option<OutOfBandRecord>, AgentError> {
        let response = self
            .http_client
            .get(self.endpoint(&format!("/oobi/records/{out_of_band_id}")))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(Some(response.json().await?))
    }

    pub async fn list_contacts(&self) -> Result<Vec<RemoteContact>, AgentError> {
        let response = self
            .http_client
            .get(self.endpoint("/contacts"))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        let contacts: Vec<ContactDto> = response.json().await?;
        Ok(contacts
            .into_iter()
            .map(ContactDto::into_remote_contact)
            .collect())
    }

    pub async fn get_contact(&self, id: &str) -> Result<Option<RemoteContact>, AgentError> {
        let response = self
            .http_client
            .get(self.endpoint(&format!("/contacts/{id}")))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        let contact: ContactDto = response.json().await?;
        Ok(Some(contact.into_remote_contact()))
    }
}
