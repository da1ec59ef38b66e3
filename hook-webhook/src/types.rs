//! Wire shapes of the registration request, its response and the submission.
use hook_common::{HookError, Result};
use hook_config::IdentityConfig;
use hook_graph::{Outcome, User, load_users};
use hook_http::HeaderValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub name: String,
    pub reg_no: String,
    pub email: String,
}

impl From<&IdentityConfig> for RegistrationRequest {
    fn from(identity: &IdentityConfig) -> Self {
        Self {
            name: identity.name.clone(),
            reg_no: identity.reg_no.clone(),
            email: identity.email.clone(),
        }
    }
}

/// Raw initiation response. Every field is optional here so a missing one
/// can be reported by name instead of as a generic decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    #[serde(default)]
    pub webhook: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub data: Option<WebhookData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub users: Option<Value>,
}

/// A validated initiation response.
#[derive(Debug, Clone)]
pub struct WebhookGrant {
    pub webhook: Url,
    pub access_token: String,
    pub users: Vec<User>,
}

impl TryFrom<WebhookResponse> for WebhookGrant {
    type Error = HookError;

    fn try_from(resp: WebhookResponse) -> Result<Self> {
        let webhook = resp
            .webhook
            .ok_or_else(|| missing("webhook"))?;
        let webhook = Url::parse(webhook.trim())
            .map_err(|e| HookError::Malformed(format!("webhook {:?}: {e}", webhook.trim())))?;

        let access_token = resp
            .access_token
            .ok_or_else(|| missing("accessToken"))?
            .trim()
            .to_string();
        if access_token.is_empty() {
            return Err(HookError::Malformed("accessToken is empty".into()));
        }
        HeaderValue::from_str(&access_token)
            .map_err(|e| HookError::Malformed(format!("accessToken is not a valid header value: {e}")))?;

        let users = resp
            .data
            .and_then(|d| d.users)
            .ok_or_else(|| missing("data.users"))?;
        let users = load_users(&users)?;

        Ok(Self {
            webhook,
            access_token,
            users,
        })
    }
}

fn missing(field: &str) -> HookError {
    HookError::Malformed(format!("missing required field `{field}`"))
}

/// Body posted to the webhook.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub reg_no: String,
    pub outcome: Outcome,
}
