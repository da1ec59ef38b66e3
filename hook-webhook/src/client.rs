//! Thin wrapper around the hiring API with the workflow's defaults.
//!
//! Each call is a single request. The registration is never retried; the
//! submission is retried by [`crate::submit::submit_with_retry`].
use crate::submit::ResultSink;
use crate::types::{RegistrationRequest, Submission, WebhookGrant, WebhookResponse};
use async_trait::async_trait;
use hook_common::{HookError, Result};
use hook_http::{Auth, HttpClient, HttpError, RequestOpts, StatusCode};
use std::time::Duration;

#[derive(Clone)]
pub struct WebhookApi {
    http: HttpClient,
    init_url: String,
}

impl WebhookApi {
    pub fn new(init_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut http = HttpClient::new(init_url).map_err(|e| HookError::Config(e.to_string()))?;
        if let Some(timeout) = timeout {
            http = http.with_timeout(timeout);
        }
        Ok(Self {
            http,
            init_url: init_url.to_string(),
        })
    }

    /// Register and receive the webhook URL, access token and follow graph.
    ///
    /// Any non-2xx status ends the run; so does a response missing one of
    /// `webhook`, `accessToken` or `data.users`.
    pub async fn generate_webhook(&self, registration: &RegistrationRequest) -> Result<WebhookGrant> {
        tracing::info!(url=%self.init_url, reg_no=%registration.reg_no, "webhook.initiate.start");

        let resp: WebhookResponse = self
            .http
            .post_json_opts(
                &self.init_url,
                registration,
                RequestOpts {
                    allow_absolute: true,
                    ..Default::default()
                },
            )
            .await
            .map_err(initiation_error)?;

        let grant = WebhookGrant::try_from(resp)?;
        tracing::info!(
            webhook_host=%grant.webhook.host_str().unwrap_or("-"),
            users=grant.users.len(),
            "webhook.initiate.granted"
        );
        Ok(grant)
    }

    /// Bind this client to a grant so results can be posted to its webhook.
    pub fn sink<'a>(&'a self, grant: &'a WebhookGrant) -> WebhookSink<'a> {
        WebhookSink { api: self, grant }
    }
}

/// Posts submissions to a granted webhook with the raw access token.
pub struct WebhookSink<'a> {
    api: &'a WebhookApi,
    grant: &'a WebhookGrant,
}

#[async_trait]
impl ResultSink for WebhookSink<'_> {
    async fn deliver(&self, submission: &Submission) -> std::result::Result<StatusCode, HttpError> {
        self.api
            .http
            .post_json_status(
                self.grant.webhook.as_str(),
                submission,
                RequestOpts {
                    auth: Some(Auth::Raw(&self.grant.access_token)),
                    allow_absolute: true,
                    ..Default::default()
                },
            )
            .await
    }
}

fn initiation_error(e: HttpError) -> HookError {
    match e {
        HttpError::Api { status, message, .. } => {
            HookError::Initiation(format!("status {status}: {message}"))
        }
        HttpError::Decode(msg, _) => HookError::Malformed(msg),
        other => HookError::Http(other.to_string()),
    }
}
