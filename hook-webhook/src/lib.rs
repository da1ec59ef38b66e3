//! Client side of the webhook exchange.
//!
//! The run is strictly sequential: [`client::WebhookApi::generate_webhook`]
//! registers and receives the webhook URL, access token and follow graph;
//! the graph goes through `hook_graph`; [`submit::submit_with_retry`] posts
//! the outcome through a [`submit::ResultSink`]. [`workflow::run_once`]
//! chains the steps.
pub mod client;
pub mod submit;
pub mod types;
pub mod workflow;

pub use client::WebhookApi;
pub use submit::{ResultSink, SubmitPolicy, submit_with_retry};
pub use types::{RegistrationRequest, Submission, WebhookGrant};
pub use workflow::{RunReport, run_once};
