use crate::client::WebhookApi;
use crate::submit::{SubmitPolicy, submit_with_retry};
use crate::types::{RegistrationRequest, Submission};
use hook_common::Result;
use hook_config::HookConfig;
use hook_graph::{Outcome, decide_outcome, find_mutual_pairs};

/// What one run did.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub users: usize,
    /// Mutual pairs found in the graph; 0 when the fallback was posted.
    pub mutual_pairs: usize,
    pub outcome: Outcome,
    /// Attempt that got a 2xx; `None` when nothing was posted (dry run).
    pub attempts: Option<u32>,
}

/// Register, compute the mutual pairs and post them back.
///
/// With `dry_run` the outcome is computed but never submitted.
pub async fn run_once(cfg: &HookConfig, dry_run: bool) -> Result<RunReport> {
    let api = WebhookApi::new(&cfg.endpoint.init_url, cfg.http.timeout())?;
    let registration = RegistrationRequest::from(&cfg.identity);
    let grant = api.generate_webhook(&registration).await?;

    let pairs = find_mutual_pairs(&grant.users);
    let mutual_pairs = pairs.len();
    let outcome = decide_outcome(pairs);
    tracing::info!(
        users = grant.users.len(),
        pairs = mutual_pairs,
        fallback = outcome.is_fallback(),
        "graph.outcome"
    );

    if dry_run {
        tracing::info!("run.dry_run.skip_submit");
        return Ok(RunReport {
            users: grant.users.len(),
            mutual_pairs,
            outcome,
            attempts: None,
        });
    }

    let submission = Submission {
        reg_no: registration.reg_no.clone(),
        outcome,
    };
    let policy = SubmitPolicy::from(&cfg.submission);
    let attempts = submit_with_retry(&api.sink(&grant), &submission, &policy).await?;

    Ok(RunReport {
        users: grant.users.len(),
        mutual_pairs,
        outcome: submission.outcome,
        attempts: Some(attempts),
    })
}
