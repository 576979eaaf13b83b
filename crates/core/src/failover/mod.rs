//! Mirror selection and failover.
//!
//! [`FailoverFetcher::fetch`] walks a capability's rotation queue from the
//! head, one attempt at a time, under a total time budget. The first
//! response that passes status and body validation is returned. Every
//! mirror that fails is demoted to the tail of the shared queue, so later
//! fetches start from mirrors that have been working.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::capability::Capability;
use crate::config::FetchConfig;
use crate::identity::IdentityProvider;
use crate::metrics::{FETCH_DURATION, MIRROR_ATTEMPTS, MIRROR_DEMOTIONS};
use crate::mirror::{Mirror, MirrorRegistry};
use crate::transport::MirrorClient;
use crate::validator::{first_stream_url, validate, Outcome, RejectReason};

/// The only failures a fetch surfaces. Per-mirror failures never escape;
/// they only reorder the queue.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("No mirrors configured for {0}")]
    NoMirrors(Capability),

    #[error("No {0} mirror produced a valid response in time")]
    BudgetExhausted(Capability),
}

impl FetchError {
    pub fn capability(&self) -> Capability {
        match self {
            FetchError::NoMirrors(c) | FetchError::BudgetExhausted(c) => *c,
        }
    }
}

pub struct FailoverFetcher {
    config: FetchConfig,
    registry: Arc<MirrorRegistry>,
    client: Arc<dyn MirrorClient>,
    identity: Arc<dyn IdentityProvider>,
}

impl FailoverFetcher {
    pub fn new(
        config: FetchConfig,
        registry: Arc<MirrorRegistry>,
        client: Arc<dyn MirrorClient>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            config,
            registry,
            client,
            identity,
        }
    }

    /// Override the strict media check from configuration.
    pub fn with_strict_media_check(mut self, enabled: bool) -> Self {
        self.config.strict_media_check = enabled;
        self
    }

    pub fn strict_media_check(&self) -> bool {
        self.config.strict_media_check
    }

    pub fn registry(&self) -> &Arc<MirrorRegistry> {
        &self.registry
    }

    /// Return the first validated payload for `path` from any mirror of
    /// `capability`.
    ///
    /// The queue is re-read before every attempt, so demotions made by
    /// concurrent fetches are observed. A mirror is attempted at most once
    /// per call. The deadline is checked only between attempts; an attempt
    /// in flight runs until its own per-call timeout.
    pub async fn fetch(&self, capability: Capability, path: &str) -> Result<String, FetchError> {
        let start = Instant::now();
        let deadline = start + self.config.max_total();
        let queue = self.registry.queue(capability);

        if queue.is_empty().await {
            warn!(capability = %capability, "No mirrors configured");
            observe_duration(capability, "no_mirrors", start);
            return Err(FetchError::NoMirrors(capability));
        }

        let mut tried: HashSet<Mirror> = HashSet::new();

        loop {
            if Instant::now() + self.config.safety_margin() >= deadline {
                debug!(capability = %capability, tried = tried.len(), "Fetch budget spent");
                break;
            }

            let next = queue.peek().await.into_iter().find(|m| !tried.contains(m));
            let Some(mirror) = next else {
                break;
            };
            tried.insert(mirror.clone());

            let outcome = self.attempt(capability, &mirror, path, deadline).await;
            MIRROR_ATTEMPTS
                .with_label_values(&[capability.as_str(), outcome.label()])
                .inc();

            match outcome {
                Outcome::Success(payload) => {
                    info!(
                        capability = %capability,
                        mirror = %mirror,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Mirror fetch succeeded"
                    );
                    observe_duration(capability, "success", start);
                    return Ok(payload);
                }
                failure => {
                    warn!(
                        capability = %capability,
                        mirror = %mirror,
                        outcome = %failure,
                        "Demoting mirror"
                    );
                    queue.demote(&mirror).await;
                    MIRROR_DEMOTIONS
                        .with_label_values(&[capability.as_str()])
                        .inc();
                }
            }
        }

        warn!(
            capability = %capability,
            tried = tried.len(),
            path = path,
            "All mirror attempts failed"
        );
        observe_duration(capability, "exhausted", start);
        Err(FetchError::BudgetExhausted(capability))
    }

    /// One GET against one mirror, classified into an [`Outcome`].
    async fn attempt(
        &self,
        capability: Capability,
        mirror: &str,
        path: &str,
        deadline: Instant,
    ) -> Outcome {
        let url = self.mirror_url(mirror, path);
        debug!(capability = %capability, url = %url, "Requesting mirror");

        let response = match self.client.get(&url, self.identity.headers()).await {
            Ok(response) => response,
            Err(e) => return Outcome::NetworkFailure(e.to_string()),
        };

        // Status gates correctness before any body inspection.
        if !response.is_success() {
            return Outcome::HttpError(response.status);
        }

        let outcome = validate(capability, &response.body);
        if capability == Capability::Video && self.config.strict_media_check {
            if let Outcome::Success(payload) = outcome {
                return self.verify_media(payload, deadline).await;
            }
        }
        outcome
    }

    /// Accept a video payload only if its first stream serves video content.
    async fn verify_media(&self, payload: String, deadline: Instant) -> Outcome {
        let Some(stream_url) = first_stream_url(&payload) else {
            return Outcome::SemanticReject(RejectReason::NonVideoStream);
        };

        let check = self
            .client
            .probe_content_type(&stream_url, self.identity.headers());

        match timeout_at(deadline, check).await {
            Ok(Ok(Some(content_type))) if content_type.contains("video") => {
                Outcome::Success(payload)
            }
            Ok(Ok(content_type)) => {
                debug!(content_type = ?content_type, "Stream is not video");
                Outcome::SemanticReject(RejectReason::NonVideoStream)
            }
            Ok(Err(e)) => {
                debug!(error = %e, "Stream check failed");
                Outcome::SemanticReject(RejectReason::NonVideoStream)
            }
            Err(_) => {
                debug!("Stream check ran past the fetch deadline");
                Outcome::SemanticReject(RejectReason::NonVideoStream)
            }
        }
    }

    fn mirror_url(&self, mirror: &str, path: &str) -> String {
        format!(
            "{}{}{}",
            mirror.trim_end_matches('/'),
            self.config.api_prefix,
            path
        )
    }
}

fn observe_duration(capability: Capability, result: &str, start: Instant) {
    FETCH_DURATION
        .with_label_values(&[capability.as_str(), result])
        .observe(start.elapsed().as_secs_f64());
}
