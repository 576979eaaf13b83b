//! Outbound client identity.
//!
//! Every call to a mirror (and to the mirror list host) carries headers from
//! an [`IdentityProvider`], so consecutive requests do not all present the
//! same client.

use rand::seq::IndexedRandom;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::warn;

use crate::config::IdentityConfig;

/// Used when no configured user agent is a valid header value.
const FALLBACK_USER_AGENT: &str = "Mozilla/5.0 (compatible; mirrortube)";

/// Supplies the headers identifying the client on one outbound call.
pub trait IdentityProvider: Send + Sync {
    fn headers(&self) -> HeaderMap;
}

/// Picks a user agent uniformly at random from a fixed list on every call.
#[derive(Debug, Clone)]
pub struct RandomUserAgent {
    agents: Vec<HeaderValue>,
}

impl RandomUserAgent {
    pub fn new<S: AsRef<str>>(agents: &[S]) -> Self {
        let mut valid: Vec<HeaderValue> = agents
            .iter()
            .map(|ua| ua.as_ref().trim())
            .filter(|ua| !ua.is_empty())
            .filter_map(|ua| match HeaderValue::from_str(ua) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(user_agent = ua, "Skipping user agent that is not a valid header");
                    None
                }
            })
            .collect();

        if valid.is_empty() {
            valid.push(HeaderValue::from_static(FALLBACK_USER_AGENT));
        }

        Self { agents: valid }
    }

    pub fn from_config(config: &IdentityConfig) -> Self {
        Self::new(&config.user_agents)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl IdentityProvider for RandomUserAgent {
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(agent) = self.agents.choose(&mut rand::rng()) {
            headers.insert(USER_AGENT, agent.clone());
        }
        headers
    }
}

/// Always presents the same user agent.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    agent: HeaderValue,
}

impl StaticIdentity {
    pub fn new(agent: &'static str) -> Self {
        Self {
            agent: HeaderValue::from_static(agent),
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, self.agent.clone());
        headers
    }
}
