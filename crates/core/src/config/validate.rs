use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Mirror source URL is set
/// - Fetch budget leaves room after the safety margin
/// - Per-call timeouts are non-zero
/// - At least one user agent is configured
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    if config.mirrors.source_url.trim().is_empty() {
        return Err(invalid("mirrors.source_url cannot be empty"));
    }

    let fetch = &config.fetch;
    if !fetch.api_prefix.starts_with('/') {
        return Err(invalid("fetch.api_prefix must start with '/'"));
    }
    if fetch.safety_margin_ms >= fetch.max_total_ms {
        return Err(invalid(
            "fetch.safety_margin_ms must be smaller than fetch.max_total_ms",
        ));
    }
    if fetch.connect_timeout_ms == 0 || fetch.read_timeout_ms == 0 {
        return Err(invalid("fetch per-call timeouts cannot be 0"));
    }
    if fetch.strict_media_check
        && (fetch.media_connect_timeout_ms == 0 || fetch.media_read_timeout_ms == 0)
    {
        return Err(invalid("fetch media timeouts cannot be 0"));
    }

    if config
        .identity
        .user_agents
        .iter()
        .all(|ua| ua.trim().is_empty())
    {
        return Err(invalid("identity.user_agents needs at least one entry"));
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
