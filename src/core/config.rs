use std::path::PathBuf;

/// Base URL of the ingest API as deployed by the city (FastAPI behind
/// port 8070). Overridable per invocation, see [`resolve_api_url`].
pub const DEFAULT_API_URL: &str = "http://localhost:8070/api";

pub const ENV_API_URL: &str = "ECOVISTA_API_URL";

/// Resolve the API base URL: explicit flag wins, then the environment,
/// then the deployment default. A trailing slash is stripped so path
/// concatenation stays uniform.
pub fn resolve_api_url(flag_value: &str) -> String {
    let raw = if !flag_value.is_empty() {
        flag_value.to_string()
    } else if let Ok(env_url) = std::env::var(ENV_API_URL)
        && !env_url.is_empty()
    {
        env_url
    } else {
        DEFAULT_API_URL.to_string()
    };
    raw.trim_end_matches('/').to_string()
}

/// Root data directory for ecovista.
/// Unix: `~/.ecovista`, Windows: `%APPDATA%\ecovista`.
pub fn data_dir() -> PathBuf {
    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ecovista")
    }
    #[cfg(not(windows))]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ecovista")
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_api_url;

    #[test]
    fn flag_value_wins_and_trailing_slash_is_stripped() {
        assert_eq!(
            resolve_api_url("http://10.0.0.5:8070/api/"),
            "http://10.0.0.5:8070/api"
        );
    }

    #[test]
    fn empty_flag_falls_back_to_default() {
        // Not asserting the env branch here: test processes share the
        // environment and var mutation would race with other tests.
        let url = resolve_api_url("");
        assert!(url.starts_with("http://"));
        assert!(!url.ends_with('/'));
    }
}
