use thiserror::Error;

/// Failure of a provider call.
///
/// Transport errors, non-2xx responses and malformed payloads all collapse
/// into the kind matching the endpoint; the message is for logs only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("location search failed: {0}")]
    SearchFailed(String),

    #[error("forecast lookup failed: {0}")]
    ForecastFailed(String),
}

impl FetchError {
    pub(crate) fn search(err: anyhow::Error) -> Self {
        FetchError::SearchFailed(format!("{err:#}"))
    }

    pub(crate) fn forecast(err: anyhow::Error) -> Self {
        FetchError::ForecastFailed(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_the_whole_context_chain() {
        let err = anyhow::anyhow!("connection refused")
            .context("Failed to send request to WeatherAPI.com (search)");

        let msg = FetchError::search(err).to_string();
        assert!(msg.starts_with("location search failed:"));
        assert!(msg.contains("(search): connection refused"));
    }
}
