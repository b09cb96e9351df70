use thiserror::Error;

use ozwb_core::LinkStatus;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("expected node {node} missing for {url}")]
    MissingData { node: &'static str, url: String },

    #[error("no product id derivable from {url}")]
    MissingProductId { url: String },

    #[error("not a storefront product URL: {url}")]
    ForeignUrl { url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("invalid value for header {name}: {reason}")]
    InvalidHeader {
        name: &'static str,
        reason: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl ScrapeError {
    /// Failure class attached as the `kind` field to per-link skip logs:
    /// `transport`, `parse`, `identifier`, or `timeout`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeError::Http(e) if e.is_timeout() => "timeout",
            ScrapeError::Http(_)
            | ScrapeError::UnexpectedStatus { .. }
            | ScrapeError::InvalidBaseUrl { .. }
            | ScrapeError::InvalidHeader { .. }
            | ScrapeError::Io { .. } => "transport",
            ScrapeError::Deserialize { .. } | ScrapeError::MissingData { .. } => "parse",
            ScrapeError::MissingProductId { .. } | ScrapeError::ForeignUrl { .. } => "identifier",
        }
    }

    /// Per-link status reported through the progress callback when this
    /// error caused the link to be skipped.
    #[must_use]
    pub fn link_status(&self) -> LinkStatus {
        match self.kind() {
            "timeout" => LinkStatus::Timeout,
            "parse" => LinkStatus::Parse,
            "identifier" => LinkStatus::MissingId,
            _ => LinkStatus::Transport,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_the_per_link_taxonomy() {
        let parse_err = ScrapeError::MissingData {
            node: "data.products",
            url: "https://example.test".to_string(),
        };
        assert_eq!(parse_err.kind(), "parse");
        assert_eq!(parse_err.link_status(), LinkStatus::Parse);

        let id_err = ScrapeError::MissingProductId {
            url: "https://example.test/no-digits".to_string(),
        };
        assert_eq!(id_err.kind(), "identifier");
        assert_eq!(id_err.link_status(), LinkStatus::MissingId);

        let status_err = ScrapeError::UnexpectedStatus {
            status: 503,
            url: "https://example.test".to_string(),
        };
        assert_eq!(status_err.kind(), "transport");
        assert_eq!(status_err.link_status(), LinkStatus::Transport);
    }
}
