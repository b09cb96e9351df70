//! Per-link progress reporting for the sequential adapter loops.

/// Outcome of processing a single link.
///
/// The string form of the failing variants matches the error-kind field
/// logged at the per-link skip boundary, so callers can correlate callback
/// events with log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// A record was produced.
    Ok,
    /// Page loaded but the product is gone; an empty-priced record is kept.
    OutOfStock,
    /// The per-link time ceiling was hit; link dropped.
    Timeout,
    /// Network failure or non-success HTTP status; link dropped.
    Transport,
    /// Response arrived but the expected payload was missing or malformed.
    Parse,
    /// No product id could be derived; skipped before any request was made.
    MissingId,
}

impl LinkStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LinkStatus::Ok => "ok",
            LinkStatus::OutOfStock => "out_of_stock",
            LinkStatus::Timeout => "timeout",
            LinkStatus::Transport => "transport",
            LinkStatus::Parse => "parse",
            LinkStatus::MissingId => "identifier",
        }
    }
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback invoked once per processed link with
/// `(completed_count, total_count, link, status)`.
///
/// Called from the pipeline's own execution context between links; it must
/// not block the loop's forward progress.
pub type ProgressFn<'a> = dyn Fn(usize, usize, &str, LinkStatus) + 'a;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
