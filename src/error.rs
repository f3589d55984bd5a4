//! Error taxonomy for the polling pipeline.
//!
//! Each variant maps to a distinct recovery policy in the scheduler:
//! a `FetchError` aborts the cycle, a `NormalizeError` skips one record,
//! a `StoreError` skips one notification, a `SendError` is logged and
//! never retried.

use thiserror::Error;

/// Source adapter failure. The whole fetch is aborted for this cycle and
/// retried on the next tick.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be parsed into records.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// One raw record could not be normalized; siblings are unaffected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// No source-stable identifier could be extracted. The record is
    /// dropped, not retried.
    #[error("no stable identifier in record")]
    MissingIdentifier,
}

/// Dedup store backend failure. The caller skips notification for the
/// affected record this cycle rather than crash or double-notify.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("dedup store unavailable: {0}")]
    Unavailable(String),
}

/// Notification transport failure. Logged and never retried: losing an
/// alert is preferred over flooding a flaky transport with duplicates.
#[derive(Debug, Error)]
pub enum SendError {
    /// HTTP request failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The sink answered but rejected the message.
    #[error("sink rejected message: {0}")]
    Rejected(String),
}
