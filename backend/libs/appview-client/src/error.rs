use thiserror::Error;

/// Errors returned by AppView calls.
///
/// The feed pipeline never propagates these: every call site degrades to an
/// empty page/batch on error. They are still typed so call sites can log
/// something more useful than a stringly error.
#[derive(Debug, Error)]
pub enum AppViewError {
    #[error("AppView request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("AppView {method} returned {status}: {body}")]
    Status {
        method: String,
        status: u16,
        body: String,
    },
}
