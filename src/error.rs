//! Error types, one enum per concern

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a flight search round trip
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network failure or undecodable body
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status; the body is kept verbatim
    #[error("search returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Failure to notify the page generator
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("page notification request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("page generator returned HTTP {status}")]
    Status { status: u16 },

    #[error("page generator reported an error: {message}")]
    Rejected { message: String },

    #[error("no page generator configured")]
    NotConfigured,
}

#[derive(Debug, Error)]
pub enum LogoError {
    #[error("logo request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("logo request returned HTTP {status}")]
    Status { status: u16 },

    #[error("logo could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no configuration directory on this platform")]
    NoConfigDir,
}
