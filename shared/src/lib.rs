// shared/src/lib.rs

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("storage: {0}")]
    Storage(String),
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("remote request failed: {0}")]
    Remote(String),
    #[error("unexpected response status: {0}")]
    UnexpectedStatus(u16),
    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Seconds in an hour, day and week, matching the catalog cache windows.
pub const HOUR_IN_SECONDS: i64 = 60 * 60;
pub const DAY_IN_SECONDS: i64 = 24 * HOUR_IN_SECONDS;
pub const WEEK_IN_SECONDS: i64 = 7 * DAY_IN_SECONDS;

/// Current time in seconds since the UNIX epoch
pub fn now_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

pub mod config;
