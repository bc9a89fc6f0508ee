//! Placeholder login tokens.
//!
//! A token is `simulated_token_` followed by the epoch milliseconds at issue
//! time. It is not signed, does not expire and is never checked by the
//! server.

use std::sync::atomic::{AtomicI64, Ordering};

pub const TOKEN_PREFIX: &str = "simulated_token_";

/// Issues tokens whose timestamps never go backwards, even if the wall clock does.
#[derive(Debug, Default)]
pub struct TokenIssuer {
    last_issued_ms: AtomicI64,
}

impl TokenIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current epoch milliseconds, clamped to the last value handed out
    pub fn next_timestamp(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let previous = self.last_issued_ms.fetch_max(now, Ordering::SeqCst);
        previous.max(now)
    }

    pub fn issue(&self) -> String {
        token_for_timestamp(self.next_timestamp())
    }
}

pub fn token_for_timestamp(epoch_ms: i64) -> String {
    format!("{}{}", TOKEN_PREFIX, epoch_ms)
}
