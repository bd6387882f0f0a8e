//! Errors - collkit のエラー型
//!
//! コアのヘルパー（each / find / filter / map / clone_deep）は独自の失敗を持たない。
//! ここに並ぶのは opt-in の経路（try_unwind, clone_deep_with, JSON 変換）が返すものだけ。

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollkitError {
    /// A panic caught by `try_unwind` / `try_unwind_or_else`.
    #[error("callback panicked: {0}")]
    Panicked(String),

    #[error("nesting deeper than max_depth={limit}")]
    DepthExceeded { limit: usize },

    #[error("value graph contains a cycle")]
    Cycle,

    #[error("number {0} has no JSON representation")]
    NonFiniteNumber(f64),

    #[error("{0} has no JSON representation")]
    Unrepresentable(&'static str),
}

impl CollkitError {
    /// Build a `Panicked` error from a `catch_unwind` payload.
    ///
    /// `panic!` payloads are `&'static str` or `String`; anything else
    /// (e.g. `std::panic::panic_any`) gets a generic message.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        CollkitError::Panicked(message)
    }
}
