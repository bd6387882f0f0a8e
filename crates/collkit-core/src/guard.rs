//! Guard - 失敗を握りつぶす安全な呼び出し
//!
//! - `try_fn` / `try_fn_or_else`: `Result` を返す thunk 用
//! - `try_unwind` / `try_unwind_or_else`: panic する可能性のある thunk 用
//!
//! handler がない場合の `None` は「thunk が None 相当を返した」のか
//! 「失敗した」のかを区別しない。

use crate::error::CollkitError;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Run `f`; an `Err` is swallowed and becomes `None`.
pub fn try_fn<T, E, F>(f: F) -> Option<T>
where
    F: FnOnce() -> Result<T, E>,
{
    f().ok()
}

/// Run `f`; an `Err` is handed to `on_err`, whose result is returned instead.
pub fn try_fn_or_else<T, E, F, H>(f: F, on_err: H) -> T
where
    F: FnOnce() -> Result<T, E>,
    H: FnOnce(E) -> T,
{
    f().unwrap_or_else(on_err)
}

/// Run `f`, catching a panic. A caught panic becomes `None`.
///
/// The panic hook still runs, so the message is printed to stderr as usual.
pub fn try_unwind<T, F>(f: F) -> Option<T>
where
    F: FnOnce() -> T,
{
    catch_unwind(AssertUnwindSafe(f)).ok()
}

/// Run `f`, catching a panic and handing it to `on_err` as
/// `CollkitError::Panicked`.
pub fn try_unwind_or_else<T, F, H>(f: F, on_err: H) -> T
where
    F: FnOnce() -> T,
    H: FnOnce(CollkitError) -> T,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(payload) => on_err(CollkitError::from_panic(payload)),
    }
}
