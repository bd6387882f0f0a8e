//! collkit-core
//!
//! Small collection helpers over sequences, records and dynamic value graphs.
//!
//! # モジュール構成
//! - **value**: 動的な値グラフ（`Value`, `Seq`, `Record`）と serde_json ブリッジ
//! - **iter**: `each`（打ち切り可能な走査）、`r_each` / `r_each_async`（逐次走査）
//! - **search**: `find_index`, `find`, `filter`
//! - **transform**: null-safe な `map`
//! - **guard**: `try_fn` 系（失敗を握りつぶす呼び出し）
//! - **clone**: 循環参照で止まる `clone_deep`
//! - **error**: `CollkitError`

pub mod clone;
pub mod error;
pub mod guard;
pub mod iter;
pub mod search;
pub mod transform;
pub mod value;

pub use clone::{CloneOptions, CycleMode, Visited, clone_deep, clone_deep_in, clone_deep_with};
pub use error::CollkitError;
pub use guard::{try_fn, try_fn_or_else, try_unwind, try_unwind_or_else};
pub use iter::{Absent, Advance, AsyncVisitor, Each, IntoFlow, Key, each, r_each, r_each_async};
pub use search::{filter, find, find_index};
pub use transform::{map, map_value};
pub use value::{Callable, Kind, Record, Seq, Value};
