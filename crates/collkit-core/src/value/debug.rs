//! Cycle-safe `Debug` rendering.
//!
//! 現在の出力経路上にあるコンテナに再び出会ったら `[Circular]` と書く。
//! 共有されているだけ（経路上にない）の部分構造は普通に展開する。

use super::Value;
use std::fmt;

pub(super) fn write_value(
    f: &mut fmt::Formatter<'_>,
    value: &Value,
    path: &mut Vec<usize>,
) -> fmt::Result {
    match value {
        Value::Undefined => f.write_str("undefined"),
        Value::Null => f.write_str("null"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Number(n) => write!(f, "{n}"),
        Value::String(s) => write!(f, "{s:?}"),
        Value::Date(at) => write!(f, "Date({})", at.to_rfc3339()),
        Value::Function(_) => f.write_str("[Function]"),
        Value::Array(seq) => {
            if path.contains(&seq.addr()) {
                return f.write_str("[Circular]");
            }
            path.push(seq.addr());
            f.write_str("[")?;
            for (i, item) in seq.to_vec().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item, path)?;
            }
            path.pop();
            f.write_str("]")
        }
        Value::Record(record) => {
            if path.contains(&record.addr()) {
                return f.write_str("[Circular]");
            }
            path.push(record.addr());
            f.write_str("{")?;
            for (i, (key, item)) in record.entries().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key}: ")?;
                write_value(f, item, path)?;
            }
            path.pop();
            f.write_str("}")
        }
    }
}
