//! Value - 動的な値グラフ
//!
//! sequence / record / scalar を tagged union（`Value`）で表現する。
//! `Seq` と `Record` は参照ハンドル（`Rc<RefCell<..>>`）なので、
//! `Clone` は参照のコピーになる（同一性は `ptr_eq` で比較）。
//! 中身ごと複製したいときは `crate::clone::clone_deep` を使う。
//!
//! # 構成
//! - **seq**: 順序付きの sequence ハンドル
//! - **record**: 挿入順を保つ string key の record ハンドル
//! - **debug**: 循環参照でも止まる `Debug` 出力
//! - **json**: serde_json との相互変換

mod debug;
pub mod json;
pub mod record;
pub mod seq;

pub use self::record::Record;
pub use self::seq::Seq;

use chrono::{DateTime, Utc};
use std::fmt;
use std::rc::Rc;

/// A node in a value graph.
#[derive(Clone, Default)]
pub enum Value {
    /// The absent-value sentinel.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Seq),
    Record(Record),
    /// Opaque. Copied by reference, never cloned.
    Date(Rc<DateTime<Utc>>),
    /// Opaque. Copied by reference, never cloned.
    Function(Callable),
}

/// Coarse classification used at every traversal point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Sequence,
    Record,
    /// Numbers, strings, booleans, null and undefined.
    Scalar,
    /// Dates and functions: objects that are not containers.
    Opaque,
}

/// A shared, reference-identified function value.
#[derive(Clone)]
pub struct Callable(Rc<dyn Fn(&[Value]) -> Value>);

impl Callable {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        Self(Rc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }

    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Value {
    /// Build a fresh sequence from anything convertible into values.
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    /// Build a fresh record. Later duplicates of a key overwrite earlier ones
    /// but keep the first position.
    pub fn record<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Record(Record::from_entries(entries))
    }

    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        Value::Function(Callable::new(f))
    }

    pub fn date(at: DateTime<Utc>) -> Self {
        Value::Date(Rc::new(at))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Array(_) => Kind::Sequence,
            Value::Record(_) => Kind::Record,
            Value::Date(_) | Value::Function(_) => Kind::Opaque,
            _ => Kind::Scalar,
        }
    }

    /// True for sequences and records, the only kinds `clone_deep` copies.
    pub fn is_container(&self) -> bool {
        matches!(self.kind(), Kind::Sequence | Kind::Record)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// `null` or `undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&Seq> {
        match self {
            Value::Array(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Field lookup on a record. `None` for missing keys and non-records.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.as_record().and_then(|r| r.get(key))
    }

    /// Element lookup on a sequence. `None` out of bounds and for non-sequences.
    pub fn index(&self, i: usize) -> Option<Value> {
        self.as_seq().and_then(|s| s.get(i))
    }

    /// Reference identity. Containers and opaque values compare by pointer;
    /// scalars are never identical to anything.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Record(a), Value::Record(b)) => a.ptr_eq(b),
            (Value::Date(a), Value::Date(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// Structural equality with an identity short-circuit.
///
/// Two distinct graphs that are both cyclic may recurse without end; compare
/// those by `ptr_eq` instead.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug::write_value(f, self, &mut Vec::new())
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[Function]")
    }
}

// ========================================
// From 変換
// ========================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

from_number!(i32, i64, u32, u64, usize, f32, f64);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Seq> for Value {
    fn from(seq: Seq) -> Self {
        Value::Array(seq)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Seq::from_vec(items))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(at: DateTime<Utc>) -> Self {
        Value::date(at)
    }
}

/// `None` becomes `null`, mirroring an explicitly empty field.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::undefined(Value::Undefined, Kind::Scalar)]
    #[case::null(Value::Null, Kind::Scalar)]
    #[case::number(Value::from(1), Kind::Scalar)]
    #[case::string(Value::from("test"), Kind::Scalar)]
    #[case::array(Value::array([1, 2]), Kind::Sequence)]
    #[case::record(Value::record([("a", 1)]), Kind::Record)]
    #[case::date(Value::date(Utc::now()), Kind::Opaque)]
    #[case::function(Value::function(|_| Value::Null), Kind::Opaque)]
    fn kind_classifies_every_variant(#[case] value: Value, #[case] expected: Kind) {
        assert_eq!(value.kind(), expected);
        assert_eq!(
            value.is_container(),
            matches!(expected, Kind::Sequence | Kind::Record)
        );
    }

    #[test]
    fn clone_shares_the_same_container() {
        let a = Value::array([1, 2, 3]);
        let b = a.clone();
        assert!(a.ptr_eq(&b));

        b.as_seq().unwrap().push(Value::from(4));
        assert_eq!(a.as_seq().unwrap().len(), 4);
    }

    #[test]
    fn structural_equality_ignores_identity() {
        let a = Value::record([("x", Value::array([1, 2, 3]))]);
        let b = Value::record([("x", Value::array([1, 2, 3]))]);
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn scalars_are_never_identical() {
        assert!(!Value::from(1).ptr_eq(&Value::from(1)));
        assert!(!Value::Null.ptr_eq(&Value::Null));
    }

    #[test]
    fn functions_compare_by_identity() {
        let f = Value::function(|args| args.first().cloned().unwrap_or_default());
        let g = Value::function(|args| args.first().cloned().unwrap_or_default());
        assert_eq!(f, f.clone());
        assert_ne!(f, g);

        let Value::Function(callable) = &f else {
            panic!("expected a function");
        };
        assert_eq!(callable.call(&[Value::from(7)]), Value::from(7));
    }

    #[test]
    fn option_converts_to_null() {
        assert!(Value::from(None::<i32>).is_null());
        assert_eq!(Value::from(Some("a")), Value::from("a"));
    }

    #[test]
    fn accessors_reject_other_kinds() {
        let r = Value::record([("a", 1)]);
        assert_eq!(r.get("a"), Some(Value::from(1)));
        assert_eq!(r.get("missing"), None);
        assert_eq!(r.index(0), None);
        assert_eq!(Value::from(3).as_str(), None);
        assert_eq!(Value::from(true).as_bool(), Some(true));
    }
}
