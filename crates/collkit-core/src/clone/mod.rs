//! Clone - 循環参照に強い deep clone
//!
//! # アルゴリズム
//! 1. visited にあるコンテナ（identity 比較）→ 記録済みの値をそのまま返す（循環を断つ）
//! 2. sequence → 新しい sequence を作り、各要素を再帰的に clone
//!    （現在の再帰経路上にある sequence に再び出会ったら元の sequence を返す）
//! 3. scalar / null / undefined / opaque（date, function）→ そのまま返す
//! 4. record → visited に登録し、key の順序を保ったまま各値を再帰的に clone
//!
//! visited はトップレベルの呼び出しが所有し、再帰呼び出しは `&mut` で借りる。
//! record は visited で、sequence は再帰経路で循環を断つので、どちらの循環でも停止する。
//! 共有されているだけの sequence は出会うたびにコピーされる。
//!
//! # CycleMode
//! - `LinkOriginal`（既定）: 2 回目以降の出会いは *元の* オブジェクトを指す
//! - `Preserve`: 2 回目以降の出会いは clone 側のコピーを指す（循環・共有構造を再現）

mod visited;

pub use self::visited::Visited;

use self::visited::identity;
use crate::error::CollkitError;
use crate::value::{Record, Seq, Value};
use std::convert::Infallible;

/// What a repeat encounter of a container resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleMode {
    /// Re-link to the original object. The clone is not fully detached from
    /// the source when the source has cycles or shared parts.
    #[default]
    LinkOriginal,
    /// Re-link to the copy made at the first encounter.
    Preserve,
}

/// Options for `clone_deep_with`.
#[derive(Debug, Clone, Default)]
pub struct CloneOptions {
    pub cycles: CycleMode,

    /// Maximum container nesting, the root container counting as 1.
    /// `None` means unbounded (deep enough input exhausts the stack).
    pub max_depth: Option<usize>,
}

impl CloneOptions {
    pub fn with_cycles(mut self, cycles: CycleMode) -> Self {
        self.cycles = cycles;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Deep-copy sequences and records; scalars and opaque values are returned
/// as-is.
///
/// Never mutates `value`. A container met a second time within the same call
/// is returned by reference (the original), which is how cycles terminate.
pub fn clone_deep(value: &Value) -> Value {
    clone_deep_in(value, &mut Visited::new())
}

/// `clone_deep` with a caller-owned visited-set.
///
/// Containers already in `visited` are resolved to whatever was recorded for
/// them, so several roots cloned with the same set share one identity map.
pub fn clone_deep_in(value: &Value, visited: &mut Visited) -> Value {
    let mut cloner = Cloner {
        mode: CycleMode::LinkOriginal,
        limit: Unbounded,
        visited,
        seq_path: Vec::new(),
    };
    match cloner.clone_value(value, 1) {
        Ok(copy) => copy,
        Err(never) => match never {},
    }
}

/// Deep-copy with explicit options.
pub fn clone_deep_with(value: &Value, options: &CloneOptions) -> Result<Value, CollkitError> {
    let mut visited = Visited::new();
    let mut cloner = Cloner {
        mode: options.cycles,
        limit: DepthLimit(options.max_depth),
        visited: &mut visited,
        seq_path: Vec::new(),
    };
    cloner.clone_value(value, 1)
}

trait Limit {
    type Error;

    fn check(&self, depth: usize) -> Result<(), Self::Error>;
}

struct Unbounded;

impl Limit for Unbounded {
    type Error = Infallible;

    fn check(&self, _depth: usize) -> Result<(), Infallible> {
        Ok(())
    }
}

struct DepthLimit(Option<usize>);

impl Limit for DepthLimit {
    type Error = CollkitError;

    fn check(&self, depth: usize) -> Result<(), CollkitError> {
        match self.0 {
            Some(limit) if depth > limit => Err(CollkitError::DepthExceeded { limit }),
            _ => Ok(()),
        }
    }
}

struct Cloner<'v, L> {
    mode: CycleMode,
    limit: L,
    visited: &'v mut Visited,
    /// Sequences on the current recursion path (`LinkOriginal` only).
    seq_path: Vec<usize>,
}

impl<L: Limit> Cloner<'_, L> {
    fn clone_value(&mut self, value: &Value, depth: usize) -> Result<Value, L::Error> {
        let Some(addr) = identity(value) else {
            return Ok(value.clone());
        };
        if let Some(seen) = self.visited.resolve(addr) {
            return Ok(seen);
        }
        self.limit.check(depth)?;

        match value {
            Value::Array(seq) => self.clone_seq(addr, seq, depth),
            Value::Record(record) => self.clone_record(addr, record, depth),
            _ => Ok(value.clone()),
        }
    }

    fn clone_seq(&mut self, addr: usize, seq: &Seq, depth: usize) -> Result<Value, L::Error> {
        let copy = Seq::new();
        match self.mode {
            // sequence は経路上にある間だけ循環判定する（共有されているだけなら毎回コピー）
            CycleMode::LinkOriginal => {
                if self.seq_path.contains(&addr) {
                    return Ok(Value::Array(seq.clone()));
                }
                self.seq_path.push(addr);
            }
            CycleMode::Preserve => {
                self.enter(addr, Value::Array(seq.clone()), Value::Array(copy.clone()));
            }
        }

        let items = seq
            .to_vec()
            .iter()
            .map(|item| self.clone_value(item, depth + 1))
            .collect::<Result<Vec<_>, _>>();
        if self.mode == CycleMode::LinkOriginal {
            self.seq_path.pop();
        }
        copy.fill(items?);
        Ok(Value::Array(copy))
    }

    fn clone_record(
        &mut self,
        addr: usize,
        record: &Record,
        depth: usize,
    ) -> Result<Value, L::Error> {
        let copy = Record::new();
        self.enter(addr, Value::Record(record.clone()), Value::Record(copy.clone()));

        let entries = record
            .entries()
            .into_iter()
            .map(|(key, item)| self.clone_value(&item, depth + 1).map(|cloned| (key, cloned)))
            .collect::<Result<Vec<_>, _>>()?;
        copy.fill(entries);
        Ok(Value::Record(copy))
    }

    fn enter(&mut self, addr: usize, original: Value, copy: Value) {
        let resolved = match self.mode {
            CycleMode::LinkOriginal => original.clone(),
            CycleMode::Preserve => copy,
        };
        self.visited.enter(addr, original, resolved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn test_collection() -> Value {
        Value::array([
            Value::record([("a", 1), ("b", 2), ("c", 3)]),
            Value::record([("a", 25), ("b", 23), ("c", 44)]),
            Value::record([("a", 895), ("b", 432), ("c", 96)]),
            Value::record([("a", 302), ("b", 2904), ("c", 132)]),
        ])
    }

    fn test_object() -> Value {
        Value::record([
            ("a", test_collection()),
            ("b", Value::record([("x", 1), ("y", 2), ("z", 3)])),
            ("c", Value::array([Value::Null])),
            ("d", Value::Null),
        ])
    }

    #[test]
    fn copies_a_record() {
        let original = test_object();
        let copy = clone_deep(&original);

        assert!(!copy.ptr_eq(&original));
        assert!(!copy.get("b").unwrap().ptr_eq(&original.get("b").unwrap()));
        assert_eq!(copy, original);
    }

    #[test]
    fn copies_a_collection() {
        let original = Value::array([
            test_object(),
            Value::record([("a", 25), ("b", 23), ("c", 44)]),
        ]);
        let copy = clone_deep(&original);

        assert!(!copy.ptr_eq(&original));
        for i in 0..2 {
            assert!(!copy.index(i).unwrap().ptr_eq(&original.index(i).unwrap()));
        }
        let (orig0, copy0) = (original.index(0).unwrap(), copy.index(0).unwrap());
        assert!(!copy0.get("b").unwrap().ptr_eq(&orig0.get("b").unwrap()));
        assert!(
            !copy0.get("a").unwrap().index(0).unwrap()
                .ptr_eq(&orig0.get("a").unwrap().index(0).unwrap())
        );
    }

    #[test]
    fn nested_sequence_is_distinct_with_equal_elements() {
        let original = Value::record([("x", Value::array([1, 2, 3]))]);
        let copy = clone_deep(&original);

        let (ox, cx) = (original.get("x").unwrap(), copy.get("x").unwrap());
        assert!(!cx.ptr_eq(&ox));
        assert_eq!(cx, Value::array([1, 2, 3]));
    }

    #[rstest]
    #[case::null(Value::Null)]
    #[case::undefined(Value::Undefined)]
    #[case::zero(Value::from(0))]
    #[case::one(Value::from(1))]
    #[case::empty_string(Value::from(""))]
    #[case::string(Value::from("test"))]
    #[case::boolean(Value::from(false))]
    fn scalars_come_back_unchanged(#[case] value: Value) {
        assert_eq!(clone_deep(&value), value);
    }

    #[test]
    fn opaque_values_are_shared() {
        let date = Value::date(Utc::now());
        let func = Value::function(|_| Value::Null);
        let original = Value::record([("when", date.clone()), ("f", func.clone())]);

        let copy = clone_deep(&original);
        assert!(copy.get("when").unwrap().ptr_eq(&date));
        assert!(copy.get("f").unwrap().ptr_eq(&func));
    }

    #[test]
    fn self_reference_links_back_to_the_original() {
        let record = Record::from_entries([("n", 1)]);
        record.insert("me", record.clone());
        let original = Value::Record(record);

        let copy = clone_deep(&original);

        assert!(!copy.ptr_eq(&original));
        assert!(copy.get("me").unwrap().ptr_eq(&original));
        assert_eq!(copy.get("n"), Some(Value::from(1)));
    }

    #[test]
    fn global_like_record_clones_every_member_but_the_loop() {
        let global = Record::new();
        global.insert("process", Value::record([("pid", 1)]));
        global.insert("list", Value::array([Value::record([("k", "v")])]));
        global.insert("global", global.clone());
        let original = Value::Record(global.clone());

        let copy = clone_deep(&original);
        let copy_record = copy.as_record().unwrap();

        assert_eq!(copy_record.len(), global.len());
        for (key, value) in global.entries() {
            let cloned = copy_record.get(&key).unwrap();
            if key == "global" {
                assert!(cloned.ptr_eq(&value));
            } else {
                assert!(!cloned.ptr_eq(&value));
            }
        }
    }

    #[test]
    fn self_containing_sequence_terminates() {
        let seq = Seq::from_vec(vec![Value::from(1)]);
        seq.push(seq.clone());
        let original = Value::Array(seq);

        let copy = clone_deep(&original);

        assert!(!copy.ptr_eq(&original));
        assert!(copy.index(1).unwrap().ptr_eq(&original));
    }

    #[test]
    fn cycle_through_a_nested_sequence_terminates() {
        let root = Record::new();
        root.insert("children", Value::array([Value::Record(root.clone())]));
        let original = Value::Record(root);

        let copy = clone_deep(&original);
        let child = copy.get("children").unwrap().index(0).unwrap();
        assert!(child.ptr_eq(&original));
    }

    #[test]
    fn shared_substructure_is_copied_once() {
        let shared = Value::record([("v", 1)]);
        let original = Value::array([shared.clone(), shared.clone()]);

        let copy = clone_deep(&original);
        assert!(!copy.index(0).unwrap().ptr_eq(&shared));
        assert!(copy.index(1).unwrap().ptr_eq(&shared));
    }

    #[test]
    fn shared_sequence_is_copied_at_every_encounter() {
        let arr = Value::array([1, 2, 3]);
        let original = Value::record([("a", arr.clone()), ("b", arr.clone())]);

        let copy = clone_deep(&original);
        let (a, b) = (copy.get("a").unwrap(), copy.get("b").unwrap());

        assert!(!a.ptr_eq(&arr));
        assert!(!b.ptr_eq(&arr));
        assert!(!a.ptr_eq(&b));
        assert_eq!(b, arr);
    }

    #[test]
    fn sequence_cycle_through_a_sibling_still_terminates() {
        let inner = Seq::from_vec(vec![Value::from(1)]);
        let outer = Seq::from_vec(vec![Value::Array(inner.clone())]);
        inner.push(outer.clone());
        let original = Value::Array(outer);

        let copy = clone_deep(&original);
        let copied_inner = copy.index(0).unwrap();
        assert!(!copied_inner.ptr_eq(&Value::Array(inner)));
        assert!(copied_inner.index(1).unwrap().ptr_eq(&original));
    }

    #[test]
    fn wide_record_clones_every_key_in_order() {
        let n = 20_000;
        let original = Value::Record(Record::from_entries(
            (0..n).map(|i| (format!("k{i}"), Value::array([i]))),
        ));

        let copy = clone_deep(&original);
        let record = copy.as_record().unwrap();
        assert_eq!(record.len(), n);
        assert_eq!(record.keys()[n - 1], format!("k{}", n - 1));
        assert!(!copy.get("k0").unwrap().ptr_eq(&original.get("k0").unwrap()));
    }

    #[test]
    fn source_is_not_mutated() {
        let original = test_object();
        let before = format!("{original:?}");

        let copy = clone_deep(&original);
        copy.as_record().unwrap().insert("extra", 1);
        copy.get("b").unwrap().as_record().unwrap().insert("x", 100);

        assert_eq!(format!("{original:?}"), before);
    }

    #[test]
    fn preserve_mode_rebuilds_cycles_inside_the_copy() {
        let record = Record::from_entries([("n", 1)]);
        record.insert("me", record.clone());
        let original = Value::Record(record);

        let options = CloneOptions::default().with_cycles(CycleMode::Preserve);
        let copy = clone_deep_with(&original, &options).unwrap();

        assert!(!copy.ptr_eq(&original));
        assert!(copy.get("me").unwrap().ptr_eq(&copy));
    }

    #[test]
    fn preserve_mode_keeps_sharing() {
        let shared = Value::array([1]);
        let original = Value::record([("a", shared.clone()), ("b", shared.clone())]);

        let options = CloneOptions::default().with_cycles(CycleMode::Preserve);
        let copy = clone_deep_with(&original, &options).unwrap();

        let (a, b) = (copy.get("a").unwrap(), copy.get("b").unwrap());
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&shared));
    }

    #[rstest]
    #[case::within(3, true)]
    #[case::exact(2, true)]
    #[case::too_deep(1, false)]
    fn max_depth_bounds_nesting(#[case] limit: usize, #[case] ok: bool) {
        let original = Value::record([("x", Value::array([1, 2, 3]))]);
        let options = CloneOptions::default().with_max_depth(limit);

        let result = clone_deep_with(&original, &options);
        match result {
            Ok(copy) => {
                assert!(ok);
                assert_eq!(copy, original);
            }
            Err(err) => {
                assert!(!ok);
                assert_eq!(err, CollkitError::DepthExceeded { limit });
            }
        }
    }

    #[test]
    fn scalars_ignore_max_depth() {
        let options = CloneOptions::default().with_max_depth(0);
        assert_eq!(clone_deep_with(&Value::from(5), &options), Ok(Value::from(5)));
    }

    #[test]
    fn caller_owned_visited_is_shared_between_roots() {
        let shared = Value::record([("v", 1)]);
        let mut visited = Visited::new();

        let first = clone_deep_in(&shared, &mut visited);
        assert!(visited.contains(&shared));
        assert_eq!(visited.len(), 1);

        let second = clone_deep_in(&shared, &mut visited);
        assert!(!first.ptr_eq(&shared));
        assert!(second.ptr_eq(&shared));
    }
}
