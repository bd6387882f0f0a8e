//! serde_json bridge.
//!
//! - JSON → `Value`: 常に新しい、循環のないグラフになる
//! - `Value` → JSON: 循環・関数・非有限数はエラー（`CollkitError`）

use super::{Record, Seq, Value};
use crate::error::CollkitError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number};

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect::<Seq>())
            }
            serde_json::Value::Object(map) => Value::Record(Record::from_entries(
                map.into_iter().map(|(k, v)| (k, Value::from(v))),
            )),
        }
    }
}

impl Value {
    /// Export to JSON.
    ///
    /// `undefined` record fields are dropped and `undefined` array slots become
    /// `null`. Dates are written as RFC 3339 strings.
    pub fn to_json(&self) -> Result<serde_json::Value, CollkitError> {
        to_json_inner(self, &mut Vec::new())
    }
}

fn to_json_inner(value: &Value, path: &mut Vec<usize>) -> Result<serde_json::Value, CollkitError> {
    let json = match value {
        Value::Undefined | Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Value::Number(to_number(*n)?),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Date(at) => serde_json::Value::String(at.to_rfc3339()),
        Value::Function(_) => return Err(CollkitError::Unrepresentable("function")),
        Value::Array(seq) => {
            enter(path, seq.addr())?;
            let items = seq
                .to_vec()
                .iter()
                .map(|item| to_json_inner(item, path))
                .collect::<Result<Vec<_>, _>>()?;
            path.pop();
            serde_json::Value::Array(items)
        }
        Value::Record(record) => {
            enter(path, record.addr())?;
            let mut map = Map::new();
            for (key, item) in record.entries() {
                if item.is_undefined() {
                    continue;
                }
                map.insert(key, to_json_inner(&item, path)?);
            }
            path.pop();
            serde_json::Value::Object(map)
        }
    };
    Ok(json)
}

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Integral values go out as JSON integers so `1` stays `1`, not `1.0`.
fn to_number(n: f64) -> Result<Number, CollkitError> {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Ok(Number::from(n as i64));
    }
    Number::from_f64(n).ok_or(CollkitError::NonFiniteNumber(n))
}

fn enter(path: &mut Vec<usize>, addr: usize) -> Result<(), CollkitError> {
    if path.contains(&addr) {
        return Err(CollkitError::Cycle);
    }
    path.push(addr);
    Ok(())
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}
