//! Search criteria: the structured input of the filter compiler.
//!
//! A [`SearchCriteria`] is an open, insertion-ordered map from logical field
//! name to [`FieldValue`]. Any key is allowed; the compiler maps it to a
//! column with [`column_name`](crate::column_name).

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// ── Scalar ──────────────────────────────────────────────────────────

/// A single literal operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Contributes nothing to the filter.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Rendered as a quoted `YYYY-MM-DD` literal.
    Date(NaiveDate),
    /// Rendered as a quoted RFC 3339 literal (UTC, second precision).
    DateTime(DateTime<Utc>),
}

impl Scalar {
    fn from_json(value: Value) -> Self {
        match value {
            Value::Bool(b) => Scalar::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Scalar::Int(i),
                None => n.as_f64().map(Scalar::Float).unwrap_or(Scalar::Null),
            },
            Value::String(s) => Scalar::Str(s),
            // Nested containers have no literal form.
            Value::Null | Value::Array(_) | Value::Object(_) => Scalar::Null,
        }
    }
}

// ── OperatorObject ──────────────────────────────────────────────────

/// Comparison operators, in their declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Like,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Like,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Like => "like",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::In => "in",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }
}

/// Operand attached to one operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

/// Per-field map of operators to operands. Present operators are ANDed.
///
/// ```ignore
/// let price = OperatorObject::new().gte(100).lte(500);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatorObject {
    operands: [Option<Operand>; 8],
}

impl OperatorObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operand for `op`, replacing any previous one.
    pub fn set(mut self, op: Operator, operand: Operand) -> Self {
        self.operands[op as usize] = Some(operand);
        self
    }

    pub fn eq(self, v: impl Into<Scalar>) -> Self {
        self.set(Operator::Eq, Operand::Scalar(v.into()))
    }

    pub fn ne(self, v: impl Into<Scalar>) -> Self {
        self.set(Operator::Ne, Operand::Scalar(v.into()))
    }

    pub fn like(self, v: impl Into<Scalar>) -> Self {
        self.set(Operator::Like, Operand::Scalar(v.into()))
    }

    pub fn gt(self, v: impl Into<Scalar>) -> Self {
        self.set(Operator::Gt, Operand::Scalar(v.into()))
    }

    pub fn gte(self, v: impl Into<Scalar>) -> Self {
        self.set(Operator::Gte, Operand::Scalar(v.into()))
    }

    pub fn lt(self, v: impl Into<Scalar>) -> Self {
        self.set(Operator::Lt, Operand::Scalar(v.into()))
    }

    pub fn lte(self, v: impl Into<Scalar>) -> Self {
        self.set(Operator::Lte, Operand::Scalar(v.into()))
    }

    /// `in` operator: matches any of `values`.
    pub fn in_list<T: Into<Scalar>>(self, values: impl IntoIterator<Item = T>) -> Self {
        let list = values.into_iter().map(Into::into).collect();
        self.set(Operator::In, Operand::List(list))
    }

    /// Present operators with their operands, in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (Operator, &Operand)> + '_ {
        Operator::ALL
            .into_iter()
            .zip(self.operands.iter())
            .filter_map(|(op, operand)| operand.as_ref().map(|o| (op, o)))
    }

    pub fn is_empty(&self) -> bool {
        self.operands.iter().all(Option::is_none)
    }

    fn from_json(map: serde_json::Map<String, Value>) -> Self {
        let mut ops = OperatorObject::new();
        for (name, value) in map {
            let Some(op) = Operator::parse(&name) else {
                tracing::debug!(operator = %name, "ignoring unknown filter operator");
                continue;
            };
            let operand = match value {
                Value::Array(items) => Operand::List(items.into_iter().map(Scalar::from_json).collect()),
                other => Operand::Scalar(Scalar::from_json(other)),
            };
            ops = ops.set(op, operand);
        }
        ops
    }
}

// ── FieldValue ──────────────────────────────────────────────────────

/// Value attached to one criteria field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// `FIELD eq <literal>`.
    Scalar(Scalar),
    /// One clause per present operator, ANDed.
    Ops(OperatorObject),
    /// OR-group of `eq` clauses.
    List(Vec<Scalar>),
}

impl FieldValue {
    /// Interpret a JSON value: objects are operator objects, arrays are
    /// OR-lists, everything else is a scalar.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => FieldValue::Ops(OperatorObject::from_json(map)),
            Value::Array(items) => FieldValue::List(items.into_iter().map(Scalar::from_json).collect()),
            other => FieldValue::Scalar(Scalar::from_json(other)),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(FieldValue::from_json)
    }
}

impl From<OperatorObject> for FieldValue {
    fn from(ops: OperatorObject) -> Self {
        FieldValue::Ops(ops)
    }
}

impl From<Scalar> for FieldValue {
    fn from(s: Scalar) -> Self {
        FieldValue::Scalar(s)
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Scalar>, const N: usize> From<[T; N]> for FieldValue {
    fn from(items: [T; N]) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(v: $ty) -> Self {
                    Scalar::$variant(v.into())
                }
            }

            impl From<$ty> for FieldValue {
                fn from(v: $ty) -> Self {
                    FieldValue::Scalar(Scalar::from(v))
                }
            }
        )*
    };
}

scalar_from! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u32 => Int,
    f64 => Float,
    String => Str,
    &str => Str,
    NaiveDate => Date,
    DateTime<Utc> => DateTime,
}

// ── SearchCriteria ──────────────────────────────────────────────────

/// Open map of logical field name → value, iterated in insertion order.
///
/// `None` values stand for "undefined" and are skipped by the compiler.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SearchCriteria {
    fields: IndexMap<String, Option<FieldValue>>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Builder form that records `None` as an undefined field.
    pub fn with_opt<V: Into<FieldValue>>(mut self, field: impl Into<String>, value: Option<V>) -> Self {
        self.fields.insert(field.into(), value.map(Into::into));
        self
    }

    /// Set a field. Re-inserting an existing key replaces its value and
    /// keeps its original position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), Some(value.into()));
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.shift_remove(field).flatten()
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> + '_ {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for SearchCriteria {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut criteria = SearchCriteria::new();
        for (k, v) in iter {
            criteria.insert(k, v);
        }
        criteria
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_is_kept() {
        let c = SearchCriteria::new().with("b", 1).with("a", 2).with("c", 3);
        let keys: Vec<&str> = c.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn reinsert_keeps_position() {
        let mut c = SearchCriteria::new().with("a", 1).with("b", 2);
        c.insert("a", 9);
        let keys: Vec<&str> = c.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(c.get("a"), Some(&FieldValue::Scalar(Scalar::Int(9))));
    }

    #[test]
    fn from_json_shapes() {
        let c: SearchCriteria = serde_json::from_str(
            r#"{"status": 1, "code": "A", "tags": ["x", "y"], "price": {"gte": 10, "lt": 2.5}, "gone": null}"#,
        )
        .unwrap();

        assert_eq!(c.len(), 5);
        assert_eq!(c.get("status"), Some(&FieldValue::Scalar(Scalar::Int(1))));
        assert_eq!(c.get("code"), Some(&FieldValue::Scalar(Scalar::Str("A".into()))));
        assert_eq!(c.get("tags"), Some(&FieldValue::from(["x", "y"])));
        assert_eq!(
            c.get("price"),
            Some(&FieldValue::Ops(OperatorObject::new().gte(10).lt(2.5)))
        );
        assert_eq!(c.get("gone"), None);
    }

    #[test]
    fn json_unknown_operator_is_ignored() {
        let c: SearchCriteria = serde_json::from_str(r#"{"a": {"between": [1, 2], "eq": 3}}"#).unwrap();
        assert_eq!(c.get("a"), Some(&FieldValue::Ops(OperatorObject::new().eq(3))));
    }

    #[test]
    fn json_in_operator_takes_list() {
        let c: SearchCriteria = serde_json::from_str(r#"{"a": {"in": ["x", "y"]}}"#).unwrap();
        assert_eq!(c.get("a"), Some(&FieldValue::Ops(OperatorObject::new().in_list(["x", "y"]))));
    }

    #[test]
    fn operators_iterate_in_declared_order() {
        let ops = OperatorObject::new().lte(5).ne(0).gt(1);
        let order: Vec<Operator> = ops.iter().map(|(op, _)| op).collect();
        assert_eq!(order, [Operator::Ne, Operator::Gt, Operator::Lte]);
    }

    #[test]
    fn operator_parse_round_trip() {
        for op in Operator::ALL {
            assert_eq!(Operator::parse(op.as_str()), Some(op));
        }
        assert_eq!(Operator::parse("between"), None);
    }

    #[test]
    fn with_opt_none_is_recorded_as_undefined() {
        let c = SearchCriteria::new().with_opt("a", None::<i32>);
        assert_eq!(c.len(), 1);
        assert_eq!(c.get("a"), None);
    }
}
