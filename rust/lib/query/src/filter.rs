//! Filter-expression compiler.
//!
//! Turns a [`SearchCriteria`] into a predicate in the provider's OData-like
//! grammar:
//!
//! ```text
//! expr    := clause (" and " clause)*
//! clause  := COLUMN " " op " " literal | "(" clause (" or " clause)+ ")"
//! op      := eq | ne | like | gt | gte | lt | lte
//! literal := 'quoted string' | number | true | false
//! ```
//!
//! Compilation never fails. Values with no literal form contribute nothing,
//! and a criteria object that produces no clause compiles to `None` so the
//! caller can omit `q` entirely.

use chrono::SecondsFormat;

use crate::column::column_name;
use crate::criteria::{FieldValue, Operand, Operator, Scalar, SearchCriteria};

/// Compile criteria into a filter string, or `None` when no clause results.
pub fn compile_filter(criteria: &SearchCriteria) -> Option<String> {
    let clauses: Vec<String> = criteria
        .iter()
        .filter_map(|(field, value)| field_clause(&column_name(field), value?))
        .collect();

    let filter = join(clauses, " and ");
    tracing::trace!(?filter, fields = criteria.len(), "compiled filter");
    filter
}

/// `"<COLUMN> like '<value>*'"` for a prefix search on one field.
///
/// The trailing `*` is appended here; the general compiler never adds one.
pub fn wildcard_search(field: &str, value: &str) -> String {
    format!("{} like {}", column_name(field), quote(&format!("{value}*")))
}

/// Join pre-built filter fragments with `" and "`, verbatim.
///
/// Fragments are not parsed or re-parenthesized. Blank fragments are
/// skipped; `None` when nothing is left.
pub fn build_query<I, S>(fragments: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parts: Vec<String> = fragments
        .into_iter()
        .filter(|f| !f.as_ref().trim().is_empty())
        .map(|f| f.as_ref().to_string())
        .collect();
    join(parts, " and ")
}

/// Render a scalar as a filter literal. `None` for values with no literal
/// form (`Null`, non-finite floats).
///
/// Strings are single-quoted with embedded quotes doubled (`O'Brien` →
/// `'O''Brien'`).
pub fn literal(value: &Scalar) -> Option<String> {
    match value {
        Scalar::Null => None,
        Scalar::Bool(b) => Some(b.to_string()),
        Scalar::Int(i) => Some(i.to_string()),
        Scalar::Float(f) if f.is_finite() => Some(f.to_string()),
        Scalar::Float(_) => None,
        Scalar::Str(s) => Some(quote(s)),
        Scalar::Date(d) => Some(quote(&d.format("%Y-%m-%d").to_string())),
        Scalar::DateTime(dt) => Some(quote(&dt.to_rfc3339_opts(SecondsFormat::Secs, true))),
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn field_clause(column: &str, value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Scalar(s) => comparison(column, Operator::Eq, s),
        FieldValue::List(items) => any_of(column, items),
        FieldValue::Ops(ops) => {
            let parts: Vec<String> = ops
                .iter()
                .filter_map(|(op, operand)| match operand {
                    Operand::List(items) => any_of(column, items),
                    // `in` with a lone operand is a one-element list.
                    Operand::Scalar(s) if op == Operator::In => comparison(column, Operator::Eq, s),
                    Operand::Scalar(s) => comparison(column, op, s),
                })
                .collect();
            join(parts, " and ")
        }
    }
}

fn comparison(column: &str, op: Operator, value: &Scalar) -> Option<String> {
    literal(value).map(|lit| format!("{column} {} {lit}", op.as_str()))
}

/// OR-group of `eq` clauses, parenthesized when it has more than one member.
fn any_of(column: &str, items: &[Scalar]) -> Option<String> {
    let mut parts: Vec<String> = items
        .iter()
        .filter_map(|item| comparison(column, Operator::Eq, item))
        .collect();
    match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ => Some(format!("({})", parts.join(" or "))),
    }
}

fn join(parts: Vec<String>, sep: &str) -> Option<String> {
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(sep))
    }
}
