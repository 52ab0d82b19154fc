//! Filter and ordering evaluation shared by the backends.

use std::cmp::Ordering;

use serde_json::Value;

use super::types::{Document, Filter, FilterOp, OrderBy};

/// Compares two JSON scalars of the same kind.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
        },
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn matches_filter(doc: &Document, filter: &Filter) -> bool {
    let Some(actual) = doc.field(&filter.field) else {
        return false;
    };
    let ordering = compare(actual, &filter.value);
    match filter.op {
        FilterOp::Eq => ordering == Some(Ordering::Equal),
        FilterOp::Ne => ordering != Some(Ordering::Equal),
        FilterOp::Lt => ordering == Some(Ordering::Less),
        FilterOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        FilterOp::Gt => ordering == Some(Ordering::Greater),
        FilterOp::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
    }
}

/// True when `doc` satisfies every filter.
pub(crate) fn matches_all(doc: &Document, filters: &[Filter]) -> bool {
    filters.iter().all(|f| matches_filter(doc, f))
}

/// Sorts documents by `order`. Documents lacking the field sort last; ties
/// keep id order.
pub(crate) fn sort(docs: &mut [Document], order: Option<&OrderBy>) {
    docs.sort_by(|a, b| a.id.cmp(&b.id));
    let Some(order) = order else {
        return;
    };
    docs.sort_by(|a, b| {
        match (a.field(&order.field), b.field(&order.field)) {
            (Some(x), Some(y)) => {
                let ord = compare(x, y).unwrap_or(Ordering::Equal);
                if order.descending { ord.reverse() } else { ord }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}
