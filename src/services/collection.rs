//! Collection operations
//!
//! Pure functions over a loaded collection: id lookup, replacement, removal,
//! name search, field sort, and the numeric aggregates. Handlers load the
//! collection, call into here, and persist the result if needed.

use crate::state::record::{record_id, NAME_FIELD};
use crate::state::{Collection, Record};
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Largest integer magnitude an `f64` holds exactly
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Find the first record whose `id` equals `id`
pub fn find_by_id<'a>(records: &'a [Record], id: &str) -> Option<&'a Record> {
    records.iter().find(|record| record_id(record) == Some(id))
}

/// Replace the first record whose `id` equals `id`, keeping its position
///
/// The replacement is stored as given; its own `id` may differ from `id`.
/// Returns `false` and leaves the collection untouched if nothing matched.
pub fn replace_by_id(records: &mut Collection, id: &str, replacement: Record) -> bool {
    match records.iter().position(|record| record_id(record) == Some(id)) {
        Some(index) => {
            records[index] = replacement;
            true
        }
        None => false,
    }
}

/// Remove every record whose `id` equals `id`, returning how many went
pub fn remove_by_id(records: &mut Collection, id: &str) -> usize {
    let before = records.len();
    records.retain(|record| record_id(record) != Some(id));
    before - records.len()
}

/// Keep the records whose `name` is a string containing `query`
///
/// Matching is a case-sensitive substring test. Records whose `name` is
/// missing or not a string never match.
pub fn search_by_name(records: Collection, query: &str) -> Collection {
    records
        .into_iter()
        .filter(|record| {
            record
                .get(NAME_FIELD)
                .and_then(Value::as_str)
                .is_some_and(|name| name.contains(query))
        })
        .collect()
}

/// Stable ascending sort of the collection by `field`
///
/// See [`compare_field_values`] for how values of different types order.
pub fn sort_by_field(mut records: Collection, field: &str) -> Collection {
    records.sort_by(|a, b| compare_field_values(a.get(field), b.get(field)));
    records
}

/// Ordering class of a field value when types differ
fn class_rank(value: Option<&Value>) -> u8 {
    match value {
        Some(Value::Number(_)) => 0,
        Some(Value::String(_)) => 1,
        Some(Value::Bool(_)) => 2,
        _ => 3,
    }
}

/// Three-way comparison of two field values
///
/// Numbers, strings and booleans compare naturally against their own type.
/// Across types, values order by class: numbers, then strings, then
/// booleans, then everything else. Missing, null, object and array values
/// all tie, so a stable sort leaves them in input order at the end.
pub fn compare_field_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => compare_numbers(x, y),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => class_rank(a).cmp(&class_rank(b)),
    }
}

fn compare_numbers(x: &Number, y: &Number) -> Ordering {
    match (exact_integer(x), exact_integer(y)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(a), None) => compare_integer_to_float(a, y.as_f64().unwrap_or(0.0)),
        (None, Some(b)) => compare_integer_to_float(b, x.as_f64().unwrap_or(0.0)).reverse(),
        (None, None) => {
            let a = x.as_f64().unwrap_or(0.0);
            let b = y.as_f64().unwrap_or(0.0);
            a.total_cmp(&b)
        }
    }
}

fn exact_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

// Compared without rounding the integer through f64, so large integers
// stay ordered against floats that only approximate them.
fn compare_integer_to_float(int: i128, float: f64) -> Ordering {
    const I128_BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    let floor = float.floor();
    if floor >= I128_BOUND {
        return Ordering::Less;
    }
    if floor < -I128_BOUND {
        return Ordering::Greater;
    }
    match int.cmp(&(floor as i128)) {
        Ordering::Equal if float > floor => Ordering::Less,
        other => other,
    }
}

/// Numeric values of `field`, in collection order
///
/// Anything that is not a JSON number is skipped, including numeric strings.
pub fn numeric_values(records: &[Record], field: &str) -> Vec<f64> {
    records
        .iter()
        .filter_map(|record| record.get(field).and_then(Value::as_f64))
        .collect()
}

/// Arithmetic mean, or `None` for no values
pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    Some(sum / values.len() as f64)
}

/// Median, or `None` for no values
///
/// Even counts take the mean of the two middle values.
pub fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// Render an aggregate as JSON
///
/// `None` becomes `null`. Whole numbers are emitted as integers so `35.0`
/// serializes as `35`.
pub fn aggregate_value(value: Option<f64>) -> Value {
    match value {
        Some(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < MAX_EXACT_INT => {
            Value::from(v as i64)
        }
        Some(v) => Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null),
        None => Value::Null,
    }
}
