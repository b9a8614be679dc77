//! Record and collection types
//!
//! Records are schemaless JSON objects. The only field the server gives
//! meaning to is `id`, and even that is not required to be present or unique.

use serde_json::{Map, Value};

/// Name of the identifying field of a record
pub const ID_FIELD: &str = "id";

/// Name of the field matched by `GET /search`
pub const NAME_FIELD: &str = "name";

/// One entry of the collection: an open-ended mapping of field name to value
pub type Record = Map<String, Value>;

/// The full ordered sequence of records, as persisted in the backing document
pub type Collection = Vec<Record>;

/// Get the record's `id` when it is a JSON string
///
/// Non-string ids never match a path parameter, mirroring strict equality.
pub fn record_id(record: &Record) -> Option<&str> {
    record.get(ID_FIELD).and_then(Value::as_str)
}
