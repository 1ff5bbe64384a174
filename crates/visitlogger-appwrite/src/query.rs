//! Appwrite query-string builders.
//!
//! The documents API takes repeated `queries[]` parameters, each a JSON
//! object naming the method, the attribute, and its values. Only the five
//! capabilities this service relies on are built here: equality filter,
//! creation-time lower bound, descending sort, limit, and offset.

use serde_json::json;

pub fn equal(attribute: &str, value: &str) -> String {
    json!({ "method": "equal", "attribute": attribute, "values": [value] }).to_string()
}

pub fn greater_than_equal(attribute: &str, value: &str) -> String {
    json!({ "method": "greaterThanEqual", "attribute": attribute, "values": [value] }).to_string()
}

pub fn order_desc(attribute: &str) -> String {
    json!({ "method": "orderDesc", "attribute": attribute }).to_string()
}

pub fn limit(count: u64) -> String {
    json!({ "method": "limit", "values": [count] }).to_string()
}

pub fn offset(count: u64) -> String {
    json!({ "method": "offset", "values": [count] }).to_string()
}
