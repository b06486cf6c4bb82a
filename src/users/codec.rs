//! Conversion between a [`UserRecord`] and its DynamoDB attribute map.
//!
//! Decoding is strict: a stored item with a missing or type-mismatched
//! attribute is a permanent store error, never silently zero-filled.

use std::collections::HashMap;
use std::str::FromStr;

use aws_sdk_dynamodb::types::AttributeValue;

use crate::error::StoreError;
use crate::users::dto::UserRecord;

pub fn encode(record: &UserRecord) -> HashMap<String, AttributeValue> {
    HashMap::from([
        ("id".to_string(), AttributeValue::S(record.id.clone())),
        (
            "firstName".to_string(),
            AttributeValue::S(record.first_name.clone()),
        ),
        (
            "lastName".to_string(),
            AttributeValue::S(record.last_name.clone()),
        ),
        ("age".to_string(), AttributeValue::N(record.age.to_string())),
        (
            "weight".to_string(),
            AttributeValue::N(record.weight.to_string()),
        ),
        ("smoker".to_string(), AttributeValue::Bool(record.smoker)),
    ])
}

pub fn decode(item: &HashMap<String, AttributeValue>) -> Result<UserRecord, StoreError> {
    Ok(UserRecord {
        id: string_attr(item, "id")?,
        first_name: string_attr(item, "firstName")?,
        last_name: string_attr(item, "lastName")?,
        age: number_attr(item, "age")?,
        weight: number_attr(item, "weight")?,
        smoker: bool_attr(item, "smoker")?,
    })
}

fn corrupt(detail: String) -> StoreError {
    StoreError::Permanent {
        op: "decode_item",
        detail,
    }
}

fn string_attr(item: &HashMap<String, AttributeValue>, key: &str) -> Result<String, StoreError> {
    match item.get(key) {
        Some(AttributeValue::S(v)) => Ok(v.clone()),
        Some(other) => Err(corrupt(format!("attribute `{key}` is not a string: {other:?}"))),
        None => Err(corrupt(format!("attribute `{key}` is missing"))),
    }
}

fn number_attr<T>(item: &HashMap<String, AttributeValue>, key: &str) -> Result<T, StoreError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match item.get(key) {
        Some(AttributeValue::N(v)) => v
            .parse()
            .map_err(|e| corrupt(format!("attribute `{key}` is not a valid number: {e}"))),
        Some(other) => Err(corrupt(format!("attribute `{key}` is not a number: {other:?}"))),
        None => Err(corrupt(format!("attribute `{key}` is missing"))),
    }
}

fn bool_attr(item: &HashMap<String, AttributeValue>, key: &str) -> Result<bool, StoreError> {
    match item.get(key) {
        Some(AttributeValue::Bool(v)) => Ok(*v),
        Some(other) => Err(corrupt(format!("attribute `{key}` is not a boolean: {other:?}"))),
        None => Err(corrupt(format!("attribute `{key}` is missing"))),
    }
}
