//! Conversion of gateway payloads into typed records.
//!
//! A missing payload (the gateway's NotAvailable) maps to an empty result,
//! never to an error. A collection is converted strictly: one element that
//! does not fit the target type fails the whole collection.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Expected a JSON object with a 'value' array")]
    MissingCollection,

    #[error("Collection element {index} does not match the expected shape: {source}")]
    Element {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Object does not match the expected shape: {0}")]
    Object(#[source] serde_json::Error),
}

/// One page of a collection, with the continuation link if the API has more.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_link: Option<String>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_link: None,
        }
    }
}

pub fn to_page<T: DeserializeOwned>(json: Option<Value>) -> Result<Page<T>, MapError> {
    let Some(json) = json else {
        return Ok(Page::default());
    };

    let Value::Object(mut object) = json else {
        return Err(MapError::MissingCollection);
    };

    let next_link = object
        .get("@odata.nextLink")
        .and_then(Value::as_str)
        .map(str::to_string);

    let Some(Value::Array(elements)) = object.remove("value") else {
        return Err(MapError::MissingCollection);
    };

    let items = elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            serde_json::from_value(element).map_err(|source| MapError::Element { index, source })
        })
        .collect::<Result<Vec<T>, MapError>>()?;

    Ok(Page { items, next_link })
}

pub fn to_collection<T: DeserializeOwned>(json: Option<Value>) -> Result<Vec<T>, MapError> {
    to_page(json).map(|page| page.items)
}

pub fn to_object<T: DeserializeOwned>(json: Option<Value>) -> Result<Option<T>, MapError> {
    json.map(|value| serde_json::from_value(value).map_err(MapError::Object))
        .transpose()
}
