//! List response normalization.
//!
//! The backend serves lists in several shapes depending on the endpoint's age.
//! [`normalize_list`] folds all of them into a [`ResultPage`]:
//!
//! ```text
//! { "data": [...], "pagination": { "total", "totalPages", ... } }   paginated
//! { "data": { "data": [...], "pagination": {...} } }               wrapped paginated
//! { "<collection>": [...], "totalItems", "totalPages" }            legacy collection
//! { "data": [...] }                                                unpaginated
//! [ ... ]                                                          bare array
//! anything else                                                    empty page
//! ```

use crate::domain::{page_count, Item, ResultPage};
use serde_json::Value;

/// Converts a list response into a page.
///
/// `collection_key` names the legacy collection field of the dataset, if any.
/// `page_size` is used to derive `total_pages` when the response omits it.
///
/// # Examples
///
/// ```
/// use dexquery::source::normalize_list;
/// use serde_json::json;
///
/// let page = normalize_list(
///     json!({ "fakemon": [{ "number": 1 }], "totalItems": 31, "totalPages": 2 }),
///     Some("fakemon"),
///     30,
/// );
/// assert_eq!(page.items.len(), 1);
/// assert_eq!(page.total_pages, 2);
/// ```
#[must_use]
pub fn normalize_list(response: Value, collection_key: Option<&str>, page_size: u32) -> ResultPage {
    match response {
        Value::Array(values) => unpaginated(values),
        Value::Object(mut body) => {
            let has_list = matches!(body.get("data"), Some(Value::Array(_)));
            if let (true, Some(pagination)) = (has_list, body.get("pagination").cloned()) {
                if let Some(Value::Array(values)) = body.remove("data") {
                    let items = collect_items(values);
                    let total = read_u64(&pagination, "total").unwrap_or(items.len() as u64);
                    return paged(items, total, read_u32(&pagination, "totalPages"), page_size);
                }
            }

            if let Some(key) = collection_key {
                if let Some(Value::Array(values)) = body.remove(key) {
                    let items = collect_items(values);
                    let body = Value::Object(body);
                    let total = read_u64(&body, "totalItems")
                        .or_else(|| read_u64(&body, "total"))
                        .unwrap_or(0);
                    return paged(items, total, read_u32(&body, "totalPages"), page_size);
                }
            }

            match body.remove("data") {
                Some(Value::Array(values)) => unpaginated(values),
                Some(nested @ Value::Object(_)) => normalize_list(nested, collection_key, page_size),
                _ => ResultPage::default(),
            }
        }
        _ => ResultPage::default(),
    }
}

fn collect_items(values: Vec<Value>) -> Vec<Item> {
    values.into_iter().filter_map(Item::from_value).collect()
}

fn unpaginated(values: Vec<Value>) -> ResultPage {
    let items = collect_items(values);
    let total_pages = u32::from(!items.is_empty());
    ResultPage {
        total_items: items.len() as u64,
        total_pages,
        items,
    }
}

fn paged(items: Vec<Item>, total: u64, total_pages: Option<u32>, page_size: u32) -> ResultPage {
    ResultPage {
        items,
        total_items: total,
        total_pages: total_pages.unwrap_or_else(|| page_count(total, page_size)),
    }
}

fn read_u64(value: &Value, key: &str) -> Option<u64> {
    let field = value.get(key)?;
    field
        .as_u64()
        .or_else(|| field.as_str().and_then(|s| s.parse().ok()))
}

fn read_u32(value: &Value, key: &str) -> Option<u32> {
    read_u64(value, key).and_then(|n| u32::try_from(n).ok())
}
