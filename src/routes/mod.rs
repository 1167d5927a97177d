use std::collections::HashMap;

pub mod coins;
pub mod health;
pub mod market;

/// Decodes a raw query string into name -> value. A repeated name keeps its
/// first value, so `?ids=a&ids=b` reads as `ids=a`.
pub fn first_query_values(raw: Option<&str>) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for (name, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
        values.entry(name.into_owned()).or_insert_with(|| value.into_owned());
    }
    values
}
