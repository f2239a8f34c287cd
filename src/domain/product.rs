use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A marketplace listing as handed to the engine. Read-only input.
///
/// Fields the engine does not know about (e.g. `warranty`, `fssai_license`)
/// are kept in `attributes` so category requirements can be checked against them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default, deserialize_with = "text_or_number")]
    pub title: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub description: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub price: String,
    #[serde(
        default,
        deserialize_with = "optional_text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub mrp: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl ProductRecord {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = price.into();
        self
    }

    #[must_use]
    pub fn with_mrp(mut self, mrp: impl Into<String>) -> Self {
        self.mrp = Some(mrp.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Title and description joined by a single space.
    #[must_use]
    pub fn full_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    #[must_use]
    pub fn normalized_category(&self) -> String {
        self.category.trim().to_lowercase()
    }

    /// The explicit `image_url`, otherwise the first entry of `images`.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| {
                self.images
                    .first()
                    .map(String::as_str)
                    .filter(|url| !url.trim().is_empty())
            })
    }

    /// Whether `name` is present with a non-empty, non-zero, non-false value.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        match name {
            "title" => !self.title.trim().is_empty(),
            "description" => !self.description.trim().is_empty(),
            "price" => !self.price.trim().is_empty(),
            "mrp" => self.mrp.as_deref().is_some_and(|m| !m.trim().is_empty()),
            "category" => !self.category.trim().is_empty(),
            "image_url" => self
                .image_url
                .as_deref()
                .is_some_and(|u| !u.trim().is_empty()),
            "images" => !self.images.is_empty(),
            other => self.attributes.get(other).is_some_and(is_truthy),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Falsy JSON scalars (`null`, `0`, `false`) read as absent.
fn value_to_text(value: Value) -> Option<String> {
    if !is_truthy(&value) && !value.is_string() {
        return None;
    }
    match value {
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn optional_text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(Value::deserialize(deserializer)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_numeric_price() {
        let record: ProductRecord =
            serde_json::from_str(r#"{"title": "Desk Lamp", "price": 499, "mrp": null}"#).unwrap();
        assert_eq!(record.price, "499");
        assert_eq!(record.mrp, None);
    }

    #[test]
    fn test_numeric_zero_is_absent() {
        let record: ProductRecord = serde_json::from_str(
            r#"{"title": "Rice 1kg", "price": 0, "mrp": 0, "category": "food"}"#,
        )
        .unwrap();
        assert_eq!(record.mrp, None);
        assert!(!record.has_field("mrp"));
        assert!(!record.has_field("price"));

        let textual: ProductRecord =
            serde_json::from_str(r#"{"title": "Rice 1kg", "mrp": "0"}"#).unwrap();
        assert!(textual.has_field("mrp"));
    }

    #[test]
    fn test_unknown_fields_become_attributes() {
        let record: ProductRecord = serde_json::from_str(
            r#"{"title": "Rice", "category": "Food", "fssai_license": "10012345", "warranty": ""}"#,
        )
        .unwrap();
        assert!(record.has_field("fssai_license"));
        assert!(!record.has_field("warranty"));
        assert!(!record.has_field("ingredients"));
        assert_eq!(record.normalized_category(), "food");
    }

    #[test]
    fn test_falsy_attribute_values() {
        let record = ProductRecord::new("x")
            .with_attribute("a", 0)
            .with_attribute("b", false)
            .with_attribute("c", Value::Array(vec![]))
            .with_attribute("d", "12 months");
        assert!(!record.has_field("a"));
        assert!(!record.has_field("b"));
        assert!(!record.has_field("c"));
        assert!(record.has_field("d"));
    }

    #[test]
    fn test_primary_image_prefers_explicit_url() {
        let mut record = ProductRecord::new("x").with_image("https://img/2.jpg");
        assert_eq!(record.primary_image(), Some("https://img/2.jpg"));
        record.image_url = Some("https://img/1.jpg".to_string());
        assert_eq!(record.primary_image(), Some("https://img/1.jpg"));
        record.image_url = Some("  ".to_string());
        assert_eq!(record.primary_image(), Some("https://img/2.jpg"));
    }

    #[test]
    fn test_primary_image_absent() {
        let mut record = ProductRecord::new("x");
        assert_eq!(record.primary_image(), None);
        record.images.push(String::new());
        assert_eq!(record.primary_image(), None);
    }

    #[test]
    fn test_full_text() {
        let record = ProductRecord::new("Steel Bottle").with_description("1 litre");
        assert_eq!(record.full_text(), "Steel Bottle 1 litre");
    }
}
