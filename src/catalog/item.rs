use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::bucket::{bucketize, PriceBucket};

/// A catalog item as delivered by the feed backend. Immutable once loaded.
///
/// The backend is inconsistent about identifiers: any of `pid`, `id`,
/// `__pid`, `_id` may carry it, numbers and strings both occur. Resolution
/// is first-present-wins; an item with none of the four simply has no id,
/// which is a distinct condition (outfit lookup refuses it), not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "stringish", skip_serializing_if = "Option::is_none")]
    pid: Option<String>,
    #[serde(default, deserialize_with = "stringish", skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(
        default,
        rename = "__pid",
        deserialize_with = "stringish",
        skip_serializing_if = "Option::is_none"
    )]
    dunder_pid: Option<String>,
    #[serde(
        default,
        rename = "_id",
        deserialize_with = "stringish",
        skip_serializing_if = "Option::is_none"
    )]
    underscore_id: Option<String>,

    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    // the backend emits `type`; older exports used `category`
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default)]
    pub color: String,
    #[serde(default, deserialize_with = "stringish", skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub url: String,
}

// Accepts a JSON string or number, normalizing to a string. Anything else
// (null, arrays, objects) collapses to None.
fn stringish<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

fn non_empty(s: &str) -> Option<&str> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

impl Item {
    pub fn new(pid: impl Into<String>) -> Self {
        Self {
            pid: Some(pid.into()),
            ..Self::default()
        }
    }

    /// An item with no identifier at all (all four id fields absent).
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    /// Resolved identifier: first present of `pid | id | __pid | _id`.
    pub fn id(&self) -> Option<&str> {
        self.pid
            .as_deref()
            .or(self.id.as_deref())
            .or(self.dunder_pid.as_deref())
            .or(self.underscore_id.as_deref())
    }

    pub fn brand(&self) -> Option<&str> {
        non_empty(&self.brand)
    }

    /// Item kind: `type` wins over the legacy `category` field.
    pub fn kind(&self) -> Option<&str> {
        self.kind
            .as_deref()
            .and_then(non_empty)
            .or_else(|| self.category.as_deref().and_then(non_empty))
    }

    pub fn color(&self) -> Option<&str> {
        non_empty(&self.color)
    }

    pub fn price_bucket(&self) -> PriceBucket {
        bucketize(self.price.as_deref())
    }

    /// Display price: `$`-prefixed strings pass through, finite numerics
    /// render as `$X.XX`, anything else is shown as-is.
    pub fn display_price(&self) -> String {
        let Some(raw) = self.price.as_deref() else {
            return String::new();
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return String::new();
        }
        if raw.starts_with('$') {
            return raw.to_string();
        }
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => format!("${n:.2}"),
            _ => raw.to_string(),
        }
    }
}
