use serde::{Deserialize, Deserializer, Serialize};

/// `[longitude, latitude]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates(pub f64, pub f64);

impl Coordinates {
    pub fn longitude(&self) -> f64 {
        self.0
    }

    pub fn latitude(&self) -> f64 {
        self.1
    }
}

/// JSON `null` 視同欄位缺漏，回傳預設值
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A shipping port keyed by its UN/LOCODE.
///
/// `unloc` never comes from the JSON value; the importer sets it from the
/// object key the value was stored under.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Port {
    #[serde(skip_deserializing)]
    pub unloc: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<String>>,
    pub coordinates: Option<Coordinates>,
    #[serde(deserialize_with = "null_as_default")]
    pub province: String,
    #[serde(deserialize_with = "null_as_default")]
    pub timezone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub unlocs: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
}
