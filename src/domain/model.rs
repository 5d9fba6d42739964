use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A location on the Earth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinate {
    #[serde(deserialize_with = "null_as_default")]
    pub lat: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub lng: f64,
}

/// Reference to a photo that can be fetched with a separate Photo request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Photo {
    #[serde(deserialize_with = "null_as_default")]
    pub photo_reference: String,
}

/// One part of a postal address, e.g. the street or the city.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressComponent {
    #[serde(deserialize_with = "null_as_default")]
    pub long_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub short_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressGeometry {
    #[serde(deserialize_with = "null_as_default")]
    pub location: Coordinate,
}

/// The per-place record written to the output file.
///
/// Field order here is the serialized field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceDetail {
    #[serde(deserialize_with = "null_as_default")]
    pub address_components: Vec<AddressComponent>,
    #[serde(deserialize_with = "null_as_default")]
    pub formatted_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub geometry: AddressGeometry,
    #[serde(deserialize_with = "null_as_default")]
    pub photos: Vec<Photo>,
    #[serde(deserialize_with = "null_as_default")]
    pub place_id: String,
    #[serde(deserialize_with = "finite_f32")]
    pub rating: f32,
}

/// Body returned by the details endpoint.
///
/// Anything missing decodes to its zero value and unknown fields are ignored,
/// so an error body such as `{"status":"NOT_FOUND"}` still decodes, with an
/// empty `result`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResponseEnvelope {
    #[serde(deserialize_with = "null_as_default")]
    pub result: PlaceDetail,
    #[serde(deserialize_with = "string_or_none")]
    pub status: Option<String>,
    #[serde(deserialize_with = "string_or_none")]
    pub error_message: Option<String>,
}

impl ResponseEnvelope {
    /// Upstream status when it is something other than `OK`.
    pub fn upstream_failure(&self) -> Option<&str> {
        match self.status.as_deref() {
            Some("OK") | None => None,
            Some(status) => Some(status),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ratings outside the `f32` range are rejected rather than narrowed to `inf`.
fn finite_f32<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or_default();
    let narrowed = value as f32;
    if !narrowed.is_finite() {
        return Err(D::Error::custom(format!(
            "rating {} is out of range for a 32-bit float",
            value
        )));
    }
    Ok(narrowed)
}

// Diagnostic-only fields: a value of the wrong type is dropped, not fatal.
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

/// Output of the transform stage for one place id.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub detail: PlaceDetail,
    pub payload: Vec<u8>,
}
