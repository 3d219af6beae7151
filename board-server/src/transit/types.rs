//! Transit backend response DTOs.
//!
//! These map directly to the JSON records returned by the backend. Times
//! stay as raw tokens here; see [`super::convert`].

use serde::{Deserialize, Deserializer};

/// One record from `GET /departures?stopId=...`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDeparture {
    /// Line label. Some feeds send it as a JSON number.
    #[serde(deserialize_with = "string_or_number")]
    pub line: String,

    /// Free-text destination.
    pub destination: String,

    /// Raw time token: `">>"`, `"<N>min"` or `"HH:MM"`.
    pub departure_time: String,
}

/// One record from `GET /train/departures?station=...`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainDeparture {
    /// Train number, e.g. "IC 3821".
    #[serde(deserialize_with = "string_or_number")]
    pub train_number: String,

    /// Free-text destination.
    pub destination: String,

    /// Raw time token, same encoding as [`StopDeparture::departure_time`].
    pub departure_time: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Number(u64),
    }

    Ok(match Label::deserialize(deserializer)? {
        Label::Text(s) => s,
        Label::Number(n) => n.to_string(),
    })
}
