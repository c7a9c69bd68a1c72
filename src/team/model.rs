use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    foundation::error::{StardeckError, StardeckResult},
    team::grouping::{RoleGroup, group_members},
};

/// One person on the team page.
///
/// Every field is optional on input. A missing key, an explicit `null` or a value of the wrong
/// type takes the default; numbers given for text fields are kept as their decimal text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub role: String,
    #[serde(
        deserialize_with = "lenient_rank",
        skip_serializing_if = "Option::is_none"
    )]
    pub group: Option<i64>,
    #[serde(
        deserialize_with = "lenient_rank",
        skip_serializing_if = "Option::is_none"
    )]
    pub subgroup: Option<i64>,
    #[serde(
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    pub image_framing: ImageFraming,
    #[serde(deserialize_with = "lenient_text")]
    pub bio: String,
    #[serde(deserialize_with = "lenient_list")]
    pub socials: Vec<SocialLink>,
}

/// Portrait crop: offset in percent of the frame, then a zoom factor.
///
/// Each number may also be given as numeric text; anything unusable keeps its default.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ImageFraming {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl Default for ImageFraming {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }
}

impl<'de> Deserialize<'de> for ImageFraming {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let d = Self::default();
        let Some(Value::Object(map)) = Option::<Value>::deserialize(deserializer)? else {
            return Ok(d);
        };
        let num = |key: &str, fallback: f64| {
            map.get(key)
                .and_then(number_from_value)
                .unwrap_or(fallback)
        };
        Ok(Self {
            offset_x: num("offset_x", d.offset_x),
            offset_y: num("offset_y", d.offset_y),
            scale: num("scale", d.scale),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    #[serde(deserialize_with = "lenient_text")]
    pub platform: String,
    #[serde(deserialize_with = "lenient_text")]
    pub url: String,
}

/// Fallback ranks for a role label, used when a member carries no group of its own.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleMetadata {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(
        deserialize_with = "lenient_rank",
        skip_serializing_if = "Option::is_none"
    )]
    pub group: Option<i64>,
    #[serde(
        deserialize_with = "lenient_rank",
        skip_serializing_if = "Option::is_none"
    )]
    pub subgroup: Option<i64>,
}

/// Members plus role metadata, as served to the team page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamRoster {
    #[serde(deserialize_with = "lenient_list")]
    pub members: Vec<TeamMember>,
    #[serde(deserialize_with = "lenient_list")]
    pub roles: Vec<RoleMetadata>,
}

impl TeamRoster {
    /// Parse a roster document. A bare JSON array is read as a member list with no roles.
    ///
    /// Only text that is not JSON at all, or a document that is neither an object nor an array,
    /// is an error. Entries that are not objects are skipped.
    pub fn from_json_str(s: &str) -> StardeckResult<Self> {
        let roster = match serde_json::from_str::<Value>(s)? {
            Value::Array(items) => Self {
                members: list_from_values(items),
                roles: Vec::new(),
            },
            doc @ Value::Object(_) => serde_json::from_value(doc)?,
            _ => {
                return Err(StardeckError::validation(
                    "roster must be a JSON object or an array of members",
                ));
            }
        };
        tracing::debug!(
            members = roster.members.len(),
            roles = roster.roles.len(),
            "team roster loaded"
        );
        Ok(roster)
    }

    pub fn grouped(&self) -> Vec<RoleGroup> {
        group_members(&self.members, &self.roles)
    }
}

/// Read a rank from arbitrary JSON.
///
/// Integers, integral floats and strings holding an integer are ranks. Everything else,
/// including fractions, booleans and free text, is treated as absent.
pub fn rank_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            // i64::MAX as f64 rounds up to 2^63, which is already out of range.
            let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
            (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn number_from_value(value: &Value) -> Option<f64> {
    let f = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    f.is_finite().then_some(f)
}

fn text_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn list_from_values<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    let total = items.len();
    let out: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if out.len() < total {
        tracing::warn!(skipped = total - out.len(), "ignoring malformed list entries");
    }
    out
}

fn lenient_rank<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(rank_from_value))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_text(deserializer)?.unwrap_or_default())
}

fn lenient_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(text_from_value))
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => list_from_values(items),
        _ => Vec::new(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/team/model.rs"]
mod tests;
