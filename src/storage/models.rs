use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One shortened URL, stored as JSON under its short code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkRecord {
    pub url: String,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default, with = "iso_millis_opt")]
    pub last_accessed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

impl ShortLinkRecord {
    pub fn new(url: impl Into<String>, owner: Option<&LinkOwner>) -> Self {
        Self {
            url: url.into(),
            created_at: Utc::now(),
            clicks: 0,
            last_accessed: None,
            user_id: owner.map(|o| o.user_id.clone()),
            user_email: owner.and_then(|o| o.email.clone()),
        }
    }

    /// 记录一次点击；`last_accessed` 不会倒退
    pub fn record_click(&mut self, now: DateTime<Utc>) {
        self.clicks = self.clicks.saturating_add(1);
        self.last_accessed = Some(match self.last_accessed {
            Some(prev) if prev > now => prev,
            _ => now,
        });
    }
}

/// Attribution copied from the authenticated caller at creation time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOwner {
    pub user_id: String,
    pub email: Option<String>,
}

/// Timestamps are written like `2024-01-01T12:00:00.000Z`
pub(crate) mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

pub(crate) mod iso_millis_opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_str(&super::iso_millis::format(v)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) => DateTime::parse_from_rfc3339(&raw)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
