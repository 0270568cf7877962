use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize)]
pub(crate) struct IssueRow {
    pub(crate) id: String,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) slug: String,
    #[serde(default)]
    pub(crate) description: String,
    pub(crate) category: String,
    #[serde(default, deserialize_with = "split_codes")]
    pub(crate) locations: Vec<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateRow {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) office: String,
    #[serde(default)]
    pub(crate) party: String,
    #[serde(default)]
    pub(crate) bio: String,
    #[serde(default, deserialize_with = "split_codes")]
    pub(crate) zip_codes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PositionRow {
    pub(crate) candidate_id: String,
    pub(crate) issue_id: String,
    pub(crate) position: i32,
}

pub(crate) fn parse_rows<T, R>(reader: R) -> Result<Vec<T>, csv::Error>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader.deserialize::<T>().collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// `;`-separated code list; blank means unscoped.
fn split_codes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .split(';')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect())
}

pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
