//! The structured five-field briefing returned by the language model.
//!
//! The model is asked for at most five actions, hot takes and drafts, with
//! draft *i* answering hot take *i*. Neither is guaranteed, so every field
//! is optional on the wire and consumers must tolerate any lengths.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Briefing {
    #[serde(default, deserialize_with = "null_as_default")]
    pub schedule: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub traffic: Traffic,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hot_takes: Vec<HotTake>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub drafts: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traffic {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub new: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub continuing: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotTake {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub crucial_note: Option<String>,
}

/// A draft paired with the subject of the hot take at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftEntry<'a> {
    pub subject: Option<&'a str>,
    pub body: &'a str,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Briefing {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// One entry per draft; drafts beyond the hot takes get no subject.
    pub fn drafts_with_subjects(&self) -> impl Iterator<Item = DraftEntry<'_>> {
        self.drafts.iter().enumerate().map(|(i, body)| DraftEntry {
            subject: self
                .hot_takes
                .get(i)
                .and_then(|h| h.subject.as_deref()),
            body,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty()
            && self.actions.is_empty()
            && self.hot_takes.is_empty()
            && self.drafts.is_empty()
            && self.traffic == Traffic::default()
    }
}
