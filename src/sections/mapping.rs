use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use crate::titles::TitleStyle;

/// Label reserved for movie-style titling. Any other label gets episode titles.
pub const MOVIES_LABEL: &str = "movies";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("section label must not be empty")]
    EmptyLabel,

    #[error("section '{label}' has a non-numeric id: {value}")]
    NonNumericId { label: String, value: String },

    #[error("section '{label}' must have a positive id, got {value}")]
    NonPositiveId { label: String, value: String },
}

/// Category kind, derived from the label text alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Movie,
    Show,
}

impl SectionKind {
    /// `"movies"` in any ASCII case is a movie section, everything else a show.
    /// Renaming a movie section therefore switches it to episode titles.
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case(MOVIES_LABEL) {
            SectionKind::Movie
        } else {
            SectionKind::Show
        }
    }

    pub fn title_style(self) -> TitleStyle {
        match self {
            SectionKind::Movie => TitleStyle::Movie,
            SectionKind::Show => TitleStyle::Episode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub label: String,
    pub section_id: u64,
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        SectionKind::from_label(&self.label)
    }
}

/// Ordered label -> upstream section id mapping.
///
/// Labels are unique and non-empty, ids are positive. Order is kept for
/// display and serialization only; lookups are exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionMapping {
    entries: Vec<Section>,
}

impl SectionMapping {
    /// Mapping used when nothing has been persisted yet.
    pub fn builtin_default() -> Self {
        Self {
            entries: vec![
                Section {
                    label: MOVIES_LABEL.to_string(),
                    section_id: 2,
                },
                Section {
                    label: "shows".to_string(),
                    section_id: 3,
                },
            ],
        }
    }

    /// Builds a mapping from `(label, id)` pairs. A repeated label keeps its
    /// first position and takes the later id.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut mapping = Self::default();
        for (label, id) in pairs {
            let label = label.into();
            validate_label(&label)?;
            if id == 0 {
                return Err(ValidationError::NonPositiveId {
                    label,
                    value: id.to_string(),
                });
            }
            mapping.upsert(label, id);
        }
        Ok(mapping)
    }

    /// Validates a raw JSON object such as the admin request body.
    ///
    /// Ids may be JSON integers (or integral floats) or strings holding an
    /// integer; anything else is rejected before any state changes.
    pub fn from_json(raw: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut mapping = Self::default();
        for (label, value) in raw {
            validate_label(label)?;
            let id = parse_section_id(label, value)?;
            mapping.upsert(label.clone(), id);
        }
        Ok(mapping)
    }

    pub fn resolve(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|section| section.label == label)
            .map(|section| section.section_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `{label: id}` object used on the wire and on disk.
    pub fn to_json(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|section| (section.label.clone(), Value::from(section.section_id)))
            .collect()
    }

    fn upsert(&mut self, label: String, section_id: u64) {
        match self.entries.iter_mut().find(|section| section.label == label) {
            Some(existing) => existing.section_id = section_id,
            None => self.entries.push(Section { label, section_id }),
        }
    }
}

fn validate_label(label: &str) -> Result<(), ValidationError> {
    if label.trim().is_empty() {
        return Err(ValidationError::EmptyLabel);
    }
    Ok(())
}

fn parse_section_id(label: &str, value: &Value) -> Result<u64, ValidationError> {
    let non_numeric = || ValidationError::NonNumericId {
        label: label.to_string(),
        value: value.to_string(),
    };
    let non_positive = || ValidationError::NonPositiveId {
        label: label.to_string(),
        value: value.to_string(),
    };

    match value {
        Value::Number(n) => {
            if let Some(id) = n.as_u64() {
                return if id == 0 { Err(non_positive()) } else { Ok(id) };
            }
            if n.as_i64().is_some() {
                return Err(non_positive());
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= 1.0 && f <= u64::MAX as f64 => Ok(f as u64),
                Some(f) if f <= 0.0 => Err(non_positive()),
                _ => Err(non_numeric()),
            }
        }
        Value::String(s) => match s.trim().parse::<i128>() {
            Ok(id) if id <= 0 => Err(non_positive()),
            Ok(id) => u64::try_from(id).map_err(|_| non_numeric()),
            Err(_) => Err(non_numeric()),
        },
        _ => Err(non_numeric()),
    }
}

impl Serialize for SectionMapping {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for section in &self.entries {
            map.serialize_entry(&section.label, &section.section_id)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SectionMapping {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct MappingVisitor;

        impl<'de> serde::de::Visitor<'de> for MappingVisitor {
            type Value = SectionMapping;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object mapping section labels to positive integer ids")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut raw = Map::new();
                while let Some((label, value)) = access.next_entry::<String, Value>()? {
                    raw.insert(label, value);
                }
                SectionMapping::from_json(&raw).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_map(MappingVisitor)
    }
}
