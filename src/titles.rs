//! Display title composition for upstream items

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a section's items are titled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleStyle {
    /// `"<show> - S01E03 - <episode>"`, falling back to the bare title
    Episode,
    /// `"<title> - <year>"`, separator always present
    Movie,
}

impl TitleStyle {
    /// Builds the display title for one upstream item. Missing or falsy
    /// fields degrade to empty strings; non-object items have no fields.
    pub fn compose(self, item: &Value) -> String {
        match self {
            TitleStyle::Episode => episode_title(item),
            TitleStyle::Movie => movie_title(item),
        }
    }
}

fn episode_title(item: &Value) -> String {
    let show = field(item, "grandparent_title");
    let season = field(item, "parent_media_index");
    let episode = field(item, "media_index");
    let title = field(item, "title");

    match (show, season, episode, title) {
        (Some(show), Some(season), Some(episode), Some(title)) => format!(
            "{} - S{}E{} - {}",
            display(show),
            padded(season),
            padded(episode),
            display(title)
        ),
        (_, _, _, title) => title.map(display).unwrap_or_default(),
    }
}

fn movie_title(item: &Value) -> String {
    let title = field(item, "title").map(display).unwrap_or_default();
    let year = field(item, "year").map(display).unwrap_or_default();
    format!("{title} - {year}")
}

/// Returns the named field only when it holds a truthy value.
fn field<'a>(item: &'a Value, key: &str) -> Option<&'a Value> {
    item.get(key).filter(|value| is_truthy(value))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Two-digit season/episode numbers; anything not integer-like is shown as-is.
fn padded(value: &Value) -> String {
    let number = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match number {
        Some(n) => format!("{n:02}"),
        None => display(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_movie_title() {
        let item = json!({"title": "Dune", "year": 2021});
        assert_eq!(TitleStyle::Movie.compose(&item), "Dune - 2021");
    }

    #[test]
    fn test_movie_title_keeps_separator_when_empty() {
        assert_eq!(TitleStyle::Movie.compose(&json!({})), " - ");
        assert_eq!(TitleStyle::Movie.compose(&json!({"title": "Solo"})), "Solo - ");
        assert_eq!(TitleStyle::Movie.compose(&json!({"year": 0})), " - ");
    }

    #[test]
    fn test_episode_title() {
        let item = json!({
            "grandparent_title": "Show",
            "parent_media_index": 1,
            "media_index": 3,
            "title": "Pilot"
        });
        assert_eq!(TitleStyle::Episode.compose(&item), "Show - S01E03 - Pilot");
    }

    #[test]
    fn test_episode_title_pads_string_indices() {
        let item = json!({
            "grandparent_title": "Show",
            "parent_media_index": "12",
            "media_index": "104",
            "title": "Finale"
        });
        assert_eq!(TitleStyle::Episode.compose(&item), "Show - S12E104 - Finale");
    }

    #[test]
    fn test_episode_title_falls_back_to_title() {
        assert_eq!(TitleStyle::Episode.compose(&json!({"title": "Lone"})), "Lone");

        // Season 0 is falsy, so the composed form is skipped
        let specials = json!({
            "grandparent_title": "Show",
            "parent_media_index": 0,
            "media_index": 2,
            "title": "Special"
        });
        assert_eq!(TitleStyle::Episode.compose(&specials), "Special");
    }

    #[test]
    fn test_episode_title_without_anything() {
        assert_eq!(TitleStyle::Episode.compose(&json!({})), "");
        assert_eq!(TitleStyle::Episode.compose(&json!(42)), "");
        assert_eq!(TitleStyle::Episode.compose(&Value::Null), "");
    }

    #[test]
    fn test_non_numeric_index_is_not_padded() {
        let item = json!({
            "grandparent_title": "Show",
            "parent_media_index": "x",
            "media_index": 5,
            "title": "Odd"
        });
        assert_eq!(TitleStyle::Episode.compose(&item), "Show - SxE05 - Odd");
    }

    #[test]
    fn test_integral_float_index_is_padded() {
        let item = json!({
            "grandparent_title": "Show",
            "parent_media_index": 1.0,
            "media_index": 2,
            "title": "Pilot"
        });
        assert_eq!(TitleStyle::Episode.compose(&item), "Show - S01E02 - Pilot");

        let item = json!({
            "grandparent_title": "Show",
            "parent_media_index": 1.5,
            "media_index": 2,
            "title": "Pilot"
        });
        assert_eq!(TitleStyle::Episode.compose(&item), "Show - S1.5E02 - Pilot");
    }
}
