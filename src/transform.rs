//! Normalization of upstream payloads into `{added, combined_title}` lists
//!
//! The upstream response is walked without a schema: arrays are item lists,
//! objects are containers, scalars pass through. Every element of every list
//! is rewritten into a [`NormalizedItem`], whatever its original shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::humanize::relative_time;
use crate::titles::TitleStyle;

/// The only shape clients ever see inside a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub added: String,
    pub combined_title: String,
}

impl NormalizedItem {
    pub fn from_upstream(item: &Value, style: TitleStyle, now: i64) -> Self {
        Self {
            added: relative_time(item.get("added_at"), now),
            combined_title: style.compose(item),
        }
    }
}

/// Rebuilds `payload` with every list normalized. The input is left untouched.
pub fn transform(payload: &Value, style: TitleStyle, now: i64) -> Value {
    match payload {
        Value::Array(items) => normalize_list(items, style, now),
        Value::Object(fields) => transform_object(fields, style, now),
        scalar => scalar.clone(),
    }
}

fn transform_object(fields: &Map<String, Value>, style: TitleStyle, now: i64) -> Value {
    let rebuilt = fields
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Array(items) => normalize_list(items, style, now),
                Value::Object(inner) => transform_object(inner, style, now),
                scalar => scalar.clone(),
            };
            (key.clone(), value)
        })
        .collect();

    Value::Object(rebuilt)
}

fn normalize_list(items: &[Value], style: TitleStyle, now: i64) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| {
                let normalized = NormalizedItem::from_upstream(item, style, now);
                let mut out = Map::with_capacity(2);
                out.insert("added".to_string(), Value::String(normalized.added));
                out.insert(
                    "combined_title".to_string(),
                    Value::String(normalized.combined_title),
                );
                Value::Object(out)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_movie_list_inside_object() {
        let payload = json!({
            "recently_added": [{"title": "A", "year": 2000, "added_at": NOW - 3600}]
        });

        let out = transform(&payload, TitleStyle::Movie, NOW);
        assert_eq!(
            out,
            json!({
                "recently_added": [{"added": "1 hour ago", "combined_title": "A - 2000"}]
            })
        );
    }

    #[test]
    fn test_tautulli_envelope_is_recursed() {
        let payload = json!({
            "response": {
                "result": "success",
                "message": null,
                "data": {
                    "recently_added": [
                        {
                            "grandparent_title": "Show",
                            "parent_media_index": "2",
                            "media_index": "7",
                            "title": "Seven",
                            "added_at": (NOW - 86_400).to_string(),
                            "rating_key": "991"
                        }
                    ]
                }
            }
        });

        let out = transform(&payload, TitleStyle::Episode, NOW);
        assert_eq!(out["response"]["result"], "success");
        assert_eq!(out["response"]["message"], Value::Null);
        assert_eq!(
            out["response"]["data"]["recently_added"],
            json!([{"added": "1 day ago", "combined_title": "Show - S02E07 - Seven"}])
        );
    }

    #[test]
    fn test_top_level_array() {
        let payload = json!([{"title": "Lone"}, 5, null, ["nested"]]);
        let out = transform(&payload, TitleStyle::Episode, NOW);
        assert_eq!(
            out,
            json!([
                {"added": "", "combined_title": "Lone"},
                {"added": "", "combined_title": ""},
                {"added": "", "combined_title": ""},
                {"added": "", "combined_title": ""}
            ])
        );
    }

    #[test]
    fn test_scalars_pass_through() {
        for payload in [json!(42), Value::Null, json!("text"), json!(true)] {
            assert_eq!(transform(&payload, TitleStyle::Movie, NOW), payload);
        }
    }

    #[test]
    fn test_empty_list_and_key_order() {
        let payload = json!({"z": 1, "items": [], "a": {"b": "c"}});
        let out = transform(&payload, TitleStyle::Movie, NOW);

        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "items", "a"]);
        assert_eq!(out["items"], json!([]));
        assert_eq!(out["a"], json!({"b": "c"}));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let payload = json!({"list": [{"title": "Keep", "year": 1999}]});
        let before = payload.clone();
        let _ = transform(&payload, TitleStyle::Movie, NOW);
        assert_eq!(payload, before);
    }
}
