use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::domain::track::{NOTHING_PLAYING, TrackState, ZERO_CLOCK};
use crate::relay::error::RelayError;

pub type RelayStore = Arc<RwLock<NowPlaying>>;

/// The single record the relay serves, replaced wholesale on every update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    #[serde(flatten)]
    pub track: TrackState,
    pub last_updated: String,
}

impl NowPlaying {
    pub fn new(track: TrackState) -> Self {
        Self {
            track,
            last_updated: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Builds a record from a pushed JSON body. Only `title` is required;
    /// anything missing or of the wrong type takes its default.
    pub fn from_update(body: &Value) -> Result<Self, RelayError> {
        let Some(title) = body.get("title").and_then(Value::as_str) else {
            return Err(RelayError::InvalidTrack);
        };

        let track = TrackState {
            title: non_empty(title).unwrap_or(NOTHING_PLAYING).to_string(),
            artist: text(body, "artist", ""),
            album_art: text(body, "albumArt", ""),
            year: text(body, "year", ""),
            current_time: text(body, "currentTime", ZERO_CLOCK),
            total_time: text(body, "totalTime", ZERO_CLOCK),
            progress: body
                .get("progress")
                .and_then(Value::as_f64)
                .filter(|p| p.is_finite())
                .map(|p| p.clamp(0.0, 100.0))
                .unwrap_or(0.0),
            is_playing: flag(body, "isPlaying"),
            is_liked: flag(body, "isLiked"),
        };

        Ok(Self::new(track))
    }
}

impl Default for NowPlaying {
    fn default() -> Self {
        Self::new(TrackState::nothing_playing())
    }
}

pub fn new_store() -> RelayStore {
    Arc::new(RwLock::new(NowPlaying::default()))
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

fn text(body: &Value, key: &str, default: &str) -> String {
    body.get(key)
        .and_then(Value::as_str)
        .and_then(non_empty)
        .unwrap_or(default)
        .to_string()
}

fn flag(body: &Value, key: &str) -> bool {
    body.get(key).and_then(Value::as_bool) == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn title_only_update_takes_defaults() {
        let record = NowPlaying::from_update(&json!({ "title": "X" })).unwrap();
        assert_eq!(
            record.track,
            TrackState {
                title: "X".to_string(),
                ..TrackState::default()
            }
        );
        assert!(!record.last_updated.is_empty());
    }

    #[test]
    fn title_must_be_a_string() {
        assert!(matches!(
            NowPlaying::from_update(&json!({ "artist": "Y" })),
            Err(RelayError::InvalidTrack)
        ));
        assert!(matches!(
            NowPlaying::from_update(&json!({ "title": 7 })),
            Err(RelayError::InvalidTrack)
        ));
        assert!(matches!(
            NowPlaying::from_update(&json!(["title"])),
            Err(RelayError::InvalidTrack)
        ));
    }

    #[test]
    fn loose_fields_are_normalized() {
        let record = NowPlaying::from_update(&json!({
            "title": "",
            "artist": 42,
            "currentTime": "1:00",
            "progress": 140.0,
            "isPlaying": "yes",
            "isLiked": true,
        }))
        .unwrap();

        assert_eq!(record.track.title, NOTHING_PLAYING);
        assert_eq!(record.track.artist, "");
        assert_eq!(record.track.current_time, "1:00");
        assert_eq!(record.track.total_time, "0:00");
        assert_eq!(record.track.progress, 100.0);
        assert!(!record.track.is_playing);
        assert!(record.track.is_liked);
    }

    #[test]
    fn serializes_flat_with_timestamp() {
        let json = serde_json::to_value(NowPlaying::default()).unwrap();
        assert_eq!(json["title"], "Nothing Playing");
        assert_eq!(json["totalTime"], "0:00");
        assert!(json["lastUpdated"].is_string());
        assert!(json.get("track").is_none());
    }
}
