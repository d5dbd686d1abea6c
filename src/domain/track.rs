use std::fmt;

use serde::Serialize;

pub const NOTHING_PLAYING: &str = "Nothing Playing";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const ZERO_CLOCK: &str = "0:00";

/// Normalized snapshot of what the player shows right now.
///
/// A pure value: the poller keeps at most one previous instance around and
/// replaces it wholesale after every push.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackState {
    pub title: String,
    pub artist: String,
    pub album_art: String,
    pub year: String,
    pub current_time: String,
    pub total_time: String,
    pub progress: f64,
    pub is_playing: bool,
    pub is_liked: bool,
}

impl TrackState {
    pub fn nothing_playing() -> Self {
        Self {
            title: NOTHING_PLAYING.to_string(),
            artist: String::new(),
            album_art: String::new(),
            year: String::new(),
            current_time: ZERO_CLOCK.to_string(),
            total_time: ZERO_CLOCK.to_string(),
            progress: 0.0,
            is_playing: false,
            is_liked: false,
        }
    }

    /// Shallow comparison of the fields a display cares about. Album art,
    /// year, total time and the progress number never trigger a push on
    /// their own.
    pub fn has_changed(&self, previous: &TrackState) -> bool {
        self.title != previous.title
            || self.artist != previous.artist
            || self.is_playing != previous.is_playing
            || self.is_liked != previous.is_liked
            || self.current_time != previous.current_time
    }

    /// Playing tracks are pushed every tick so elapsed-time displays stay live.
    pub fn should_push(&self, previous: &TrackState) -> bool {
        self.is_playing || self.has_changed(previous)
    }
}

impl Default for TrackState {
    fn default() -> Self {
        Self::nothing_playing()
    }
}

impl fmt::Display for TrackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.artist.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{} - {}", self.title, self.artist)
        }
    }
}
