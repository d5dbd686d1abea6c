//! Turns raw page reads into a [`TrackState`].
//!
//! Every function here is pure except [`Extractor::scrape`], which pulls a
//! document from a [`SnapshotSource`] first. None of them fail: anything
//! unexpected resolves to the "nothing playing" record.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::selectors::PlayerSelectors;
use crate::domain::track::{TrackState, UNKNOWN_ARTIST, ZERO_CLOCK};
use crate::infrastructure::page::{LikeControl, PageSnapshot};
use crate::infrastructure::source::SnapshotSource;

static ART_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"=w\d+-h\d+").unwrap());

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

const ART_SIZE: &str = "=w600-h600";
const TIME_SEPARATOR: &str = " / ";

/// Parses `M:SS` (or `H:MM:SS`) into seconds. `None` stands for an
/// unparseable clock.
pub fn parse_clock(text: &str) -> Option<u32> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }

    parts.iter().try_fold(0u32, |acc, part| {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: u32 = part.parse().ok()?;
        acc.checked_mul(60)?.checked_add(value)
    })
}

/// Percentage of `total` elapsed at `current`, 0 whenever either side is
/// unparseable or the total is zero.
pub fn compute_progress(current: &str, total: &str) -> f64 {
    match (parse_clock(current), parse_clock(total)) {
        (Some(current), Some(total)) if total > 0 => {
            (f64::from(current) / f64::from(total) * 100.0).clamp(0.0, 100.0)
        }
        _ => 0.0,
    }
}

/// Rewrites an encoded `=w<N>-h<N>` size to the 600x600 variant. Other URLs
/// pass through untouched.
pub fn upscale_album_art(url: &str) -> String {
    ART_SIZE_RE.replace(url, ART_SIZE).into_owned()
}

pub fn find_year(text: &str) -> String {
    YEAR_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

pub struct Extractor {
    selectors: PlayerSelectors,
}

impl Extractor {
    pub fn new(selectors: PlayerSelectors) -> Self {
        Self { selectors }
    }

    pub fn extract(&self, page: &PageSnapshot) -> TrackState {
        // No title means the player has not loaded a track yet.
        let title = match page.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => return TrackState::nothing_playing(),
        };

        let (artist, year) = match &page.byline {
            Some(byline) => {
                let artist = byline
                    .first_link
                    .as_deref()
                    .unwrap_or(&byline.text)
                    .trim()
                    .to_string();
                (artist, find_year(&byline.text))
            }
            None => (UNKNOWN_ARTIST.to_string(), String::new()),
        };

        let album_art = page
            .album_art
            .as_deref()
            .filter(|src| !src.is_empty())
            .map(upscale_album_art)
            .unwrap_or_default();

        let mut current_time = ZERO_CLOCK.to_string();
        let mut total_time = ZERO_CLOCK.to_string();
        let mut progress = 0.0;
        if let Some(text) = &page.time_info {
            let parts: Vec<&str> = text.split(TIME_SEPARATOR).collect();
            if let [current, total] = parts.as_slice() {
                current_time = current.trim().to_string();
                total_time = total.trim().to_string();
                progress = compute_progress(&current_time, &total_time);
            }
        }

        TrackState {
            title,
            artist,
            album_art,
            year,
            current_time,
            total_time,
            progress,
            is_playing: self.is_playing(page),
            is_liked: self.is_liked(page.like.as_ref()),
        }
    }

    /// Fetches the current document and extracts it. A failed read is logged
    /// and reported as "nothing playing".
    pub async fn scrape(&self, source: &dyn SnapshotSource) -> TrackState {
        match source.fetch().await {
            Ok(html) => self.extract(&PageSnapshot::parse(&html, &self.selectors)),
            Err(e) => {
                tracing::error!("Failed to read page from {}: {e}", source.describe());
                TrackState::nothing_playing()
            }
        }
    }

    // A visible "Pause" action means music is playing right now.
    fn is_playing(&self, page: &PageSnapshot) -> bool {
        if let Some(paused) = page.media_paused {
            return !paused;
        }
        page.play_label
            .as_deref()
            .is_some_and(|label| contains_ignore_case(label, &self.selectors.pause_keyword))
    }

    fn is_liked(&self, control: Option<&LikeControl>) -> bool {
        let Some(control) = control else {
            return false;
        };
        let pressed = control
            .pressed
            .as_deref()
            .is_some_and(|p| p.trim().eq_ignore_ascii_case("true"));
        let offers_unlike = control
            .label
            .as_deref()
            .is_some_and(|label| contains_ignore_case(label, &self.selectors.unlike_keyword));
        pressed || offers_unlike
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}
