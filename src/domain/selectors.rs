use std::path::Path;

use scraper::Selector;
use serde::Deserialize;

use crate::services::error::{BridgeError, Result};

/// Where each piece of track metadata lives in the player document.
///
/// Defaults target the YouTube Music player bar. Every key can be overridden
/// from a TOML file so markup changes do not need a rebuild.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub title: String,
    pub byline: String,
    pub byline_link: String,
    pub album_art: String,
    pub time_info: String,
    pub media: String,
    pub play_button: String,
    /// Tried in order, most specific markup first.
    pub like_buttons: Vec<String>,
    pub pause_keyword: String,
    pub unlike_keyword: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            title: ".title.style-scope.ytmusic-player-bar".to_string(),
            byline: ".byline.style-scope.ytmusic-player-bar".to_string(),
            byline_link: "a".to_string(),
            album_art: "img.style-scope.ytmusic-player-bar".to_string(),
            time_info: ".time-info.style-scope.ytmusic-player-bar".to_string(),
            media: "video".to_string(),
            play_button: "#play-pause-button".to_string(),
            like_buttons: vec![
                "ytmusic-like-button-renderer#like-button-renderer #button-shape-like button"
                    .to_string(),
                "ytmusic-like-button-renderer .like".to_string(),
                "#like-button-renderer button[aria-pressed]".to_string(),
                "tp-yt-paper-icon-button.like".to_string(),
            ],
            pause_keyword: "pause".to_string(),
            unlike_keyword: "unlike".to_string(),
        }
    }
}

impl Selectors {
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| BridgeError::Config(format!("invalid selectors: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(raw.as_str())
    }

    /// Parses every selector up front so a bad override fails at startup
    /// instead of on every tick.
    pub fn compile(&self) -> Result<PlayerSelectors> {
        Ok(PlayerSelectors {
            title: compile(&self.title)?,
            byline: compile(&self.byline)?,
            byline_link: compile(&self.byline_link)?,
            album_art: compile(&self.album_art)?,
            time_info: compile(&self.time_info)?,
            media: compile(&self.media)?,
            play_button: compile(&self.play_button)?,
            like_buttons: self
                .like_buttons
                .iter()
                .map(|s| compile(s))
                .collect::<Result<_>>()?,
            pause_keyword: self.pause_keyword.clone(),
            unlike_keyword: self.unlike_keyword.clone(),
        })
    }
}

/// [`Selectors`] after parsing, ready to run against a document.
#[derive(Debug, Clone)]
pub struct PlayerSelectors {
    pub title: Selector,
    pub byline: Selector,
    pub byline_link: Selector,
    pub album_art: Selector,
    pub time_info: Selector,
    pub media: Selector,
    pub play_button: Selector,
    pub like_buttons: Vec<Selector>,
    pub pause_keyword: String,
    pub unlike_keyword: String,
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|_| BridgeError::Selector(selector.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let selectors = Selectors::from_toml(
            r#"
            title = "h1.song"
            like_buttons = ["button.heart"]
            "#,
        )
        .unwrap();

        assert_eq!(selectors.title, "h1.song");
        assert_eq!(selectors.like_buttons, vec!["button.heart".to_string()]);
        assert_eq!(selectors.play_button, "#play-pause-button");
        assert_eq!(selectors.pause_keyword, "pause");
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = Selectors::from_toml("title = [").unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn defaults_compile() {
        let compiled = Selectors::default().compile().unwrap();
        assert_eq!(compiled.like_buttons.len(), 4);
        assert_eq!(compiled.pause_keyword, "pause");
    }

    #[test]
    fn invalid_selector_fails_compile() {
        let selectors = Selectors {
            title: "[[".to_string(),
            ..Selectors::default()
        };
        let err = selectors.compile().unwrap_err();
        assert!(matches!(err, BridgeError::Selector(s) if s == "[["));

        let selectors = Selectors::from_toml("media = \"\"").unwrap();
        assert!(matches!(selectors.compile(), Err(BridgeError::Selector(_))));

        let selectors = Selectors {
            like_buttons: vec!["button.ok".to_string(), "[[".to_string()],
            ..Selectors::default()
        };
        assert!(matches!(selectors.compile(), Err(BridgeError::Selector(s)) if s == "[["));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selectors.toml");
        std::fs::write(&path, "media = \"audio\"\n").unwrap();

        let selectors = Selectors::load(&path).unwrap();
        assert_eq!(selectors.media, "audio");
    }
}
