//! Raw reads from one serialized player document.
//!
//! Nothing here normalizes or defaults anything; that is the extractor's job.
//! A field is `None` when its element is missing from the document.

use scraper::{ElementRef, Html, Selector};

use crate::domain::selectors::PlayerSelectors;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Byline {
    pub text: String,
    pub first_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LikeControl {
    pub pressed: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSnapshot {
    pub title: Option<String>,
    pub byline: Option<Byline>,
    pub album_art: Option<String>,
    pub time_info: Option<String>,
    /// `Some(paused)` only when the media element exposes its state.
    pub media_paused: Option<bool>,
    pub play_label: Option<String>,
    pub like: Option<LikeControl>,
}

impl PageSnapshot {
    pub fn parse(html: &str, selectors: &PlayerSelectors) -> Self {
        let document = Html::parse_document(html);

        let title = first(&document, &selectors.title).map(text_of);

        let byline = first(&document, &selectors.byline).map(|node| Byline {
            text: text_of(node),
            first_link: node.select(&selectors.byline_link).next().map(text_of),
        });

        let album_art = first(&document, &selectors.album_art)
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string);

        let time_info = first(&document, &selectors.time_info).map(text_of);

        let media_paused = first(&document, &selectors.media).and_then(media_state);

        let play_label = first(&document, &selectors.play_button).and_then(|button| {
            button
                .value()
                .attr("title")
                .or_else(|| button.value().attr("aria-label"))
                .map(str::to_string)
        });

        let like = selectors
            .like_buttons
            .iter()
            .find_map(|candidate| first(&document, candidate))
            .map(|control| {
                let attrs = control.value();
                LikeControl {
                    pressed: attrs.attr("aria-pressed").map(str::to_string),
                    label: attrs
                        .attr("aria-label")
                        .or_else(|| attrs.attr("title"))
                        .map(str::to_string),
                }
            });

        Self {
            title,
            byline,
            album_art,
            time_info,
            media_paused,
            play_label,
            like,
        }
    }
}

fn first<'a>(document: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    document.select(selector).next()
}

/// Text content with runs of whitespace collapsed, so pretty-printed dumps
/// read the same as the live page.
fn text_of(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// Serialized DOM loses the live `paused` property, so the dump carries it as
// `data-paused="true|false"` or a bare `paused` flag.
fn media_state(element: ElementRef<'_>) -> Option<bool> {
    let attrs = element.value();
    if let Some(flag) = attrs.attr("data-paused") {
        return match flag.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        };
    }
    attrs.attr("paused").map(|_| true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::selectors::Selectors;

    fn parse(html: &str) -> PageSnapshot {
        PageSnapshot::parse(html, &Selectors::default().compile().unwrap())
    }

    const PLAYER: &str = r#"
        <html><body>
          <ytmusic-player-bar>
            <img class="image style-scope ytmusic-player-bar" src="https://lh3.example/abc=w60-h60-l90-rj">
            <yt-formatted-string class="title style-scope ytmusic-player-bar">
              Song
            </yt-formatted-string>
            <span class="byline style-scope ytmusic-player-bar">
              <a href="/channel/1">Artist1</a>, <a href="/channel/2">Artist2</a> • 2021
            </span>
            <span class="time-info style-scope ytmusic-player-bar">1:30 / 3:00</span>
            <tp-yt-paper-icon-button id="play-pause-button" title="Pause"></tp-yt-paper-icon-button>
            <ytmusic-like-button-renderer id="like-button-renderer">
              <div id="button-shape-like"><button aria-pressed="true" aria-label="Unlike"></button></div>
            </ytmusic-like-button-renderer>
          </ytmusic-player-bar>
          <video data-paused="false"></video>
        </body></html>
    "#;

    #[test]
    fn reads_player_bar() {
        let snapshot = parse(PLAYER);

        assert_eq!(snapshot.title.as_deref(), Some("Song"));
        let byline = snapshot.byline.unwrap();
        assert_eq!(byline.text, "Artist1, Artist2 • 2021");
        assert_eq!(byline.first_link.as_deref(), Some("Artist1"));
        assert_eq!(
            snapshot.album_art.as_deref(),
            Some("https://lh3.example/abc=w60-h60-l90-rj")
        );
        assert_eq!(snapshot.time_info.as_deref(), Some("1:30 / 3:00"));
        assert_eq!(snapshot.media_paused, Some(false));
        assert_eq!(snapshot.play_label.as_deref(), Some("Pause"));
        assert_eq!(
            snapshot.like,
            Some(LikeControl {
                pressed: Some("true".to_string()),
                label: Some("Unlike".to_string()),
            })
        );
    }

    #[test]
    fn empty_document_yields_nothing() {
        let snapshot = parse("<html></html>");
        assert_eq!(snapshot, PageSnapshot::default());
    }

    #[test]
    fn like_selectors_are_tried_in_order() {
        let html = r#"
            <button class="first" aria-label="Like"></button>
            <button class="second" aria-pressed="true"></button>
        "#;
        let selectors = Selectors {
            like_buttons: vec![
                "button.missing".into(),
                "button.second".into(),
                "button.first".into(),
            ],
            ..Selectors::default()
        };

        let like = PageSnapshot::parse(html, &selectors.compile().unwrap())
            .like
            .unwrap();
        assert_eq!(like.pressed.as_deref(), Some("true"));
        assert_eq!(like.label, None);
    }

    #[test]
    fn media_without_state_is_unknown() {
        let snapshot = parse("<video src=\"x\"></video>");
        assert_eq!(snapshot.media_paused, None);

        let snapshot = parse("<video paused></video>");
        assert_eq!(snapshot.media_paused, Some(true));
    }

    #[test]
    fn play_label_falls_back_to_aria_label() {
        let html = r#"<div id="play-pause-button" aria-label="Play"></div>"#;
        let snapshot = parse(html);
        assert_eq!(snapshot.play_label.as_deref(), Some("Play"));
    }
}
