use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, Event, HtmlVideoElement, MouseEvent};

use crate::dom::{self, Listener};
use crate::error::FxError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayToggle {
    Play,
    Pause,
}

impl PlayToggle {
    pub fn for_paused(paused: bool) -> Self {
        if paused {
            PlayToggle::Play
        } else {
            PlayToggle::Pause
        }
    }

    /// The overlay button gets out of the way while the video plays.
    pub fn hides_button(self) -> bool {
        self == PlayToggle::Play
    }
}

/// A refused `play()` puts the button back so the visitor can retry.
fn play(video: &HtmlVideoElement, button: Element) {
    match video.play() {
        Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("video playback refused: {:?}", e);
                dom::toggle_class(&button, "hidden", false);
            }
        }),
        Err(e) => {
            log::warn!("video playback failed: {:?}", e);
            dom::toggle_class(&button, "hidden", false);
        }
    }
}

/// `.video-container` play buttons toggle their video, and reappear when it ends.
pub fn attach(document: &Document) -> Result<Vec<Listener>, FxError> {
    let containers = dom::query_all(document, ".video-container");
    if containers.is_empty() {
        return Err(FxError::MissingElement(".video-container"));
    }

    let mut listeners = Vec::new();
    for container in containers {
        let button = container.query_selector(".play-btn").ok().flatten();
        let video = container
            .query_selector("video")
            .ok()
            .flatten()
            .and_then(|v| v.dyn_into::<HtmlVideoElement>().ok());
        let (Some(button), Some(video)) = (button, video) else {
            continue;
        };

        {
            let (target, video) = (button.clone(), video.clone());
            listeners.push(dom::listen(&button, "click", move |_: MouseEvent| {
                let toggle = PlayToggle::for_paused(video.paused());
                dom::toggle_class(&target, "hidden", toggle.hides_button());
                match toggle {
                    PlayToggle::Play => play(&video, target.clone()),
                    PlayToggle::Pause => {
                        let _ = video.pause();
                    }
                }
            }));
        }
        listeners.push(dom::listen(&video, "ended", move |_: Event| {
            dom::toggle_class(&button, "hidden", false);
        }));
    }
    Ok(listeners)
}
