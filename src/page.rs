use gloo_timers::callback::Interval;
use web_sys::{Document, Element};

use crate::config::FxConfig;
use crate::dom::{self, Listener};
use crate::effects::reveal::{self, OneShotObserver};
use crate::effects::scroll::{self, ScrollHandle, ScrollScene};
use crate::effects::{a11y, forms, hover, music_videos, nav, split_text, timecode, video};
use crate::error::{self, FxError};

/// Behaviours wired to the page markup as soon as the app mounts. Dropping
/// this detaches all of them.
pub struct PageEffects {
    _listeners: Vec<Listener>,
    _scroll: Option<ScrollHandle>,
    _timecode: Option<Interval>,
    _lazy_images: Option<OneShotObserver>,
}

impl PageEffects {
    pub fn mount(config: &FxConfig, progress_bar: Option<Element>) -> Result<Self, FxError> {
        let window = dom::window()?;
        let document = dom::document()?;

        split_text::apply(&document);

        let groups = [
            ("mobile menu", nav::attach_menu(&document)),
            ("smooth scroll", nav::attach_smooth_scroll(&document, &window, &config.nav)),
            ("magnetic buttons", hover::attach_magnetic(&document, &config.hover)),
            ("tilt cards", hover::attach_tilt(&document, &config.hover)),
            ("form validation", forms::attach(&document)),
            ("video players", video::attach(&document)),
            ("music video cards", music_videos::attach(&document)),
            ("accessibility", a11y::attach(&document)),
        ];
        let listeners: Vec<Listener> = groups
            .into_iter()
            .filter_map(|(feature, result)| error::optional(feature, result))
            .flatten()
            .collect();

        let scene = ScrollScene::collect(&window, &document, config, progress_bar);

        log::debug!("page effects mounted with {} listeners", listeners.len());
        Ok(Self {
            _listeners: listeners,
            _scroll: error::optional("scroll effects", scroll::attach(&window, scene)),
            _timecode: error::optional("timecode", timecode::start(&document, &config.timecode)),
            _lazy_images: error::optional("lazy images", reveal::attach_lazy_images(&document)),
        })
    }
}

/// Everything that waits for the preloader to get out of the way.
pub struct RevealEffects {
    _observers: Vec<OneShotObserver>,
}

impl RevealEffects {
    pub fn activate(config: &FxConfig) -> Result<Self, FxError> {
        let document = dom::document()?;
        start_film_strips(&document);
        let observers = reveal::attach(&document, &config.reveal, &config.counter);
        log::debug!("{} reveal observers active", observers.len());
        Ok(Self { _observers: observers })
    }
}

fn start_film_strips(document: &Document) {
    for (i, strip) in dom::query_all(document, ".film-strip").iter().enumerate() {
        dom::set_style(strip, "animation", &format!("float {}s ease-in-out infinite", 6 + i));
    }
}
