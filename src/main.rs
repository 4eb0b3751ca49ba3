use log::info;
use web_sys::Element;
use yew::prelude::*;

mod config;
mod dom;
mod error;
mod page;
mod schedule;
mod components {
    pub mod cursor;
    pub mod flash;
    pub mod lightbox;
    pub mod preloader;
    pub mod skip_link;
}
mod effects {
    pub mod a11y;
    pub mod counter;
    pub mod forms;
    pub mod hover;
    pub mod music_videos;
    pub mod nav;
    pub mod parallax;
    pub mod reveal;
    pub mod scroll;
    pub mod split_text;
    pub mod timecode;
    pub mod video;
}

use components::{
    cursor::CursorLayer,
    flash::CameraFlash,
    lightbox::Lightbox,
    preloader::Preloader,
    skip_link::SkipLink,
};
use config::FxConfig;
use page::{PageEffects, RevealEffects};

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

const MOUNT_POINT_ID: &str = "fx-root";

const SCROLL_PROGRESS_STYLE: &str = "position: fixed; top: 0; left: 0; width: 0%; height: 3px; \
    background: linear-gradient(90deg, var(--color-accent), var(--color-red)); \
    z-index: 9999; transition: width 0.1s linear;";

#[function_component]
fn App() -> Html {
    let config = use_state(|| dom::document().map(|d| FxConfig::load(&d)).unwrap_or_default());
    let ready = use_state(|| false);
    let flash_pulse = use_state(|| 0u32);
    let progress_ref = use_node_ref();

    // Listeners on the page markup live as long as the app does
    {
        let config = (*config).clone();
        let progress_ref = progress_ref.clone();
        use_effect_with_deps(
            move |_| {
                let effects = error::optional("page effects", PageEffects::mount(&config, progress_ref.cast::<Element>()));
                move || drop(effects)
            },
            (),
        );
    }

    {
        let config = (*config).clone();
        use_effect_with_deps(
            move |ready: &bool| {
                let effects = if *ready {
                    error::optional("reveal effects", RevealEffects::activate(&config))
                } else {
                    None
                };
                move || drop(effects)
            },
            *ready,
        );
    }

    let on_finished = {
        let ready = ready.clone();
        let flash_pulse = flash_pulse.clone();
        Callback::from(move |_| {
            ready.set(true);
            flash_pulse.set(*flash_pulse + 1);
        })
    };

    html! {
        <>
            <SkipLink />
            <Preloader config={config.preloader.clone()} on_finished={on_finished} />
            <div ref={progress_ref} class="scroll-progress" style={SCROLL_PROGRESS_STYLE} />
            <CursorLayer config={config.cursor.clone()} />
            <CameraFlash config={config.flash.clone()} pulse={*flash_pulse} />
            <Lightbox />
        </>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    let _ = console_log::init_with_level(config::log_level());

    info!("Starting reelfx");
    match dom::document().ok().and_then(|d| d.get_element_by_id(MOUNT_POINT_ID)) {
        Some(root) => yew::Renderer::<App>::with_root(root).render(),
        None => {
            info!("no #{} on the page, mounting on body", MOUNT_POINT_ID);
            yew::Renderer::<App>::new().render()
        }
    };
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use gloo_timers::future::TimeoutFuture;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    async fn reveals_start_once_the_preloader_hides() {
        let document = dom::document().unwrap();
        let body = document.body().unwrap();

        let settings = document.create_element("script").unwrap();
        settings.set_id(config::CONFIG_ELEMENT_ID);
        settings.set_attribute("type", "application/json").unwrap();
        settings.set_text_content(Some(r#"{ "preloader": { "start": 1, "end": 1, "hold_ms": 20 } }"#));
        body.append_child(&settings).unwrap();

        let header = document.create_element("div").unwrap();
        header.set_class_name("section-header");
        body.append_child(&header).unwrap();
        let root = document.create_element("div").unwrap();
        body.append_child(&root).unwrap();

        let app = yew::Renderer::<App>::with_root(root.clone()).render();
        TimeoutFuture::new(5).await;
        assert!(!header.class_list().contains("reveal"));

        TimeoutFuture::new(150).await;
        let preloader = document.get_element_by_id("preloader").unwrap();
        assert!(preloader.class_list().contains("hidden"));
        assert!(header.class_list().contains("reveal"));
        assert_eq!(body.style().get_property_value("overflow").unwrap(), "auto");

        app.destroy();
        for el in [settings, header, root] {
            el.remove();
        }
    }
}
