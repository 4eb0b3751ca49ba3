use gloo_timers::callback::Timeout;
use yew::prelude::*;

use crate::config::PreloaderConfig;
use crate::dom;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreloaderPhase {
    Counting(u32),
    Hidden,
}

impl PreloaderPhase {
    pub fn first(config: &PreloaderConfig) -> Self {
        PreloaderPhase::Counting(config.start.max(config.end))
    }

    /// How long to stay in this phase and where to go next. Nothing follows `Hidden`.
    pub fn next(self, config: &PreloaderConfig) -> Option<(u32, PreloaderPhase)> {
        match self {
            PreloaderPhase::Counting(n) if n > config.end => Some((config.step_ms, PreloaderPhase::Counting(n - 1))),
            PreloaderPhase::Counting(_) => Some((config.hold_ms, PreloaderPhase::Hidden)),
            PreloaderPhase::Hidden => None,
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct PreloaderProps {
    pub config: PreloaderConfig,
    pub on_finished: Callback<()>,
}

#[function_component(Preloader)]
pub fn preloader(props: &PreloaderProps) -> Html {
    let phase = use_state(|| PreloaderPhase::first(&props.config));

    // Page stays put until the countdown is over
    use_effect_with_deps(
        |_| {
            if let Ok(document) = dom::document() {
                dom::set_scroll_locked(&document, true);
            }
            || ()
        },
        (),
    );

    {
        let set_phase = phase.setter();
        let config = props.config.clone();
        let on_finished = props.on_finished.clone();
        use_effect_with_deps(
            move |current: &PreloaderPhase| {
                let timeout = match current.next(&config) {
                    Some((delay, next)) => Some(Timeout::new(delay, move || set_phase.set(next))),
                    None => {
                        if let Ok(document) = dom::document() {
                            dom::set_scroll_locked(&document, false);
                        }
                        log::info!("preloader finished");
                        on_finished.emit(());
                        None
                    }
                };
                move || drop(timeout)
            },
            *phase,
        );
    }

    let (count, hidden) = match *phase {
        PreloaderPhase::Counting(n) => (n, false),
        PreloaderPhase::Hidden => (props.config.end, true),
    };

    html! {
        <div id="preloader" class={classes!("preloader", hidden.then(|| "hidden"))}>
            <div class="preloader-count">{ count.to_string() }</div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walks the phases, returning each phase with the time it was entered.
    fn timeline(config: &PreloaderConfig) -> Vec<(u32, PreloaderPhase)> {
        let mut at = 0;
        let mut phase = PreloaderPhase::first(config);
        let mut seen = vec![(at, phase)];
        while let Some((delay, next)) = phase.next(config) {
            at += delay;
            phase = next;
            seen.push((at, phase));
        }
        seen
    }

    #[test]
    fn counts_down_then_hides() {
        let seen = timeline(&PreloaderConfig::default());
        assert_eq!(
            seen,
            vec![
                (0, PreloaderPhase::Counting(5)),
                (900, PreloaderPhase::Counting(4)),
                (1800, PreloaderPhase::Counting(3)),
                (2700, PreloaderPhase::Counting(2)),
                (3600, PreloaderPhase::Counting(1)),
                (4100, PreloaderPhase::Hidden),
            ]
        );
    }

    #[test]
    fn hidden_is_final() {
        assert_eq!(PreloaderPhase::Hidden.next(&PreloaderConfig::default()), None);
    }

    #[test]
    fn start_below_end_only_holds() {
        let config = PreloaderConfig { start: 0, end: 1, ..PreloaderConfig::default() };
        let seen = timeline(&config);
        assert_eq!(seen, vec![(0, PreloaderPhase::Counting(1)), (500, PreloaderPhase::Hidden)]);
    }
}
