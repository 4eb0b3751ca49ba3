use std::fmt;

use chrono::{Local, Timelike};
use gloo_timers::callback::Interval;
use web_sys::Document;

use crate::config::{TimecodeConfig, TimecodeMode};
use crate::dom;
use crate::error::FxError;

const SELECTOR: &str = ".vf-timecode";

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timecode {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u32,
}

impl Timecode {
    /// One frame forward, carrying into seconds, minutes and hours.
    pub fn advance(&mut self, fps: u32) {
        self.frames += 1;
        if self.frames >= fps.max(1) {
            self.frames = 0;
            self.seconds += 1;
        }
        if self.seconds >= 60 {
            self.seconds = 0;
            self.minutes += 1;
        }
        if self.minutes >= 60 {
            self.minutes = 0;
            self.hours += 1;
        }
    }

    pub fn from_clock<T: Timelike>(time: &T, fps: u32) -> Self {
        let millis = (time.nanosecond() / 1_000_000).min(999);
        Self {
            hours: time.hour(),
            minutes: time.minute(),
            seconds: time.second().min(59),
            frames: (u64::from(millis) * u64::from(fps) / 1000) as u32,
        }
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds, self.frames)
    }
}

pub struct TimecodeClock {
    mode: TimecodeMode,
    fps: u32,
    elapsed: Timecode,
}

impl TimecodeClock {
    pub fn new(config: &TimecodeConfig) -> Self {
        Self { mode: config.mode, fps: config.fps.max(1), elapsed: Timecode::default() }
    }

    pub fn tick(&mut self) -> Timecode {
        match self.mode {
            TimecodeMode::Elapsed => {
                self.elapsed.advance(self.fps);
                self.elapsed
            }
            TimecodeMode::TimeOfDay => Timecode::from_clock(&Local::now(), self.fps),
        }
    }

    pub fn tick_ms(&self) -> u32 {
        (1000 / self.fps).max(1)
    }
}

/// Starts the free-running readout. Dropping the returned interval stops it.
pub fn start(document: &Document, config: &TimecodeConfig) -> Result<Interval, FxError> {
    let readout = dom::require(document, SELECTOR)?;
    let mut clock = TimecodeClock::new(config);
    let tick_ms = clock.tick_ms();

    Ok(Interval::new(tick_ms, move || {
        readout.set_text_content(Some(&clock.tick().to_string()));
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn tc(hours: u32, minutes: u32, seconds: u32, frames: u32) -> Timecode {
        Timecode { hours, minutes, seconds, frames }
    }

    #[test]
    fn frame_rollover_carries_into_seconds() {
        let mut t = tc(0, 0, 0, 23);
        t.advance(24);
        assert_eq!(t, tc(0, 0, 1, 0));
    }

    #[test]
    fn second_rollover_carries_into_minutes() {
        let mut t = tc(0, 0, 59, 23);
        t.advance(24);
        assert_eq!(t, tc(0, 1, 0, 0));
    }

    #[test]
    fn minute_rollover_carries_into_hours() {
        let mut t = tc(0, 59, 59, 23);
        t.advance(24);
        assert_eq!(t, tc(1, 0, 0, 0));
    }

    #[test]
    fn one_second_of_frames_is_one_second() {
        let mut t = Timecode::default();
        for _ in 0..24 {
            t.advance(24);
        }
        assert_eq!(t, tc(0, 0, 1, 0));
    }

    #[test]
    fn formats_as_zero_padded_fields() {
        assert_eq!(tc(1, 2, 3, 4).to_string(), "01:02:03:04");
    }

    #[test]
    fn time_of_day_derives_frames_from_millis() {
        let time = NaiveTime::from_hms_milli_opt(13, 45, 7, 500).unwrap();
        assert_eq!(Timecode::from_clock(&time, 24), tc(13, 45, 7, 12));
    }

    #[test]
    fn huge_frame_rates_do_not_overflow() {
        let time = NaiveTime::from_hms_milli_opt(0, 0, 0, 999).unwrap();
        assert_eq!(Timecode::from_clock(&time, u32::MAX).frames, 4_290_672_327);
        assert_eq!(TimecodeClock::new(&TimecodeConfig { fps: u32::MAX, ..TimecodeConfig::default() }).tick_ms(), 1);
    }

    #[test]
    fn elapsed_clock_ticks_at_frame_rate() {
        let mut clock = TimecodeClock::new(&TimecodeConfig::default());
        assert_eq!(clock.tick_ms(), 41);
        assert_eq!(clock.tick(), tc(0, 0, 0, 1));
        assert_eq!(clock.tick(), tc(0, 0, 0, 2));
    }
}
