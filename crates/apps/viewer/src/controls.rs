use std::fmt;
use std::str::FromStr;

use foundation::HourOfWeek;
use tracing::{error, info};

/// Input from the control surface (slider, "now" button, map gestures).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UiEvent {
    SetTime(i64),
    Now,
    Pan { latitude: f64, longitude: f64 },
    Zoom(f64),
    Pinch(f64),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError(pub String);

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for CommandError {}

/// Terminal command syntax: `time N`, `now`, `pan LAT LON`, `zoom Z`, `pinch Z`, `quit`.
impl FromStr for UiEvent {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let cmd = words
            .next()
            .ok_or_else(|| CommandError("empty command".to_string()))?;
        let args: Vec<&str> = words.collect();

        let event = match (cmd.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("time", [n]) => UiEvent::SetTime(number(n)?),
            ("now", []) => UiEvent::Now,
            ("pan", [lat, lon]) => UiEvent::Pan {
                latitude: number(lat)?,
                longitude: number(lon)?,
            },
            ("zoom", [z]) => UiEvent::Zoom(number(z)?),
            ("pinch", [z]) => UiEvent::Pinch(number(z)?),
            ("quit" | "exit", []) => UiEvent::Quit,
            _ => return Err(CommandError(format!("unrecognized command: {line:?}"))),
        };
        Ok(event)
    }
}

fn number<T: FromStr>(s: &str) -> Result<T, CommandError> {
    s.parse()
        .map_err(|_| CommandError(format!("not a number: {s:?}")))
}

/// Label and status readouts next to the map.
pub trait Controls {
    fn show_time(&mut self, time: HourOfWeek, label: &str);
    fn show_coordinates(&mut self, label: &str);
    fn show_error(&mut self, message: &str);
}

impl<T: Controls + ?Sized> Controls for Box<T> {
    fn show_time(&mut self, time: HourOfWeek, label: &str) {
        (**self).show_time(time, label)
    }

    fn show_coordinates(&mut self, label: &str) {
        (**self).show_coordinates(label)
    }

    fn show_error(&mut self, message: &str) {
        (**self).show_error(message)
    }
}

/// Controls that report through the log.
#[derive(Debug, Default)]
pub struct TerminalControls {
    last_time: Option<HourOfWeek>,
}

impl Controls for TerminalControls {
    fn show_time(&mut self, time: HourOfWeek, label: &str) {
        // Render passes fire for every chunk; only report when the value moves.
        if self.last_time != Some(time) {
            info!(target: "controls", time = time.value(), "{label}");
            self.last_time = Some(time);
        }
    }

    fn show_coordinates(&mut self, label: &str) {
        info!(target: "controls", "{label}");
    }

    fn show_error(&mut self, message: &str) {
        error!(target: "controls", "{message}");
    }
}
