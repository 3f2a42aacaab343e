//! Frame-accurate timecode values.
//!
//! A timecode keeps its displayed `HH:MM:SS:FF` components together with
//! the framerate they are counted in. Changing the framerate keeps the
//! displayed components (a timecode typed as `00:00:10:00` stays ten
//! seconds), which is how records adopt a framerate after the fact.

use std::fmt;
use std::str::FromStr;

/// Separator convention used when displaying a timecode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimecodeFormat {
    /// `HH:MM:SS:FF`
    NonDropFrame,
    /// `HH;MM;SS;FF`
    DropFrame,
}

impl TimecodeFormat {
    /// Value of the `<displayformat>` tag.
    pub fn tag(&self) -> &'static str {
        match self {
            TimecodeFormat::NonDropFrame => "NDF",
            TimecodeFormat::DropFrame => "DF",
        }
    }

    fn separator(&self) -> char {
        match self {
            TimecodeFormat::NonDropFrame => ':',
            TimecodeFormat::DropFrame => ';',
        }
    }
}

/// A timecode tied to a framerate.
///
/// A framerate of `0` means "not known yet": the frame count is then just
/// the frame component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timecode {
    hours: u32,
    minutes: u32,
    seconds: u32,
    frames: u32,
    framerate: u32,
}

/// Errors produced when parsing a timecode string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimecodeError {
    #[error("invalid timecode '{input}': expected HH:MM:SS:FF")]
    InvalidFormat { input: String },

    #[error("invalid timecode '{input}': {component} out of range")]
    OutOfRange {
        input: String,
        component: &'static str,
    },
}

impl Timecode {
    /// `00:00:00:00` with an unknown framerate.
    pub const ZERO: Timecode = Timecode {
        hours: 0,
        minutes: 0,
        seconds: 0,
        frames: 0,
        framerate: 0,
    };

    /// Build a timecode from a total frame count.
    pub fn from_frames(total: u64, framerate: u32) -> Self {
        let mut tc = Timecode {
            hours: 0,
            minutes: 0,
            seconds: 0,
            frames: 0,
            framerate,
        };
        tc.spread(total);
        tc
    }

    /// Build a timecode from its displayed components.
    pub fn from_components(hours: u32, minutes: u32, seconds: u32, frames: u32, framerate: u32) -> Self {
        Timecode {
            hours,
            minutes,
            seconds,
            frames,
            framerate,
        }
    }

    /// Parse `HH:MM:SS:FF` (`;` is accepted as a separator) with an unknown framerate.
    pub fn parse(input: &str) -> Result<Self, TimecodeError> {
        Self::parse_with_rate(input, 0)
    }

    /// Parse `HH:MM:SS:FF` and attach a framerate.
    pub fn parse_with_rate(input: &str, framerate: u32) -> Result<Self, TimecodeError> {
        let parts: Vec<&str> = input.trim().split([':', ';']).collect();
        if parts.len() != 4 {
            return Err(TimecodeError::InvalidFormat {
                input: input.to_string(),
            });
        }

        let mut values = [0u32; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| TimecodeError::InvalidFormat {
                input: input.to_string(),
            })?;
        }
        let [hours, minutes, seconds, frames] = values;

        if minutes >= 60 {
            return Err(TimecodeError::OutOfRange {
                input: input.to_string(),
                component: "minutes",
            });
        }
        if seconds >= 60 {
            return Err(TimecodeError::OutOfRange {
                input: input.to_string(),
                component: "seconds",
            });
        }
        if framerate != 0 && frames >= framerate {
            return Err(TimecodeError::OutOfRange {
                input: input.to_string(),
                component: "frames",
            });
        }

        Ok(Timecode {
            hours,
            minutes,
            seconds,
            frames,
            framerate,
        })
    }

    /// Total number of frames since `00:00:00:00`.
    pub fn frames_count(&self) -> u64 {
        let secs = (self.hours as u64 * 60 + self.minutes as u64) * 60 + self.seconds as u64;
        secs * self.framerate as u64 + self.frames as u64
    }

    /// Framerate the components are counted in (`0` when unknown).
    pub fn framerate(&self) -> u32 {
        self.framerate
    }

    /// Change the framerate, keeping the displayed components.
    ///
    /// Frame components that do not fit the new rate carry over into the
    /// seconds, so a raw frame count built with an unknown rate keeps its
    /// total once a rate is known.
    pub fn set_framerate(&mut self, framerate: u32) {
        if self.framerate == framerate {
            return;
        }
        let secs = (self.hours as u64 * 60 + self.minutes as u64) * 60 + self.seconds as u64;
        self.framerate = framerate;
        if framerate != 0 && self.frames >= framerate {
            let total = secs * framerate as u64 + self.frames as u64;
            self.spread(total);
        }
    }

    /// Same timecode with a different framerate.
    pub fn with_framerate(mut self, framerate: u32) -> Self {
        self.set_framerate(framerate);
        self
    }

    /// Display string using the requested separator convention.
    pub fn display(&self, format: TimecodeFormat) -> String {
        let sep = format.separator();
        format!(
            "{:02}{sep}{:02}{sep}{:02}{sep}{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }

    /// Components as `(hours, minutes, seconds, frames)`.
    pub fn components(&self) -> (u32, u32, u32, u32) {
        (self.hours, self.minutes, self.seconds, self.frames)
    }

    fn spread(&mut self, total: u64) {
        if self.framerate == 0 {
            self.hours = 0;
            self.minutes = 0;
            self.seconds = 0;
            self.frames = total.min(u32::MAX as u64) as u32;
            return;
        }
        let fps = self.framerate as u64;
        let secs = total / fps;
        self.frames = (total % fps) as u32;
        self.seconds = (secs % 60) as u32;
        self.minutes = ((secs / 60) % 60) as u32;
        self.hours = (secs / 3600).min(u32::MAX as u64) as u32;
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display(TimecodeFormat::NonDropFrame))
    }
}

impl FromStr for Timecode {
    type Err = TimecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Copy the owner's framerate onto `tc`, or adopt the timecode's framerate
/// when the owner has none yet. A zero on both sides stays zero.
///
/// Returns the rate when the owner just adopted one; the caller must then
/// bring every other timecode it holds to that rate.
#[must_use]
pub(crate) fn sync_framerate(owner_rate: &mut u32, tc: &mut Timecode) -> Option<u32> {
    if *owner_rate != 0 {
        tc.set_framerate(*owner_rate);
        None
    } else if tc.framerate() != 0 {
        *owner_rate = tc.framerate();
        Some(*owner_rate)
    } else {
        None
    }
}
