//! Competition lifecycle derived from the registration window and the announce time

use std::fmt;
use time::OffsetDateTime;

use crate::Competition;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Where a competition sits relative to `now`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Registration has not opened yet
    Upcoming,
    /// Registration is open
    Live,
    /// Registration closed, results not announced yet
    Ended,
    /// Results announced
    Past,
}

impl LifecycleState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Live => "● Live Now",
            Self::Ended => "Ended",
            Self::Past => "Past",
        }
    }

    /// Tab a competition in this state is listed under
    pub fn tab(&self) -> LifecycleTab {
        match self {
            Self::Upcoming => LifecycleTab::Upcoming,
            Self::Live => LifecycleTab::LiveNow,
            Self::Ended | Self::Past => LifecycleTab::Past,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle tabs on the listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleTab {
    #[default]
    LiveNow,
    Upcoming,
    Past,
}

impl LifecycleTab {
    pub const ALL: [LifecycleTab; 3] = [
        LifecycleTab::LiveNow,
        LifecycleTab::Upcoming,
        LifecycleTab::Past,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::LiveNow => "● Live Now",
            Self::Upcoming => "Upcoming",
            Self::Past => "Past",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::LiveNow => "live",
            Self::Upcoming => "upcoming",
            Self::Past => "past",
        }
    }
}

impl std::str::FromStr for LifecycleTab {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" | "live now" | "● live now" => Ok(Self::LiveNow),
            "upcoming" => Ok(Self::Upcoming),
            "past" => Ok(Self::Past),
            other => Err(crate::CoreError::UnknownTab(other.to_string())),
        }
    }
}

/// The three timestamps that drive a competition's lifecycle.
/// Upstream guarantees `registration_start <= registration_end <= announce_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationWindow {
    pub registration_start: OffsetDateTime,
    pub registration_end: OffsetDateTime,
    pub announce_time: OffsetDateTime,
}

impl RegistrationWindow {
    pub fn new(
        registration_start: OffsetDateTime,
        registration_end: OffsetDateTime,
        announce_time: OffsetDateTime,
    ) -> Self {
        Self {
            registration_start,
            registration_end,
            announce_time,
        }
    }

    /// Classifies `now` against the window, returning the state and the next
    /// deadline the countdown should run towards.
    pub fn classify(&self, now: OffsetDateTime) -> (LifecycleState, Option<OffsetDateTime>) {
        if now < self.registration_start {
            (LifecycleState::Upcoming, Some(self.registration_start))
        } else if now < self.registration_end {
            (LifecycleState::Live, Some(self.registration_end))
        } else if now < self.announce_time {
            (LifecycleState::Ended, Some(self.announce_time))
        } else {
            (LifecycleState::Past, None)
        }
    }
}

impl From<&Competition> for RegistrationWindow {
    fn from(competition: &Competition) -> Self {
        Self::new(
            competition.registration_start,
            competition.registration_end,
            competition.announce_time,
        )
    }
}

/// Time left until a deadline, in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Countdown {
    /// Deadline passed or absent
    NotApplicable,
    Remaining(u64),
}

impl Countdown {
    pub fn until(now: OffsetDateTime, deadline: Option<OffsetDateTime>) -> Self {
        let Some(deadline) = deadline else {
            return Self::NotApplicable;
        };

        let millis = (deadline - now).whole_milliseconds();
        if millis <= 0 {
            return Self::NotApplicable;
        }

        Self::Remaining((millis / 1000) as u64)
    }

    pub fn remaining_secs(&self) -> Option<u64> {
        match self {
            Self::NotApplicable => None,
            Self::Remaining(secs) => Some(*secs),
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = match self {
            Self::NotApplicable => return f.write_str("N/A"),
            Self::Remaining(secs) => *secs,
        };

        let days = total / SECS_PER_DAY;
        let hours = (total % SECS_PER_DAY) / SECS_PER_HOUR;
        let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
        let seconds = total % SECS_PER_MINUTE;

        if days > 0 {
            write!(f, "{}d ", days)?;
        }
        if hours > 0 {
            write!(f, "{}h ", hours)?;
        }
        if minutes > 0 {
            write!(f, "{}m ", minutes)?;
        }
        write!(f, "{}s", seconds)
    }
}
