//! Derived listing view: lifecycle + countdown per competition, and the tab filters

use std::str::FromStr;
use time::OffsetDateTime;

use crate::{
    Competition, CompetitionKind, CoreError, Countdown, LifecycleState, LifecycleTab,
    RegistrationWindow,
};

/// A competition together with its state at the time the listing was derived
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayCompetition {
    pub competition: Competition,
    pub state: LifecycleState,
    pub deadline: Option<OffsetDateTime>,
    pub countdown: Countdown,
}

impl DisplayCompetition {
    pub fn derive(competition: &Competition, now: OffsetDateTime) -> Self {
        let (state, deadline) = RegistrationWindow::from(competition).classify(now);
        Self {
            competition: competition.clone(),
            state,
            deadline,
            countdown: Countdown::until(now, deadline),
        }
    }
}

/// Re-derives the whole listing for `now`. Pure: the same input and `now`
/// always yield the same output.
pub fn derive_listing(
    competitions: &[Competition],
    now: OffsetDateTime,
) -> Vec<DisplayCompetition> {
    competitions
        .iter()
        .map(|competition| DisplayCompetition::derive(competition, now))
        .collect()
}

/// Category tabs on the listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryTab {
    #[default]
    All,
    Kind(CompetitionKind),
}

impl CategoryTab {
    pub fn all_tabs() -> [CategoryTab; 4] {
        [
            CategoryTab::All,
            CategoryTab::Kind(CompetitionKind::Callers),
            CategoryTab::Kind(CompetitionKind::Prediction),
            CategoryTab::Kind(CompetitionKind::Trading),
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Kind(kind) => kind.as_str(),
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Kind(kind) => kind.slug(),
        }
    }

    pub fn matches(&self, kind: CompetitionKind) -> bool {
        match self {
            Self::All => true,
            Self::Kind(selected) => *selected == kind,
        }
    }
}

impl FromStr for CategoryTab {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<CompetitionKind>()
            .map(Self::Kind)
            .map_err(|_| CoreError::UnknownTab(s.to_string()))
    }
}

/// How the "Live Now" tab filters.
///
/// The platform's listing has always shown every competition while "Live Now"
/// is selected. `Strict` restricts it to competitions whose registration is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiveTabPolicy {
    #[default]
    ShowAll,
    Strict,
}

impl LiveTabPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::ShowAll
        }
    }
}

fn lifecycle_matches(state: LifecycleState, tab: LifecycleTab, policy: LiveTabPolicy) -> bool {
    match (tab, policy) {
        (LifecycleTab::LiveNow, LiveTabPolicy::ShowAll) => true,
        (tab, _) => state.tab() == tab,
    }
}

/// Order-preserving projection of the listing for the selected tabs
pub fn filter_listing<'a>(
    listing: &'a [DisplayCompetition],
    category: CategoryTab,
    tab: LifecycleTab,
    policy: LiveTabPolicy,
) -> Vec<&'a DisplayCompetition> {
    listing
        .iter()
        .filter(|item| category.matches(item.competition.kind))
        .filter(|item| lifecycle_matches(item.state, tab, policy))
        .collect()
}

/// Tabs on the activities page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivityTab {
    #[default]
    All,
    OnGoing,
    Completed,
}

impl ActivityTab {
    pub const ALL: [ActivityTab; 3] = [
        ActivityTab::All,
        ActivityTab::OnGoing,
        ActivityTab::Completed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::OnGoing => "On Going",
            Self::Completed => "Completed",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::OnGoing => "ongoing",
            Self::Completed => "completed",
        }
    }

    /// Maps the backend status of a joined competition. Anything that is not
    /// explicitly ended (including "upcoming") counts as on going.
    pub fn for_status(status: &str) -> ActivityTab {
        if status.eq_ignore_ascii_case("ended") {
            ActivityTab::Completed
        } else {
            ActivityTab::OnGoing
        }
    }
}

impl FromStr for ActivityTab {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(' ', "").as_str() {
            "all" => Ok(Self::All),
            "ongoing" => Ok(Self::OnGoing),
            "completed" => Ok(Self::Completed),
            other => Err(CoreError::UnknownTab(other.to_string())),
        }
    }
}

pub fn filter_activities(competitions: &[Competition], tab: ActivityTab) -> Vec<&Competition> {
    competitions
        .iter()
        .filter(|competition| match tab {
            ActivityTab::All => true,
            tab => ActivityTab::for_status(&competition.status) == tab,
        })
        .collect()
}
