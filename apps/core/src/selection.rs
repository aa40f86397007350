use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::Mode;
use crate::facility::Facility;

/// What an empty selection means for the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySelection {
    #[default]
    ShowNothing,
    ShowEverything,
}

impl EmptySelection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "nothing" | "none" | "show_nothing" => Some(Self::ShowNothing),
            "everything" | "all" | "show_everything" => Some(Self::ShowEverything),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAction {
    Toggle(Mode),
    SelectAll,
    Clear,
}

/// The set of currently highlighted modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    modes: BTreeSet<Mode>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::all()
    }
}

impl Selection {
    pub fn all() -> Self {
        Self {
            modes: Mode::ALL.into_iter().collect(),
        }
    }

    pub const fn empty() -> Self {
        Self {
            modes: BTreeSet::new(),
        }
    }

    pub fn from_modes(modes: impl IntoIterator<Item = Mode>) -> Self {
        Self {
            modes: modes.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn apply(mut self, action: SelectionAction) -> Self {
        match action {
            SelectionAction::Toggle(mode) => {
                if !self.modes.remove(&mode) {
                    self.modes.insert(mode);
                }
            }
            SelectionAction::SelectAll => self.modes = Mode::ALL.into_iter().collect(),
            SelectionAction::Clear => self.modes.clear(),
        }
        self
    }

    pub fn contains(&self, mode: Mode) -> bool {
        self.modes.contains(&mode)
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_all(&self) -> bool {
        self.modes.len() == Mode::ALL.len()
    }

    /// Selected modes in display order.
    pub fn modes(&self) -> impl Iterator<Item = Mode> + '_ {
        self.modes.iter().copied()
    }

    /// True when any of the tags is a selected mode.
    ///
    /// An empty selection under `ShowEverything` behaves like the full one:
    /// tags with no recognised mode still match nothing.
    pub fn matches_tags(&self, tags: &[String], empty: EmptySelection) -> bool {
        let show_all = self.modes.is_empty() && empty == EmptySelection::ShowEverything;
        tags.iter()
            .filter_map(|tag| Mode::parse(tag))
            .any(|mode| show_all || self.modes.contains(&mode))
    }

    /// A `mode_count` of zero marks malformed mode data and never matches.
    pub fn matches(&self, facility: &Facility, empty: EmptySelection) -> bool {
        facility.mode_count > 0 && self.matches_tags(&facility.modes, empty)
    }
}
