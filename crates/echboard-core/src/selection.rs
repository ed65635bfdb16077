//! Visible-region selection
//!
//! Two states: every region visible, or a non-empty custom subset. A custom
//! subset that would become empty snaps back to "all", so an empty visible
//! set is unreachable.

use std::collections::BTreeSet;

use echboard_types::RegionId;

/// Selection mode as shown in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    All,
    Custom,
}

/// User action on the region filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    /// "All regions" button
    SelectAll,
    /// Click on a single region chip
    ClickRegion(RegionId),
    /// The user switched to a different scenario
    NewScenarioSelected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    All,
    /// Never empty
    Custom(BTreeSet<RegionId>),
}

/// Region filter state; construct with [`RegionSelection::default`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSelection {
    state: State,
}

impl Default for RegionSelection {
    fn default() -> Self {
        Self { state: State::All }
    }
}

impl RegionSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SelectionMode {
        match self.state {
            State::All => SelectionMode::All,
            State::Custom(_) => SelectionMode::Custom,
        }
    }

    /// Next state after `event`
    pub fn apply(&self, event: SelectionEvent) -> Self {
        match event {
            SelectionEvent::SelectAll | SelectionEvent::NewScenarioSelected => Self::all(),
            SelectionEvent::ClickRegion(region) => self.click(region),
        }
    }

    /// Clicking from "all" narrows to exactly that region; clicking in
    /// custom mode toggles membership.
    pub fn click(&self, region: RegionId) -> Self {
        let selected = match &self.state {
            State::All => BTreeSet::from([region]),
            State::Custom(current) => {
                let mut next = current.clone();
                if !next.remove(&region) {
                    next.insert(region);
                }
                next
            }
        };

        if selected.is_empty() {
            Self::all()
        } else {
            Self {
                state: State::Custom(selected),
            }
        }
    }

    /// Effective visible regions, never empty
    pub fn visible(&self) -> BTreeSet<RegionId> {
        match &self.state {
            State::All => RegionId::ALL.into_iter().collect(),
            State::Custom(selected) => selected.clone(),
        }
    }

    /// Visible regions in canonical order
    pub fn visible_ordered(&self) -> Vec<RegionId> {
        RegionId::ALL
            .into_iter()
            .filter(|r| self.is_visible(*r))
            .collect()
    }

    pub fn is_visible(&self, region: RegionId) -> bool {
        match &self.state {
            State::All => true,
            State::Custom(selected) => selected.contains(&region),
        }
    }

    /// True if `region` is explicitly selected (chip highlighted)
    pub fn is_selected(&self, region: RegionId) -> bool {
        matches!(&self.state, State::Custom(s) if s.contains(&region))
    }
}
