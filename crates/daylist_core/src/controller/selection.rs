//! How the user marks items for complete/restore.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::model::item::ItemId;

/// Selection mechanism for the completed list.
///
/// The pending list always uses checkboxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    /// Completed items keep an enabled checkbox.
    #[default]
    Checkbox,
    /// Completed items show a disabled, checked box; tapping a row toggles it.
    TapToggle,
}

impl SelectionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checkbox => "checkbox",
            Self::TapToggle => "tap-toggle",
        }
    }
}

impl Display for SelectionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "checkbox" => Ok(Self::Checkbox),
            "tap-toggle" | "tap_toggle" | "tap" => Ok(Self::TapToggle),
            other => Err(format!("unsupported selection mode `{other}`")),
        }
    }
}

/// Ids currently marked by the user, across both lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<ItemId>,
}

impl Selection {
    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    pub fn set(&mut self, id: ItemId, selected: bool) {
        if selected {
            self.ids.insert(id);
        } else {
            self.ids.remove(&id);
        }
    }

    /// Flips membership and returns the new state.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn remove(&mut self, id: &ItemId) {
        self.ids.remove(id);
    }

    /// Drops ids for which `keep` is false.
    pub fn retain(&mut self, keep: impl Fn(&ItemId) -> bool) {
        self.ids.retain(|id| keep(id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
