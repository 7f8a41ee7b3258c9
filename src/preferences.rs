//! The preference surface exposed to the user.
//!
//! Two settings are offered: an "Open" toggle and a four-way "Position" dropdown. Each change is
//! written through the controller, which persists it before returning.

use crate::controller::TocController;
use crate::geometry::Corner;
use crate::settings::{Settings, SettingsStore};

/// Number of preference rows.
pub const ITEM_COUNT: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which setting a row controls.
pub enum PreferenceKey {
    /// The `opened` flag.
    Open,
    /// The preferred corner.
    Position,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Widget and current value of a preference row.
pub enum PreferenceValue {
    /// On/off switch.
    Toggle(bool),
    /// Choice among labelled options.
    Dropdown {
        /// Option labels in display order.
        options: Vec<&'static str>,
        /// Index of the current option.
        selected: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One row of the preference surface.
pub struct PreferenceItem {
    /// Setting controlled by the row.
    pub key: PreferenceKey,
    /// Row name.
    pub name: &'static str,
    /// Row description.
    pub description: &'static str,
    /// Widget and value.
    pub value: PreferenceValue,
}

#[must_use]
/// Rows describing `settings`.
pub fn items(settings: &Settings) -> [PreferenceItem; ITEM_COUNT] {
    [
        PreferenceItem {
            key: PreferenceKey::Open,
            name: "Open",
            description: "Expand the plugin",
            value: PreferenceValue::Toggle(settings.opened),
        },
        PreferenceItem {
            key: PreferenceKey::Position,
            name: "Position",
            description: "Set the position of the table of contents",
            value: PreferenceValue::Dropdown {
                options: Corner::ALL.iter().map(|c| c.label()).collect(),
                selected: Corner::ALL
                    .iter()
                    .position(|c| *c == settings.position)
                    .unwrap_or_default(),
            },
        },
    ]
}

#[derive(Debug, Default)]
/// Keyboard-driven cursor over the preference rows.
pub struct PreferencePane {
    /// Highlighted row.
    pub selected: usize,
}

impl PreferencePane {
    /// Highlights the next row, wrapping around.
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % ITEM_COUNT;
    }

    /// Highlights the previous row, wrapping around.
    pub fn select_prev(&mut self) {
        self.selected = (self.selected + ITEM_COUNT - 1) % ITEM_COUNT;
    }

    #[must_use]
    /// Setting controlled by the highlighted row.
    pub fn selected_key(&self) -> PreferenceKey {
        if self.selected == 0 {
            PreferenceKey::Open
        } else {
            PreferenceKey::Position
        }
    }

    /// Changes the highlighted setting: flips the toggle, or steps the dropdown by `step`.
    pub fn change<S: SettingsStore>(&self, controller: &mut TocController<S>, step: isize) {
        match self.selected_key() {
            PreferenceKey::Open => controller.toggle_open(),
            PreferenceKey::Position => {
                let current = controller.settings().position;
                controller.set_position(step_corner(current, step));
            }
        }
    }
}

#[must_use]
/// The corner `step` places away from `corner` in dropdown order, wrapping around.
pub fn step_corner(corner: Corner, step: isize) -> Corner {
    let len = Corner::ALL.len().cast_signed();
    let index = Corner::ALL
        .iter()
        .position(|c| *c == corner)
        .unwrap_or_default()
        .cast_signed();
    Corner::ALL[(index + step).rem_euclid(len).cast_unsigned()]
}

#[cfg(test)]
#[path = "tests/preferences.rs"]
mod tests;
