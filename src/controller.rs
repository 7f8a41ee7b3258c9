//! Keeps one panel in sync with the one active view.
//!
//! Every trigger funnels into the same idempotent rebuild: the old panel is detached first, then
//! a new one is built from whatever the host reports as active.
//!
//! ```text
//! trigger -> detach old panel -> active view? -> headings? -> build -> mount -> place
//!                                    |no            |no/empty
//!                                    v              v
//!                                 no panel       no panel
//! ```

use crate::geometry::{compute_placement, Bounds, Corner, LayoutProbe, Placement};
use crate::host::{ActiveViewContext, DocumentId, Host, PanelId, ViewId};
use crate::navigator::HeadingNavigator;
use crate::panel::{build_panel, PanelHandle};
use crate::settings::{Settings, SettingsStore};
use std::time::Instant;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Host notifications that cause a rebuild.
pub enum TriggerEvent {
    /// A pointer click anywhere in the host window.
    Click,
    /// Focus moved to another view, or away from every view.
    ActiveViewChanged,
    /// Heading metadata of a document was refreshed.
    MetadataChanged(DocumentId),
}

/// Owns the settings, the active view context and the panel handle.
pub struct TocController<S: SettingsStore> {
    settings: Settings,
    store: S,
    active: Option<ActiveViewContext>,
    panel: Option<PanelHandle>,
    navigator: HeadingNavigator,
}

impl<S: SettingsStore> TocController<S> {
    /// Loads settings from `store`, falling back to defaults for anything unusable.
    pub fn activate(store: S, navigator: HeadingNavigator) -> Self {
        let stored = store.load().unwrap_or_else(|e| {
            warn!("could not load settings, using defaults: {e}");
            None
        });
        let settings = Settings::merged(stored.as_ref());
        debug!(?settings, "floating toc activated");
        Self {
            settings,
            store,
            active: None,
            panel: None,
            navigator,
        }
    }

    /// Tears down the panel and pending highlights, then persists the settings.
    pub fn deactivate(mut self, host: &mut impl Host) -> S {
        self.detach_panel(host);
        self.navigator.cancel_all(host);
        self.persist();
        self.store
    }

    #[must_use]
    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    /// The view context captured by the last trigger.
    pub fn active_view(&self) -> Option<&ActiveViewContext> {
        self.active.as_ref()
    }

    #[must_use]
    /// The mounted panel, if any.
    pub fn panel(&self) -> Option<&PanelHandle> {
        self.panel.as_ref()
    }

    #[must_use]
    /// The settings store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Rebuilds the panel for the host's active view. Returns whether a panel is now shown.
    pub fn on_trigger(&mut self, host: &mut impl Host, event: &TriggerEvent) -> bool {
        if let TriggerEvent::MetadataChanged(document) = event {
            let is_active = self
                .active
                .as_ref()
                .is_some_and(|active| &active.document == document);
            if !is_active {
                return self.panel.is_some();
            }
        }

        self.detach_panel(host);

        self.active = host.active_view();
        let Some(active) = self.active.clone() else {
            debug!(?event, "no active view, panel hidden");
            return false;
        };

        let Some(headings) = host.headings(&active.document).filter(|h| !h.is_empty()) else {
            debug!(document = %active.document.0, "no headings, panel hidden");
            return false;
        };

        let panel = build_panel(headings, self.settings.opened);
        debug!(
            document = %active.document.0,
            entries = panel.entries.len(),
            ?event,
            "rebuilding panel"
        );
        let handle = PanelHandle::mount(host, active.view, panel);
        let placement = place(&*host, handle.view, handle.id, self.settings.position);
        host.apply_placement(handle.id, placement);
        self.panel = Some(handle);
        true
    }

    /// Routes a click on entry `index` to the navigator.
    pub fn activate_entry(&mut self, host: &mut impl Host, index: usize, now: Instant) {
        let Some(handle) = &self.panel else {
            return;
        };
        let Some(target) = handle.target(index) else {
            return;
        };
        let view = handle.view;
        let target = target.clone();
        self.navigator.activate(host, view, &target, now);
    }

    /// Removes highlights whose time is up.
    pub fn on_tick(&mut self, host: &mut impl Host, now: Instant) {
        self.navigator.expire(host, now);
    }

    /// Flips the expanded state. The displayed panel follows on the next rebuild.
    pub fn toggle_open(&mut self) {
        self.set_opened(!self.settings.opened);
    }

    /// Sets the expanded state and persists it.
    pub fn set_opened(&mut self, opened: bool) {
        self.settings.opened = opened;
        self.persist();
    }

    /// Sets the preferred corner and persists it.
    pub fn set_position(&mut self, position: Corner) {
        self.settings.position = position;
        self.persist();
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.settings) {
            warn!("could not save settings: {e}");
        }
    }

    fn detach_panel(&mut self, host: &mut impl Host) {
        if let Some(handle) = self.panel.take() {
            handle.detach(host);
        }
    }
}

struct MountedLayout<'a, H> {
    host: &'a H,
    view: ViewId,
    panel: PanelId,
}

impl<H: Host> LayoutProbe for MountedLayout<'_, H> {
    fn header_visible(&self) -> bool {
        self.host.header_visible(self.view)
    }

    fn status_bar(&self) -> Option<Bounds> {
        self.host.status_bar_bounds()
    }

    fn panel(&self, placement: &Placement) -> Option<Bounds> {
        self.host.panel_bounds(self.panel, placement)
    }
}

fn place<H: Host>(host: &H, view: ViewId, panel: PanelId, corner: Corner) -> Placement {
    compute_placement(corner, &MountedLayout { host, view, panel })
}

#[cfg(test)]
#[path = "tests/controller.rs"]
mod tests;
