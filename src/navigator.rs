//! Maps a panel entry onto a scroll target in the view's current rendering mode.
//!
//! Navigation is two-staged. A coarse jump by line number always happens first (cursor move in
//! source mode, renderer scroll in preview mode), then the rendered heading element is looked up
//! and scrolled into view exactly. If the lookup misses, the flash is skipped and the coarse jump
//! stands.
//!
//! Flash highlights are removed by [`HeadingNavigator::expire`], which the host loop calls on
//! every tick. Pending removals survive panel rebuilds: they refer to rendered blocks, not to the
//! panel.

use crate::heading::HeadingDescriptor;
use crate::host::{ElementId, HeaderQuery, Host, ViewId, ViewMode};
use crate::panel::EntryTarget;
use std::time::{Duration, Instant};
use tracing::debug;

/// How long a navigation target stays highlighted.
pub const FLASH_DURATION: Duration = Duration::from_millis(2000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingFlash {
    view: ViewId,
    block: ElementId,
    until: Instant,
}

#[derive(Debug)]
/// Executes entry activations and tracks pending highlight removals.
pub struct HeadingNavigator {
    flash_duration: Duration,
    pending: Vec<PendingFlash>,
}

impl Default for HeadingNavigator {
    fn default() -> Self {
        Self::new(FLASH_DURATION)
    }
}

impl HeadingNavigator {
    #[must_use]
    /// Creates a navigator whose highlights last `flash_duration`.
    pub fn new(flash_duration: Duration) -> Self {
        Self {
            flash_duration,
            pending: Vec::new(),
        }
    }

    #[must_use]
    /// Number of highlights awaiting removal.
    pub fn pending_flashes(&self) -> usize {
        self.pending.len()
    }

    /// Navigates `view` to `target`, returning the block that was flashed, if any.
    pub fn activate(
        &mut self,
        host: &mut impl Host,
        view: ViewId,
        target: &EntryTarget,
        now: Instant,
    ) -> Option<ElementId> {
        match target {
            EntryTarget::Top => {
                host.apply_scroll(view, 0);
                host.scroll_to(view, 0);
                None
            }
            EntryTarget::Heading(heading) => match host.mode(view)? {
                ViewMode::Source => self.activate_source(host, view, heading, now),
                ViewMode::Preview => self.activate_preview(host, view, heading, now),
            },
        }
    }

    fn activate_source(
        &mut self,
        host: &mut impl Host,
        view: ViewId,
        heading: &HeadingDescriptor,
        now: Instant,
    ) -> Option<ElementId> {
        host.set_cursor(view, heading.start_line, heading.start_column);

        // First match wins, even when several headers share text and level.
        let Some(header) = host
            .find_headers(view, &HeaderQuery::SourceLevel(heading.level))
            .into_iter()
            .find(|header| header.text == heading.text)
        else {
            debug!(heading = %heading.text, "no rendered source header");
            return None;
        };

        host.scroll_into_view(view, header.element);
        let block = header.block?;
        self.flash(host, view, block, now);
        Some(block)
    }

    fn activate_preview(
        &mut self,
        host: &mut impl Host,
        view: ViewId,
        heading: &HeadingDescriptor,
        now: Instant,
    ) -> Option<ElementId> {
        host.apply_scroll(view, heading.start_line);

        let query = HeaderQuery::PreviewHeading {
            level: heading.level,
            text: heading.text.clone(),
        };
        let Some(header) = host.find_headers(view, &query).into_iter().next() else {
            debug!(heading = %heading.text, "no rendered preview header");
            return None;
        };

        host.scroll_into_view(view, header.element);
        let block = header.block?;
        self.flash(host, view, block, now);
        Some(block)
    }

    fn flash(&mut self, host: &mut impl Host, view: ViewId, block: ElementId, now: Instant) {
        host.set_flashing(view, block, true);
        self.pending.push(PendingFlash {
            view,
            block,
            until: now + self.flash_duration,
        });
    }

    /// Clears every highlight whose time is up.
    pub fn expire(&mut self, host: &mut impl Host, now: Instant) {
        self.pending.retain(|flash| {
            if flash.until <= now {
                host.set_flashing(flash.view, flash.block, false);
                false
            } else {
                true
            }
        });
    }

    /// Clears every pending highlight immediately.
    pub fn cancel_all(&mut self, host: &mut impl Host) {
        for flash in self.pending.drain(..) {
            host.set_flashing(flash.view, flash.block, false);
        }
    }
}

#[cfg(test)]
#[path = "tests/navigator.rs"]
mod tests;
