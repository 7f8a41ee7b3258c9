//! Placement of the panel relative to host chrome.
//!
//! The resolver only ever compares two rectangles handed back by the host's layout: the panel's
//! and the status bar's. It never needs the window size, so it stays correct across external
//! reflows as long as the panel is placed again after each rebuild.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Preferred corner of the view for the panel.
pub enum Corner {
    /// Upper left corner.
    TopLeft,
    #[default]
    /// Upper right corner.
    TopRight,
    /// Lower left corner.
    BottomLeft,
    /// Lower right corner.
    BottomRight,
}

impl Corner {
    /// Every corner, in the order the preference dropdown lists them.
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    #[must_use]
    /// The vertical half of the corner.
    pub fn vertical(self) -> VerticalHalf {
        match self {
            Self::TopLeft | Self::TopRight => VerticalHalf::Top,
            Self::BottomLeft | Self::BottomRight => VerticalHalf::Bottom,
        }
    }

    #[must_use]
    /// The horizontal half of the corner.
    pub fn horizontal(self) -> HorizontalHalf {
        match self {
            Self::TopLeft | Self::BottomLeft => HorizontalHalf::Left,
            Self::TopRight | Self::BottomRight => HorizontalHalf::Right,
        }
    }

    #[must_use]
    /// Persisted identifier, e.g. `top-right`.
    pub fn key(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }

    #[must_use]
    /// Human readable label for preference surfaces.
    pub fn label(self) -> &'static str {
        match self {
            Self::TopLeft => "Top Left",
            Self::TopRight => "Top Right",
            Self::BottomLeft => "Bottom Left",
            Self::BottomRight => "Bottom Right",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Upper or lower half of the view.
pub enum VerticalHalf {
    /// Anchored to the top edge.
    Top,
    /// Anchored to the bottom edge.
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Left or right half of the view.
pub enum HorizontalHalf {
    /// Anchored to the left edge.
    Left,
    /// Anchored to the right edge.
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Offset from the top edge of the container.
pub enum TopOffset {
    /// No header chrome to clear.
    NoHeader,
    /// Clears the visible view header.
    Header,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Offset from the bottom edge of the container.
pub enum BottomOffset {
    /// No status bar to clear.
    NoStatusBar,
    /// Lifted above the status bar.
    StatusBar,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Final layout directives for the panel.
///
/// A top corner normally only carries `top`; it also gains a `bottom` constraint when it would
/// otherwise run into the status bar.
pub struct Placement {
    /// Horizontal anchor.
    pub horizontal: HorizontalHalf,
    /// Top anchor, if any.
    pub top: Option<TopOffset>,
    /// Bottom anchor, if any.
    pub bottom: Option<BottomOffset>,
}

impl Placement {
    #[must_use]
    /// Starting directives for a corner, before any chrome is considered.
    pub fn initial(corner: Corner) -> Self {
        let (top, bottom) = match corner.vertical() {
            VerticalHalf::Top => (Some(TopOffset::NoHeader), None),
            VerticalHalf::Bottom => (None, Some(BottomOffset::NoStatusBar)),
        };
        Self {
            horizontal: corner.horizontal(),
            top,
            bottom,
        }
    }

    #[must_use]
    /// Class names a DOM host would attach for these directives.
    pub fn css_classes(&self) -> Vec<&'static str> {
        let mut classes = Vec::with_capacity(3);
        match self.top {
            Some(TopOffset::NoHeader) => classes.push("toc-box-top-no-header"),
            Some(TopOffset::Header) => classes.push("toc-box-top-header"),
            None => {}
        }
        match self.bottom {
            Some(BottomOffset::NoStatusBar) => classes.push("toc-box-bottom-no-status-bar"),
            Some(BottomOffset::StatusBar) => classes.push("toc-box-bottom-status-bar"),
            None => {}
        }
        classes.push(match self.horizontal {
            HorizontalHalf::Left => "toc-box-left",
            HorizontalHalf::Right => "toc-box-right",
        });
        classes
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Bounding rectangle in host layout coordinates; `right` and `bottom` are the far edges.
pub struct Bounds {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge.
    pub right: i32,
    /// Bottom edge.
    pub bottom: i32,
}

impl Bounds {
    #[must_use]
    /// Builds bounds from an origin and a size.
    pub fn from_origin(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    #[must_use]
    /// Whether a panel with these bounds runs into `status_bar`.
    ///
    /// Any intersection of the bottom/right edges counts, touching included.
    pub fn reaches(&self, status_bar: &Bounds) -> bool {
        self.bottom >= status_bar.top && self.right >= status_bar.left
    }
}

/// Layout measurements the resolver needs from the host.
pub trait LayoutProbe {
    /// Whether the view's header chrome is displayed.
    fn header_visible(&self) -> bool;
    /// Status bar bounds, if the host has one.
    fn status_bar(&self) -> Option<Bounds>;
    /// Panel bounds under a candidate placement.
    fn panel(&self, placement: &Placement) -> Option<Bounds>;
}

#[must_use]
/// Resolves the final placement for `corner`.
pub fn compute_placement(corner: Corner, probe: &impl LayoutProbe) -> Placement {
    let mut placement = Placement::initial(corner);

    if corner.vertical() == VerticalHalf::Top && probe.header_visible() {
        placement.top = Some(TopOffset::Header);
    }

    if let (Some(status_bar), Some(panel)) = (probe.status_bar(), probe.panel(&placement)) {
        if panel.reaches(&status_bar) {
            placement.bottom = Some(BottomOffset::StatusBar);
        }
    }

    placement
}

#[cfg(test)]
#[path = "tests/geometry.rs"]
mod tests;
