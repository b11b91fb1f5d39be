//! Viewport state and the controller that owns it.
//!
//! [`ViewportState`] has exactly one writer, [`ZoomScrollController`]. Every
//! other component reads a `Copy` snapshot, so a render pass never observes
//! a half-applied change. Header and body panes do not keep their own scroll
//! values; they are [`PaneView`]s bound to the controller's single state.

use serde::Serialize;

use crate::timeline::range::DateRange;
use crate::timeline::resolution::Resolution;
use crate::timeline::projection::Projection;

/// Lower zoom bound.
pub const MIN_ZOOM: f64 = 0.3;
/// Upper zoom bound.
pub const MAX_ZOOM: f64 = 3.0;
/// Factor applied by one zoom-in / zoom-out step.
pub const ZOOM_STEP: f64 = 1.2;
/// Zoom factor at mount time and after reset.
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Zoom factor and horizontal scroll shared by every pane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportState {
    zoom_factor: f64,
    scroll_offset: i64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom_factor: DEFAULT_ZOOM,
            scroll_offset: 0,
        }
    }
}

impl ViewportState {
    /// Always within `[MIN_ZOOM, MAX_ZOOM]`.
    #[must_use]
    pub const fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    /// Horizontal scroll in pixels, never negative.
    #[must_use]
    pub const fn scroll_offset(&self) -> i64 {
        self.scroll_offset
    }
}

/// Control-surface operations, as messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportMsg {
    ZoomIn,
    ZoomOut,
    Reset,
    SetScroll(i64),
    SetResolution(Resolution),
}

/// A pane that renders against the shared viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    /// Date header (tick row and month row).
    Header,
    /// Body row for the item at this index.
    Row(usize),
}

/// Read-only view of the viewport bound to one pane.
#[derive(Debug, Clone, Copy)]
pub struct PaneView<'a> {
    pane: Pane,
    state: &'a ViewportState,
}

impl PaneView<'_> {
    #[must_use]
    pub const fn pane(&self) -> Pane {
        self.pane
    }

    #[must_use]
    pub const fn scroll_offset(&self) -> i64 {
        self.state.scroll_offset
    }

    #[must_use]
    pub const fn zoom_factor(&self) -> f64 {
        self.state.zoom_factor
    }
}

/// Single owner of [`ViewportState`] and of the active resolution.
#[derive(Debug, Clone, Default)]
pub struct ZoomScrollController {
    state: ViewportState,
    resolution: Resolution,
}

impl ZoomScrollController {
    /// Mount with zoom 1.0 and scroll 0.
    #[must_use]
    pub fn new(resolution: Resolution) -> Self {
        Self {
            state: ViewportState::default(),
            resolution,
        }
    }

    /// Consistent copy for one render pass.
    #[must_use]
    pub const fn snapshot(&self) -> ViewportState {
        self.state
    }

    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Pixel width of one tick under the current resolution and zoom.
    #[must_use]
    pub fn unit_width(&self) -> f64 {
        self.resolution.base_unit_width() * self.state.zoom_factor
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.state.zoom_factor * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.state.zoom_factor / ZOOM_STEP);
    }

    pub fn reset(&mut self) {
        self.state = ViewportState::default();
    }

    /// Move every pane to `offset`; negative offsets clamp to 0.
    pub fn set_scroll(&mut self, offset: i64) {
        self.state.scroll_offset = offset.max(0);
    }

    /// Switch resolution; zoom and scroll are left as they are.
    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
    }

    /// Apply one message. Returns `true` when anything changed.
    pub fn apply(&mut self, msg: ViewportMsg) -> bool {
        let before = (self.state, self.resolution);
        match msg {
            ViewportMsg::ZoomIn => self.zoom_in(),
            ViewportMsg::ZoomOut => self.zoom_out(),
            ViewportMsg::Reset => self.reset(),
            ViewportMsg::SetScroll(offset) => self.set_scroll(offset),
            ViewportMsg::SetResolution(resolution) => self.set_resolution(resolution),
        }
        before != (self.state, self.resolution)
    }

    /// Read-only view for a pane.
    #[must_use]
    pub const fn pane(&self, pane: Pane) -> PaneView<'_> {
        PaneView {
            pane,
            state: &self.state,
        }
    }

    /// Projection for `range` under the current state.
    #[must_use]
    pub fn projection(&self, range: DateRange) -> Projection {
        Projection::new(range.min, self.resolution, self.state)
    }

    fn set_zoom(&mut self, requested: f64) {
        let clamped = if requested.is_finite() {
            requested.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            DEFAULT_ZOOM
        };
        if (clamped - requested).abs() > f64::EPSILON {
            tracing::debug!(requested, clamped, "zoom request clamped");
        }
        self.state.zoom_factor = clamped;
    }
}
