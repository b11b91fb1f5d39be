//! Planning timeline engine: resolution policy, range, grid, viewport,
//! projection, bars and the today marker.
//!
//! Everything here is pure and synchronous. The only mutable state is the
//! [`viewport::ViewportState`] owned by [`viewport::ZoomScrollController`].

pub mod bars;
pub mod clock;
pub mod grid;
pub mod months;
pub mod projection;
pub mod range;
pub mod resolution;
pub mod today;
pub mod view;
pub mod viewport;

#[cfg(test)]
mod test_properties;

pub use view::{TimelineFrame, TimelineView};
