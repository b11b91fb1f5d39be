//! Property-based tests for timeline invariants.
//!
//! Uses `proptest` to verify that grids stay strictly increasing, projection
//! stays monotonic, month spans partition the ticks, and arbitrary control
//! message sequences keep the viewport inside its bounds.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use super::grid::generate_grid;
use super::months::aggregate_months;
use super::projection::Projection;
use super::range::{DateRange, RangePolicy, resolve_range};
use super::resolution::Resolution;
use super::viewport::{MAX_ZOOM, MIN_ZOOM, Pane, ViewportMsg, ZoomScrollController};
use crate::schedule::item::ScheduleItem;

// ──────────────────── strategies ────────────────────

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..1_500).prop_map(|offset| base_date() + Duration::days(offset))
}

fn arb_resolution() -> impl Strategy<Value = Resolution> {
    prop_oneof![
        Just(Resolution::Day),
        Just(Resolution::Week),
        Just(Resolution::Month),
    ]
}

fn arb_range() -> impl Strategy<Value = DateRange> {
    (arb_date(), 1i64..800).prop_map(|(min, span)| DateRange::new(min, min + Duration::days(span)))
}

fn arb_msg() -> impl Strategy<Value = ViewportMsg> {
    prop_oneof![
        Just(ViewportMsg::ZoomIn),
        Just(ViewportMsg::ZoomOut),
        Just(ViewportMsg::Reset),
        (-5_000i64..50_000).prop_map(ViewportMsg::SetScroll),
        arb_resolution().prop_map(ViewportMsg::SetResolution),
    ]
}

fn arb_item() -> impl Strategy<Value = ScheduleItem> {
    (arb_date(), 0i64..120, proptest::option::of(0i64..200)).prop_map(|(start, len, delivery)| {
        let mut item = ScheduleItem::new("p", "prop", start, start + Duration::days(len));
        if let Some(offset) = delivery {
            item = item.with_delivery(start + Duration::days(offset));
        }
        item
    })
}

/// Controller after an arbitrary message history.
fn driven_controller(msgs: &[ViewportMsg]) -> ZoomScrollController {
    let mut controller = ZoomScrollController::default();
    for msg in msgs {
        controller.apply(*msg);
    }
    controller
}

// ──────────────────── property tests ────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Zoom stays in bounds and scroll stays non-negative after any history.
    #[test]
    fn controller_preserves_bounds(msgs in prop::collection::vec(arb_msg(), 1..60)) {
        let mut controller = ZoomScrollController::default();
        for msg in msgs {
            controller.apply(msg);
            let state = controller.snapshot();
            prop_assert!((MIN_ZOOM..=MAX_ZOOM).contains(&state.zoom_factor()));
            prop_assert!(state.scroll_offset() >= 0);
        }
    }

    /// Header and every row pane read the same scroll at all times.
    #[test]
    fn panes_never_desynchronize(
        msgs in prop::collection::vec(arb_msg(), 1..40),
        rows in 1usize..30
    ) {
        let mut controller = ZoomScrollController::default();
        for msg in msgs {
            controller.apply(msg);
            let header = controller.pane(Pane::Header).scroll_offset();
            for row in 0..rows {
                prop_assert_eq!(controller.pane(Pane::Row(row)).scroll_offset(), header);
            }
        }
    }

    /// Resolution changes never touch zoom or scroll.
    #[test]
    fn resolution_switch_keeps_viewport(
        msgs in prop::collection::vec(arb_msg(), 0..20),
        target in arb_resolution()
    ) {
        let mut controller = driven_controller(&msgs);
        let before = controller.snapshot();
        controller.apply(ViewportMsg::SetResolution(target));
        prop_assert_eq!(controller.snapshot(), before);
    }

    /// Grids are strictly increasing in date and pixel offset, one increment apart.
    #[test]
    fn grid_strictly_increasing(
        range in arb_range(),
        resolution in arb_resolution(),
        msgs in prop::collection::vec(arb_msg(), 0..20)
    ) {
        let controller = driven_controller(&msgs);
        let unit = resolution.base_unit_width() * controller.snapshot().zoom_factor();
        let ticks = generate_grid(range, resolution, unit);
        prop_assert!(!ticks.is_empty());
        prop_assert_eq!(ticks[0].date, range.min);
        prop_assert!(ticks.last().is_some_and(|t| t.date <= range.max));
        for pair in ticks.windows(2) {
            prop_assert!(pair[0].date < pair[1].date);
            prop_assert!(pair[0].pixel_offset < pair[1].pixel_offset);
            prop_assert_eq!((pair[1].date - pair[0].date).num_days(), resolution.increment_days());
        }
    }

    /// Month spans partition the tick sequence exactly.
    #[test]
    fn month_spans_partition_ticks(range in arb_range(), resolution in arb_resolution()) {
        let ticks = generate_grid(range, resolution, resolution.base_unit_width());
        let spans = aggregate_months(&ticks);
        let total: usize = spans.iter().map(|s| s.tick_count).sum();
        prop_assert_eq!(total, ticks.len());
        let mut expected_start = 0;
        for span in &spans {
            prop_assert_eq!(span.start_tick_index, expected_start);
            prop_assert!(span.tick_count >= 1);
            expected_start += span.tick_count;
        }
    }

    /// `date_to_x` is monotonic non-decreasing for fixed resolution and zoom.
    #[test]
    fn projection_is_monotonic(
        a in arb_date(),
        b in arb_date(),
        resolution in arb_resolution(),
        msgs in prop::collection::vec(arb_msg(), 0..20)
    ) {
        let controller = driven_controller(&msgs);
        let p = Projection::new(base_date(), resolution, controller.snapshot());
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(p.date_to_x(lo) <= p.date_to_x(hi));
    }

    /// Zero-length intervals render exactly one unit wide; longer ones at least that.
    #[test]
    fn minimum_bar_width(
        d in arb_date(),
        len in 0i64..400,
        resolution in arb_resolution(),
        msgs in prop::collection::vec(arb_msg(), 0..20)
    ) {
        let controller = driven_controller(&msgs);
        let p = Projection::new(base_date(), resolution, controller.snapshot());
        let unit = resolution.base_unit_width() * controller.snapshot().zoom_factor();
        prop_assert!((p.interval_to_width(d, d) - unit).abs() < 1e-9);
        prop_assert!(p.interval_to_width(d, d + Duration::days(len)) >= unit - 1e-9);
    }

    /// Tick edges survive a round trip through `x_to_date`.
    #[test]
    fn tick_edges_invert(range in arb_range(), resolution in arb_resolution()) {
        let p = Projection::new(range.min, resolution, ZoomScrollController::default().snapshot());
        for tick in generate_grid(range, resolution, p.unit_width()) {
            prop_assert_eq!(p.x_to_date(tick.pixel_offset), tick.date);
        }
    }

    /// Every relevant item date lies inside the resolved range.
    #[test]
    fn resolved_range_covers_items(
        items in prop::collection::vec(arb_item(), 0..25),
        today in arb_date()
    ) {
        let range = resolve_range(&items, today, RangePolicy::default());
        prop_assert!(range.min <= range.max);
        if items.is_empty() {
            prop_assert!(range.contains(today));
        }
        for item in &items {
            for date in item.relevant_dates() {
                prop_assert!(range.contains(date));
            }
        }
    }
}
