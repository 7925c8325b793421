use crate::*;

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_i64(&mut self, start: i64, end_exclusive: i64) -> i64 {
        debug_assert!(start < end_exclusive);
        let span = (end_exclusive - start) as u64;
        start + (self.next_u64() % span) as i64
    }

    fn gen_unit_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn project(id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Project {
    Project::new(id, start, end)
}

#[test]
fn zoom_level_index_falls_back_to_day() {
    assert_eq!(ZoomLevel::from_index(0), ZoomLevel::Week);
    assert_eq!(ZoomLevel::from_index(2), ZoomLevel::Hour);
    assert_eq!(ZoomLevel::from_index(7), ZoomLevel::Day);
    assert_eq!(ZoomLevel::from_index(-1), ZoomLevel::Day);
    assert_eq!(ZoomLevel::Day.zoomed_in(), Some(ZoomLevel::Hour));
    assert_eq!(ZoomLevel::Hour.zoomed_in(), None);
    assert_eq!(ZoomLevel::Week.zoomed_out(), None);
}

#[test]
fn day_scroll_config_matches_container_math() {
    let config = GridGeometry::default().scroll_config(ZoomLevel::Day);
    assert_eq!(config.container_width, 182_500.0);
    assert_eq!(config.center, 91_250.0);
    assert_eq!(config.threshold_high, 146_000.0);
    assert_eq!(config.threshold_low, 36_500.0);
    assert_eq!(config.reposition_jump, 9_000.0);
    assert_eq!(config.date_shift, 180);
    assert_eq!(config.unit, TimeUnit::Days);
}

#[test]
fn week_and_hour_scroll_configs_use_their_units() {
    let geometry = GridGeometry::default();

    let week = geometry.scroll_config(ZoomLevel::Week);
    assert_eq!(week.container_width, 521.0 * 84.0);
    assert_eq!(week.date_shift, 25);
    assert_eq!(week.reposition_jump, 25.0 * 84.0);

    let hour = geometry.scroll_config(ZoomLevel::Hour);
    assert_eq!(hour.container_width, 87_600.0 * 50.0);
    assert_eq!(hour.date_shift, 180 * 24);
    assert_eq!(hour.unit, TimeUnit::Hours);
}

#[test]
fn threshold_ratio_is_clamped() {
    let config = GridGeometry::default()
        .with_reposition_threshold(0.2)
        .scroll_config(ZoomLevel::Day);
    assert_eq!(config.threshold_high, config.center);
    assert_eq!(config.threshold_low, config.center);
}

#[test]
fn safe_zone_and_clamp() {
    let config = GridGeometry::default().scroll_config(ZoomLevel::Day);
    assert!(config.is_in_safe_zone(36_500.0));
    assert!(config.is_in_safe_zone(146_000.0));
    assert!(!config.is_in_safe_zone(146_000.5));
    assert_eq!(config.clamp_scroll_left(-10.0, None), 0.0);
    assert_eq!(config.clamp_scroll_left(1e9, None), config.container_width);
    assert_eq!(config.clamp_scroll_left(5_000.0, Some(4_000.0)), 4_000.0);
}

#[test]
fn cols_rounds_up() {
    let geometry = GridGeometry::default();
    assert_eq!(geometry.cols(ZoomLevel::Day, 1000.0), 20);
    assert_eq!(geometry.cols(ZoomLevel::Day, 1001.0), 21);
    assert_eq!(geometry.cols(ZoomLevel::Day, 0.0), 0);
}

#[test]
fn center_date_and_scroll_position_are_inverse() {
    let geometry = GridGeometry::default();
    let mut rng = Lcg::new(0x5eed);
    for zoom in ZoomLevel::ALL {
        let config = geometry.scroll_config(zoom);
        for _ in 0..500 {
            let reference = shift_units(
                at(2024, 1, 1, 0),
                rng.gen_range_i64(-100_000, 100_000),
                TimeUnit::Hours,
            );
            let s = rng.gen_unit_f64() * config.container_width;
            let center = geometry.center_date_from_scroll(s, reference, zoom);
            let back = geometry.scroll_position_for_date(center, reference, zoom);
            assert!((back - s).abs() < 1e-3, "zoom={zoom:?} s={s} back={back}");
        }
    }
}

#[test]
fn visible_range_is_buffered_around_floored_center() {
    let geometry = GridGeometry::default();
    let reference = at(2024, 3, 10, 0);
    let center = geometry.scroll_config(ZoomLevel::Day).center;

    let range = geometry.visible_range(center, reference, ZoomLevel::Day, 1000.0);
    assert_eq!(range.start, at(2024, 2, 27, 0));
    assert_eq!(range.end, at(2024, 3, 22, 0));

    let range = geometry.visible_range(center + 75.0, reference, ZoomLevel::Day, 1000.0);
    assert_eq!(range.center(), at(2024, 3, 11, 0));

    assert_eq!(geometry.offset_units(center - 1.0, ZoomLevel::Day), -1);
}

#[test]
fn center_date_is_continuous() {
    let geometry = GridGeometry::default();
    let reference = at(2024, 3, 10, 0);
    let center = geometry.scroll_config(ZoomLevel::Day).center;
    let date = geometry.center_date_from_scroll(center + 25.0, reference, ZoomLevel::Day);
    assert_eq!(date, at(2024, 3, 10, 12));
}

#[test]
fn tile_x_snaps_to_unit_start() {
    let geometry = GridGeometry::default();
    let center_date = at(2024, 3, 10, 12);

    let x = geometry.tile_x(at(2024, 3, 12, 18), center_date, ZoomLevel::Day, 20);
    assert_eq!(x, 11.5 * 50.0);

    // 2024-01-10 is a Wednesday; week zoom snaps to Monday 2024-01-08.
    let offset =
        geometry.unit_offset_from_center(at(2024, 1, 10, 8), at(2024, 1, 8, 0), ZoomLevel::Week);
    assert_eq!(offset, 0.0);

    let x = geometry.tile_x(at(2024, 3, 10, 9), center_date, ZoomLevel::Hour, 20);
    assert_eq!(x, 7.0 * 50.0 + 25.0);
}

#[test]
fn data_loading_options_normalize_each_key() {
    assert_eq!(
        DataLoadingOptions::default().normalized(),
        DataLoadingConfig::default()
    );

    let config = DataLoadingOptions::default()
        .with_prefetch_days(0.5)
        .with_prefetch_trigger_days(-3.0)
        .with_prefetch_trigger_ratio(5.0)
        .with_max_cached_days(12.9)
        .normalized();
    assert_eq!(config.prefetch_days, 1);
    assert_eq!(config.prefetch_trigger_days, 0);
    assert_eq!(config.prefetch_trigger_ratio, 0.99);
    assert_eq!(config.max_cached_days, 12);

    let config = DataLoadingOptions::default()
        .with_prefetch_days(f64::NAN)
        .with_prefetch_trigger_ratio(f64::NAN)
        .with_max_cached_days(f64::INFINITY)
        .normalized();
    assert_eq!(config.prefetch_days, 30);
    assert_eq!(config.prefetch_trigger_ratio, 0.8);
    assert_eq!(config.max_cached_days, u32::MAX);

    let config = DataLoadingOptions::default()
        .with_prefetch_trigger_ratio(-1.0)
        .normalized();
    assert_eq!(config.prefetch_trigger_ratio, 0.01);
}

fn sample_rows() -> SchedulerData {
    SchedulerData::new(vec![
        Row::new("r1", "Alice").with_projects([
            project("p1", at(2024, 1, 1, 0), at(2024, 1, 5, 0)),
            project("p2", at(2024, 2, 1, 0), at(2024, 2, 3, 0)),
        ]),
        Row::new("r2", "Bob").with_projects([project("p3", at(2024, 3, 1, 0), at(2024, 3, 2, 0))]),
    ])
}

#[test]
fn merge_keeps_first_seen_order_and_incoming_wins() {
    let current = sample_rows();
    let incoming = SchedulerData::new(vec![
        Row::new("r3", "Carol")
            .with_projects([project("p5", at(2024, 4, 1, 0), at(2024, 4, 2, 0))]),
        Row::new("r1", "Alice (updated)").with_projects([
            project("p2", at(2024, 2, 10, 0), at(2024, 2, 12, 0)),
            project("p4", at(2024, 2, 20, 0), at(2024, 2, 21, 0)),
        ]),
    ]);

    let merged = merge_scheduler_data(&current, &incoming);
    let ids: Vec<&str> = merged.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, ["r1", "r2", "r3"]);

    let r1 = &merged[0];
    assert_eq!(r1.label.title, "Alice (updated)");
    let projects: Vec<&str> = r1.data.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(projects, ["p1", "p2", "p4"]);
    assert_eq!(r1.data[1].start_date, at(2024, 2, 10, 0));

    assert!(Arc::ptr_eq(&merged[1], &current[1]));
    assert!(Arc::ptr_eq(&merged[2], &incoming[0]));
    assert_eq!(merged.project_count(), 5);
}

#[test]
fn merge_applies_repeated_incoming_rows_in_order() {
    let current = sample_rows();
    let incoming = SchedulerData::new(vec![
        Row::new("r1", "Alice (first)")
            .with_projects([project("p1", at(2024, 1, 2, 0), at(2024, 1, 6, 0))]),
        Row::new("r4", "Dan").with_projects([project("d1", at(2024, 5, 1, 0), at(2024, 5, 2, 0))]),
        Row::new("r1", "Alice (second)").with_projects([
            project("p1", at(2024, 1, 3, 0), at(2024, 1, 7, 0)),
            project("p6", at(2024, 6, 1, 0), at(2024, 6, 2, 0)),
        ]),
        Row::new("r4", "Dan (again)")
            .with_projects([project("d2", at(2024, 5, 3, 0), at(2024, 5, 4, 0))]),
    ]);

    let merged = merge_scheduler_data(&current, &incoming);
    let ids: Vec<&str> = merged.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, ["r1", "r2", "r4"]);

    let r1 = &merged[0];
    assert_eq!(r1.label.title, "Alice (second)");
    let projects: Vec<&str> = r1.data.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(projects, ["p1", "p2", "p6"]);
    assert_eq!(r1.data[0].start_date, at(2024, 1, 3, 0));

    // A row new to `current` that arrives twice is copied before the second write.
    let r4 = &merged[2];
    assert_eq!(r4.label.title, "Dan (again)");
    let projects: Vec<&str> = r4.data.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(projects, ["d1", "d2"]);
    assert_eq!(incoming[1].data.len(), 1);
    assert!(Arc::ptr_eq(&merged[1], &current[1]));
}

#[test]
fn merge_with_empty_incoming_is_identity() {
    let current = sample_rows();
    let merged = merge_scheduler_data(&current, &SchedulerData::empty());
    assert!(merged.ptr_eq(&current));
}

#[test]
fn trim_is_idempotent_and_reference_stable() {
    let rows = sample_rows();
    let range = DateRange::new(at(2024, 1, 20, 0), at(2024, 2, 28, 0));

    let once = trim_data_to_range(&rows, &range);
    assert_eq!(once.len(), 2);
    assert_eq!(once[0].data.len(), 1);
    assert_eq!(once[0].data[0].id, "p2");
    assert!(once[1].data.is_empty());

    let twice = trim_data_to_range(&once, &range);
    assert_eq!(twice, once);
    assert!(twice.ptr_eq(&once));

    let everything = DateRange::new(at(2023, 1, 1, 0), at(2025, 1, 1, 0));
    let kept = trim_data_to_range(&rows, &everything);
    assert!(kept.ptr_eq(&rows));
}

#[test]
fn trim_keeps_untouched_rows_identical() {
    let rows = sample_rows();
    let range = DateRange::new(at(2024, 1, 20, 0), at(2024, 3, 1, 0));
    let trimmed = trim_data_to_range(&rows, &range);
    assert!(!trimmed.ptr_eq(&rows));
    assert!(!Arc::ptr_eq(&trimmed[0], &rows[0]));
    assert!(Arc::ptr_eq(&trimmed[1], &rows[1]));
}

#[test]
fn data_range_spans_every_project() {
    assert_eq!(data_range(&SchedulerData::empty()), None);
    assert_eq!(
        data_range(&sample_rows()),
        Some(DateRange::new(at(2024, 1, 1, 0), at(2024, 3, 2, 0)))
    );
}

#[test]
fn prefetch_flags_trigger_backward_when_visible_starts_before_data() {
    let data = DateRange::new(at(2024, 1, 1, 0), at(2024, 12, 31, 0));
    let visible = DateRange::new(at(2023, 12, 22, 0), at(2024, 1, 10, 0));
    let flags = prefetch_flags(&visible, &data, &DataLoadingConfig::default());
    assert!(flags.backward);
    assert!(!flags.forward);
}

#[test]
fn prefetch_flags_are_quiet_in_the_middle() {
    let data = DateRange::new(at(2024, 1, 1, 0), at(2024, 12, 31, 0));
    let visible = DateRange::new(at(2024, 6, 1, 0), at(2024, 6, 20, 0));
    let flags = prefetch_flags(&visible, &data, &DataLoadingConfig::default());
    assert_eq!(flags, PrefetchFlags::default());

    let near_end = DateRange::new(at(2024, 12, 1, 0), at(2024, 12, 15, 0));
    let flags = prefetch_flags(&near_end, &data, &DataLoadingConfig::default());
    assert!(flags.forward);
    assert!(!flags.backward);
}

#[test]
fn prefetch_requests_are_adjacent_to_the_data_range() {
    let data = DateRange::new(at(2024, 1, 1, 0), at(2024, 3, 1, 0));

    let backward = prefetch_request(Direction::Backward, &data, 30);
    assert_eq!(backward.range.start, at(2023, 12, 2, 0));
    assert_eq!(
        backward.range.end,
        NaiveDate::from_ymd_opt(2023, 12, 31)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap()
    );
    assert_eq!(backward.edge, timestamp_ms(data.start));

    let forward = prefetch_request(Direction::Forward, &data, 30);
    assert_eq!(forward.range.end, at(2024, 3, 31, 0));
    assert_eq!(timestamp_ms(forward.range.start), timestamp_ms(data.end) + 1);
    assert_eq!(forward.edge, timestamp_ms(data.end));
}

#[test]
fn retention_range_is_centered_on_the_visible_range() {
    let visible = DateRange::new(at(2024, 6, 1, 0), at(2024, 6, 21, 0));
    let retained = retention_range(&visible, 60);
    assert_eq!(retained.start, at(2024, 4, 12, 0));
    assert_eq!(retained.end, at(2024, 8, 10, 0));
}

#[test]
fn packing_stacks_overlapping_projects() {
    let row = Row::new("r", "R").with_projects([
        project("p1", at(2024, 1, 1, 0), at(2024, 1, 3, 0)),
        project("p2", at(2024, 1, 4, 0), at(2024, 1, 5, 0)),
        project("p3", at(2024, 1, 3, 0), at(2024, 1, 4, 0)),
    ]);
    let packed = pack_resource(&row);
    let ids: Vec<Vec<&str>> = packed
        .sub_rows
        .iter()
        .map(|sub| sub.iter().map(|p| p.id.as_str()).collect())
        .collect();
    assert_eq!(ids, vec![vec!["p1", "p2"], vec!["p3"]]);
    assert_eq!(packed.row_count(), 2);
}

#[test]
fn row_offsets_reserve_a_row_for_empty_resources() {
    let rows = SchedulerData::new(vec![
        Row::new("a", "A").with_projects([
            project("p1", at(2024, 1, 1, 0), at(2024, 1, 3, 0)),
            project("p2", at(2024, 1, 2, 0), at(2024, 1, 4, 0)),
        ]),
        Row::new("b", "B"),
        Row::new("c", "C").with_projects([project("p3", at(2024, 1, 1, 0), at(2024, 1, 4, 0))]),
    ]);
    let packed = pack_resources(&rows);
    assert_eq!(rows_per_resource(&packed), [2, 1, 1]);
    assert_eq!(row_offsets(&packed), [0, 2, 3]);

    let ctx = PlacementContext {
        zoom: ZoomLevel::Day,
        visible_range: DateRange::new(at(2023, 12, 20, 0), at(2024, 1, 20, 0)),
        center_date: at(2024, 1, 1, 0),
        cols: 20,
    };
    let tiles = place_tiles(&rows, &GridGeometry::default(), &TileOptions::default(), &ctx);
    assert_eq!(tiles.len(), 3);
    let p3 = tiles.iter().find(|t| t.project_id == "p3").unwrap();
    assert_eq!(p3.row, 3);
    assert_eq!(p3.resource_index, 2);
    assert_eq!(p3.y, 3.0 * 56.0 + 4.0);
    assert_eq!(p3.x, 10.0 * 50.0);
    assert_eq!(p3.width, 150.0);
    assert_eq!(p3.key, "p3");
}

#[test]
fn regular_placement_skips_invisible_projects() {
    let rows = SchedulerData::new(vec![Row::new("a", "A").with_projects([
        project("in", at(2024, 1, 5, 0), at(2024, 1, 6, 0)),
        project("out", at(2024, 5, 1, 0), at(2024, 5, 2, 0)),
    ])]);
    let ctx = PlacementContext {
        zoom: ZoomLevel::Week,
        visible_range: DateRange::new(at(2024, 1, 1, 0), at(2024, 2, 1, 0)),
        center_date: at(2024, 1, 15, 0),
        cols: 12,
    };
    let tiles = place_tiles(&rows, &GridGeometry::default(), &TileOptions::default(), &ctx);
    let ids: Vec<&str> = tiles.iter().map(|t| t.project_id.as_str()).collect();
    assert_eq!(ids, ["in"]);
}

#[test]
fn hourly_projects_split_into_day_tiles() {
    let rows = SchedulerData::new(vec![Row::new("a", "A").with_projects([project(
        "p",
        at(2024, 3, 4, 0),
        at(2024, 3, 5, 23),
    )
    .with_occupancy(7200)])]);
    let ctx = PlacementContext {
        zoom: ZoomLevel::Hour,
        visible_range: DateRange::new(at(2024, 3, 3, 0), at(2024, 3, 7, 0)),
        center_date: at(2024, 3, 4, 12),
        cols: 20,
    };
    let tiles = place_tiles(&rows, &GridGeometry::default(), &TileOptions::default(), &ctx);

    assert_eq!(tiles.len(), 2);
    assert_eq!(tiles[0].key, "p-2024-03-04");
    assert_eq!(tiles[1].key, "p-2024-03-05");
    assert_eq!(tiles[0].start, at(2024, 3, 4, 9));
    assert_eq!(tiles[1].start, at(2024, 3, 5, 9));
    assert_eq!(tiles[1].end, at(2024, 3, 5, 11));
    for tile in &tiles {
        assert_eq!(tile.width, 100.0);
    }
    assert_eq!(tiles[0].x, 7.0 * 50.0 + 25.0);
}

#[test]
fn hourly_same_day_projects_are_packed_sequentially() {
    let rows = SchedulerData::new(vec![Row::new("a", "A").with_projects([
        project("p1", at(2024, 3, 4, 0), at(2024, 3, 4, 20)).with_occupancy(3600),
        project("p2", at(2024, 3, 4, 0), at(2024, 3, 4, 23)).with_occupancy(7200),
    ])]);
    let ctx = PlacementContext {
        zoom: ZoomLevel::Hour,
        visible_range: DateRange::new(at(2024, 3, 4, 0), at(2024, 3, 5, 0)),
        center_date: at(2024, 3, 4, 12),
        cols: 20,
    };
    let tiles = place_tiles(
        &rows,
        &GridGeometry::default(),
        &TileOptions::default().with_day_start_hour(8),
        &ctx,
    );
    assert_eq!(tiles.len(), 2);
    assert_eq!((tiles[0].start, tiles[0].end), (at(2024, 3, 4, 8), at(2024, 3, 4, 9)));
    assert_eq!((tiles[1].start, tiles[1].end), (at(2024, 3, 4, 9), at(2024, 3, 4, 11)));
    assert_eq!(tiles[1].row, 1);
}

#[test]
fn hourly_tiles_are_clamped_to_the_visible_end() {
    let rows = SchedulerData::new(vec![Row::new("a", "A").with_projects([project(
        "p",
        at(2024, 3, 4, 0),
        at(2024, 3, 4, 23),
    )
    .with_occupancy(4 * 3600)])]);
    let ctx = PlacementContext {
        zoom: ZoomLevel::Hour,
        visible_range: DateRange::new(at(2024, 3, 4, 0), at(2024, 3, 4, 10)),
        center_date: at(2024, 3, 4, 5),
        cols: 20,
    };
    let tiles = place_tiles(&rows, &GridGeometry::default(), &TileOptions::default(), &ctx);
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].end, at(2024, 3, 4, 10));
    assert_eq!(tiles[0].width, 50.0);
}

fn hit_rows() -> SchedulerData {
    SchedulerData::new(vec![
        Row::new("a", "A").with_projects([
            project("a1", at(2024, 3, 1, 0), at(2024, 3, 5, 0)),
            project("a2", at(2024, 3, 2, 0), at(2024, 3, 6, 0)),
        ]),
        Row::new("b", "B").with_projects([
            project("b1", at(2024, 3, 4, 0), at(2024, 3, 4, 0)).with_occupancy(5 * 3600),
        ]),
        Row::new("c", "C").with_projects([
            project("c1", at(2024, 3, 1, 0), at(2024, 3, 9, 0)),
            project("c2", at(2024, 3, 2, 0), at(2024, 3, 9, 0)),
            project("c3", at(2024, 3, 3, 0), at(2024, 3, 9, 0)),
        ]),
    ])
}

fn hit_context<'a>(zoom: ZoomLevel, resources: &'a [PackedResource<'a>]) -> HitContext<'a> {
    HitContext {
        zoom,
        center_date: at(2024, 3, 4, 15),
        cols: 20,
        tiles: TileOptions::default(),
        occupancy: OccupancyOptions::default(),
        resources,
    }
}

#[test]
fn hit_test_resolves_cell_date_and_resource() {
    let geometry = GridGeometry::default();
    let rows = hit_rows();
    let packed = pack_resources(&rows);
    assert_eq!(rows_per_resource(&packed), [2, 1, 3]);

    let hit = hit_test(
        &geometry,
        &hit_context(ZoomLevel::Day, &packed),
        Point::new(525.0, 130.0),
    );
    assert_eq!(hit.column, 10);
    assert_eq!(hit.focused_date, at(2024, 3, 4, 0));
    assert_eq!(hit.row, 2);
    assert_eq!(hit.resource_index, Some(1));
    assert_eq!(hit.cell, Point::new(500.0, 112.0));
    assert_eq!(hit.occupancy.taken, HoursMinutes { hours: 5, minutes: 0 });
    assert_eq!(hit.occupancy.free, HoursMinutes { hours: 3, minutes: 0 });

    let hit = hit_test(
        &geometry,
        &hit_context(ZoomLevel::Hour, &packed),
        Point::new(25.0, 1000.0),
    );
    assert_eq!(hit.column, 0);
    assert_eq!(hit.focused_date, at(2024, 3, 4, 5));
    assert_eq!(hit.resource_index, None);
    assert_eq!(hit.occupancy, OccupancyData::EMPTY);

    let hit = hit_test(
        &geometry,
        &hit_context(ZoomLevel::Week, &packed[..1]),
        Point::new(10.0 * 84.0, -3.0),
    );
    assert_eq!(hit.focused_date, at(2024, 3, 4, 0));
    assert_eq!(hit.resource_index, None);
    assert_eq!(hit.occupancy, OccupancyData::EMPTY);
}

#[test]
fn day_occupancy_sums_projects_and_reports_overtime() {
    // 2024-03-04 is a Monday.
    let row = Row::new("r", "R").with_projects([
        project("p1", at(2024, 3, 1, 0), at(2024, 3, 4, 0)).with_occupancy(6 * 3600),
        project("p2", at(2024, 3, 4, 12), at(2024, 3, 8, 0)).with_occupancy(3 * 3600 + 1800),
        project("p3", at(2024, 3, 5, 0), at(2024, 3, 8, 0)).with_occupancy(8 * 3600),
    ]);
    let packed = pack_resource(&row);
    let options = OccupancyOptions::default();

    let monday = day_occupancy(&packed, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), &options);
    assert_eq!(monday.taken, HoursMinutes { hours: 9, minutes: 30 });
    assert_eq!(monday.free, HoursMinutes::ZERO);
    assert_eq!(monday.overtime, HoursMinutes { hours: 1, minutes: 30 });

    let tuesday = day_occupancy(&packed, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), &options);
    assert_eq!(tuesday.taken, HoursMinutes { hours: 11, minutes: 30 });

    let quiet = day_occupancy(&packed, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), &options);
    assert_eq!(quiet.taken, HoursMinutes::ZERO);
    assert_eq!(quiet.free, HoursMinutes { hours: 8, minutes: 0 });
}

#[test]
fn weekends_book_nothing_unless_included() {
    let row = Row::new("r", "R").with_projects([
        project("p", at(2024, 3, 1, 0), at(2024, 3, 12, 0)).with_occupancy(4 * 3600),
    ]);
    let packed = pack_resource(&row);
    let saturday = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

    let off = day_occupancy(&packed, saturday, &OccupancyOptions::default());
    assert_eq!(off.taken, HoursMinutes::ZERO);
    assert_eq!(off.free, HoursMinutes { hours: 8, minutes: 0 });

    let included = OccupancyOptions::default().with_include_weekends(true);
    let on = day_occupancy(&packed, saturday, &included);
    assert_eq!(on.taken, HoursMinutes { hours: 4, minutes: 0 });
    assert_eq!(on.free, HoursMinutes { hours: 4, minutes: 0 });
}

#[test]
fn fractional_capacity_keeps_minutes() {
    let options = OccupancyOptions::default().with_max_hours_per_day(7.5);
    assert_eq!(options.capacity_minutes(), 450);
    assert_eq!(
        OccupancyOptions::default()
            .with_max_hours_per_day(f64::NAN)
            .capacity_minutes(),
        480
    );
    assert_eq!(
        OccupancyOptions::default()
            .with_max_hours_per_day(0.0)
            .capacity_minutes(),
        480
    );

    let row = Row::new("r", "R").with_projects([
        project("p", at(2024, 3, 4, 0), at(2024, 3, 4, 0)).with_occupancy(7 * 3600 + 45 * 60),
    ]);
    let packed = pack_resource(&row);
    let day = day_occupancy(&packed, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), &options);
    assert_eq!(day.free, HoursMinutes::ZERO);
    assert_eq!(day.overtime, HoursMinutes { hours: 0, minutes: 15 });
}

#[test]
fn week_occupancy_counts_working_days() {
    // Monday 2024-03-04 through Wednesday, 2h a day; the weekend project only counts when
    // weekends are included.
    let row = Row::new("r", "R").with_projects([
        project("mid", at(2024, 3, 4, 0), at(2024, 3, 6, 0)).with_occupancy(2 * 3600),
        project("sat", at(2024, 3, 9, 0), at(2024, 3, 9, 0)).with_occupancy(3 * 3600),
    ]);
    let packed = pack_resource(&row);
    let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();

    let week = week_occupancy(&packed, monday, &OccupancyOptions::default());
    assert_eq!(week.taken, HoursMinutes { hours: 6, minutes: 0 });
    assert_eq!(week.free, HoursMinutes { hours: 34, minutes: 0 });
    assert_eq!(week.overtime, HoursMinutes::ZERO);

    let all_days = OccupancyOptions::default().with_include_weekends(true);
    let week = week_occupancy(&packed, monday, &all_days);
    assert_eq!(week.taken, HoursMinutes { hours: 9, minutes: 0 });
    assert_eq!(week.free, HoursMinutes { hours: 47, minutes: 0 });
}

#[test]
fn hour_occupancy_packs_sub_rows_from_the_day_start() {
    // Two overlapping projects land in separate sub-rows: 9:00-10:30 and 10:30-11:30.
    let row = Row::new("r", "R").with_projects([
        project("p1", at(2024, 3, 4, 0), at(2024, 3, 5, 0)).with_occupancy(5400),
        project("p2", at(2024, 3, 4, 0), at(2024, 3, 6, 0)).with_occupancy(3600),
    ]);
    let packed = pack_resource(&row);
    assert_eq!(packed.row_count(), 2);

    let nine = hour_occupancy(&packed, at(2024, 3, 4, 9), 9);
    assert_eq!(nine.taken, HoursMinutes { hours: 1, minutes: 0 });
    assert_eq!(nine.free, HoursMinutes::ZERO);

    let ten = hour_occupancy(&packed, at(2024, 3, 4, 10), 9);
    assert_eq!(ten.taken, HoursMinutes { hours: 1, minutes: 0 });

    let eleven = hour_occupancy(&packed, at(2024, 3, 4, 11), 9);
    assert_eq!(eleven.taken, HoursMinutes { hours: 0, minutes: 30 });
    assert_eq!(eleven.free, HoursMinutes { hours: 0, minutes: 30 });
    assert_eq!(eleven.overtime, HoursMinutes::ZERO);

    let early = hour_occupancy(&packed, at(2024, 3, 4, 8), 9);
    assert_eq!(early.taken, HoursMinutes::ZERO);
    assert_eq!(early.free, HoursMinutes { hours: 1, minutes: 0 });

    let shifted = hour_occupancy(&packed, at(2024, 3, 4, 8), 8);
    assert_eq!(shifted.taken, HoursMinutes { hours: 1, minutes: 0 });
}

#[test]
fn hour_occupancy_caps_at_one_hour() {
    let row = Row::new("r", "R").with_projects([
        project("p1", at(2024, 3, 4, 0), at(2024, 3, 4, 0)).with_occupancy(1800),
        project("p2", at(2024, 3, 4, 0), at(2024, 3, 4, 0)).with_occupancy(1800),
        project("p3", at(2024, 3, 4, 0), at(2024, 3, 4, 0)).with_occupancy(1800),
    ]);
    let packed = pack_resource(&row);
    let hit = occupancy(
        &packed,
        at(2024, 3, 4, 9),
        ZoomLevel::Hour,
        9,
        &OccupancyOptions::default(),
    );
    assert_eq!(hit.taken, HoursMinutes { hours: 1, minutes: 0 });
    assert_eq!(hit.free, HoursMinutes::ZERO);
    assert_eq!(hit.overtime, HoursMinutes::ZERO);
}

#[test]
fn project_visibility_is_inclusive() {
    let range = DateRange::new(at(2024, 1, 1, 0), at(2024, 1, 31, 0));
    assert!(is_project_visible(at(2023, 12, 1, 0), at(2024, 1, 1, 0), &range));
    assert!(is_project_visible(at(2024, 1, 31, 0), at(2024, 2, 5, 0), &range));
    assert!(!is_project_visible(at(2024, 2, 1, 0), at(2024, 2, 5, 0), &range));
}
