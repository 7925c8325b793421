// Example: map a scroll offset to dates and lay out tiles.
use calendar_grid::chrono::{NaiveDate, TimeDelta};
use calendar_grid::{
    GridGeometry, PlacementContext, Project, Row, SchedulerData, TileOptions, ZoomLevel,
    place_tiles,
};

fn main() {
    let Some(reference) = NaiveDate::from_ymd_opt(2024, 3, 4).and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return;
    };
    let geometry = GridGeometry::default();
    let zoom = ZoomLevel::Day;
    let viewport_width = 1200.0;
    let scroll_left = geometry.scroll_config(zoom).center + 320.0;

    let visible = geometry.visible_range(scroll_left, reference, zoom, viewport_width);
    let center = geometry.center_date_from_scroll(scroll_left, reference, zoom);
    println!("visible={} .. {}", visible.start, visible.end);
    println!("center={center}");

    let data = SchedulerData::new(vec![
        Row::new("alice", "Alice").with_projects([
            Project::new("launch", reference, reference + TimeDelta::days(5)).with_title("Launch"),
            Project::new("review", reference + TimeDelta::days(2), reference + TimeDelta::days(3))
                .with_title("Review"),
        ]),
        Row::new("bob", "Bob"),
    ]);

    let ctx = PlacementContext {
        zoom,
        visible_range: visible,
        center_date: center,
        cols: geometry.cols(zoom, viewport_width),
    };
    for tile in place_tiles(&data, &geometry, &TileOptions::default(), &ctx) {
        println!(
            "{:>8} row={} x={:.1} y={:.1} w={:.1}",
            tile.key, tile.row, tile.x, tile.y, tile.width
        );
    }
}
