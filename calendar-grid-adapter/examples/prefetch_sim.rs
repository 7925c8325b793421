use std::convert::Infallible;

use calendar_grid::chrono::{NaiveDate, TimeDelta};
use calendar_grid::{DataLoadingOptions, DateRange, Direction, Project, Row, SchedulerData};
use calendar_grid_adapter::{HeadlessSurface, Scheduler, SchedulerOptions, ScrollBehavior};

// A fake backend: one two-day booking at the start of every requested page.
async fn fetch_page(direction: Direction, range: DateRange) -> Result<SchedulerData, Infallible> {
    let id = format!("{direction:?}-{}", range.start.date());
    Ok(SchedulerData::new(vec![Row::new("crew", "Crew").with_projects([
        Project::new(id, range.start, range.start + TimeDelta::days(2)),
    ])]))
}

fn main() {
    // Example: a scheduler paging data in as the user navigates.
    //
    // Fetch tickets are drained after each navigation and resolved in place here; a real
    // adapter would spawn them on its runtime and call `complete_fetch` when they finish.
    let Some(start) = NaiveDate::from_ymd_opt(2024, 3, 10).and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return;
    };
    let options = SchedulerOptions::default()
        .with_prefetch(true)
        .with_data_loading(
            DataLoadingOptions::default()
                .with_prefetch_days(14.0)
                .with_max_cached_days(45.0),
        )
        .with_on_visible_range_change(|range| {
            println!("visible {} .. {}", range.start.date(), range.end.date());
        });
    let seed = SchedulerData::new(vec![Row::new("crew", "Crew").with_projects([Project::new(
        "kickoff",
        start,
        start + TimeDelta::days(3),
    )])]);
    let mut scheduler = Scheduler::new(options, seed, start, 1200.0);
    let mut surface = HeadlessSurface::new(0.0);

    for _ in 0..6 {
        let outcomes = futures::executor::block_on(scheduler.fetch_pending(&fetch_page));
        println!(
            "fetched {outcomes:?}, cached projects={} range={:?}",
            scheduler.data().project_count(),
            scheduler.window().data_range()
        );
        for _ in 0..7 {
            scheduler.go_next(ScrollBehavior::Instant, &mut surface);
        }
    }

    for tile in scheduler.tiles() {
        println!("{} x={} y={} w={}", tile.key, tile.x, tile.y, tile.width);
    }
}
