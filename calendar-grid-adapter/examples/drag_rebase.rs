use calendar_grid::ZoomLevel;
use calendar_grid::chrono::NaiveDate;
use calendar_grid_adapter::{Calendar, CalendarOptions, HeadlessSurface, ScrollOutcome};

fn main() {
    // Example: a scrollbar thumb dragged back and forth across the forward threshold.
    //
    // The first crossing rebases (the reference date jumps and the surface is moved back); the
    // following events are pinned until the drag travels past the re-arm distance. A quiet period
    // then drops the lock.
    let Some(start) = NaiveDate::from_ymd_opt(2024, 3, 10).and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return;
    };
    let options = CalendarOptions::default().with_zoom(ZoomLevel::Day);
    let mut calendar = Calendar::new(options, start, 1000.0);
    let mut surface = HeadlessSurface::new(calendar.scroll_position());
    let high = calendar.scroll_config().threshold_high;

    let mut now_ms = 0u64;
    for step in 0..24u32 {
        now_ms += 16;
        // Wiggle around the threshold, drifting forward a little each frame.
        let wiggle = if step % 2 == 0 { 1.0 } else { 180.0 };
        let drag = high + wiggle + f64::from(step) * 40.0;
        surface.scroll_left = drag;
        let outcome = calendar.handle_scroll_change(drag, now_ms, &mut surface);
        match outcome {
            ScrollOutcome::Rebased {
                scroll_left,
                shift_units,
                ..
            } => println!(
                "t={now_ms} drag={drag} rebased to {scroll_left} ({shift_units:+} days), ref={}",
                calendar.reference_date()
            ),
            ScrollOutcome::Pinned { scroll_left } => {
                println!("t={now_ms} drag={drag} pinned at {scroll_left}")
            }
            ScrollOutcome::Accepted { scroll_left } => {
                println!("t={now_ms} accepted {scroll_left}")
            }
        }
    }

    now_ms += 250;
    calendar.tick(now_ms, &mut surface);
    println!(
        "after idle: lock={:?} center={}",
        calendar
            .rebase_controller()
            .lock(calendar_grid::Direction::Forward),
        calendar.current_center_date()
    );
}
