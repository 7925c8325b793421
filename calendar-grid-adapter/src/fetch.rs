use std::fmt::Debug;
use std::future::Future;

use calendar_grid::{DateRange, Direction, SchedulerData};

use crate::FetchRequest;

/// The external data source pages are requested from.
///
/// Implemented for any `Fn(Direction, DateRange)` returning a future of
/// `Result<SchedulerData, E>`.
pub trait RangeFetcher {
    type Error: Debug;

    fn fetch_range(
        &self,
        direction: Direction,
        range: DateRange,
    ) -> impl Future<Output = Result<SchedulerData, Self::Error>>;
}

impl<F, Fut, E> RangeFetcher for F
where
    F: Fn(Direction, DateRange) -> Fut,
    Fut: Future<Output = Result<SchedulerData, E>>,
    E: Debug,
{
    type Error = E;

    fn fetch_range(
        &self,
        direction: Direction,
        range: DateRange,
    ) -> impl Future<Output = Result<SchedulerData, E>> {
        self(direction, range)
    }
}

/// Resolves a fetch ticket against `fetcher`.
///
/// The result is meant to be handed back to [`crate::PrefetchWindow::complete`] (or
/// [`crate::Scheduler::complete_fetch`]), which decides whether it is still relevant.
pub async fn run_fetch<F: RangeFetcher + ?Sized>(
    fetcher: &F,
    request: &FetchRequest,
) -> Result<SchedulerData, F::Error> {
    vtrace!(direction = ?request.direction, session = request.session, "fetch start");
    fetcher.fetch_range(request.direction, request.range).await
}
