//! Adapter utilities for the `calendar-grid` crate.
//!
//! The `calendar-grid` crate is UI-agnostic and holds the pure geometry and data transforms. This
//! crate provides the small, framework-neutral state machines an adapter needs on top:
//!
//! - Scroll rebasing with directional locks (infinite horizontal scrolling without drag loops)
//! - A prefetch/cache window over scheduler rows, with ticket-based async fetching
//! - A `Calendar` state owner and a `Scheduler` that wires everything together
//! - `now_ms`-driven single-slot timers and tween-based smooth scrolling helpers
//!
//! This crate is intentionally framework-agnostic (no DOM/egui bindings). The scroll container is
//! abstracted as a [`ScrollSurface`].
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod calendar;
mod debounce;
mod fetch;
mod rebase;
mod scheduler;
mod surface;
mod tween;
mod window;


pub use calendar::{Calendar, CalendarOptions};
pub use debounce::Debounce;
pub use fetch::{RangeFetcher, run_fetch};
pub use rebase::{RebaseController, RebaseLock, RebaseOptions, ScrollOutcome};
pub use scheduler::{Scheduler, SchedulerOptions};
pub use surface::{HeadlessSurface, ScrollBehavior, ScrollSurface};
pub use tween::{Easing, Tween};
pub use window::{FetchOutcome, FetchRequest, PrefetchWindow, RangeChangeCallback};
