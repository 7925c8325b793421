/// How a corrective or navigational scroll should be applied by the UI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollBehavior {
    #[default]
    Instant,
    Smooth,
}

/// The horizontally scrollable container the grid lives in (e.g. a DOM element).
pub trait ScrollSurface {
    fn scroll_left(&self) -> f64;

    /// Largest reachable `scroll_left`, when the surface knows it.
    fn max_scroll_left(&self) -> Option<f64> {
        None
    }

    fn scroll_to(&mut self, left: f64, behavior: ScrollBehavior);
}

impl<S: ScrollSurface + ?Sized> ScrollSurface for &mut S {
    fn scroll_left(&self) -> f64 {
        (**self).scroll_left()
    }

    fn max_scroll_left(&self) -> Option<f64> {
        (**self).max_scroll_left()
    }

    fn scroll_to(&mut self, left: f64, behavior: ScrollBehavior) {
        (**self).scroll_to(left, behavior);
    }
}

/// An in-memory surface that applies every request immediately and records it.
///
/// Useful for tests and for driving the controllers without a UI.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeadlessSurface {
    pub scroll_left: f64,
    pub max_scroll_left: Option<f64>,
    pub requests: Vec<(f64, ScrollBehavior)>,
}

impl HeadlessSurface {
    pub fn new(scroll_left: f64) -> Self {
        Self {
            scroll_left,
            ..Self::default()
        }
    }

    pub fn with_max_scroll_left(mut self, max: f64) -> Self {
        self.max_scroll_left = Some(max);
        self
    }

    /// Drains the recorded scroll requests.
    pub fn take_requests(&mut self) -> Vec<(f64, ScrollBehavior)> {
        std::mem::take(&mut self.requests)
    }
}

impl ScrollSurface for HeadlessSurface {
    fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    fn max_scroll_left(&self) -> Option<f64> {
        self.max_scroll_left
    }

    fn scroll_to(&mut self, left: f64, behavior: ScrollBehavior) {
        self.scroll_left = left;
        self.requests.push((left, behavior));
    }
}
