pub const DEFAULT_TRIGGER_FRACTION: f64 = 0.8;

/// Decides when a scroll position is close enough to the bottom to pull the
/// next chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTrigger {
    fraction: f64,
    threshold: Option<f64>,
}

impl ScrollTrigger {
    pub fn new(fraction: f64) -> Self {
        ScrollTrigger {
            fraction,
            threshold: None,
        }
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// `None` until the first range is reported.
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    pub fn on_range_changed(&mut self, _min: i32, max: i32) {
        self.threshold = Some(f64::from(max) * self.fraction);
    }

    pub fn should_load(&self, value: i32) -> bool {
        match self.threshold {
            Some(threshold) => f64::from(value) >= threshold,
            None => false,
        }
    }
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER_FRACTION)
    }
}

/// Scrollbar events produced by one [`ScrollTracker::update`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEvents {
    /// `(min, max)` when the range moved.
    pub range: Option<(i32, i32)>,
    pub value: Option<i32>,
}

impl ScrollEvents {
    pub fn is_empty(&self) -> bool {
        self.range.is_none() && self.value.is_none()
    }
}

/// Turns a row-based viewport into scrollbar events, measured in rows:
/// range max = rows not on screen, value = first visible row.
///
/// A range event is sent when the max moves. A value event is sent when the
/// value moves, after a range event, or after rows were appended, so a table
/// that fits on screen keeps filling until it scrolls.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTracker {
    last_max: Option<i32>,
    last_value: Option<i32>,
    last_total: Option<usize>,
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets what was sent; the next update reports both range and value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn update(
        &mut self,
        total_rows: usize,
        first_visible: usize,
        visible_rows: usize,
    ) -> ScrollEvents {
        let max = to_i32(total_rows.saturating_sub(visible_rows));
        let value = to_i32(first_visible);

        let range_changed = self.last_max != Some(max);
        let value_due = range_changed
            || self.last_value != Some(value)
            || self.last_total != Some(total_rows);

        self.last_max = Some(max);
        self.last_value = Some(value);
        self.last_total = Some(total_rows);

        ScrollEvents {
            range: range_changed.then_some((0, max)),
            value: value_due.then_some(value),
        }
    }
}

fn to_i32(n: usize) -> i32 {
    n.min(i32::MAX as usize) as i32
}
