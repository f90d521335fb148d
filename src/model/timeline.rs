use chrono::{DateTime, Datelike, Duration, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const SECS_PER_DAY: i64 = 86_400;

/// Time granularity of the timeline. Controls snapping of edits and how
/// coarsely task intervals are compared for row packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Minute,
    Hour,
    Day,
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

/// How two task intervals are compared when packing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionBucket {
    /// Half-open `[start, end)` comparison on exact instants.
    Exact,
    /// Whole UTC calendar days, inclusive at both ends.
    Day,
}

impl ViewMode {
    pub const ALL: [ViewMode; 7] = [
        ViewMode::Minute,
        ViewMode::Hour,
        ViewMode::Day,
        ViewMode::Week,
        ViewMode::Month,
        ViewMode::Quarter,
        ViewMode::Year,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Minute => "Minute",
            ViewMode::Hour => "Hour",
            ViewMode::Day => "Day",
            ViewMode::Week => "Week",
            ViewMode::Month => "Month",
            ViewMode::Quarter => "Quarter",
            ViewMode::Year => "Year",
        }
    }

    pub fn collision_bucket(self) -> CollisionBucket {
        match self {
            ViewMode::Minute | ViewMode::Hour => CollisionBucket::Exact,
            _ => CollisionBucket::Day,
        }
    }

    /// Average length of one grid unit. Months, quarters and years vary, so
    /// this is only used for sizing, never for snapping.
    pub fn nominal_unit(self) -> Duration {
        match self {
            ViewMode::Minute => Duration::minutes(1),
            ViewMode::Hour => Duration::hours(1),
            ViewMode::Day => Duration::days(1),
            ViewMode::Week => Duration::weeks(1),
            ViewMode::Month => Duration::days(30),
            ViewMode::Quarter => Duration::days(91),
            ViewMode::Year => Duration::days(365),
        }
    }

    /// Default horizontal density in pixels per grid unit.
    pub fn default_unit_width(self) -> f64 {
        match self {
            ViewMode::Minute => 24.0,
            ViewMode::Hour => 80.0,
            ViewMode::Day => 60.0,
            ViewMode::Week => 120.0,
            ViewMode::Month => 150.0,
            ViewMode::Quarter => 220.0,
            ViewMode::Year => 320.0,
        }
    }

    /// Start of the grid cell containing `t`.
    pub fn floor(self, t: DateTime<Utc>) -> DateTime<Utc> {
        let secs = t.timestamp();
        let floored = match self {
            ViewMode::Minute => Some(secs - secs.rem_euclid(60)),
            ViewMode::Hour => Some(secs - secs.rem_euclid(3_600)),
            ViewMode::Day => Some(secs - secs.rem_euclid(SECS_PER_DAY)),
            ViewMode::Week => {
                let day = secs.div_euclid(SECS_PER_DAY);
                // 1970-01-01 was a Thursday; weeks start on Monday.
                let from_monday = (day + 3).rem_euclid(7);
                Some((day - from_monday) * SECS_PER_DAY)
            }
            ViewMode::Month => month_start(t.year(), t.month()).map(|d| d.timestamp()),
            ViewMode::Quarter => {
                month_start(t.year(), (t.month() - 1) / 3 * 3 + 1).map(|d| d.timestamp())
            }
            ViewMode::Year => month_start(t.year(), 1).map(|d| d.timestamp()),
        };
        floored
            .and_then(|s| DateTime::from_timestamp(s, 0))
            .unwrap_or(t)
    }

    /// Grid line following `boundary`. `boundary` must already be floored.
    pub fn next_boundary(self, boundary: DateTime<Utc>) -> DateTime<Utc> {
        let next = match self {
            ViewMode::Minute => boundary.checked_add_signed(Duration::minutes(1)),
            ViewMode::Hour => boundary.checked_add_signed(Duration::hours(1)),
            ViewMode::Day => boundary.checked_add_signed(Duration::days(1)),
            ViewMode::Week => boundary.checked_add_signed(Duration::weeks(1)),
            ViewMode::Month => boundary.checked_add_months(Months::new(1)),
            ViewMode::Quarter => boundary.checked_add_months(Months::new(3)),
            ViewMode::Year => boundary.checked_add_months(Months::new(12)),
        };
        next.unwrap_or(boundary)
    }

    /// Grid line preceding `boundary`. `boundary` must already be floored.
    pub fn prev_boundary(self, boundary: DateTime<Utc>) -> DateTime<Utc> {
        let prev = match self {
            ViewMode::Minute => boundary.checked_sub_signed(Duration::minutes(1)),
            ViewMode::Hour => boundary.checked_sub_signed(Duration::hours(1)),
            ViewMode::Day => boundary.checked_sub_signed(Duration::days(1)),
            ViewMode::Week => boundary.checked_sub_signed(Duration::weeks(1)),
            ViewMode::Month => boundary.checked_sub_months(Months::new(1)),
            ViewMode::Quarter => boundary.checked_sub_months(Months::new(3)),
            ViewMode::Year => boundary.checked_sub_months(Months::new(12)),
        };
        prev.unwrap_or(boundary)
    }

    /// Nearest grid line to `t`. Exact midpoints round up.
    pub fn snap(self, t: DateTime<Utc>) -> DateTime<Utc> {
        let lo = self.floor(t);
        if lo == t {
            return t;
        }
        let hi = self.next_boundary(lo);
        if (t - lo) < (hi - t) {
            lo
        } else {
            hi
        }
    }

    /// Grid lines in `[start, end]`, starting at the first line at or after `start`.
    pub fn grid_lines(self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let mut lines = Vec::new();
        let mut line = self.floor(start);
        if line < start {
            line = self.next_boundary(line);
        }
        while line <= end {
            lines.push(line);
            let next = self.next_boundary(line);
            if next <= line {
                break;
            }
            line = next;
        }
        lines
    }
}

fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()
}

/// Visible time window and its width on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// The leftmost visible instant.
    pub start: DateTime<Utc>,
    /// The rightmost visible instant.
    pub end: DateTime<Utc>,
    /// Canvas width in pixels for the whole window.
    pub width: f64,
}

impl Viewport {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, width: f64) -> Self {
        Self { start, end, width }
    }

    /// A window covering `bounds` padded by one grid unit on each side, sized at
    /// the mode's default density. With no bounds the window is centred on `anchor`.
    pub fn fit(
        bounds: Option<(DateTime<Utc>, DateTime<Utc>)>,
        mode: ViewMode,
        anchor: DateTime<Utc>,
    ) -> Self {
        let (lo, hi) = bounds.unwrap_or((anchor, anchor));
        let start = mode.prev_boundary(mode.floor(lo));
        let end = mode.next_boundary(mode.next_boundary(mode.floor(hi)));
        let mut viewport = Self::new(start, end, 0.0);
        viewport.width = viewport.default_width(mode);
        viewport
    }

    /// Width at `mode`'s default density.
    pub fn default_width(&self, mode: ViewMode) -> f64 {
        let span = (self.end - self.start).num_milliseconds() as f64;
        let unit = mode.nominal_unit().num_milliseconds() as f64;
        (span / unit * mode.default_unit_width()).max(1.0)
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }

    /// Zoom in (widen the canvas).
    pub fn zoom_in(&mut self) {
        self.width = (self.width * 1.2).min(1_000_000.0);
    }

    /// Zoom out (narrow the canvas).
    pub fn zoom_out(&mut self) {
        self.width = (self.width / 1.2).max(100.0);
    }
}

/// Affine mapping between instants and horizontal pixel offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    viewport: Viewport,
    mode: ViewMode,
    span_ms: f64,
}

impl TimeScale {
    /// Rejects an empty or inverted time range and a non-positive width.
    pub fn new(viewport: Viewport, mode: ViewMode) -> Result<Self> {
        if viewport.end <= viewport.start {
            return Err(Error::DegenerateRange {
                start: viewport.start,
                end: viewport.end,
            });
        }
        if !(viewport.width > 0.0) {
            return Err(Error::NonPositiveWidth(viewport.width));
        }
        Ok(Self {
            viewport,
            mode,
            span_ms: viewport.span().num_milliseconds() as f64,
        })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn view_mode(&self) -> ViewMode {
        self.mode
    }

    pub fn width(&self) -> f64 {
        self.viewport.width
    }

    /// Horizontal offset of `instant` from the viewport start.
    pub fn to_pixel(&self, instant: DateTime<Utc>) -> f64 {
        let offset = (instant - self.viewport.start).num_milliseconds() as f64;
        offset / self.span_ms * self.viewport.width
    }

    /// Instant under pixel `x`, snapped to the view mode's grid.
    pub fn to_instant(&self, x: f64) -> DateTime<Utc> {
        self.mode.snap(self.to_instant_exact(x))
    }

    /// Instant under pixel `x` without snapping.
    pub fn to_instant_exact(&self, x: f64) -> DateTime<Utc> {
        self.viewport.start + self.pixels_to_duration(x)
    }

    /// Time covered by `dx` pixels.
    pub fn pixels_to_duration(&self, dx: f64) -> Duration {
        let ms = dx / self.viewport.width * self.span_ms;
        Duration::milliseconds(ms.round() as i64)
    }

    /// Pixels covered by `d`.
    pub fn duration_to_pixels(&self, d: Duration) -> f64 {
        d.num_milliseconds() as f64 / self.span_ms * self.viewport.width
    }

    pub fn snap(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        self.mode.snap(instant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn day_scale(mode: ViewMode) -> TimeScale {
        let vp = Viewport::new(utc(2024, 3, 4, 0, 0), utc(2024, 3, 5, 0, 0), 2400.0);
        TimeScale::new(vp, mode).unwrap()
    }

    #[test]
    fn to_pixel_is_affine() {
        let scale = day_scale(ViewMode::Hour);
        assert_eq!(scale.to_pixel(utc(2024, 3, 4, 0, 0)), 0.0);
        assert_eq!(scale.to_pixel(utc(2024, 3, 4, 12, 0)), 1200.0);
        assert_eq!(scale.to_pixel(utc(2024, 3, 5, 0, 0)), 2400.0);
        assert_eq!(scale.to_pixel(utc(2024, 3, 3, 23, 0)), -100.0);
    }

    #[test]
    fn to_instant_snaps_to_hour() {
        let scale = day_scale(ViewMode::Hour);
        // 100 px per hour: 940 px is 9:24, 960 px is 9:36
        assert_eq!(scale.to_instant(940.0), utc(2024, 3, 4, 9, 0));
        assert_eq!(scale.to_instant(960.0), utc(2024, 3, 4, 10, 0));
        assert_eq!(scale.to_instant_exact(950.0), utc(2024, 3, 4, 9, 30));
    }

    #[test]
    fn rejects_degenerate_range_and_width() {
        let t = utc(2024, 3, 4, 0, 0);
        let err = TimeScale::new(Viewport::new(t, t, 100.0), ViewMode::Day).unwrap_err();
        assert!(matches!(err, Error::DegenerateRange { .. }));

        let end = utc(2024, 3, 5, 0, 0);
        let err = TimeScale::new(Viewport::new(t, end, 0.0), ViewMode::Day).unwrap_err();
        assert!(matches!(err, Error::NonPositiveWidth(_)));
        let err = TimeScale::new(Viewport::new(t, end, f64::NAN), ViewMode::Day).unwrap_err();
        assert!(matches!(err, Error::NonPositiveWidth(_)));
    }

    #[test]
    fn week_floor_lands_on_monday() {
        // 2024-03-07 is a Thursday
        let floored = ViewMode::Week.floor(utc(2024, 3, 7, 15, 0));
        assert_eq!(floored, utc(2024, 3, 4, 0, 0));
        assert_eq!(floored.weekday(), chrono::Weekday::Mon);
        // Before the epoch as well
        assert_eq!(
            ViewMode::Week.floor(utc(1969, 12, 31, 1, 0)).weekday(),
            chrono::Weekday::Mon
        );
    }

    #[test]
    fn calendar_modes_snap_to_nearest_boundary() {
        assert_eq!(ViewMode::Month.snap(utc(2024, 2, 10, 0, 0)), utc(2024, 2, 1, 0, 0));
        assert_eq!(ViewMode::Month.snap(utc(2024, 2, 20, 0, 0)), utc(2024, 3, 1, 0, 0));
        assert_eq!(ViewMode::Quarter.snap(utc(2024, 5, 1, 0, 0)), utc(2024, 4, 1, 0, 0));
        assert_eq!(ViewMode::Year.snap(utc(2024, 9, 1, 0, 0)), utc(2025, 1, 1, 0, 0));
        assert_eq!(ViewMode::Day.snap(utc(2024, 2, 10, 12, 0)), utc(2024, 2, 11, 0, 0));
    }

    #[test]
    fn grid_lines_cover_range() {
        let lines = ViewMode::Hour.grid_lines(utc(2024, 3, 4, 8, 30), utc(2024, 3, 4, 11, 0));
        assert_eq!(
            lines,
            vec![utc(2024, 3, 4, 9, 0), utc(2024, 3, 4, 10, 0), utc(2024, 3, 4, 11, 0)]
        );
    }

    #[test]
    fn fit_pads_bounds_by_one_unit() {
        let vp = Viewport::fit(
            Some((utc(2024, 3, 4, 9, 15), utc(2024, 3, 4, 10, 45))),
            ViewMode::Hour,
            utc(2000, 1, 1, 0, 0),
        );
        assert_eq!(vp.start, utc(2024, 3, 4, 8, 0));
        assert_eq!(vp.end, utc(2024, 3, 4, 12, 0));
        assert_eq!(vp.width, 4.0 * 80.0);
    }

    #[test]
    fn fit_without_tasks_is_never_empty() {
        let anchor = utc(2024, 3, 4, 0, 0);
        let vp = Viewport::fit(None, ViewMode::Day, anchor);
        assert!(vp.end > vp.start);
        assert!(TimeScale::new(vp, ViewMode::Day).is_ok());
    }
}
