//! Calendar-day query windows in a caller-supplied timezone.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// One calendar day and its local `[00:00:00, 23:59:59]` bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl DayWindow {
    /// Build the window for `date` in `tz`.
    pub fn for_date<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Self {
        Self {
            date,
            start: resolve_local(tz, date.and_time(NaiveTime::MIN)),
            end: resolve_local(tz, date.and_time(end_of_day())),
        }
    }
}

/// An inclusive range of calendar days.
///
/// Iterating is lazy and can be repeated; each pass starts again from
/// `start`.
#[derive(Debug, Clone)]
pub struct DateRange<Tz: TimeZone> {
    start: NaiveDate,
    end: NaiveDate,
    tz: Tz,
}

impl<Tz: TimeZone> DateRange<Tz> {
    /// Days from `start` through `end`, both inclusive. Empty if
    /// `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate, tz: Tz) -> Self {
        Self { start, end, tz }
    }

    /// The `days` calendar days ending with `today`.
    pub fn last_n_days(today: NaiveDate, days: u32, tz: Tz) -> Self {
        let back = u64::from(days.saturating_sub(1));
        let start = today.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
        Self::new(start, today, tz)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range.
    pub fn len(&self) -> usize {
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn iter(&self) -> DayWindows<'_, Tz> {
        DayWindows {
            range: self,
            offset: 0,
        }
    }
}

impl<'a, Tz: TimeZone> IntoIterator for &'a DateRange<Tz> {
    type Item = DayWindow;
    type IntoIter = DayWindows<'a, Tz>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the [`DayWindow`]s of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct DayWindows<'a, Tz: TimeZone> {
    range: &'a DateRange<Tz>,
    offset: u64,
}

impl<Tz: TimeZone> Iterator for DayWindows<'_, Tz> {
    type Item = DayWindow;

    fn next(&mut self) -> Option<DayWindow> {
        let date = self.range.start.checked_add_days(Days::new(self.offset))?;
        if date > self.range.end {
            return None;
        }
        self.offset += 1;
        Some(DayWindow::for_date(date, &self.range.tz))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .range
            .len()
            .saturating_sub(usize::try_from(self.offset).unwrap_or(usize::MAX));
        (remaining, Some(remaining))
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// Map a local wall-clock time to an instant. Ambiguous times take the
/// earlier instant; times inside a DST gap move forward to the first valid
/// local time.
fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<FixedOffset> {
    let mut candidate = local;
    // Real-world gaps are at most a few hours; scan forward a minute at a time.
    for _ in 0..(24 * 60) {
        if let Some(dt) = tz.from_local_datetime(&candidate).earliest() {
            return dt.fixed_offset();
        }
        candidate += chrono::Duration::minutes(1);
    }
    tz.from_utc_datetime(&local).fixed_offset()
}
