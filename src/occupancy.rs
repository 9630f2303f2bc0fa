// src/occupancy.rs
//! Occupancy states, timeslots, and the grid → interval extraction.
//!
//! The occupancy table has one frame row (day headers) and two frame columns
//! (time labels) on the left. Every other cell is one quarter-hour sample,
//! starting at 07:00; every other column is one day of the displayed week.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::ParseError;
use crate::table::Grid;

pub const FRAME_ROWS: usize = 1;
pub const FRAME_COLUMNS: usize = 2;
pub const SAMPLE_MINUTES: i64 = 15;
/// First sample of a day starts this many hours after midnight.
pub const TRACKED_FROM_HOURS: i64 = 7;
/// The leading unknown block starts this many hours before midnight.
pub const PADDING_HOURS: i64 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occupancy {
    Closed,
    Free,
    Occupied,
    /// Outside the tracked hours.
    Unknown,
    /// Frame cells without a hex background.
    Invalid,
}

/// Background color → state. Only these three colors carry a state.
const PALETTE: [(&str, Occupancy); 3] = [
    ("#cccccc", Occupancy::Closed),
    ("#99cc99", Occupancy::Free),
    ("#006799", Occupancy::Occupied),
];

/// Frame cells on the live site are sometimes shaded with this. Decodes to
/// `Invalid`, but `Invalid` has no color of its own.
const FRAME_COLOR: &str = "#eeeeee";

impl Occupancy {
    pub fn color(self) -> Option<&'static str> {
        PALETTE.iter().find(|(_, o)| *o == self).map(|(c, _)| *c)
    }

    pub fn from_color(color: &str) -> Option<Occupancy> {
        let color = color.trim();
        if color.eq_ignore_ascii_case(FRAME_COLOR) {
            return Some(Occupancy::Invalid);
        }
        PALETTE
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(color))
            .map(|(_, o)| *o)
    }

    /// State of a cell from its `bgcolor` attribute. Absent or non-hex colors
    /// mark frame cells; an unknown hex color is a data error.
    pub fn from_bgcolor(bgcolor: Option<&str>) -> Result<Occupancy, ParseError> {
        match bgcolor.map(str::trim) {
            Some(c) if c.starts_with('#') => {
                Occupancy::from_color(c).ok_or_else(|| ParseError::UnrecognizedColor(s!(c)))
            }
            _ => Ok(Occupancy::Invalid),
        }
    }
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Occupancy::Closed => "closed",
            Occupancy::Free => "free",
            Occupancy::Occupied => "occupied",
            Occupancy::Unknown => "unknown",
            Occupancy::Invalid => "invalid",
        };
        f.write_str(s)
    }
}

/// A course occupying a room.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Event {
    pub title: String,
    pub organization: Option<String>,
}

impl Event {
    pub fn new(title: impl Into<String>, organization: Option<String>) -> Self {
        Self { title: title.into(), organization }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.organization {
            Some(org) => write!(f, "{} ({})", self.title, org),
            None => f.write_str(&self.title),
        }
    }
}

/// One quarter-hour grid cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    pub event: Option<Event>,
    pub state: Occupancy,
}

impl Sample {
    pub fn new(state: Occupancy, event: Option<Event>) -> Self {
        Self { event, state }
    }

    pub fn unknown() -> Self {
        Self { event: None, state: Occupancy::Unknown }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timeslot {
    pub state: Occupancy,
    pub begin: NaiveDateTime,
    pub end: NaiveDateTime,
    pub event: Option<Event>,
}

impl Timeslot {
    /// Inclusive on both ends, so the instant a slot ends still counts.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.begin <= at && at <= self.end
    }

    fn same_sample(&self, sample: &Sample) -> bool {
        self.state == sample.state && self.event == sample.event
    }
}

impl fmt::Display for Timeslot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} – {}  {}",
            self.begin.format("%a %d.%m. %H:%M"),
            self.end.format("%H:%M"),
            self.state
        )?;
        if let Some(ev) = &self.event {
            write!(f, "  {ev}")?;
        }
        Ok(())
    }
}

/// One room's displayed week.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeekOccupancy {
    pub week_start: NaiveDate,
    /// Chronological slots per day, Monday first.
    pub days: Vec<Vec<Timeslot>>,
}

impl WeekOccupancy {
    pub fn slots(&self) -> impl Iterator<Item = &Timeslot> {
        self.days.iter().flatten()
    }

    /// The free slot covering `at`, if the room is free then.
    pub fn free_at(&self, at: NaiveDateTime) -> Option<&Timeslot> {
        self.slots().find(|s| s.state == Occupancy::Free && s.contains(at))
    }
}

/// Collapse one day's samples into contiguous slots, led by the unknown block
/// from 22:00 of the previous day up to the first sample.
pub fn day_timeslots<'a, I>(date: NaiveDate, samples: I) -> Vec<Timeslot>
where
    I: IntoIterator<Item = &'a Sample>,
{
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    let first = midnight + Duration::hours(TRACKED_FROM_HOURS);
    let step = Duration::minutes(SAMPLE_MINUTES);

    let mut out = Vec::new();
    let mut open = Timeslot {
        state: Occupancy::Unknown,
        begin: midnight - Duration::hours(PADDING_HOURS),
        end: first,
        event: None,
    };

    let mut boundary = first;
    for sample in samples {
        let next = boundary + step;
        if open.same_sample(sample) {
            open.end = next;
        } else {
            let closed = std::mem::replace(
                &mut open,
                Timeslot { state: sample.state, begin: boundary, end: next, event: sample.event.clone() },
            );
            out.push(closed);
        }
        boundary = next;
    }
    out.push(open);
    out
}

/// Walk the resolved grid day column by day column.
pub fn extract_intervals(grid: &Grid<Sample>, week_start: NaiveDate) -> Result<WeekOccupancy, ParseError> {
    if grid.len() < FRAME_ROWS {
        return Err(ParseError::malformed("table has no rows"));
    }
    let columns = grid.first().map_or(0, Vec::len);
    if columns < FRAME_COLUMNS {
        return Err(ParseError::malformed(format!(
            "expected at least {FRAME_COLUMNS} frame columns, found {columns}"
        )));
    }

    let unknown = Sample::unknown();
    let days = (FRAME_COLUMNS..columns)
        .enumerate()
        .map(|(day, col)| {
            let date = week_start + Duration::days(day as i64);
            let samples = grid[FRAME_ROWS..]
                .iter()
                .map(|row| row.get(col).and_then(Option::as_ref).unwrap_or(&unknown));
            day_timeslots(date, samples)
        })
        .collect();

    Ok(WeekOccupancy { week_start, days })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_hms_opt(h, m, 0).unwrap()
    }

    fn free() -> Sample {
        Sample::new(Occupancy::Free, None)
    }

    fn algebra() -> Sample {
        Sample::new(Occupancy::Occupied, Some(Event::new("Algebra", None)))
    }

    #[test]
    fn palette_lookup() {
        assert_eq!(Occupancy::from_color("#99cc99"), Some(Occupancy::Free));
        assert_eq!(Occupancy::from_color("#99CC99"), Some(Occupancy::Free));
        assert_eq!(Occupancy::from_color("#cccccc"), Some(Occupancy::Closed));
        assert_eq!(Occupancy::from_color("#006799"), Some(Occupancy::Occupied));
        assert_eq!(Occupancy::from_color("#eeeeee"), Some(Occupancy::Invalid));
        assert_eq!(Occupancy::from_color("#EEEEEE"), Some(Occupancy::Invalid));
        assert_eq!(Occupancy::from_color("#abcdef"), None);
        assert_eq!(Occupancy::Free.color(), Some("#99cc99"));
        assert_eq!(Occupancy::Unknown.color(), None);
        assert_eq!(Occupancy::Invalid.color(), None);
    }

    #[test]
    fn bgcolor_fallbacks() {
        assert_eq!(Occupancy::from_bgcolor(None), Ok(Occupancy::Invalid));
        assert_eq!(Occupancy::from_bgcolor(Some("white")), Ok(Occupancy::Invalid));
        assert_eq!(Occupancy::from_bgcolor(Some("#99cc99")), Ok(Occupancy::Free));
        assert_eq!(Occupancy::from_bgcolor(Some("#eeeeee")), Ok(Occupancy::Invalid));
        assert_eq!(
            Occupancy::from_bgcolor(Some("#123456")),
            Err(ParseError::UnrecognizedColor(s!("#123456")))
        );
    }

    #[test]
    fn merges_identical_neighbours() {
        let d = NaiveDate::from_ymd_opt(2023, 9, 4).unwrap();
        let samples = [free(), free(), algebra(), algebra(), free()];
        let slots = day_timeslots(d, &samples);

        let prev = d.pred_opt().unwrap();
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0].state, Occupancy::Unknown);
        assert_eq!((slots[0].begin, slots[0].end), (at(prev, 22, 0), at(d, 7, 0)));

        assert_eq!(slots[1].state, Occupancy::Free);
        assert_eq!((slots[1].begin, slots[1].end), (at(d, 7, 0), at(d, 7, 30)));

        assert_eq!(slots[2].state, Occupancy::Occupied);
        assert_eq!(slots[2].event.as_ref().map(|e| e.title.as_str()), Some("Algebra"));
        assert_eq!((slots[2].begin, slots[2].end), (at(d, 7, 30), at(d, 8, 0)));

        assert_eq!(slots[3].state, Occupancy::Free);
        assert_eq!((slots[3].begin, slots[3].end), (at(d, 8, 0), at(d, 8, 15)));
    }

    #[test]
    fn trailing_run_keeps_its_last_quarter() {
        let d = NaiveDate::from_ymd_opt(2023, 9, 4).unwrap();
        let slots = day_timeslots(d, &[algebra(), free(), free()]);
        assert_eq!(slots.last().unwrap().end, at(d, 7, 45));
    }

    #[test]
    fn different_events_do_not_merge() {
        let d = NaiveDate::from_ymd_opt(2023, 9, 4).unwrap();
        let other = Sample::new(Occupancy::Occupied, Some(Event::new("Algebra", Some(s!("D-MATH")))));
        let slots = day_timeslots(d, &[algebra(), other]);
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn leading_unknown_sample_extends_padding() {
        let d = NaiveDate::from_ymd_opt(2023, 9, 4).unwrap();
        let slots = day_timeslots(d, &[Sample::unknown(), free()]);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].end, at(d, 7, 15));
    }

    #[test]
    fn no_samples_is_padding_only() {
        let d = NaiveDate::from_ymd_opt(2023, 9, 4).unwrap();
        let slots = day_timeslots(d, std::iter::empty());
        assert_eq!(slots.len(), 1);
        assert!(slots[0].begin < slots[0].end);
    }

    #[test]
    fn grid_columns_become_days() {
        let week = NaiveDate::from_ymd_opt(2023, 9, 4).unwrap();
        let frame = || Some(Sample::new(Occupancy::Invalid, None));
        let grid: Grid<Sample> = vec![
            vec![frame(), frame(), frame(), frame()],
            vec![frame(), frame(), Some(free()), Some(algebra())],
            vec![frame(), frame(), Some(free()), None],
        ];
        let out = extract_intervals(&grid, week).unwrap();
        assert_eq!(out.days.len(), 2);

        let tue = week.succ_opt().unwrap();
        assert_eq!(out.days[1][0].begin, at(week, 22, 0));
        assert_eq!(out.days[1][1].begin, at(tue, 7, 0));
        assert_eq!(out.days[1][2].state, Occupancy::Unknown);
        assert_eq!(out.days[1][2].end, at(tue, 7, 30));

        for day in &out.days {
            for pair in day.windows(2) {
                assert_eq!(pair[0].end, pair[1].begin);
                assert!(pair[0].begin < pair[0].end);
            }
        }
        assert_eq!(out.free_at(at(week, 7, 20)).map(|s| s.end), Some(at(week, 7, 30)));
        assert!(out.free_at(at(tue, 7, 5)).is_none());
    }

    #[test]
    fn too_few_columns_is_malformed() {
        let week = NaiveDate::from_ymd_opt(2023, 9, 4).unwrap();
        let grid: Grid<Sample> = vec![vec![Some(free())]];
        assert!(matches!(extract_intervals(&grid, week), Err(ParseError::MalformedTable(_))));
        assert!(matches!(extract_intervals(&Vec::new(), week), Err(ParseError::MalformedTable(_))));
    }
}
