// src/specs/occupancy.rs
//! Scraper for the weekly occupancy page (`Rauminfo/Rauminfo.do`).
//!
//! Page layout:
//! - Somewhere in the page: `DD.MM.YYYY&nbsp;bis&nbsp;DD.MM.YYYY`, the first
//!   date being the Monday of the displayed week.
//! - The second `<table>` is the occupancy grid. Cells span rows/columns
//!   freely; the background color encodes the state and nested
//!   `<font color=…>` spans carry the course title (`#ffffff`) and the
//!   organizing unit (`#dddddd`).
//!
//! Decoding a cell can fail (unknown color), resolving spans cannot.

use std::{error::Error, sync::LazyLock, time::Instant};

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::config::consts::OCCUPANCY_PATH;
use crate::core::{html, net};
use crate::error::ParseError;
use crate::occupancy::{Event, Occupancy, Sample, WeekOccupancy, extract_intervals};
use crate::room::Room;
use crate::table::{self, RawCell, Span};

const TITLE_COLOR: &str = "#ffffff";
const ORGANIZATION_COLOR: &str = "#dddddd";
const OCCUPANCY_TABLE_INDEX: usize = 1;

/// The form wants German month abbreviations.
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
];

static WEEK_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<week_begin>\d\d\.\d\d\.\d\d\d\d)(?:&nbsp;|\s)+bis(?:&nbsp;|\s)+(?P<week_end>\d\d\.\d\d\.\d\d\d\d)")
        .expect("week marker pattern")
});

/// POST fields asking for the week containing `date`.
pub fn request_form(room: &Room, date: NaiveDate) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("tag", date.day().to_string()),
        ("monat", s!(MONTHS[date.month0() as usize])),
        ("jahr", date.year().to_string()),
        ("checkUsage", s!("anzeigen")),
    ];
    fields.extend(room.fields());
    fields.push(("rektoratInListe", s!("true")));
    fields.push(("raumInRaumgruppe", s!("true")));
    fields
}

pub fn fetch(room: &Room, date: NaiveDate) -> Result<WeekOccupancy, Box<dyn Error>> {
    let doc = net::http_post_form(OCCUPANCY_PATH, &request_form(room, date))?;
    let t = Instant::now();
    let week = parse_doc(&doc)?;
    log::debug!("Occupancy: parsed {} in {:?}", room, t.elapsed());
    Ok(week)
}

/// Split out for unit tests.
pub fn parse_doc(doc: &str) -> Result<WeekOccupancy, ParseError> {
    let week_start = week_start(doc)?;
    let table = html::nth_element(doc, "table", OCCUPANCY_TABLE_INDEX)
        .ok_or_else(|| ParseError::malformed("occupancy table not found"))?;
    let rows = read_rows(table)?;
    let grid = table::resolve(&rows);
    extract_intervals(&grid, week_start)
}

pub fn week_start(doc: &str) -> Result<NaiveDate, ParseError> {
    let caps = WEEK_MARKER.captures(doc).ok_or(ParseError::MissingWeekMarker)?;
    parse_date(&caps["week_begin"])
}

/// `DD.MM.YYYY` → calendar date, no timezone involved.
pub fn parse_date(s: &str) -> Result<NaiveDate, ParseError> {
    let bad = || ParseError::InvalidDate(s!(s));
    let mut parts = s.trim().split('.');
    let mut next = || parts.next().and_then(|p| p.parse::<u32>().ok());
    let (day, month, year) = (next().ok_or_else(bad)?, next().ok_or_else(bad)?, next().ok_or_else(bad)?);
    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(bad)
}

/* ---------- helpers ---------- */

fn read_rows(table: &str) -> Result<Vec<Vec<RawCell<Sample>>>, ParseError> {
    html::child_blocks(html::inner(table), &["tr"])
        .into_iter()
        .map(|tr| {
            html::child_blocks(html::inner(tr), &["td", "th"])
                .into_iter()
                .map(read_cell)
                .collect()
        })
        .collect()
}

fn read_cell(td: &str) -> Result<RawCell<Sample>, ParseError> {
    let open = html::opener(td);
    let rowspan = Span::from_attr(html::attr(open, "rowspan").as_deref());
    let colspan = Span::from_attr(html::attr(open, "colspan").as_deref());
    Ok(RawCell::spanning(decode_cell(td)?, rowspan, colspan))
}

/// Background color → state; title/organization markers → event. Frame
/// cells never carry an event.
fn decode_cell(td: &str) -> Result<Sample, ParseError> {
    let state = Occupancy::from_bgcolor(html::attr(html::opener(td), "bgcolor").as_deref())?;
    if state == Occupancy::Invalid {
        return Ok(Sample::new(state, None));
    }

    let body = html::inner(td);
    let event = html::text_by_attr(body, "color", TITLE_COLOR).map(|title| {
        let organization = html::text_by_attr(body, "color", ORGANIZATION_COLOR)
            .filter(|o| !o.is_empty());
        Event::new(title, organization)
    });
    Ok(Sample::new(state, event))
}
