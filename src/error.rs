// src/error.rs

/// Why an occupancy page could not be turned into timeslots. Every variant is
/// fatal for that room's request; nothing here is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Missing table, no rows, or not enough frame columns.
    #[error("malformed occupancy table: {0}")]
    MalformedTable(String),

    /// A `#…` background color outside the known occupancy palette.
    #[error("unrecognized cell color `{0}`")]
    UnrecognizedColor(String),

    #[error("week marker (DD.MM.YYYY bis DD.MM.YYYY) not found")]
    MissingWeekMarker,

    #[error("invalid date `{0}`")]
    InvalidDate(String),
}

impl ParseError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        ParseError::MalformedTable(msg.into())
    }
}
