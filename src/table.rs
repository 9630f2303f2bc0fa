// src/table.rs
//! Row/column span resolution for HTML tables.
//!
//! [`resolve`] turns rows of [`RawCell`]s into a dense [`Grid`] in which a
//! spanning cell's value is repeated at every position it covers. It runs in
//! two passes, each owning its own span bookkeeping:
//!
//! 1. **Column count.** A row is as wide as the column spans of all its cells
//!    but the last, plus one for the last cell, plus the row spans still
//!    active from rows above. The last cell's column span is deliberately not
//!    expanded, so a trailing "fill the rest" cell cannot create phantom
//!    columns. [`Span::ToEdge`] counts as one column here.
//! 2. **Fill.** Cells are placed left to right, skipping columns still held by
//!    row spans from above. Here `ToEdge` really extends to the last
//!    column/row. Writes outside the grid are dropped and overlapping writes
//!    are last-write-wins; malformed spans are never an error.

use std::collections::HashMap;

/// Declared extent of a cell along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Span {
    Count(usize),
    /// HTML `rowspan="0"` / `colspan="0"`: up to the table's edge.
    ToEdge,
}

impl Default for Span {
    fn default() -> Self {
        Span::Count(1)
    }
}

impl Span {
    /// Read a `rowspan`/`colspan` attribute. Absent means 1, `0` means
    /// [`Span::ToEdge`]. Junk like `"2;"` or `"100%"` is read by its leading
    /// digits; a value without any digits counts as 1.
    pub fn from_attr(value: Option<&str>) -> Span {
        let Some(v) = value else { return Span::default() };
        let digits: String = v.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
        match digits.parse::<usize>() {
            Ok(0) => Span::ToEdge,
            Ok(n) => Span::Count(n),
            Err(_) => Span::default(),
        }
    }

    /// Concrete extent, with `edge` being the room left up to the border.
    fn resolve(self, edge: usize) -> usize {
        match self {
            Span::Count(0) | Span::ToEdge => edge,
            Span::Count(n) => n,
        }
    }

    /// Width used while counting columns, before the edge is known.
    fn counted_width(self) -> usize {
        match self {
            Span::Count(0) | Span::ToEdge => 1,
            Span::Count(n) => n,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawCell<T> {
    pub value: T,
    pub rowspan: Span,
    pub colspan: Span,
}

impl<T> RawCell<T> {
    pub fn new(value: T) -> Self {
        Self { value, rowspan: Span::default(), colspan: Span::default() }
    }

    pub fn spanning(value: T, rowspan: Span, colspan: Span) -> Self {
        Self { value, rowspan, colspan }
    }
}

/// `rows × columns`; `None` where no cell reaches.
pub type Grid<T> = Vec<Vec<Option<T>>>;

/// Column count of the resolved grid (first pass).
pub fn column_count<T>(rows: &[Vec<RawCell<T>>]) -> usize {
    let n = rows.len();
    let mut colcount = 0usize;
    // one entry per cell whose row span still reaches the current row
    let mut carried: Vec<usize> = Vec::new();

    for (r, row) in rows.iter().enumerate() {
        let width = match row.split_last() {
            Some((_, init)) => init.iter().map(|c| c.colspan.counted_width()).sum::<usize>() + 1,
            None => 0,
        };
        colcount = colcount.max(width + carried.len());

        carried.extend(row.iter().map(|c| c.rowspan.resolve(n - r)));
        carried.retain_mut(|s| {
            *s -= 1;
            *s > 0
        });
    }
    colcount
}

/// Resolve all spans into a dense grid (both passes).
pub fn resolve<T: Clone>(rows: &[Vec<RawCell<T>>]) -> Grid<T> {
    let n = rows.len();
    let colcount = column_count(rows);
    let mut grid: Grid<T> = vec![vec![None; colcount]; n];
    // column -> rows it stays reserved for, counting the current one
    let mut pending: HashMap<usize, usize> = HashMap::new();

    for (r, row) in rows.iter().enumerate() {
        let mut col = 0usize;
        for cell in row {
            while pending.get(&col).is_some_and(|&left| left > 0) {
                col += 1;
            }
            let rowspan = cell.rowspan.resolve(n - r);
            let colspan = cell.colspan.resolve(colcount.saturating_sub(col));
            pending.insert(col, rowspan);

            for dr in 0..rowspan {
                for dc in 0..colspan {
                    let Some(slot) = grid.get_mut(r + dr).and_then(|g| g.get_mut(col + dc)) else {
                        continue;
                    };
                    *slot = Some(cell.value.clone());
                    pending.insert(col + dc, rowspan);
                }
            }
            col += colspan.max(1);
        }

        pending.retain(|_, left| {
            *left -= 1;
            *left > 0
        });
    }
    grid
}
