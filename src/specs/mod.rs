// src/specs/mod.rs
//! # Page scrapers
//!
//! Page-specific scrapers for `rauminfo.ethz.ch`. Each one
//! covers a single page and encodes *where the ground truth lives in the HTML*
//! and *how to extract it robustly*.
//!
//! ## What lives here
//! - **Pure HTML parsing** of remote pages, split into a `parse_doc` that
//!   works on a captured page and a thin `fetch` doing the request.
//! - **Tolerant extraction** using `core::html` (case-insensitive tags,
//!   unquoted attributes, missing end tags, nested tables).
//!
//! ## What does **not** live here
//! - **Caching** (`store`, `catalog`) and **iteration over rooms** (`scan`).
//! - **Span resolution and interval merging**: `table` and `occupancy` own
//!   those; `specs::occupancy` only decodes cells and hands them over.
//!
//! ## Typical call chain
//! ```text
//! cli → scan::find_free_rooms → catalog::rooms  → specs::rooms::fetch
//!                             ↘ specs::occupancy::fetch → table::resolve
//!                                                       → occupancy::extract_intervals
//! ```
//!
//! ## Testing notes
//! Specs are tested offline against inline fixtures shaped like the real pages.
pub mod occupancy;
pub mod room_info;
pub mod rooms;
