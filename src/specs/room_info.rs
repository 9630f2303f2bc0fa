// src/specs/room_info.rs
//! Scraper for a room's detail page (`RauminfoPre.do?region=…`).
//!
//! The last `<table>` lists one property per row after the header:
//! `<td><b>Name</b></td><td>:</td><td>Value</td>`.

use std::error::Error;

use crate::config::consts::ROOM_INFO_PATH;
use crate::core::{html, net};
use crate::core::net::encode_form;
use crate::room::Room;

pub fn fetch(room: &Room) -> Result<Vec<(String, String)>, Box<dyn Error>> {
    let path = format!("{}?{}", ROOM_INFO_PATH, encode_form(&room.fields()));
    let doc = net::http_get(&path)?;
    parse_doc(&doc).ok_or_else(|| format!("room info table not found for {room}").into())
}

/// Split out for unit tests. `None` when the page has no table at all.
pub fn parse_doc(doc: &str) -> Option<Vec<(String, String)>> {
    let table = html::last_element(doc, "table")?;

    let mut specs = Vec::new();
    for tr in html::child_blocks(html::inner(table), &["tr"]).into_iter().skip(1) {
        let cells = html::child_blocks(html::inner(tr), &["td", "th"]);
        let (Some(label), Some(value)) = (cells.first(), cells.get(2)) else { continue };
        let Some(bold) = html::nth_element(label, "b", 0) else { continue };
        specs.push((html::text(bold), html::text(value)));
    }
    Some(specs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_bold_labels_and_third_cell() {
        let doc = r#"
            <table><tr><td>header</td></tr></table>
            <table>
              <tr><td colspan=3>CAB G 11</td></tr>
              <tr><td><b>Plätze</b></td><td>:</td><td> 40 </td></tr>
              <tr><td><b>Raumtyp</b></td><td>:</td><td>Seminar&nbsp;/ Kurs</td></tr>
              <tr><td>Fussnote</td><td>:</td><td>ignored</td></tr>
              <tr><td><b>kurz</b></td></tr>
            </table>
        "#;
        let specs = parse_doc(doc).unwrap();
        assert_eq!(
            specs,
            vec![(s!("Plätze"), s!("40")), (s!("Raumtyp"), s!("Seminar / Kurs"))]
        );
    }

    #[test]
    fn no_table() {
        assert_eq!(parse_doc("<p>down for maintenance</p>"), None);
    }
}
