// src/specs/rooms.rs
//! Scraper for the room list (`Rauminfo/Index.do?…showAll…`).
//!
//! The list is the sixth `<table>` of the page. Every row after the header
//! starts with a link whose text is the room name and whose query string
//! carries the room's form fields:
//! `<a href="RauminfoPre.do?region=Z&areal=Z&gebaeude=CAB&geschoss=G&raumNr=11">CAB G 11</a>`

use std::error::Error;

use url::Url;

use crate::config::consts::{HOST, ROOM_LIST_PATH};
use crate::core::{html, net};
use crate::room::Room;

const ROOM_TABLE_INDEX: usize = 5;

pub fn fetch() -> Result<Vec<Room>, Box<dyn Error>> {
    let doc = net::http_get(ROOM_LIST_PATH)?;
    let rooms = parse_doc(&doc)?;
    log::info!("Rooms: {} listed", rooms.len());
    Ok(rooms)
}

/// Split out for unit tests.
pub fn parse_doc(doc: &str) -> Result<Vec<Room>, Box<dyn Error>> {
    let table = html::nth_element(doc, "table", ROOM_TABLE_INDEX).ok_or("room list table not found")?;
    let base = Url::parse(&format!("http://{}/Rauminfo/", HOST))?;

    let mut rooms = Vec::new();
    for tr in html::child_blocks(html::inner(table), &["tr"]).into_iter().skip(1) {
        let Some(td) = html::child_blocks(html::inner(tr), &["td", "th"]).into_iter().next() else {
            continue;
        };
        let Some(a) = html::nth_element(td, "a", 0) else { continue };
        let Some(href) = html::attr(html::opener(a), "href") else { continue };

        let name = html::text(a);
        let url = base.join(&href.replace("&amp;", "&"))?;
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        match Room::from_pairs(&name, pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))) {
            Some(room) => rooms.push(room),
            None => log::warn!("Rooms: skipping {name:?}, incomplete link {href:?}"),
        }
    }
    Ok(rooms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(rows: &str) -> String {
        let mut doc = s!("<html><body>");
        for _ in 0..ROOM_TABLE_INDEX {
            doc.push_str("<table><tr><td>nav</td></tr></table>");
        }
        doc.push_str("<table><tr><th>Raum</th><th>Plätze</th></tr>");
        doc.push_str(rows);
        doc.push_str("</table></body></html>");
        doc
    }

    #[test]
    fn parses_room_links() {
        let doc = page(
            r#"<tr><td><a href="RauminfoPre.do?region=Z&amp;areal=Z&amp;gebaeude=CAB&amp;geschoss=G&amp;raumNr=11">CAB G 11</a></td><td>40</td></tr>
               <tr><td><a href=RauminfoPre.do?region=Z&areal=Z&gebaeude=HG&geschoss=E&raumNr=1.1>HG E 1.1</a><td>300
               <tr><td>no link</td></tr>"#,
        );
        let rooms = parse_doc(&doc).unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].name, "CAB G 11");
        assert_eq!(rooms[0].gebaeude, "CAB");
        assert_eq!(rooms[0].raum_nr, "11");
        assert_eq!(rooms[1].name, "HG E 1.1");
        assert_eq!(rooms[1].geschoss, "E");
        assert_eq!(rooms[1].raum_nr, "1.1");
    }

    #[test]
    fn incomplete_links_are_skipped() {
        let doc = page(r#"<tr><td><a href="RauminfoPre.do?region=Z&gebaeude=CAB">CAB</a></td></tr>"#);
        assert!(parse_doc(&doc).unwrap().is_empty());
    }

    #[test]
    fn missing_table_is_an_error() {
        assert!(parse_doc("<table></table>").is_err());
    }
}
