// src/catalog.rs

use std::error::Error;

use crate::config::consts::{ROOM_INFO_SUFFIX, ROOM_LIST_FILE};
use crate::core::sanitize::label_key;
use crate::room::Room;
use crate::specs;
use crate::store::Store;

/// All rooms, from cache or the website. Sorted by name.
pub fn rooms(store: &Store, refresh: bool) -> Result<Vec<Room>, Box<dyn Error>> {
    let records = store.load_or_fetch(ROOM_LIST_FILE, refresh, || {
        specs::rooms::fetch().map(|rooms| rooms.iter().map(Room::to_record).collect())
    })?;

    let mut rooms: Vec<Room> = records.iter().filter_map(|r| Room::from_record(r)).collect();
    if rooms.len() != records.len() {
        log::warn!("Catalog: {} malformed cached room rows ignored", records.len() - rooms.len());
    }
    rooms.sort();
    Ok(rooms)
}

/// Look a room up by its listed name, ignoring case and spacing.
pub fn find<'a>(rooms: &'a [Room], name: &str) -> Option<&'a Room> {
    let key = label_key(name);
    rooms.iter().find(|r| label_key(&r.name) == key)
}

/// A room's property list, from cache or the website.
pub fn room_info(store: &Store, room: &Room, refresh: bool) -> Result<Vec<(String, String)>, Box<dyn Error>> {
    let name = format!("{}{}", room.cache_key(), ROOM_INFO_SUFFIX);
    let records = store.load_or_fetch(&name, refresh, || {
        specs::room_info::fetch(room).map(|specs| specs.into_iter().map(|(k, v)| vec![k, v]).collect())
    })?;

    Ok(records
        .into_iter()
        .filter_map(|mut r| {
            if r.len() != 2 { return None; }
            let v = r.pop()?;
            let k = r.pop()?;
            Some((k, v))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(name: &str) -> Room {
        Room::from_pairs(name, [("region", "Z"), ("areal", "Z"), ("gebaeude", "X"), ("geschoss", "G"), ("raumNr", "1")])
            .unwrap()
    }

    #[test]
    fn find_ignores_case_and_spacing() {
        let rooms = vec![room("CAB G 11"), room("HG E 1.1")];
        assert_eq!(find(&rooms, "hg  e 1.1").map(|r| r.name.as_str()), Some("HG E 1.1"));
        assert!(find(&rooms, "ETZ E 1").is_none());
    }

    #[test]
    fn cached_room_list_is_read_without_network() {
        let dir = std::env::temp_dir().join(format!("freiraum_catalog_{}", std::process::id()));
        let store = Store::new(&dir);
        store
            .save(ROOM_LIST_FILE, &[room("HG E 1.1").to_record(), room("CAB G 11").to_record(), vec![s!("junk")]])
            .unwrap();

        let rooms = rooms(&store, false).unwrap();
        let names: Vec<_> = rooms.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["CAB G 11", "HG E 1.1"]);
        let _ = std::fs::remove_dir_all(dir);
    }
}
