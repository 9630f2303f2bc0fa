// src/scan.rs
use std::{
    error::Error, thread, time::Duration,
    sync::{ mpsc, Arc, atomic::{ AtomicUsize, Ordering }}
};

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    catalog,
    config::consts::{ JITTER_MS, REQUEST_PAUSE_MS, WORKERS },
    config::options::ScanOptions,
    occupancy::WeekOccupancy,
    progress::Progress,
    room::Room,
    specs,
    store::Store,
};

/// A room that is free at the scanned instant, and until when.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FreeRoom {
    pub room: Room,
    pub until: NaiveDateTime,
}

/// List rooms (cached), keep the selected buildings, and check each one's
/// occupancy at `opts.at`. Rooms that fail to load are reported to
/// `progress` and skipped.
pub fn find_free_rooms(
    opts: &ScanOptions,
    store: &Store,
    mut progress: Option<&mut dyn Progress>,
) -> Result<Vec<FreeRoom>, Box<dyn Error>> {
    if let Some(p) = progress.as_deref_mut() {
        p.log("Loading room list…");
    }
    let rooms: Vec<Room> = catalog::rooms(store, opts.refresh)?
        .into_iter()
        .filter(|r| opts.buildings.matches(&r.gebaeude))
        .collect();
    log::info!("Scan: {} rooms selected", rooms.len());

    let fetch = |room: &Room, date: NaiveDate| {
        specs::occupancy::fetch(room, date).map_err(|e| e.to_string())
    };
    Ok(scan_rooms(rooms, opts.at, REQUEST_PAUSE_MS, progress, fetch))
}

/// Worker pool over `rooms`. `fetch` gets each room's week; `pause_ms` is the
/// politeness pause after every request (plus a little jitter).
pub fn scan_rooms<F>(
    rooms: Vec<Room>,
    at: NaiveDateTime,
    pause_ms: u64,
    mut progress: Option<&mut dyn Progress>,
    fetch: F,
) -> Vec<FreeRoom>
where
    F: Fn(&Room, NaiveDate) -> Result<WeekOccupancy, String> + Send + Sync + 'static,
{
    if let Some(p) = progress.as_deref_mut() {
        p.begin(rooms.len());
    }

    type FetchOk = (usize, Option<NaiveDateTime>);
    type FetchErr = (usize, String);

    let rooms = Arc::new(rooms);
    let fetch = Arc::new(fetch);
    let counter = Arc::new(AtomicUsize::new(0));
    let (res_tx, res_rx) = mpsc::channel::<Result<FetchOk, FetchErr>>();

    let workers = WORKERS.min(rooms.len()).max(1);
    for _ in 0..workers {
        let rooms = Arc::clone(&rooms);
        let fetch = Arc::clone(&fetch);
        let idx = Arc::clone(&counter);
        let tx = res_tx.clone();

        thread::spawn(move || {
            loop {
                let i = idx.fetch_add(1, Ordering::Relaxed);
                if i >= rooms.len() {
                    break;
                }
                let result = match fetch(&rooms[i], at.date()) {
                    Ok(week) => Ok((i, week.free_at(at).map(|slot| slot.end))),
                    Err(e) => Err((i, e)),
                };
                if tx.send(result).is_err() {
                    break;
                }
                if pause_ms > 0 {
                    let jitter = (i as u64) % JITTER_MS;
                    thread::sleep(Duration::from_millis(pause_ms + jitter)); // be polite
                }
            }
        });
    }
    drop(res_tx); // main thread is sole receiver now

    let mut free = Vec::new();
    for _ in 0..rooms.len() {
        match res_rx.recv() {
            Ok(Ok((i, until))) => {
                let room = &rooms[i];
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(&room.name);
                }
                if let Some(until) = until {
                    free.push(FreeRoom { room: room.clone(), until });
                }
            }
            Ok(Err((i, msg))) => {
                let room = &rooms[i];
                log::error!("Room {}: {}", room, msg);
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(&room.name, &msg);
                }
            }
            Err(_) => break, // workers ended early; bail gracefully
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    free.sort_by(|a, b| a.room.cmp(&b.room));
    free
}
