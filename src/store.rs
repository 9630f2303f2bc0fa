// src/store.rs
//
// Local record cache under `.cache/`. Best-effort: a missing or unreadable
// file is a cache miss, never an error for the caller.

use std::{fs, io::{self, BufWriter, Write}, path::{Path, PathBuf}};

use crate::config::consts::CACHE_DIR;
use crate::csv::{read_records, write_record};

pub struct Store {
    dir: PathBuf,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(CACHE_DIR)
    }
}

impl Store {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn load(&self, name: &str) -> Option<Vec<Vec<String>>> {
        let text = fs::read_to_string(self.path(name)).ok()?;
        let records = read_records(&text);
        if records.is_empty() { None } else { Some(records) }
    }

    pub fn save(&self, name: &str, records: &[Vec<String>]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(name);
        let mut out = BufWriter::new(fs::File::create(&path)?);
        for rec in records {
            write_record(&mut out, rec)?;
        }
        out.flush()?;
        Ok(path)
    }

    /// Cached records for `name`, or `fetch` them and cache the result.
    /// `refresh` skips the read but still rewrites the cache.
    pub fn load_or_fetch<F, E>(&self, name: &str, refresh: bool, fetch: F) -> Result<Vec<Vec<String>>, E>
    where
        F: FnOnce() -> Result<Vec<Vec<String>>, E>,
    {
        if !refresh {
            if let Some(records) = self.load(name) {
                log::debug!("Store: hit {}", name);
                return Ok(records);
            }
        }
        let records = fetch()?;
        if let Err(e) = self.save(name, &records) {
            log::warn!("Store: could not write {}: {}", name, e);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn tmp_store(tag: &str) -> Store {
        let dir = std::env::temp_dir().join(format!("freiraum_store_{}_{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        Store::new(dir)
    }

    #[test]
    fn load_or_fetch_caches() {
        let store = tmp_store("cache");
        let calls = Cell::new(0);
        let fetch = || -> Result<Vec<Vec<String>>, String> {
            calls.set(calls.get() + 1);
            Ok(vec![vec![s!("CAB G 11"), s!("Z")]])
        };

        let first = store.load_or_fetch("rooms", false, fetch).unwrap();
        let second = store.load_or_fetch("rooms", false, fetch).unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);

        store.load_or_fetch("rooms", true, fetch).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn fetch_errors_pass_through_and_nothing_is_written() {
        let store = tmp_store("err");
        let res: Result<_, String> = store.load_or_fetch("rooms", false, || Err(s!("offline")));
        assert_eq!(res.unwrap_err(), "offline");
        assert!(store.load("rooms").is_none());
    }
}
