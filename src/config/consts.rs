// src/config/consts.rs

// Net config
pub const HOST: &str = "www.rauminfo.ethz.ch";
pub const ROOM_LIST_PATH: &str = "/Rauminfo/Index.do?hidden=&gebaeude=-&showAll=alle+R%C3%A4ume+anzeigen&geschoss=-&leitzahl=-";
pub const OCCUPANCY_PATH: &str = "/Rauminfo/Rauminfo.do";
pub const ROOM_INFO_PATH: &str = "/RauminfoPre.do";
pub const USER_AGENT: &str = "freiraum/0.2";
pub const IO_TIMEOUT_SECS: u64 = 15;

// Local cache
pub const CACHE_DIR: &str = ".cache";
pub const ROOM_LIST_FILE: &str = "room_list";
pub const ROOM_INFO_SUFFIX: &str = "_info";
pub const LOG_FILE: &str = "debug.log";

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite
pub const JITTER_MS: u64 = 50; // extra 0..50 ms
