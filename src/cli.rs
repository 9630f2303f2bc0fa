// src/cli.rs
use std::error::Error;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{Report, Result, eyre};

use crate::{
    catalog,
    config::options::{BuildingSelector, ScanOptions},
    logger,
    progress::StderrProgress,
    room::Room,
    scan, specs,
    store::Store,
};

#[derive(Parser, Debug)]
#[command(name = "freiraum", version)]
#[command(about = "Finds free rooms in ETH Zurich buildings", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Buildings to scan (e.g. CAB HG); omit to scan all
    buildings: Vec<String>,

    /// Check this instant instead of now: "YYYY-MM-DD HH:MM" or "HH:MM" (today)
    #[arg(long, value_parser = parse_at)]
    at: Option<NaiveDateTime>,

    /// Ignore the cached room list and room info
    #[arg(long, global = true)]
    refresh: bool,

    /// Log to .cache/debug.log instead of stderr
    #[arg(long, global = true)]
    log_file: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List known rooms, optionally only in some buildings
    Rooms {
        buildings: Vec<String>,
    },
    /// Print every timeslot of a room's week
    Week {
        /// Room as listed, e.g. CAB G 11
        #[arg(required = true, num_args = 1..)]
        room: Vec<String>,
        /// Any day of the wanted week (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print a room's properties (seats, type, equipment)
    Info {
        #[arg(required = true, num_args = 1..)]
        room: Vec<String>,
    },
}

pub fn run() -> Result<()> {
    let Cli { command, buildings, at, refresh, log_file, verbose } = Cli::parse();

    let level = logger::level_for(verbose);
    if log_file {
        let path = logger::init_file(level).map_err(|e| eyre!("cannot log to file: {e}"))?;
        eprintln!("Logging to {}", path.display());
    } else {
        logger::init_stderr(level);
    }

    let store = Store::default();
    match command {
        None => free_rooms(&store, &buildings, at, refresh),
        Some(Command::Rooms { buildings }) => list_rooms(&store, &buildings, refresh),
        Some(Command::Week { room, date }) => {
            let room = lookup(&store, &room.join(" "), refresh)?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            print_week(&room, date)
        }
        Some(Command::Info { room }) => {
            let room = lookup(&store, &room.join(" "), refresh)?;
            for (k, v) in catalog::room_info(&store, &room, refresh).map_err(report)? {
                println!("{k}: {v}");
            }
            Ok(())
        }
    }
}

fn free_rooms(store: &Store, buildings: &[String], at: Option<NaiveDateTime>, refresh: bool) -> Result<()> {
    let opts = ScanOptions {
        buildings: BuildingSelector::from_names(buildings),
        at: at.unwrap_or_else(|| Local::now().naive_local()),
        refresh,
    };
    let mut progress = StderrProgress::default();
    let free = scan::find_free_rooms(&opts, store, Some(&mut progress)).map_err(report)?;

    if free.is_empty() {
        println!("No free rooms found.");
    }
    for f in free {
        println!("{} is free until {}", f.room, f.until.format("%H:%M"));
    }
    Ok(())
}

fn list_rooms(store: &Store, buildings: &[String], refresh: bool) -> Result<()> {
    let sel = BuildingSelector::from_names(buildings);
    for room in catalog::rooms(store, refresh).map_err(report)? {
        if sel.matches(&room.gebaeude) {
            println!("{room}");
        }
    }
    Ok(())
}

fn print_week(room: &Room, date: NaiveDate) -> Result<()> {
    let week = specs::occupancy::fetch(room, date).map_err(report)?;
    println!("{} (week of {})", room, week.week_start.format("%d.%m.%Y"));
    for day in &week.days {
        println!();
        for slot in day {
            println!("  {slot}");
        }
    }
    Ok(())
}

fn lookup(store: &Store, name: &str, refresh: bool) -> Result<Room> {
    let rooms = catalog::rooms(store, refresh).map_err(report)?;
    catalog::find(&rooms, name)
        .cloned()
        .ok_or_else(|| eyre!("unknown room {name:?} (see `freiraum rooms`)"))
}

fn parse_at(s: &str) -> Result<NaiveDateTime, String> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return Ok(dt);
    }
    NaiveTime::parse_from_str(s, "%H:%M")
        .map(|t| Local::now().date_naive().and_time(t))
        .map_err(|_| format!("expected \"YYYY-MM-DD HH:MM\" or \"HH:MM\", got {s:?}"))
}

fn report(e: Box<dyn Error>) -> Report {
    eyre!("{e}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_at_formats() {
        assert_eq!(
            parse_at("2023-09-04 07:20"),
            Ok(NaiveDate::from_ymd_opt(2023, 9, 4).unwrap().and_hms_opt(7, 20, 0).unwrap())
        );
        assert_eq!(parse_at("13:45").unwrap().time(), NaiveTime::from_hms_opt(13, 45, 0).unwrap());
        assert!(parse_at("tomorrow").is_err());
    }

    #[test]
    fn buildings_and_subcommands_parse() {
        let cli = Cli::try_parse_from(["freiraum", "CAB", "HG", "--at", "2023-09-04 08:00"]).unwrap();
        assert_eq!(cli.buildings, vec!["CAB", "HG"]);
        assert!(cli.command.is_none());
        assert!(cli.at.is_some());

        let cli = Cli::try_parse_from(["freiraum", "week", "CAB", "G", "11", "--date", "2023-09-06"]).unwrap();
        match cli.command {
            Some(Command::Week { room, date }) => {
                assert_eq!(room.join(" "), "CAB G 11");
                assert_eq!(date, NaiveDate::from_ymd_opt(2023, 9, 6));
            }
            other => panic!("unexpected {other:?}"),
        }

        let cli = Cli::try_parse_from(["freiraum", "-vv", "rooms", "HG", "--refresh"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.refresh);
    }
}
