// src/progress.rs
/// Progress reporting for long-running scans.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of rooms.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One room was fetched and parsed.
    fn item_done(&mut self, _label: &str) {}

    /// One room could not be fetched or parsed; the scan goes on.
    fn item_failed(&mut self, _label: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Counter line on stderr, failures on their own lines.
#[derive(Default)]
pub struct StderrProgress {
    total: usize,
    done: usize,
}

impl Progress for StderrProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn item_done(&mut self, label: &str) {
        self.done += 1;
        eprint!("\r[{}/{}] {:<24}", self.done, self.total, label);
    }

    fn item_failed(&mut self, label: &str, reason: &str) {
        self.done += 1;
        eprintln!("\r[{}/{}] {}: {}", self.done, self.total, label, reason);
    }

    fn finish(&mut self) {
        if self.total > 0 {
            eprintln!();
        }
    }
}
