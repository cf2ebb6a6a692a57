//! File naming policies for the file sink

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time in whole seconds
pub trait Clock {
    /// Seconds since the Unix epoch
    fn now(&self) -> u64;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default()
    }
}

impl<F: Fn() -> u64> Clock for F {
    fn now(&self) -> u64 {
        self()
    }
}

/// Produces the file name for each new bulk
pub trait NamingPolicy {
    /// Name for a bulk that has just started
    fn next_name(&mut self) -> PathBuf;

    /// Clock tick of the most recent name, if the policy is time based
    fn timestamp(&self) -> Option<u64> {
        None
    }
}

/// `bulk<secs>.log`, with `_<k>` appended for further bulks in the same second
#[derive(Debug)]
pub struct TimestampNaming<C: Clock = SystemClock> {
    dir: PathBuf,
    clock: C,
    last: Option<u64>,
    section: u32,
}

impl TimestampNaming<SystemClock> {
    /// Name files in `dir` using the system clock
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(dir, SystemClock)
    }
}

impl<C: Clock> TimestampNaming<C> {
    /// Name files in `dir` using a custom clock
    pub fn with_clock(dir: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            dir: dir.into(),
            clock,
            last: None,
            section: 0,
        }
    }
}

impl<C: Clock> NamingPolicy for TimestampNaming<C> {
    fn next_name(&mut self) -> PathBuf {
        let now = self.clock.now();
        if self.last == Some(now) {
            self.section += 1;
        } else {
            self.last = Some(now);
            self.section = 0;
        }

        let file = match self.section {
            0 => format!("bulk{now}.log"),
            k => format!("bulk{now}_{k}.log"),
        };
        self.dir.join(file)
    }

    fn timestamp(&self) -> Option<u64> {
        self.last
    }
}

/// Every bulk goes to the same file
#[derive(Debug, Clone)]
pub struct FixedNaming {
    path: PathBuf,
}

impl FixedNaming {
    /// Always use `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl NamingPolicy for FixedNaming {
    fn next_name(&mut self) -> PathBuf {
        self.path.clone()
    }
}
