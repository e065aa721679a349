//! Lightweight named timers for setup / solve instrumentation.

use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct InnerTimer {
    start: Option<Instant>,
    elapsed: Duration,
}

/// A flat collection of named accumulating timers.
#[derive(Debug, Default)]
pub struct Timers {
    timers: HashMap<&'static str, InnerTimer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.timers.clear();
    }

    pub fn start(&mut self, key: &'static str) {
        let t = self.timers.entry(key).or_default();
        t.start = Some(Instant::now());
    }

    pub fn stop(&mut self, key: &'static str) {
        let t = self.timers.get_mut(key).expect("stop called before start");
        if let Some(instant) = t.start.take() {
            t.elapsed += instant.elapsed();
        }
    }

    /// accumulated time on the given timer in seconds
    pub fn elapsed(&self, key: &'static str) -> f64 {
        match self.timers.get(key) {
            Some(t) => t.elapsed.as_secs_f64(),
            None => 0.0,
        }
    }
}

/// times the enclosed block on the named timer
#[macro_export]
macro_rules! timeit {
    ($timers:ident => $key:literal; $blk:block) => {
        $timers.start($key);
        $blk
        $timers.stop($key);
    };
}

#[test]
fn test_timers() {
    let mut timers = Timers::new();

    timeit! {timers => "outer"; {
        std::thread::sleep(std::time::Duration::from_millis(2));
    }}

    assert!(timers.elapsed("outer") > 0.0);
    assert_eq!(timers.elapsed("missing"), 0.0);

    timers.reset();
    assert_eq!(timers.elapsed("outer"), 0.0);
}
