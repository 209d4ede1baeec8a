use std::io::{self, Write};
use std::time::Instant;

pub struct ConsoleProgress {
    enabled: bool,
    t0: Instant,
}

impl ConsoleProgress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            t0: Instant::now(),
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.line("", msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.line("warning: ", msg.as_ref());
    }

    fn line(&self, prefix: &str, msg: &str) {
        if !self.enabled {
            return;
        }
        let ts = fmt_elapsed(self.t0.elapsed().as_secs_f64());
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "[{ts}] {prefix}{msg}");
    }
}

fn fmt_elapsed(seconds: f64) -> String {
    let seconds = seconds.max(0.0) as u64;
    let m = seconds / 60;
    let s = seconds % 60;
    format!("{m:02}:{s:02}")
}
