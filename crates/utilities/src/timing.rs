use std::cell::RefCell;
use std::io;
use std::io::stderr;
use std::io::Write;
use std::rc::Rc;
use std::time::Instant;

use log::debug;

/// Collects the measured durations of named phases.
#[derive(Default)]
pub struct Timing {
    results: Rc<RefCell<Vec<(String, f64)>>>,
}

/// A running measurement, the duration is registered with the [Timing] it was
/// started from when [Timer::finish] is called.
pub struct Timer {
    name: String,
    start: Instant,
    results: Rc<RefCell<Vec<(String, f64)>>>,
    registered: bool,
}

impl Timing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts measuring the phase with the given name.
    pub fn start(&mut self, name: &str) -> Timer {
        Timer {
            name: name.to_string(),
            start: Instant::now(),
            results: self.results.clone(),
            registered: false,
        }
    }

    /// Prints the measured durations to stderr.
    pub fn print(&self) -> io::Result<()> {
        self.write(&mut stderr().lock())
    }

    /// Writes one line for every measured phase, in the order they finished.
    fn write(&self, writer: &mut impl Write) -> io::Result<()> {
        for (name, time) in self.results.borrow().iter() {
            writeln!(writer, "Time {}: {:.3}s", name, time)?;
        }

        Ok(())
    }
}

impl Timer {
    /// Stops the measurement and registers its duration.
    pub fn finish(&mut self) {
        let time = self.start.elapsed().as_secs_f64();
        debug!("Time {}: {:.3}s", self.name, time);

        self.results.borrow_mut().push((self.name.clone(), time));
        self.registered = true;
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if !self.registered {
            debug!("Timer {} was dropped before finishing", self.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_timing() {
        let mut timing = Timing::new();

        let mut read = timing.start("read");
        read.finish();

        let mut write = timing.start("write");
        write.finish();

        let _unfinished = timing.start("unfinished");

        let mut buffer: Vec<u8> = Vec::new();
        timing.write(&mut buffer).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2, "Unfinished phases are not printed");
        assert!(lines[0].starts_with("Time read: "));
        assert!(lines[1].starts_with("Time write: "));
        assert!(lines.iter().all(|line| line.ends_with('s')));
    }
}
