//! Shared harness for CLI integration tests: an isolated data directory,
//! scrubbed `ARCADE_*` variables and captured output. [`TimedInput`] feeds
//! lines against a manual clock for rounds that measure elapsed time.
//!
//! Tests that use it must be `#[serial]`, since the environment is
//! process-wide.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, BufRead, Cursor, Read};
use std::sync::Arc;

use arcade_floor::{Clock, ManualClock};
use tempfile::TempDir;

const ARCADE_VARS: [&str; 6] = [
    "ARCADE_CONFIG",
    "ARCADE_STARTING_CREDITS",
    "ARCADE_LOG_CAPACITY",
    "ARCADE_SEED",
    "ARCADE_DATA_DIR",
    "ARCADE_LOG_FORMAT",
];

#[derive(Debug, Clone)]
pub struct CliResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

pub struct CliRunner {
    data_dir: TempDir,
    restores: Vec<(&'static str, Option<String>)>,
}

impl CliRunner {
    pub fn new() -> Self {
        let data_dir = TempDir::new().expect("temp data dir");
        let mut restores = Vec::new();
        for key in ARCADE_VARS {
            restores.push((key, std::env::var(key).ok()));
            unsafe { std::env::remove_var(key) };
        }
        unsafe { std::env::set_var("ARCADE_DATA_DIR", data_dir.path()) };
        Self { data_dir, restores }
    }

    pub fn with_env(self, key: &str, value: &str) -> Self {
        unsafe { std::env::set_var(key, value) };
        self
    }

    pub fn data_dir(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    pub fn run(&self, args: &[&str]) -> CliResult {
        self.run_with_input(args, "")
    }

    pub fn run_with_input(&self, args: &[&str], input: &str) -> CliResult {
        let mut argv = vec!["arcade"];
        argv.extend_from_slice(args);
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        let exit_code = arcade_cli::run_with_input(argv, &mut reader, &mut out, &mut err);
        CliResult {
            exit_code,
            stdout: String::from_utf8_lossy(&out).into_owned(),
            stderr: String::from_utf8_lossy(&err).into_owned(),
        }
    }
}

impl CliRunner {
    /// Runs with a manual clock. Each `(delay_ms, line)` pair advances the
    /// clock by `delay_ms` right before the line is read.
    pub fn run_timed(&self, args: &[&str], lines: &[(u64, &str)]) -> CliResult {
        let mut argv = vec!["arcade"];
        argv.extend_from_slice(args);
        let clock = Arc::new(ManualClock::new());
        let mut reader = TimedInput::new(Arc::clone(&clock), lines);
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        let exit_code =
            arcade_cli::run_with_clock(argv, &mut reader, &mut out, &mut err, clock as Arc<dyn Clock>);
        CliResult {
            exit_code,
            stdout: String::from_utf8_lossy(&out).into_owned(),
            stderr: String::from_utf8_lossy(&err).into_owned(),
        }
    }
}

pub struct TimedInput {
    clock: Arc<ManualClock>,
    lines: VecDeque<(u64, Vec<u8>)>,
    pos: usize,
    started: bool,
}

impl TimedInput {
    pub fn new(clock: Arc<ManualClock>, lines: &[(u64, &str)]) -> Self {
        Self {
            clock,
            lines: lines
                .iter()
                .map(|(delay, line)| (*delay, format!("{line}\n").into_bytes()))
                .collect(),
            pos: 0,
            started: false,
        }
    }
}

impl Read for TimedInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for TimedInput {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        while let Some((_, line)) = self.lines.front() {
            if self.pos < line.len() {
                break;
            }
            self.lines.pop_front();
            self.pos = 0;
            self.started = false;
        }
        let Some((delay, line)) = self.lines.front() else {
            return Ok(&[]);
        };
        if !self.started {
            self.clock.advance(*delay);
            self.started = true;
        }
        Ok(&line[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos += amt;
    }
}

impl Drop for CliRunner {
    fn drop(&mut self) {
        for (key, previous) in self.restores.drain(..) {
            match previous {
                Some(val) => unsafe { std::env::set_var(key, val) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}
