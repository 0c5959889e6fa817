//! Progress reporting for optimization runs.
//!
//! The driver calls [`ProgressObserver::on_generation`] once per generation,
//! synchronously, between generations. Observers decide what to do with the
//! snapshot: print it, forward it over a channel, or ask the run to stop.

use crate::driver::IterationRecord;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

/// Whether the driver should keep going after a generation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Flow {
    #[default]
    Continue,
    Stop,
}

/// Snapshot handed to observers after each generation.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// 1-based generation index
    pub generation: usize,
    /// Generations requested for this call to `optimize`
    pub total_generations: usize,
    /// Best closed route found so far
    pub best_route: &'a [usize],
    /// Its length
    pub best_length: f64,
    /// Every record so far, oldest first
    pub history: &'a [IterationRecord],
}

impl Progress<'_> {
    /// The record of the generation that just finished.
    pub fn latest(&self) -> Option<&IterationRecord> {
        self.history.last()
    }
}

pub trait ProgressObserver {
    fn on_generation(&mut self, progress: &Progress<'_>) -> Flow;

    fn name(&self) -> &str {
        "ProgressObserver"
    }
}

impl std::fmt::Debug for dyn ProgressObserver + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProgressObserver({})", self.name())
    }
}

/// Plain callbacks never stop the run.
impl<F> ProgressObserver for F
where
    F: FnMut(&Progress<'_>),
{
    fn on_generation(&mut self, progress: &Progress<'_>) -> Flow {
        self(progress);
        Flow::Continue
    }

    fn name(&self) -> &str {
        "Callback"
    }
}

/// Observer that ignores every event.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct NoOpObserver;

impl ProgressObserver for NoOpObserver {
    fn on_generation(&mut self, _progress: &Progress<'_>) -> Flow {
        Flow::Continue
    }

    fn name(&self) -> &str {
        "NoOpObserver"
    }
}

/// Owned copy of a progress snapshot, for consumers on other threads.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub generation: usize,
    pub best_route: Vec<usize>,
    pub best_length: f64,
    pub generation_time: Duration,
    pub cumulative_time: Duration,
}

impl From<&Progress<'_>> for GenerationSummary {
    fn from(progress: &Progress<'_>) -> Self {
        let (generation_time, cumulative_time) = progress
            .latest()
            .map(|r| (r.generation_time, r.cumulative_time))
            .unwrap_or_default();
        Self {
            generation: progress.generation,
            best_route: progress.best_route.to_vec(),
            best_length: progress.best_length,
            generation_time,
            cumulative_time,
        }
    }
}

/// Sends a [`GenerationSummary`] per generation over an mpsc channel.
///
/// A dropped receiver does not interrupt the run.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: Sender<GenerationSummary>,
}

impl ChannelObserver {
    pub fn new(sender: Sender<GenerationSummary>) -> Self {
        Self { sender }
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_generation(&mut self, progress: &Progress<'_>) -> Flow {
        let _ = self.sender.send(GenerationSummary::from(progress));
        Flow::Continue
    }

    fn name(&self) -> &str {
        "ChannelObserver"
    }
}

/// Prints a progress table to stdout.
///
/// A line is printed every `interval` generations, whenever the best length
/// improves, and for the final generation.
#[derive(Debug, Clone)]
pub struct LogObserver {
    start_time: Instant,
    interval: usize,
    last_best: f64,
    header_printed: bool,
}

impl LogObserver {
    pub fn new(interval: usize) -> Self {
        Self {
            start_time: Instant::now(),
            interval: interval.max(1),
            last_best: f64::INFINITY,
            header_printed: false,
        }
    }

    fn print_header(&self) {
        println!(
            "{:<9} | {:<10} | {:<16} | {:<16}",
            "Elapsed", "Generation", "Generation Time", "Best Length"
        );
        println!("{}", "-".repeat(60));
    }

    fn should_log(&self, progress: &Progress<'_>) -> bool {
        progress.generation % self.interval == 0
            || progress.best_length < self.last_best
            || progress.generation == progress.total_generations
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new(10)
    }
}

impl std::fmt::Display for LogObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogObserver(interval: {})", self.interval)
    }
}

impl ProgressObserver for LogObserver {
    fn on_generation(&mut self, progress: &Progress<'_>) -> Flow {
        if self.should_log(progress) {
            if !self.header_printed {
                self.print_header();
                self.header_printed = true;
            }
            let elapsed = format!("{:.1}s", self.start_time.elapsed().as_secs_f32());
            let generation_time = progress
                .latest()
                .map(|r| format!("{:.2}ms", r.generation_time.as_secs_f64() * 1e3))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<9} | {:<10} | {:<16} | {:<16.4}",
                elapsed, progress.generation, generation_time, progress.best_length
            );
        }
        self.last_best = self.last_best.min(progress.best_length);
        Flow::Continue
    }

    fn name(&self) -> &str {
        "LogObserver"
    }
}
