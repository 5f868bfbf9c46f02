// tenet-core/src/infrastructure/progress.rs

//! Progress reporters. `simple`/`iterative` print one line per percent
//! tick; `progressive`/`verbose` draw an animated bar with spinner,
//! percentage and elapsed time.

use crate::ports::Progress;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::{Duration, Instant};

const MAX_NAME_LENGTH: usize = 21;

/// Truncate long names and pad short ones so bars line up across resources.
fn standardize(input: &str) -> String {
    let mut name = if input.chars().count() > MAX_NAME_LENGTH {
        let truncated: String = input.chars().take(MAX_NAME_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        input.to_string()
    };
    while name.chars().count() < MAX_NAME_LENGTH + 3 {
        name.push(' ');
    }
    name
}

struct LineState {
    counter: u64,
    previous_percentage: u64,
    finished: bool,
}

/// Line-based percent ticks.
pub struct LineProgress {
    name: String,
    total: u64,
    start_time: Instant,
    state: Mutex<LineState>,
}

impl LineProgress {
    pub fn new(name: &str, total: u64) -> Self {
        Self {
            name: name.to_string(),
            total,
            start_time: Instant::now(),
            state: Mutex::new(LineState {
                counter: 0,
                previous_percentage: 0,
                finished: false,
            }),
        }
    }
}

impl Progress for LineProgress {
    fn advance(&self, n: u64) {
        if self.total == 0 {
            return;
        }
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if state.finished {
            return;
        }
        for _ in 0..n {
            if state.counter >= self.total {
                break;
            }
            state.counter += 1;
            let percentage = 100 * state.counter / self.total;
            if percentage > state.previous_percentage {
                state.previous_percentage = percentage;
                let width = self.total.to_string().len();
                println!(
                    "{}: {:>width$}/{} [{:>3}%]",
                    self.name,
                    state.counter,
                    self.total,
                    percentage,
                    width = width,
                );
            }
        }
    }

    fn finish(&self) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !state.finished {
            println!("total elapsed: {:?}", self.start_time.elapsed());
        }
        state.finished = true;
    }
}

/// Animated bar backed by indicatif.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(name: &str, total: u64) -> Self {
        let style = ProgressStyle::with_template(
            "{prefix}{spinner} ╢{bar:64}╟ {percent:>3}% {elapsed}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▌░");
        let bar = ProgressBar::new(total);
        bar.set_style(style);
        bar.set_prefix(standardize(name));
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }
}

impl Progress for BarProgress {
    fn advance(&self, n: u64) {
        self.bar.inc(n);
    }

    fn finish(&self) {
        self.bar.finish();
    }
}
