use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use toxgraph::engine::progress::{Progress, ProgressCallback};
use tracing::{debug, warn};

const TICK: Duration = Duration::from_millis(100);

struct PhaseState {
    bar: ProgressBar,
    phase: Option<&'static str>,
    started: Option<Instant>,
    finished_phases: usize,
}

impl PhaseState {
    fn start_phase(&mut self, name: &'static str) {
        self.phase = Some(name);
        self.started = Some(Instant::now());
        self.bar.reset();
        self.bar.set_length(0);
        self.bar.set_style(spinner_style());
        self.bar.set_prefix(format!("[{}]", self.finished_phases + 1));
        self.bar.set_message(name);
        self.bar.enable_steady_tick(TICK);
    }

    fn start_task(&mut self, total_steps: u64) {
        self.bar.disable_steady_tick();
        self.bar.set_style(bar_style());
        self.bar.set_length(total_steps);
        self.bar.set_position(0);
    }

    /// Leaves the bar showing the phase again; the phase may still have work left.
    fn finish_task(&mut self) {
        self.bar.set_style(spinner_style());
        self.bar.set_length(0);
        self.bar.enable_steady_tick(TICK);
    }

    fn finish_phase(&mut self) {
        let name = self.phase.take().unwrap_or("phase");
        let elapsed = self.started.take().map(|t| t.elapsed()).unwrap_or_default();
        self.finished_phases += 1;
        debug!(phase = name, elapsed_ms = elapsed.as_millis() as u64, "Phase finished.");
        self.bar.disable_steady_tick();
        self.bar
            .finish_with_message(format!("{} done in {:.2}s", name, elapsed.as_secs_f64()));
    }

    fn note(&self, message: String) {
        match self.phase {
            Some(_) => self.bar.println(format!("    {}", message)),
            None => self.bar.set_message(message),
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix:.dim} {spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix:.dim} {msg:<18} {wide_bar:.green/white} {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

/// Draws workflow phases on stderr: a numbered spinner per phase, switching to a
/// step bar while a bounded task runs inside it.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<PhaseState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// A handler that draws nothing, used with `--quiet`.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(spinner_style());
        Self {
            state: Arc::new(Mutex::new(PhaseState {
                bar,
                phase: None,
                started: None,
                finished_phases: 0,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = Arc::clone(&self.state);
        Box::new(move |event: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress display lock was poisoned; dropping event.");
                return;
            };
            match event {
                Progress::PhaseStart { name } => state.start_phase(name),
                Progress::PhaseFinish => state.finish_phase(),
                Progress::TaskStart { total_steps } => state.start_task(total_steps),
                Progress::TaskIncrement => state.bar.inc(1),
                Progress::TaskFinish => state.finish_task(),
                Progress::Message(message) => state.note(message),
            }
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn task_steps_advance_the_bar_within_a_phase() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Graph Construction",
        });
        callback(Progress::TaskStart { total_steps: 12 });
        for _ in 0..5 {
            callback(Progress::TaskIncrement);
        }
        {
            let state = handler.state.lock().unwrap();
            assert_eq!(state.phase, Some("Graph Construction"));
            assert_eq!(state.bar.length(), Some(12));
            assert_eq!(state.bar.position(), 5);
            assert_eq!(state.bar.prefix(), "[1]");
        }

        callback(Progress::TaskFinish);
        assert!(!handler.state.lock().unwrap().bar.is_finished());

        callback(Progress::PhaseFinish);
        let state = handler.state.lock().unwrap();
        assert!(state.bar.is_finished());
        assert!(state.bar.message().starts_with("Graph Construction done in"));
        assert_eq!(state.finished_phases, 1);
    }

    #[test]
    fn phases_are_numbered_in_sequence() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();
        for name in ["Graph Construction", "Dipole Moment"] {
            callback(Progress::PhaseStart { name });
            callback(Progress::PhaseFinish);
        }
        callback(Progress::PhaseStart {
            name: "Graph Metrics",
        });
        let state = handler.state.lock().unwrap();
        assert_eq!(state.bar.prefix(), "[3]");
        assert_eq!(state.bar.message(), "Graph Metrics");
    }

    #[test]
    fn callback_is_usable_from_another_thread() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart {
                name: "Segmentation",
            });
            callback(Progress::Message("3 segments".to_string()));
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let state = handler.state.lock().unwrap();
        assert!(state.phase.is_none());
        assert!(state.bar.message().starts_with("Segmentation done in"));
    }
}
