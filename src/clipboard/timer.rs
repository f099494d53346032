use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use super::backend::ClipboardBackend;
use crate::notices::Notice;

/// Fixed delay between a copy and the automatic clipboard clear
pub const CLEAR_DELAY: Duration = Duration::from_secs(30);

enum TimerCommand {
    Arm(Duration),
    Cancel,
    Shutdown,
}

/// One-shot cancelable clipboard clear timer
///
/// A single worker thread owns a single deadline slot: `arm` replaces
/// whatever is pending, and only the newest copy's clear ever fires.
/// Firing is best-effort; a failed clear is logged and swallowed.
/// Dropping the timer shuts the worker down without joining it, and a
/// pending clear never blocks process exit.
pub struct ClearTimer {
    tx: Sender<TimerCommand>,
}

impl ClearTimer {
    /// Spawn the timer worker
    /// The worker owns its own clipboard backend and clears through it;
    /// a successful clear is announced on the notice channel
    pub fn spawn(backend: Box<dyn ClipboardBackend>, notices: Sender<Notice>) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || run_worker(rx, backend, notices));
        ClearTimer { tx }
    }

    /// Arm the clear after `delay`, superseding any pending clear
    pub fn arm(&self, delay: Duration) {
        let _ = self.tx.send(TimerCommand::Arm(delay));
    }

    /// Cancel any pending clear; idempotent and non-blocking
    pub fn cancel(&self) {
        let _ = self.tx.send(TimerCommand::Cancel);
    }
}

impl Drop for ClearTimer {
    fn drop(&mut self) {
        // Fire-and-forget: the worker exits on its own time
        let _ = self.tx.send(TimerCommand::Shutdown);
    }
}

fn run_worker(
    rx: Receiver<TimerCommand>,
    mut backend: Box<dyn ClipboardBackend>,
    notices: Sender<Notice>,
) {
    log::debug!("Clear timer worker started ({})", backend.name());
    let mut deadline: Option<Instant> = None;

    loop {
        // Idle waits block; with a deadline pending, sleep only until it
        let command = match deadline {
            Some(due) => {
                let remaining = due.saturating_duration_since(Instant::now());
                match rx.recv_timeout(remaining) {
                    Ok(command) => Some(command),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            },
        };

        match command {
            Some(TimerCommand::Arm(delay)) => {
                if deadline.is_some() {
                    log::debug!("Superseding pending clipboard clear");
                }
                deadline = Some(Instant::now() + delay);
            }
            Some(TimerCommand::Cancel) => {
                deadline = None;
            }
            Some(TimerCommand::Shutdown) => break,
            None => {
                // Deadline reached
                deadline = None;
                match backend.clear() {
                    Ok(()) => {
                        log::info!("Clipboard cleared");
                        let _ = notices.send(Notice::ClipboardCleared);
                    }
                    Err(e) => log::warn!("Clipboard clear failed: {:#}", e),
                }
            }
        }
    }

    log::debug!("Clear timer worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryBackend;

    fn timer_fixture() -> (ClearTimer, MemoryBackend, Receiver<Notice>) {
        let backend = MemoryBackend::new();
        let (notice_tx, notice_rx) = mpsc::channel();
        let timer = ClearTimer::spawn(Box::new(backend.clone()), notice_tx);
        (timer, backend, notice_rx)
    }

    #[test]
    fn test_fires_once_after_delay() {
        let (timer, backend, notices) = timer_fixture();

        timer.arm(Duration::from_millis(30));
        thread::sleep(Duration::from_millis(150));

        assert_eq!(backend.writes(), vec![""]);
        assert_eq!(notices.try_iter().count(), 1);
    }

    #[test]
    fn test_rearm_supersedes_pending_clear() {
        let (timer, backend, notices) = timer_fixture();

        timer.arm(Duration::from_millis(80));
        thread::sleep(Duration::from_millis(20));
        timer.arm(Duration::from_millis(120));

        // Past the first deadline: the superseded clear must not have fired
        thread::sleep(Duration::from_millis(80));
        assert!(backend.writes().is_empty());

        // Past the second deadline: exactly one clear, timed from the re-arm
        thread::sleep(Duration::from_millis(150));
        assert_eq!(backend.writes(), vec![""]);
        assert_eq!(notices.try_iter().count(), 1);
    }

    #[test]
    fn test_cancel_stops_pending_clear() {
        let (timer, backend, notices) = timer_fixture();

        timer.arm(Duration::from_millis(30));
        timer.cancel();
        thread::sleep(Duration::from_millis(120));

        assert!(backend.writes().is_empty());
        assert_eq!(notices.try_iter().count(), 0);

        // Cancel with nothing pending is fine
        timer.cancel();
        timer.cancel();
    }

    #[test]
    fn test_rearm_after_fire_runs_again() {
        let (timer, backend, _notices) = timer_fixture();

        timer.arm(Duration::from_millis(20));
        thread::sleep(Duration::from_millis(100));
        timer.arm(Duration::from_millis(20));
        thread::sleep(Duration::from_millis(100));

        assert_eq!(backend.writes(), vec!["", ""]);
    }

    #[test]
    fn test_drop_does_not_block_or_fire() {
        let (timer, backend, _notices) = timer_fixture();
        timer.arm(Duration::from_secs(600));

        let started = Instant::now();
        drop(timer);
        assert!(started.elapsed() < Duration::from_secs(1));

        thread::sleep(Duration::from_millis(50));
        assert!(backend.writes().is_empty());
    }
}
