use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Periodic redraw of a live view, running on the tokio runtime while the
/// main thread waits for keys.
///
/// The first failed tick (an error or a panic) stops the timer and is kept
/// for the input loop to pick up through [`AutoRefresh::fault`].
pub struct AutoRefresh {
    cancel: watch::Sender<bool>,
    fault: watch::Receiver<Option<String>>,
    task: JoinHandle<()>,
}

impl AutoRefresh {
    /// Call `tick` every `period`, starting one period from now. Each tick
    /// runs on the blocking pool and the next one waits for it to finish.
    pub fn start<F>(handle: &Handle, period: Duration, tick: F) -> Self
    where
        F: Fn() -> io::Result<()> + Send + Sync + 'static,
    {
        let (cancel, mut cancelled) = watch::channel(false);
        let (report, fault) = watch::channel(None);
        let tick = Arc::new(tick);

        let task = handle.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; the view was just drawn.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let tick = Arc::clone(&tick);
                        let failure = match tokio::task::spawn_blocking(move || tick()).await {
                            Ok(Ok(())) => continue,
                            Ok(Err(e)) => e.to_string(),
                            Err(e) if e.is_panic() => "refresh panicked".to_string(),
                            Err(e) => e.to_string(),
                        };
                        tracing::warn!(error = %failure, "refresh tick failed");
                        let _ = report.send(Some(failure));
                        break;
                    }
                    _ = cancelled.changed() => break,
                }
            }
        });

        Self {
            cancel,
            fault,
            task,
        }
    }

    /// Why the refresh stopped on its own, if it did.
    pub fn fault(&self) -> Option<String> {
        self.fault.borrow().clone()
    }

    /// Cancel and wait for the task. A tick already drawing completes first.
    pub async fn stop(self) {
        let _ = self.cancel.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "refresh task ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    use super::*;

    async fn wait_for_fault(refresh: &AutoRefresh) -> Option<String> {
        for _ in 0..100 {
            if let Some(fault) = refresh.fault() {
                return Some(fault);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        None
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn ticks_until_stopped() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let refresh = AutoRefresh::start(&Handle::current(), Duration::from_millis(20), move || {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(refresh.fault().is_none());
        refresh.stop().await;
        let after_stop = count.load(Ordering::SeqCst);
        assert!(after_stop >= 2, "only {} ticks", after_stop);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn stop_joins_promptly() {
        let refresh = AutoRefresh::start(&Handle::current(), Duration::from_secs(3600), || Ok(()));
        tokio::time::timeout(Duration::from_secs(1), refresh.stop())
            .await
            .expect("refresh task did not stop");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn no_tick_before_first_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let refresh = AutoRefresh::start(&Handle::current(), Duration::from_secs(3600), move || {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        refresh.stop().await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn slow_ticks_never_overlap() {
        let spans: Arc<Mutex<Vec<(Instant, Instant)>>> = Arc::new(Mutex::new(Vec::new()));
        let record = Arc::clone(&spans);
        let refresh = AutoRefresh::start(&Handle::current(), Duration::from_millis(10), move || {
            let start = Instant::now();
            std::thread::sleep(Duration::from_millis(50));
            record.lock().unwrap().push((start, Instant::now()));
            Ok(())
        });

        tokio::time::sleep(Duration::from_millis(300)).await;
        refresh.stop().await;

        let spans = spans.lock().unwrap();
        assert!(spans.len() >= 2, "only {} ticks", spans.len());
        // Bounded by the 50ms draw, not the 10ms period.
        assert!(spans.len() <= 7, "{} ticks in 300ms", spans.len());
        for pair in spans.windows(2) {
            assert!(pair[1].0 >= pair[0].1, "tick started before the previous one ended");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn failed_tick_is_reported_and_stops() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let refresh = AutoRefresh::start(&Handle::current(), Duration::from_millis(20), move || {
            seen.fetch_add(1, Ordering::SeqCst);
            Err(io::Error::other("terminal gone"))
        });

        let fault = wait_for_fault(&refresh).await;
        assert_eq!(fault.as_deref(), Some("terminal gone"));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        refresh.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn panicking_tick_is_reported() {
        let refresh = AutoRefresh::start(&Handle::current(), Duration::from_millis(20), || {
            panic!("collector blew up")
        });

        let fault = wait_for_fault(&refresh).await;
        assert_eq!(fault.as_deref(), Some("refresh panicked"));
        tokio::time::timeout(Duration::from_secs(1), refresh.stop())
            .await
            .expect("refresh task did not stop");
    }
}
