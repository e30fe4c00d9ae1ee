use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::StatusSource;
use crate::api::models::{TaskResult, TaskState, TaskStatus};

/// Cadence of the status checks, matching the ingest API's worker latency.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Locally held view of an upload task. Overwritten wholesale on every poll;
/// discarded when the owning view goes away or a new upload starts.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub task_id: String,
    pub state: TaskState,
    pub result: Option<TaskResult>,
}

impl TaskRecord {
    fn pending(task_id: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            state: TaskState::Pending,
            result: None,
        }
    }

    fn absorb(&mut self, status: TaskStatus) {
        self.state = status.state;
        self.result = status.result;
    }
}

/// Events pushed to the owner. `Completed` is sent at most once per poller,
/// after which the background task exits and the channel closes.
#[derive(Debug, Clone)]
pub enum PollEvent {
    Update(TaskRecord),
    Completed(TaskRecord),
}

/// Handle to one running poller. Stopping it (or dropping it, e.g. when a
/// new upload replaces it or the owning screen unmounts) cancels the
/// background task; an in-flight request is not aborted, its result is
/// simply never delivered.
pub struct PollerHandle {
    task_id: String,
    cancel: CancellationToken,
}

impl PollerHandle {
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Start polling `task_id` at [`POLL_INTERVAL`].
pub fn spawn(
    source: Arc<dyn StatusSource>,
    task_id: String,
    events: mpsc::Sender<PollEvent>,
) -> PollerHandle {
    spawn_with_interval(source, task_id, events, POLL_INTERVAL)
}

/// Like [`spawn`] but with an explicit cadence; tests shrink it.
///
/// Polls are serialized: each round trip is awaited before the ticker is
/// consulted again, so a slow network stretches the cadence instead of
/// stacking overlapping requests.
pub fn spawn_with_interval(
    source: Arc<dyn StatusSource>,
    task_id: String,
    events: mpsc::Sender<PollEvent>,
    period: Duration,
) -> PollerHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let id = task_id.clone();

    tokio::spawn(async move {
        let mut record = TaskRecord::pending(&id);
        // The owner sees the task as PENDING before the first poll lands.
        if events.send(PollEvent::Update(record.clone())).await.is_err() {
            return;
        }

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // An interval's first tick completes immediately; consume it so the
        // first status check happens one full period after submission.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!(task_id = %id, "poller cancelled");
                    return;
                }
                _ = ticker.tick() => {}
            }

            match source.task_status(&id).await {
                Ok(status) => {
                    record.absorb(status);
                    if record.state.is_terminal() {
                        info!(task_id = %id, state = record.state.as_str(), "task finished");
                        let _ = events.send(PollEvent::Completed(record)).await;
                        return;
                    }
                    if events.send(PollEvent::Update(record.clone())).await.is_err() {
                        return;
                    }
                }
                Err(e) => {
                    // Transport or parse failure is its own terminal state,
                    // never retried.
                    warn!(task_id = %id, error = %e, "status poll failed");
                    record.state = TaskState::FetchError;
                    record.result = None;
                    let _ = events.send(PollEvent::Completed(record)).await;
                    return;
                }
            }
        }
    });

    PollerHandle { task_id, cancel }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const FAST: Duration = Duration::from_millis(10);

    /// Plays back a fixed sequence of responses, repeating the last one, and
    /// counts how many queries were issued.
    struct ScriptedSource {
        script: Mutex<VecDeque<Result<TaskStatus>>>,
        hits: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<TaskStatus>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                hits: AtomicUsize::new(0),
            })
        }

        fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StatusSource for ScriptedSource {
        async fn task_status(&self, _task_id: &str) -> Result<TaskStatus> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            match script.pop_front() {
                Some(Ok(status)) => {
                    if script.is_empty() {
                        script.push_back(Ok(status.clone()));
                    }
                    Ok(status)
                }
                Some(Err(e)) => Err(e),
                None => Ok(pending()),
            }
        }
    }

    fn pending() -> TaskStatus {
        TaskStatus {
            state: TaskState::Pending,
            result: None,
        }
    }

    fn success() -> TaskStatus {
        TaskStatus {
            state: TaskState::Success,
            result: Some(TaskResult {
                message: "Procesadas 48 filas".to_string(),
                collection: "air_quality".to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn stops_on_success_and_completes_exactly_once() {
        let source = ScriptedSource::new(vec![Ok(pending()), Ok(success())]);
        let (tx, mut rx) = mpsc::channel(16);
        let _handle = spawn_with_interval(source.clone(), "t-1".to_string(), tx, FAST);

        let mut completions = Vec::new();
        let mut updates = 0;
        while let Some(event) = rx.recv().await {
            match event {
                PollEvent::Update(_) => updates += 1,
                PollEvent::Completed(record) => completions.push(record),
            }
        }

        // Initial PENDING push plus one PENDING poll, then the terminal one.
        assert_eq!(updates, 2);
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].state, TaskState::Success);
        assert_eq!(
            completions[0].result.as_ref().unwrap().collection,
            "air_quality"
        );
        assert_eq!(source.hits(), 2);
    }

    #[tokio::test]
    async fn failure_is_terminal() {
        let source = ScriptedSource::new(vec![Ok(TaskStatus {
            state: TaskState::Failure,
            result: None,
        })]);
        let (tx, mut rx) = mpsc::channel(16);
        let _handle = spawn_with_interval(source.clone(), "t-2".to_string(), tx, FAST);

        let mut last = None;
        while let Some(event) = rx.recv().await {
            if let PollEvent::Completed(record) = event {
                last = Some(record);
            }
        }
        assert_eq!(last.unwrap().state, TaskState::Failure);
        assert_eq!(source.hits(), 1);
    }

    #[tokio::test]
    async fn transport_error_becomes_fetch_error_and_is_not_retried() {
        let source = ScriptedSource::new(vec![Err(anyhow!("connection refused"))]);
        let (tx, mut rx) = mpsc::channel(16);
        let _handle = spawn_with_interval(source.clone(), "t-3".to_string(), tx, FAST);

        let mut final_state = None;
        while let Some(event) = rx.recv().await {
            if let PollEvent::Completed(record) = event {
                final_state = Some(record.state);
            }
        }
        assert_eq!(final_state, Some(TaskState::FetchError));
        assert_eq!(source.hits(), 1);
    }

    #[tokio::test]
    async fn stopping_the_handle_halts_queries() {
        let source = ScriptedSource::new(vec![Ok(pending())]);
        let (tx, mut rx) = mpsc::channel(16);
        let handle = spawn_with_interval(source.clone(), "t-4".to_string(), tx, FAST);

        // Let a few polls land first.
        tokio::time::sleep(FAST * 5).await;
        handle.stop();
        while rx.recv().await.is_some() {}
        let hits_at_stop = source.hits();

        tokio::time::sleep(FAST * 10).await;
        assert_eq!(source.hits(), hits_at_stop);
    }

    #[tokio::test]
    async fn dropping_the_handle_halts_queries() {
        let source = ScriptedSource::new(vec![Ok(pending())]);
        let (tx, mut rx) = mpsc::channel(16);
        let handle = spawn_with_interval(source.clone(), "t-5".to_string(), tx, FAST);

        tokio::time::sleep(FAST * 5).await;
        drop(handle);
        while rx.recv().await.is_some() {}
        let hits_at_drop = source.hits();

        tokio::time::sleep(FAST * 10).await;
        assert_eq!(source.hits(), hits_at_drop);
    }

    #[tokio::test]
    async fn replacing_a_poller_stops_the_old_task_id() {
        let old_source = ScriptedSource::new(vec![Ok(pending())]);
        let (old_tx, mut old_rx) = mpsc::channel(16);
        let mut active =
            spawn_with_interval(old_source.clone(), "old".to_string(), old_tx, FAST);
        assert_eq!(active.task_id(), "old");
        tokio::time::sleep(FAST * 3).await;

        // New upload: the previous handle is replaced, which cancels it.
        let new_source = ScriptedSource::new(vec![Ok(pending()), Ok(success())]);
        let (new_tx, mut new_rx) = mpsc::channel(16);
        active = spawn_with_interval(new_source.clone(), "new".to_string(), new_tx, FAST);
        assert_eq!(active.task_id(), "new");

        while old_rx.recv().await.is_some() {}
        let old_hits = old_source.hits();

        let mut completed = None;
        while let Some(event) = new_rx.recv().await {
            if let PollEvent::Completed(record) = event {
                completed = Some(record);
            }
        }
        assert_eq!(completed.unwrap().task_id, "new");
        assert_eq!(old_source.hits(), old_hits);
    }
}
