//! Background fetch execution.
//!
//! The UI thread never awaits anything. It hands [`FetchJob`]s to the
//! [`Worker`], which runs each one as a task on the tokio runtime and sends
//! a [`FetchMsg`] back over an [`mpsc`] channel that the main loop drains on
//! every tick.
//!
//! Jobs carry the generation number the screen assigned when it asked for
//! the data. The worker passes it through untouched; the screen uses it to
//! drop results it no longer wants.

use std::sync::mpsc;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::debug;

use crate::app::Tab;
use crate::client::FetchError;
use crate::feed::{FeedFetcher, FeedOutcome, FeedRequest};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FetchJob {
    pub tab: Tab,
    pub generation: u64,
    pub request: FeedRequest,
}

/// A finished fetch, sent from a runtime task to the UI thread.
#[derive(Debug)]
pub struct FetchMsg {
    pub tab: Tab,
    pub generation: u64,
    pub result: Result<FeedOutcome, FetchError>,
}

pub struct Worker {
    handle: Handle,
    fetcher: Arc<FeedFetcher>,
    tx: mpsc::Sender<FetchMsg>,
}

/// Create a worker that runs jobs on `handle`.
///
/// Returns the receiver the main loop should drain on every tick.
pub fn spawn(handle: Handle, fetcher: FeedFetcher) -> (Worker, mpsc::Receiver<FetchMsg>) {
    let (tx, rx) = mpsc::channel();
    let worker = Worker {
        handle,
        fetcher: Arc::new(fetcher),
        tx,
    };
    (worker, rx)
}

impl Worker {
    pub fn submit(&self, job: FetchJob) {
        debug!("Dispatching {:?}", job);

        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();

        self.handle.spawn(async move {
            let result = fetcher.fetch(job.request).await;
            // The receiver only goes away when the UI has exited.
            let _ = tx.send(FetchMsg {
                tab: job.tab,
                generation: job.generation,
                result,
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::testing::{Reply, ScriptedApi};
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn results_come_back_with_their_job_tags() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let api = Arc::new(ScriptedApi::with_default(Reply::Json(json!({ "photos": [] }))));
        let (worker, rx) = spawn(rt.handle().clone(), FeedFetcher::new(api, "https://epic.test"));

        worker.submit(FetchJob {
            tab: Tab::Mars,
            generation: 7,
            request: FeedRequest::Mars,
        });

        let msg = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(msg.tab, Tab::Mars);
        assert_eq!(msg.generation, 7);
        assert!(matches!(msg.result, Ok(FeedOutcome::Empty)));
    }

    #[test]
    fn failures_are_delivered_too() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let api = Arc::new(ScriptedApi::with_default(Reply::Fail));
        let (worker, rx) = spawn(rt.handle().clone(), FeedFetcher::new(api, "https://epic.test"));

        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        worker.submit(FetchJob {
            tab: Tab::Apod,
            generation: 1,
            request: FeedRequest::Apod { date },
        });

        let msg = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(msg.tab, Tab::Apod);
        assert!(msg.result.is_err());
    }
}
