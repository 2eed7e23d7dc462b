//! Feed fetching and photo selection.
//!
//! Each feed lives in its own sub-module and turns one or more JSON
//! responses into a [`FeedOutcome`]:
//!
//! * [`apod`] — one request for a given date, mapped verbatim.
//! * [`earth`] — a week of EPIC listings pooled, one photo drawn at random.
//! * [`mars`] — random sols sampled until one has a usable photo.
//!
//! All HTTP goes through [`JsonGet`], and all randomness through a caller
//! supplied [`Rng`], so every policy here can be tested deterministically.
//! [`FeedFetcher`] ties the three together behind a single
//! [`FeedRequest`] so the worker doesn't need to know which feed it runs.

pub mod apod;
pub mod earth;
pub mod mars;
mod photo_record;

pub use photo_record::{FeedOutcome, PhotoRecord, SourceMetadata};

use std::sync::Arc;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::client::{FetchError, JsonGet};

/// Draw one element uniformly at random, or `None` from an empty slice.
pub fn pick_uniform<'a, T, R>(items: &'a [T], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    if items.is_empty() {
        return None;
    }
    items.get(rng.gen_range(0..items.len()))
}

/// What a screen asks the fetcher for.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FeedRequest {
    Apod { date: NaiveDate },
    Earth { today: NaiveDate },
    Mars,
}

pub struct FeedFetcher {
    api: Arc<dyn JsonGet>,
    archive_url: String,
}

impl FeedFetcher {
    pub fn new(api: Arc<dyn JsonGet>, archive_url: impl Into<String>) -> Self {
        Self {
            api,
            archive_url: archive_url.into(),
        }
    }

    /// Run one logical fetch. Only APOD ever returns `Err`.
    pub async fn fetch(&self, request: FeedRequest) -> Result<FeedOutcome, FetchError> {
        let mut rng = StdRng::from_entropy();
        self.fetch_with(request, &mut rng).await
    }

    pub async fn fetch_with<R>(&self, request: FeedRequest, rng: &mut R) -> Result<FeedOutcome, FetchError>
    where
        R: Rng + Send + ?Sized,
    {
        let api = self.api.as_ref();
        match request {
            FeedRequest::Apod { date } => apod::fetch(api, date).await.map(FeedOutcome::Photo),
            FeedRequest::Earth { today } => earth::fetch(api, &self.archive_url, today, rng).await,
            FeedRequest::Mars => mars::fetch(api, rng).await,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! A [`JsonGet`] fake that answers from a script and records every call.

    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use crate::client::{FetchError, JsonGet};

    #[derive(Debug, Clone)]
    pub enum Reply {
        Json(Value),
        /// Answer with HTTP 503.
        Fail,
    }

    #[derive(Debug, Clone)]
    pub struct Call {
        pub path: String,
        pub params: Vec<(String, String)>,
    }

    impl Call {
        pub fn param(&self, key: &str) -> Option<&str> {
            self.params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        }
    }

    /// Replies are chosen by exact path first, then from the queue in
    /// order, then the default.
    pub struct ScriptedApi {
        routes: HashMap<String, Reply>,
        queue: Mutex<VecDeque<Reply>>,
        default: Reply,
        calls: Mutex<Vec<Call>>,
    }

    impl ScriptedApi {
        pub fn with_default(default: Reply) -> Self {
            Self {
                routes: HashMap::new(),
                queue: Mutex::new(VecDeque::new()),
                default,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn route(mut self, path: &str, reply: Reply) -> Self {
            self.routes.insert(path.to_string(), reply);
            self
        }

        pub fn queue(self, replies: impl IntoIterator<Item = Reply>) -> Self {
            self.queue.lock().unwrap().extend(replies);
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl JsonGet for ScriptedApi {
        async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value, FetchError> {
            self.calls.lock().unwrap().push(Call {
                path: path.to_string(),
                params: params.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            });

            let reply = match self.routes.get(path) {
                Some(reply) => reply.clone(),
                None => self
                    .queue
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| self.default.clone()),
            };

            match reply {
                Reply::Json(body) => Ok(body),
                Reply::Fail => Err(FetchError::Status {
                    path: path.to_string(),
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                }),
            }
        }
    }
}
