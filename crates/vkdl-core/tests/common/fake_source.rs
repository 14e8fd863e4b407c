//! Scripted in-memory media source for scheduler tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use vkdl_core::job::JobOptions;
use vkdl_core::retry::SourceError;
use vkdl_core::source::{FormatInfo, MediaItem, MediaSource, Resolved};

pub const EXTRACTOR: &str = "Fake";

/// Result of one scripted transfer call.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Ok,
    Timeout,
    NotFound,
}

type Hook = Box<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
pub struct FakeSource {
    resolves: HashMap<String, Result<Resolved, String>>,
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    resolve_calls: Mutex<Vec<String>>,
    transfer_calls: Mutex<Vec<String>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
    on_transfer: Option<Hook>,
    panics: Vec<String>,
}

pub fn item(url: &str, id: &str, title: &str) -> MediaItem {
    MediaItem {
        id: Some(id.to_string()),
        extractor: Some(EXTRACTOR.to_string()),
        title: Some(title.to_string()),
        url: url.to_string(),
        duration_secs: Some(60.0),
    }
}

/// Archive key the scheduler records for an item id.
pub fn key(id: &str) -> String {
    format!("{} {}", EXTRACTOR.to_lowercase(), id)
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// `url` resolves to one item with `id`.
    pub fn single(mut self, url: &str, id: &str) -> Self {
        let title = format!("Video {id}");
        self.resolves.insert(
            url.to_string(),
            Ok(Resolved {
                is_collection: false,
                title: Some(title.clone()),
                items: vec![item(url, id, &title)],
            }),
        );
        self
    }

    /// `url` resolves to a collection; item URLs are `{url}/{id}`.
    pub fn collection(mut self, url: &str, title: &str, ids: &[&str]) -> Self {
        let items = ids
            .iter()
            .map(|id| item(&format!("{url}/{id}"), id, &format!("Part {id}")))
            .collect();
        self.resolves.insert(
            url.to_string(),
            Ok(Resolved {
                is_collection: true,
                title: Some(title.to_string()),
                items,
            }),
        );
        self
    }

    /// Resolving `url` panics inside the worker.
    pub fn panicking(mut self, url: &str) -> Self {
        self.panics.push(url.to_string());
        self
    }

    pub fn unresolvable(mut self, url: &str, message: &str) -> Self {
        self.resolves.insert(url.to_string(), Err(message.to_string()));
        self
    }

    /// Scripted results for successive transfers of `item_url`; `Ok` once exhausted.
    pub fn script(self, item_url: &str, steps: &[Step]) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(item_url.to_string(), steps.iter().copied().collect());
        self
    }

    pub fn delay(mut self, d: Duration) -> Self {
        self.default_delay = d;
        self
    }

    pub fn delay_for(mut self, item_url: &str, d: Duration) -> Self {
        self.delays.insert(item_url.to_string(), d);
        self
    }

    /// Called after every transfer with the item URL.
    pub fn on_transfer(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_transfer = Some(Box::new(hook));
        self
    }

    pub fn resolve_calls(&self) -> Vec<String> {
        self.resolve_calls.lock().unwrap().clone()
    }

    pub fn transfer_calls(&self) -> Vec<String> {
        self.transfer_calls.lock().unwrap().clone()
    }

    pub fn transfers_of(&self, prefix: &str) -> usize {
        self.transfer_calls()
            .iter()
            .filter(|u| u.starts_with(prefix))
            .count()
    }

    /// Transfers in progress right now.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

impl MediaSource for FakeSource {
    fn resolve(&self, url: &str, _options: &JobOptions) -> Result<Resolved, SourceError> {
        self.resolve_calls.lock().unwrap().push(url.to_string());
        if self.panics.iter().any(|p| p == url) {
            panic!("resolver crashed on {url}");
        }
        match self.resolves.get(url) {
            Some(Ok(r)) => Ok(r.clone()),
            Some(Err(msg)) => Err(SourceError::NotFound(msg.clone())),
            None => Err(SourceError::InvalidUrl(format!("no extractor for {url}"))),
        }
    }

    fn transfer(&self, item: &MediaItem, _options: &JobOptions) -> Result<(), SourceError> {
        let call = {
            let mut calls = self.transfer_calls.lock().unwrap();
            calls.push(item.url.clone());
            calls.iter().filter(|u| **u == item.url).count()
        };
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.get(&item.url).copied().unwrap_or(self.default_delay);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        let step = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&item.url)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Step::Ok);

        self.active.fetch_sub(1, Ordering::SeqCst);
        if let Some(hook) = &self.on_transfer {
            hook(&item.url);
        }
        match step {
            Step::Ok => Ok(()),
            Step::Timeout => Err(SourceError::Timeout(format!("read timed out (call {call})"))),
            Step::NotFound => Err(SourceError::NotFound(format!("{} was removed", item.url))),
        }
    }

    fn list_formats(&self, _url: &str, _options: &JobOptions) -> Result<Vec<FormatInfo>, SourceError> {
        Ok(Vec::new())
    }
}
