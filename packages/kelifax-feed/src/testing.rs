//! Testing utilities including mock implementations.
//!
//! These let applications exercise the feed controller without a live API
//! or terminal.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use kelifax_client::{ClientError, PageRequest, Resource, ResourcePage};
use tokio::sync::oneshot;

use crate::feed::{FeedView, LoadMoreVisibility};
use crate::source::ResourceSource;

type PageResult = kelifax_client::Result<ResourcePage>;

enum Scripted {
    Ready(PageResult),
    Gated(oneshot::Receiver<PageResult>),
}

/// Scripted [`ResourceSource`].
///
/// Responses are consumed in order. A gated response keeps the request in
/// flight until its [`Gate`] is released, which is how tests hold the
/// controller in the loading state.
#[derive(Clone, Default)]
pub struct MockSource {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<Mutex<Vec<PageRequest>>>,
}

/// Handle releasing one gated response.
pub struct Gate(oneshot::Sender<PageResult>);

impl Gate {
    pub fn release(self, page: ResourcePage) {
        let _ = self.0.send(Ok(page));
    }

    pub fn fail(self, error: ClientError) {
        let _ = self.0.send(Err(error));
    }
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful page.
    pub fn push_page(&self, page: ResourcePage) {
        self.push(Scripted::Ready(Ok(page)));
    }

    /// Queue a failure.
    pub fn push_error(&self, error: ClientError) {
        self.push(Scripted::Ready(Err(error)));
    }

    /// Queue a response that stays pending until the returned gate is used.
    pub fn push_gated(&self) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.push(Scripted::Gated(rx));
        Gate(tx)
    }

    /// Builder form of [`MockSource::push_page`].
    pub fn with_page(self, page: ResourcePage) -> Self {
        self.push_page(page);
        self
    }

    pub fn calls(&self) -> Vec<PageRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn last_call(&self) -> Option<PageRequest> {
        self.calls().pop()
    }

    fn push(&self, response: Scripted) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }
}

#[async_trait]
impl ResourceSource for MockSource {
    async fn fetch_page(&self, request: &PageRequest) -> PageResult {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let next = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(Scripted::Ready(result)) => result,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ClientError::Network("gate dropped".into()))),
            None => Err(ClientError::Network("no scripted response".into())),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Something a [`RecordingView`] was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Render { slugs: Vec<String>, append: bool },
    Featured(Vec<String>),
    Loading(bool),
    Error(String),
    Degraded,
    LoadMore(LoadMoreVisibility),
    Count(usize),
}

/// [`FeedView`] that records every call.
#[derive(Clone, Default)]
pub struct RecordingView {
    events: Arc<Mutex<Vec<ViewEvent>>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn last_count(&self) -> Option<usize> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::Count(n) => Some(n),
            _ => None,
        })
    }

    pub fn last_load_more(&self) -> Option<LoadMoreVisibility> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::LoadMore(v) => Some(v),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, event: ViewEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

fn slugs(resources: &[Resource]) -> Vec<String> {
    resources.iter().map(|r| r.slug.clone()).collect()
}

impl FeedView for RecordingView {
    fn render(&self, resources: &[Resource], append: bool) {
        self.record(ViewEvent::Render {
            slugs: slugs(resources),
            append,
        });
    }

    fn render_featured(&self, featured: &[Resource]) {
        self.record(ViewEvent::Featured(slugs(featured)));
    }

    fn set_loading(&self, loading: bool) {
        self.record(ViewEvent::Loading(loading));
    }

    fn show_error(&self, message: &str) {
        self.record(ViewEvent::Error(message.to_string()));
    }

    fn show_degraded(&self) {
        self.record(ViewEvent::Degraded);
    }

    fn update_load_more(&self, visibility: LoadMoreVisibility) {
        self.record(ViewEvent::LoadMore(visibility));
    }

    fn update_count(&self, count: usize) {
        self.record(ViewEvent::Count(count));
    }
}

/// `count` resources in `category` named `"<prefix> 0"`, `"<prefix> 1"`, ...
pub fn resources(prefix: &str, category: kelifax_client::Category, count: usize) -> Vec<Resource> {
    (0..count)
        .map(|i| Resource::new(format!("{} {}", prefix, i), category))
        .collect()
}
