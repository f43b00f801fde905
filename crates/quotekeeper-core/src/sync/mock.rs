//! Mock remote source for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{RemoteError, RemoteSource};
use crate::Quote;

/// A configurable mock response for [`MockRemote`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Simulate a successful fetch of the given snapshot.
    Quotes(Vec<Quote>),
    /// Simulate a transport or decode failure.
    Error(String),
}

/// A hand-rolled mock implementing [`RemoteSource`] for tests.
///
/// Supports a fixed fetch response or a sequence of responses (one per
/// call, repeating the last when exhausted), an optionally failing push
/// path, and fetch/push call counting.
pub struct MockRemote {
    /// If non-empty, each fetch pops the next response.
    responses: Mutex<Vec<MockResponse>>,
    /// Fallback when the sequence is exhausted (or single-response mode).
    fallback: MockResponse,
    push_fails: bool,
    fetch_count: AtomicUsize,
    push_count: AtomicUsize,
}

impl MockRemote {
    /// Create a mock that always returns `response` on fetch.
    pub fn new(response: MockResponse) -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            fallback: response,
            push_fails: false,
            fetch_count: AtomicUsize::new(0),
            push_count: AtomicUsize::new(0),
        }
    }

    /// Create a mock that returns responses in order, repeating the last one.
    pub fn with_sequence(mut responses: Vec<MockResponse>) -> Self {
        assert!(
            !responses.is_empty(),
            "sequence must have at least one response"
        );
        // Reverse so we can pop() from the front cheaply.
        responses.reverse();
        let fallback = responses.first().cloned().unwrap();
        Self {
            responses: Mutex::new(responses),
            fallback,
            push_fails: false,
            fetch_count: AtomicUsize::new(0),
            push_count: AtomicUsize::new(0),
        }
    }

    /// Make every push fail.
    pub fn failing_push(mut self) -> Self {
        self.push_fails = true;
        self
    }

    /// How many times `fetch()` has been called.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// How many times `push()` has been called.
    pub fn push_count(&self) -> usize {
        self.push_count.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> MockResponse {
        let mut seq = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        seq.pop().unwrap_or_else(|| self.fallback.clone())
    }
}

impl RemoteSource for MockRemote {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch<'a>(
        &'a self,
        _client: &'a reqwest::Client,
        _timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Quote>, RemoteError>> + Send + 'a>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        let response = self.next_response();

        Box::pin(async move {
            match response {
                MockResponse::Quotes(quotes) => Ok(quotes),
                MockResponse::Error(msg) => Err(RemoteError::Response(msg)),
            }
        })
    }

    fn push<'a>(
        &'a self,
        _client: &'a reqwest::Client,
        _timeout: Duration,
        _quote: &'a Quote,
    ) -> Pin<Box<dyn Future<Output = Result<(), RemoteError>> + Send + 'a>> {
        self.push_count.fetch_add(1, Ordering::SeqCst);
        let fails = self.push_fails;

        Box::pin(async move {
            if fails {
                Err(RemoteError::Response("push failed".into()))
            } else {
                Ok(())
            }
        })
    }
}
