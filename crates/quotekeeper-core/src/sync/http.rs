//! HTTP-backed remote quote source.
//!
//! The remote is a JSONPlaceholder-style post list: GET `<base>/posts`
//! returns an array of items whose title-like field becomes the quote text,
//! tagged with the fixed `"Server"` category. POST `<base>/posts` receives a
//! JSON-encoded quote for the optional push path.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{RemoteError, RemoteSource};
use crate::Quote;

/// Category tag applied to every quote mapped from the remote source.
pub const REMOTE_CATEGORY: &str = "Server";

/// Default remote endpoint.
pub const DEFAULT_REMOTE_URL: &str = "https://jsonplaceholder.typicode.com";

/// One item of the remote list. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct RemotePost {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Serialize)]
struct PushBody<'a> {
    text: &'a str,
    category: &'a str,
}

pub struct HttpRemoteSource {
    base_url: String,
}

impl HttpRemoteSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    fn posts_url(&self) -> String {
        format!("{}/posts", self.base_url)
    }
}

impl RemoteSource for HttpRemoteSource {
    fn name(&self) -> &str {
        "server"
    }

    fn fetch<'a>(
        &'a self,
        client: &'a reqwest::Client,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Quote>, RemoteError>> + Send + 'a>> {
        Box::pin(async move {
            let resp = client
                .get(self.posts_url())
                .timeout(timeout)
                .send()
                .await?;

            if !resp.status().is_success() {
                return Err(RemoteError::Response(format!("HTTP {}", resp.status())));
            }

            let posts: Vec<RemotePost> = resp.json().await?;
            Ok(posts
                .into_iter()
                .filter(|p| !p.title.trim().is_empty())
                .map(|p| Quote::new(p.title.trim(), REMOTE_CATEGORY))
                .collect())
        })
    }

    fn push<'a>(
        &'a self,
        client: &'a reqwest::Client,
        timeout: Duration,
        quote: &'a Quote,
    ) -> Pin<Box<dyn Future<Output = Result<(), RemoteError>> + Send + 'a>> {
        Box::pin(async move {
            let body = PushBody {
                text: &quote.text,
                category: &quote.category,
            };
            let resp = client
                .post(self.posts_url())
                .timeout(timeout)
                .json(&body)
                .send()
                .await?;

            if !resp.status().is_success() {
                return Err(RemoteError::Response(format!("HTTP {}", resp.status())));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped() {
        let source = HttpRemoteSource::new("https://example.com//");
        assert_eq!(source.posts_url(), "https://example.com/posts");
    }
}
