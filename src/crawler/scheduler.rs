//! Crawl frontier and request pacing
//!
//! The frontier is a plain FIFO queue, which makes the traversal
//! breadth-first. Pages are marked visited when they are dequeued, so a URL
//! queued twice before its first visit is still crawled once.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use url::Url;

/// A page waiting to be crawled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedPage {
    pub url: Url,

    /// Distance in hops from the seed, which is depth 0
    pub depth: u32,
}

/// FIFO queue of pages plus the set of pages already crawled
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<QueuedPage>,
    visited: HashSet<String>,
    max_depth: Option<u32>,
}

impl Frontier {
    /// Creates a frontier holding only the seed
    pub fn new(seed: Url, max_depth: Option<u32>) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(QueuedPage { url: seed, depth: 0 });

        Self {
            queue,
            visited: HashSet::new(),
            max_depth,
        }
    }

    /// Pops the next page that has not been crawled yet and marks it visited
    pub fn next_page(&mut self) -> Option<QueuedPage> {
        while let Some(page) = self.queue.pop_front() {
            if self.visited.insert(page.url.as_str().to_string()) {
                return Some(page);
            }
        }
        None
    }

    /// Queues a page unless it was already crawled or lies past the depth limit
    ///
    /// # Returns
    ///
    /// `true` if the page was queued
    pub fn enqueue(&mut self, url: Url, depth: u32) -> bool {
        if self.max_depth.is_some_and(|max| depth > max) {
            return false;
        }

        if self.visited.contains(url.as_str()) {
            return false;
        }

        self.queue.push_back(QueuedPage { url, depth });
        true
    }

    /// Number of pages dequeued so far
    pub fn pages_crawled(&self) -> u64 {
        self.visited.len() as u64
    }

    /// Number of pages waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

/// Fixed pause applied after every link check
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
