//! Bounded worker pool shared by both crawl phases
//!
//! The pool is a `JoinSet` with a fixed capacity. Dispatch loops check
//! [`WorkerPool::has_capacity`] before each spawn and otherwise wait for a
//! completion with [`WorkerPool::join_next`], which is also where they get a
//! chance to react to results (e.g. stop issuing new work).

use std::future::Future;
use tokio::task::{JoinError, JoinSet};

/// A set of spawned tasks never larger than its limit
pub struct WorkerPool<T> {
    tasks: JoinSet<T>,
    limit: usize,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Creates a pool running at most `limit` tasks at once
    ///
    /// A limit of zero is treated as one.
    pub fn new(limit: usize) -> Self {
        Self {
            tasks: JoinSet::new(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of spawned tasks that have not been joined yet
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub fn has_capacity(&self) -> bool {
        self.tasks.len() < self.limit
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Spawns a task
    ///
    /// Callers are expected to check [`Self::has_capacity`] first; spawning
    /// into a full pool is a logic error and is reported in debug builds.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        debug_assert!(self.has_capacity(), "spawn into a full worker pool");
        self.tasks.spawn(task);
    }

    /// Waits for the next task to finish, in completion order
    ///
    /// Returns `None` once the pool is empty.
    pub async fn join_next(&mut self) -> Option<Result<T, JoinError>> {
        self.tasks.join_next().await
    }

    /// Waits until a slot is free, handing every finished result to `on_done`
    pub async fn wait_for_slot<C>(&mut self, mut on_done: C)
    where
        C: FnMut(Result<T, JoinError>),
    {
        while !self.has_capacity() {
            match self.join_next().await {
                Some(result) => on_done(result),
                None => break,
            }
        }
    }
}
