//! Process-wide handle on the current index
//!
//! Readers clone the `Arc` out under a short read lock and query it without
//! holding the lock. A reload builds a complete new index before swapping it
//! in, so readers never observe a partially built one.

use std::sync::{Arc, Mutex, RwLock};

use super::ContentIndex;
use crate::content::ContentLoader;

/// Lifecycle of a [`SharedIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Uninitialized,
    Loading,
    Ready,
}

#[derive(Debug)]
pub struct SharedIndex {
    current: RwLock<Arc<ContentIndex>>,
    state: Mutex<IndexState>,
}

impl SharedIndex {
    /// An empty handle; queries see an empty index until the first load
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(ContentIndex::default())),
            state: Mutex::new(IndexState::Uninitialized),
        }
    }

    /// Wrap an index that is already built
    pub fn from_index(index: ContentIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
            state: Mutex::new(IndexState::Ready),
        }
    }

    pub fn state(&self) -> IndexState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The index as of now
    pub fn current(&self) -> Arc<ContentIndex> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Rebuild from the content roots and swap the result in.
    ///
    /// Always ends `Ready`: documents that fail to load are skipped, never
    /// fatal.
    pub fn reload(&self, loader: &ContentLoader<'_>) -> Arc<ContentIndex> {
        self.set_state(IndexState::Loading);
        let fresh = Arc::new(ContentIndex::build(loader));
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = fresh.clone();
        self.set_state(IndexState::Ready);
        fresh
    }

    fn set_state(&self, state: IndexState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }
}

impl Default for SharedIndex {
    fn default() -> Self {
        Self::new()
    }
}
