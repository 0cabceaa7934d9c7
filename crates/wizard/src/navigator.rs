//! Turns [`NavigationAction`] values into history mutations.

use std::sync::Arc;

use listflow_core::error::CoreError;
use listflow_core::navigation::NavigationAction;
use listflow_core::routes::Router;

use crate::gateway::HistorySink;

#[derive(Clone)]
pub struct Navigator {
    router: Arc<dyn Router>,
    history: Arc<dyn HistorySink>,
}

/// A history change with its URL already built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryMutation {
    Push(String),
    Replace(String),
}

impl Navigator {
    pub fn new(router: Arc<dyn Router>, history: Arc<dyn HistorySink>) -> Self {
        Self { router, history }
    }

    pub fn router(&self) -> &Arc<dyn Router> {
        &self.router
    }

    /// Build the URL of every history action without touching history.
    ///
    /// `PublishTriggered` is not a history action and is skipped.
    pub fn resolve(&self, actions: &[NavigationAction]) -> Result<Vec<HistoryMutation>, CoreError> {
        actions
            .iter()
            .filter_map(|action| match action {
                NavigationAction::Push(target) => {
                    Some(self.router.resolve(target).map(HistoryMutation::Push))
                }
                NavigationAction::Replace(target) => {
                    Some(self.router.resolve(target).map(HistoryMutation::Replace))
                }
                NavigationAction::PublishTriggered(_) => None,
            })
            .collect()
    }

    /// Apply already resolved mutations in order.
    pub fn commit(&self, mutations: &[HistoryMutation]) {
        for mutation in mutations {
            match mutation {
                HistoryMutation::Replace(url) => {
                    tracing::info!(url = %url, "Replacing history entry");
                    self.history.replace(url);
                }
                HistoryMutation::Push(url) => {
                    tracing::info!(url = %url, "Pushing history entry");
                    self.history.push(url);
                }
            }
        }
    }

    /// Resolve and apply the actions, returning how many history entries
    /// changed. A routing error leaves history unchanged.
    pub fn apply(&self, actions: &[NavigationAction]) -> Result<usize, CoreError> {
        let mutations = self.resolve(actions)?;
        self.commit(&mutations);
        Ok(mutations.len())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
