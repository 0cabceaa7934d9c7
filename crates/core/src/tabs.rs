//! The configured, ordered sequence of wizard steps.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::CoreError;
use crate::step::Step;

/// Where a submitted step sits in the configured sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabPosition {
    /// The step is configured and another step follows it.
    Intermediate { next: Step },
    /// The step is the final configured step.
    Last,
    /// The step is not part of the sequence (removed or disabled tab
    /// referenced by a stale URL).
    NotConfigured,
}

/// Ordered, non-empty, duplicate-free list of the steps enabled for this
/// marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MarketplaceTabs(Vec<Step>);

impl MarketplaceTabs {
    pub fn new(steps: Vec<Step>) -> Result<Self, CoreError> {
        if steps.is_empty() {
            return Err(CoreError::Config(
                "Marketplace tabs must contain at least one step".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(*step) {
                return Err(CoreError::Config(format!(
                    "Marketplace tabs contain '{step}' more than once"
                )));
            }
        }
        Ok(Self(steps))
    }

    /// Parse a comma-separated list of step tags, e.g. `details,pricing,photos`.
    pub fn parse_list(raw: &str) -> Result<Self, CoreError> {
        let steps = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<Step>().map_err(|e| CoreError::Config(e.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn first(&self) -> Step {
        self.0[0]
    }

    pub fn last(&self) -> Step {
        self.0[self.0.len() - 1]
    }

    pub fn contains(&self, step: Step) -> bool {
        self.0.contains(&step)
    }

    pub fn index_of(&self, step: Step) -> Option<usize> {
        self.0.iter().position(|s| *s == step)
    }

    pub fn is_last(&self, step: Step) -> bool {
        self.last() == step
    }

    pub fn position(&self, step: Step) -> TabPosition {
        match self.index_of(step) {
            None => TabPosition::NotConfigured,
            Some(i) if i + 1 == self.0.len() => TabPosition::Last,
            Some(i) => TabPosition::Intermediate { next: self.0[i + 1] },
        }
    }

    /// The step after `step`, clamped to the last configured step.
    ///
    /// Never advances past the end of the sequence. A step that is not
    /// configured also resolves to the last step.
    pub fn next_after(&self, step: Step) -> Step {
        match self.position(step) {
            TabPosition::Intermediate { next } => next,
            TabPosition::Last | TabPosition::NotConfigured => self.last(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
