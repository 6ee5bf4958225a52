//! Recording backend for unit and integration tests.
//!
//! Captures every call in order without touching the network or spawning
//! anything.

use super::{AnalyticsSettings, MinePlan, MiningBackend};
use crate::error::MinerError;

/// A call received by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    StartAnalytics(AnalyticsSettings),
    Mine(MinePlan),
}

/// Backend that records calls and can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    /// Fail `start_analytics` after recording it.
    pub fail_analytics: bool,
    /// Fail `mine` after recording it.
    pub fail_mine: bool,
}

impl RecordingBackend {
    /// Create a backend that accepts every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls received so far.
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// The last mine plan, if `mine` was called.
    pub fn mined(&self) -> Option<&MinePlan> {
        self.calls.iter().rev().find_map(|call| match call {
            BackendCall::Mine(plan) => Some(plan),
            BackendCall::StartAnalytics(_) => None,
        })
    }

    /// Forget recorded calls.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl MiningBackend for RecordingBackend {
    async fn start_analytics(&mut self, analytics: &AnalyticsSettings) -> Result<(), MinerError> {
        self.calls.push(BackendCall::StartAnalytics(analytics.clone()));
        if self.fail_analytics {
            return Err(MinerError::Exited { code: Some(1) });
        }
        Ok(())
    }

    async fn mine(&mut self, plan: &MinePlan) -> Result<(), MinerError> {
        self.calls.push(BackendCall::Mine(plan.clone()));
        if self.fail_mine {
            return Err(MinerError::Exited { code: Some(1) });
        }
        Ok(())
    }
}
