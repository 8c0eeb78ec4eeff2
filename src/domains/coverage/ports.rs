use crate::common::DomainResult;
use async_trait::async_trait;

use super::types::{
    NewTrajectory, TrajectoryFilter, TrajectoryRecord, TrajectoryStats, TrajectorySummary,
};

/// Port for persisting and querying generated trajectories. Implementations
/// (adapters) provide SQLite or in-memory backends; the domain treats them
/// as black boxes and never depends on their schema.
#[async_trait]
pub trait TrajectoryStore: Send + Sync {
    /// Persist a trajectory and return its assigned id.
    async fn store(&self, new: NewTrajectory) -> DomainResult<i64>;
    /// Load a full trajectory record, or None if the id is unknown.
    async fn fetch(&self, id: i64) -> DomainResult<Option<TrajectoryRecord>>;
    /// List trajectory summaries, newest first, honoring the filter.
    async fn list(&self, filter: TrajectoryFilter) -> DomainResult<Vec<TrajectorySummary>>;
    /// Aggregate metrics over all stored trajectories.
    async fn stats(&self) -> DomainResult<TrajectoryStats>;
    /// Summaries whose processing time falls in the given bounds,
    /// fastest first.
    async fn search_by_performance(
        &self,
        min_processing_time: Option<i64>,
        max_processing_time: Option<i64>,
        limit: i64,
    ) -> DomainResult<Vec<TrajectorySummary>>;
}
