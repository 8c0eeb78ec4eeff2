use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::common::{DomainError, DomainResult};
use crate::domains::coverage::{
    NewTrajectory, PerformanceDistribution, TrajectoryFilter, TrajectoryRecord, TrajectoryStats,
    TrajectoryStore, TrajectorySummary,
};

/// In-memory trajectory store for tests and environments without a
/// writable database. Semantics mirror the SQLite adapter.
#[derive(Default)]
pub struct InMemoryTrajectoryStore {
    records: Mutex<Vec<TrajectoryRecord>>,
}

impl InMemoryTrajectoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_err<T>(e: std::sync::PoisonError<T>) -> DomainError {
    DomainError::InfrastructureError(format!("memory store lock poisoned: {}", e))
}

fn summarize(record: &TrajectoryRecord) -> TrajectorySummary {
    TrajectorySummary {
        id: record.id,
        wall_width: record.wall_width,
        wall_height: record.wall_height,
        step: record.step,
        path_length: record.path_length,
        coverage_percentage: record.coverage_percentage,
        processing_time_ms: record.processing_time_ms,
        created_at: record.created_at.clone(),
    }
}

#[async_trait]
impl TrajectoryStore for InMemoryTrajectoryStore {
    async fn store(&self, new: NewTrajectory) -> DomainResult<i64> {
        let mut records = self.records.lock().map_err(lock_err)?;
        let id = records.len() as i64 + 1;
        let path_length = new.waypoints.len() as i64;
        records.push(TrajectoryRecord {
            id,
            wall_width: new.wall_width,
            wall_height: new.wall_height,
            step: new.step,
            waypoints: new.waypoints,
            obstacles: new.obstacles,
            path_length,
            coverage_percentage: new.coverage_percentage,
            processing_time_ms: new.processing_time_ms,
            created_at: Utc::now().to_rfc3339(),
        });
        Ok(id)
    }

    async fn fetch(&self, id: i64) -> DomainResult<Option<TrajectoryRecord>> {
        let records = self.records.lock().map_err(lock_err)?;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self, filter: TrajectoryFilter) -> DomainResult<Vec<TrajectorySummary>> {
        let records = self.records.lock().map_err(lock_err)?;
        Ok(records
            .iter()
            .rev() // newest first, insertion order stands in for created_at
            .filter(|r| filter.wall_width.map_or(true, |w| r.wall_width == w))
            .filter(|r| filter.wall_height.map_or(true, |h| r.wall_height == h))
            .filter(|r| filter.min_coverage.map_or(true, |c| r.coverage_percentage >= c))
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .map(summarize)
            .collect())
    }

    async fn stats(&self) -> DomainResult<TrajectoryStats> {
        let records = self.records.lock().map_err(lock_err)?;
        let total = records.len() as i64;
        if total == 0 {
            return Ok(TrajectoryStats {
                total_trajectories: 0,
                avg_wall_width: None,
                avg_wall_height: None,
                avg_path_length: None,
                avg_coverage: None,
                avg_processing_time: None,
                min_processing_time: None,
                max_processing_time: None,
                performance_distribution: PerformanceDistribution::default(),
            });
        }

        let n = total as f64;
        let mut distribution = PerformanceDistribution::default();
        for record in records.iter() {
            match record.processing_time_ms {
                t if t < 100 => distribution.fast += 1,
                t if t < 500 => distribution.medium += 1,
                _ => distribution.slow += 1,
            }
        }

        Ok(TrajectoryStats {
            total_trajectories: total,
            avg_wall_width: Some(records.iter().map(|r| r.wall_width).sum::<f64>() / n),
            avg_wall_height: Some(records.iter().map(|r| r.wall_height).sum::<f64>() / n),
            avg_path_length: Some(records.iter().map(|r| r.path_length as f64).sum::<f64>() / n),
            avg_coverage: Some(records.iter().map(|r| r.coverage_percentage).sum::<f64>() / n),
            avg_processing_time: Some(
                records.iter().map(|r| r.processing_time_ms as f64).sum::<f64>() / n,
            ),
            min_processing_time: records.iter().map(|r| r.processing_time_ms).min(),
            max_processing_time: records.iter().map(|r| r.processing_time_ms).max(),
            performance_distribution: distribution,
        })
    }

    async fn search_by_performance(
        &self,
        min_processing_time: Option<i64>,
        max_processing_time: Option<i64>,
        limit: i64,
    ) -> DomainResult<Vec<TrajectorySummary>> {
        let records = self.records.lock().map_err(lock_err)?;
        let mut matching: Vec<&TrajectoryRecord> = records
            .iter()
            .filter(|r| min_processing_time.map_or(true, |min| r.processing_time_ms >= min))
            .filter(|r| max_processing_time.map_or(true, |max| r.processing_time_ms <= max))
            .collect();
        matching.sort_by_key(|r| r.processing_time_ms);
        Ok(matching
            .into_iter()
            .take(limit.max(0) as usize)
            .map(summarize)
            .collect())
    }
}
