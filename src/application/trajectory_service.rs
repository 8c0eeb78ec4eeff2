use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use uuid::Uuid;

use crate::application::result_cache::{PlanKey, PlanOutcome, ResultCache};
use crate::common::{ApplicationError, ApplicationResult};
use crate::config::CacheConfig;
use crate::domains::coverage::{
    planner, validate_request, GenerateRequest, GenerateResponse, Grid, NewTrajectory, Obstacle,
    TrajectoryFilter, TrajectoryRecord, TrajectoryStats, TrajectoryStore, TrajectorySummary,
};

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Geometric coverage estimate: obstacle-free wall area over total wall
/// area, as a percentage with 2 decimals. Independent of grid resolution.
pub fn geometric_coverage(wall_width: f64, wall_height: f64, obstacles: &[Obstacle]) -> f64 {
    let wall_area = wall_width * wall_height;
    let obstacle_area: f64 = obstacles.iter().map(|o| o.area()).sum();
    round2((wall_area - obstacle_area) / wall_area * 100.0)
}

fn plan_outcome(request: &GenerateRequest) -> PlanOutcome {
    let grid = Grid::derive(request.wall_width, request.wall_height, request.step);
    let waypoints = planner::plan(
        request.wall_width,
        request.wall_height,
        &request.obstacles,
        request.step,
    );
    PlanOutcome {
        waypoints,
        nx: grid.nx,
        ny: grid.ny,
    }
}

/// Application service orchestrating trajectory generation: validation,
/// cached planning, persistence and retrieval. Owns the result cache;
/// the store is injected behind its port.
pub struct TrajectoryService {
    store: Arc<dyn TrajectoryStore>,
    cache: ResultCache,
}

impl TrajectoryService {
    pub fn new(store: Arc<dyn TrajectoryStore>, cache_config: &CacheConfig) -> Self {
        Self {
            store,
            cache: ResultCache::new(cache_config),
        }
    }

    pub async fn generate(&self, request: GenerateRequest) -> ApplicationResult<GenerateResponse> {
        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            "generating trajectory for wall {}x{} with step {}",
            request.wall_width, request.wall_height, request.step
        );
        validate_request(&request)?;

        let key = PlanKey::canonical(
            request.wall_width,
            request.wall_height,
            request.step,
            &request.obstacles,
        );
        let content_hash = key.content_hash();

        match self.cache.lookup_response(&content_hash) {
            Ok(Some(response)) => {
                info!(%request_id, "returning cached trajectory for key {}", &content_hash[..8]);
                return Ok(response);
            }
            Ok(None) => {}
            Err(e) => warn!(%request_id, "response cache lookup failed: {}", e),
        }

        let started = Instant::now();
        let outcome = match self.cache.get_or_compute(&key, || plan_outcome(&request)) {
            Ok(outcome) => outcome,
            Err(e) => {
                // Cache trouble never blocks planning; fall through to a
                // direct computation.
                warn!(%request_id, "plan memo unavailable: {}; computing directly", e);
                Arc::new(plan_outcome(&request))
            }
        };
        let processing_time_ms = started.elapsed().as_millis() as i64;

        let path_length = outcome.waypoints.len();
        let coverage_percentage =
            geometric_coverage(request.wall_width, request.wall_height, &request.obstacles);
        let cell_count = (outcome.nx * outcome.ny) as f64;
        let grid_coverage_percentage = round2(path_length as f64 / cell_count * 100.0);

        info!(
            %request_id,
            "planned {} waypoints over a {}x{} grid in {}ms",
            path_length, outcome.nx, outcome.ny, processing_time_ms
        );

        let id = self
            .store
            .store(NewTrajectory {
                wall_width: request.wall_width,
                wall_height: request.wall_height,
                step: request.step,
                waypoints: outcome.waypoints.clone(),
                obstacles: request.obstacles.clone(),
                coverage_percentage,
                processing_time_ms,
            })
            .await
            .map_err(|e| ApplicationError::Store(e.to_string()))?;

        let response = GenerateResponse {
            id,
            waypoints: outcome.waypoints.clone(),
            path_length,
            coverage_percentage,
            grid_coverage_percentage,
            processing_time_ms,
        };
        if let Err(e) = self.cache.insert_response(content_hash, response.clone()) {
            warn!(%request_id, "response cache insert failed: {}", e);
        }
        Ok(response)
    }

    pub async fn fetch(&self, id: i64) -> ApplicationResult<Option<TrajectoryRecord>> {
        self.store
            .fetch(id)
            .await
            .map_err(|e| ApplicationError::Store(e.to_string()))
    }

    pub async fn list(&self, filter: TrajectoryFilter) -> ApplicationResult<Vec<TrajectorySummary>> {
        self.store
            .list(filter)
            .await
            .map_err(|e| ApplicationError::Store(e.to_string()))
    }

    pub async fn stats(&self) -> ApplicationResult<TrajectoryStats> {
        self.store
            .stats()
            .await
            .map_err(|e| ApplicationError::Store(e.to_string()))
    }

    pub async fn search_by_performance(
        &self,
        min_processing_time: Option<i64>,
        max_processing_time: Option<i64>,
        limit: i64,
    ) -> ApplicationResult<Vec<TrajectorySummary>> {
        self.store
            .search_by_performance(min_processing_time, max_processing_time, limit)
            .await
            .map_err(|e| ApplicationError::Store(e.to_string()))
    }
}
