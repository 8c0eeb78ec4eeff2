use serde::{Deserialize, Serialize};

/// Axis-aligned rectangular obstacle, anchored at its bottom-left corner.
/// Dimensions are meters; validation guarantees the rectangle lies inside
/// the wall before a planner ever sees it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Obstacle {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Centroid of one included grid cell, rounded to 4 decimal digits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub wall_width: f64,
    pub wall_height: f64,
    pub step: f64,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub id: i64,
    pub waypoints: Vec<Waypoint>,
    pub path_length: usize,
    /// Geometric estimate: (wall area - obstacle area) / wall area, 2 decimals.
    pub coverage_percentage: f64,
    /// Grid-realized figure: emitted cells / (nx * ny), 2 decimals. May
    /// diverge from the geometric estimate at coarse resolutions.
    pub grid_coverage_percentage: f64,
    pub processing_time_ms: i64,
}

/// Trajectory as handed to the store; the adapter assigns id and created_at.
#[derive(Debug, Clone)]
pub struct NewTrajectory {
    pub wall_width: f64,
    pub wall_height: f64,
    pub step: f64,
    pub waypoints: Vec<Waypoint>,
    pub obstacles: Vec<Obstacle>,
    pub coverage_percentage: f64,
    pub processing_time_ms: i64,
}

/// Full persisted trajectory. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    pub id: i64,
    pub wall_width: f64,
    pub wall_height: f64,
    pub step: f64,
    pub waypoints: Vec<Waypoint>,
    pub obstacles: Vec<Obstacle>,
    pub path_length: i64,
    pub coverage_percentage: f64,
    pub processing_time_ms: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectorySummary {
    pub id: i64,
    pub wall_width: f64,
    pub wall_height: f64,
    pub step: f64,
    pub path_length: i64,
    pub coverage_percentage: f64,
    pub processing_time_ms: i64,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct TrajectoryFilter {
    pub wall_width: Option<f64>,
    pub wall_height: Option<f64>,
    pub min_coverage: Option<f64>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for TrajectoryFilter {
    fn default() -> Self {
        Self {
            wall_width: None,
            wall_height: None,
            min_coverage: None,
            limit: 20,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryStats {
    pub total_trajectories: i64,
    pub avg_wall_width: Option<f64>,
    pub avg_wall_height: Option<f64>,
    pub avg_path_length: Option<f64>,
    pub avg_coverage: Option<f64>,
    pub avg_processing_time: Option<f64>,
    pub min_processing_time: Option<i64>,
    pub max_processing_time: Option<i64>,
    pub performance_distribution: PerformanceDistribution,
}

/// Bucketed processing times: fast < 100ms, medium < 500ms, slow otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceDistribution {
    pub fast: i64,
    pub medium: i64,
    pub slow: i64,
}
