use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use once_cell::sync::OnceCell;
use ordered_float::OrderedFloat;

use crate::common::{ApplicationError, ApplicationResult};
use crate::config::CacheConfig;
use crate::domains::coverage::{GenerateResponse, Obstacle, Waypoint};

type ObstacleKey = (
    OrderedFloat<f64>,
    OrderedFloat<f64>,
    OrderedFloat<f64>,
    OrderedFloat<f64>,
);

/// Canonical identity of a planning request. Obstacles are treated as a set:
/// they are sorted by (x, y, width, height) so callers listing the same
/// obstacles in different orders land on the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanKey {
    wall_width: OrderedFloat<f64>,
    wall_height: OrderedFloat<f64>,
    step: OrderedFloat<f64>,
    obstacles: Vec<ObstacleKey>,
}

impl PlanKey {
    pub fn canonical(wall_width: f64, wall_height: f64, step: f64, obstacles: &[Obstacle]) -> Self {
        let mut obs: Vec<ObstacleKey> = obstacles
            .iter()
            .map(|o| {
                (
                    OrderedFloat(o.x),
                    OrderedFloat(o.y),
                    OrderedFloat(o.width),
                    OrderedFloat(o.height),
                )
            })
            .collect();
        obs.sort();
        Self {
            wall_width: OrderedFloat(wall_width),
            wall_height: OrderedFloat(wall_height),
            step: OrderedFloat(step),
            obstacles: obs,
        }
    }

    /// Stable content hash of the canonical tuple, used to key the
    /// response layer.
    pub fn content_hash(&self) -> String {
        let mut payload = format!("{}_{}_{}", self.wall_width, self.wall_height, self.step);
        for (x, y, w, h) in &self.obstacles {
            payload.push_str(&format!("_{},{},{},{}", x, y, w, h));
        }
        format!("{:x}", md5::compute(payload))
    }
}

/// Planner output memoized by the inner cache layer; derived metrics are
/// computed by the service from these figures.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    pub waypoints: Vec<Waypoint>,
    pub nx: usize,
    pub ny: usize,
}

struct PlanMemo {
    entries: HashMap<PlanKey, Arc<OnceCell<Arc<PlanOutcome>>>>,
    order: VecDeque<PlanKey>,
}

struct TimedResponse {
    response: GenerateResponse,
    inserted_at: Instant,
}

/// Two-layer memoization in front of the planner.
///
/// The inner layer memoizes planner output by exact canonical-key equality
/// with no expiry and a bounded entry count (oldest-first eviction on
/// overflow). Each entry is a once-cell initialized outside the map lock,
/// so concurrent misses for the same key run the planner exactly once and
/// share the result.
///
/// The outer layer holds full responses keyed by content hash with a
/// wall-clock TTL; an entry past its TTL is a miss regardless of presence.
///
/// The cache is constructed by and owned by the service; nothing here is
/// process-global. Lock failures surface as `CacheUnavailable`, which the
/// caller downgrades to direct computation.
pub struct ResultCache {
    memo: Mutex<PlanMemo>,
    responses: Mutex<HashMap<String, TimedResponse>>,
    ttl: Duration,
    memo_capacity: usize,
    response_capacity: usize,
}

fn lock_failed<T>(e: std::sync::PoisonError<T>) -> ApplicationError {
    ApplicationError::CacheUnavailable(e.to_string())
}

impl ResultCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            memo: Mutex::new(PlanMemo {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            responses: Mutex::new(HashMap::new()),
            ttl: Duration::from_secs(config.ttl_secs),
            memo_capacity: config.memo_capacity.max(1),
            response_capacity: config.response_capacity.max(1),
        }
    }

    pub fn get_or_compute<F>(&self, key: &PlanKey, compute: F) -> ApplicationResult<Arc<PlanOutcome>>
    where
        F: FnOnce() -> PlanOutcome,
    {
        let cell = {
            let mut memo = self.memo.lock().map_err(lock_failed)?;
            if let Some(cell) = memo.entries.get(key) {
                cell.clone()
            } else {
                while memo.order.len() >= self.memo_capacity {
                    match memo.order.pop_front() {
                        Some(oldest) => {
                            memo.entries.remove(&oldest);
                        }
                        None => break,
                    }
                }
                let cell = Arc::new(OnceCell::new());
                memo.entries.insert(key.clone(), cell.clone());
                memo.order.push_back(key.clone());
                cell
            }
        };
        // Initialization happens outside the map lock; racing callers for
        // the same key block on the cell, not on the whole cache.
        Ok(cell.get_or_init(|| Arc::new(compute())).clone())
    }

    pub fn lookup_response(&self, hash: &str) -> ApplicationResult<Option<GenerateResponse>> {
        let mut responses = self.responses.lock().map_err(lock_failed)?;
        match responses.get(hash) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                Ok(Some(entry.response.clone()))
            }
            Some(_) => {
                responses.remove(hash);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub fn insert_response(&self, hash: String, response: GenerateResponse) -> ApplicationResult<()> {
        let mut responses = self.responses.lock().map_err(lock_failed)?;
        if responses.len() >= self.response_capacity && !responses.contains_key(&hash) {
            let oldest = responses
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                responses.remove(&oldest);
            }
        }
        responses.insert(
            hash,
            TimedResponse {
                response,
                inserted_at: Instant::now(),
            },
        );
        Ok(())
    }

    pub fn memo_len(&self) -> ApplicationResult<usize> {
        Ok(self.memo.lock().map_err(lock_failed)?.entries.len())
    }

    pub fn response_len(&self) -> ApplicationResult<usize> {
        Ok(self.responses.lock().map_err(lock_failed)?.len())
    }
}
