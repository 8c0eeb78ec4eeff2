use std::sync::Arc;

use murus::adapters::outbound::InMemoryTrajectoryStore;
use murus::application::TrajectoryService;
use murus::common::{ApplicationError, DomainError};
use murus::config::CacheConfig;
use murus::domains::coverage::{GenerateRequest, Obstacle, TrajectoryFilter, TrajectoryStore};

fn service_with_store(ttl_secs: u64) -> (TrajectoryService, Arc<InMemoryTrajectoryStore>) {
    let store = Arc::new(InMemoryTrajectoryStore::new());
    let cache_config = CacheConfig {
        ttl_secs,
        memo_capacity: 100,
        response_capacity: 100,
    };
    (TrajectoryService::new(store.clone(), &cache_config), store)
}

fn corner_obstacle_request() -> GenerateRequest {
    GenerateRequest {
        wall_width: 1.0,
        wall_height: 1.0,
        step: 0.5,
        obstacles: vec![Obstacle {
            x: 0.0,
            y: 0.0,
            width: 0.5,
            height: 0.5,
        }],
    }
}

fn expect_validation_error(result: Result<murus::domains::coverage::GenerateResponse, ApplicationError>) {
    match result {
        Err(ApplicationError::Domain(DomainError::Validation { .. })) => {}
        other => panic!("expected validation error, got {:?}", other.map(|r| r.id)),
    }
}

#[tokio::test]
async fn test_generate_full_wall() {
    let (service, _) = service_with_store(300);
    let response = service
        .generate(GenerateRequest {
            wall_width: 2.0,
            wall_height: 1.0,
            step: 0.2,
            obstacles: vec![],
        })
        .await
        .unwrap();

    assert_eq!(response.path_length, 50);
    assert_eq!(response.waypoints.len(), 50);
    assert_eq!(response.coverage_percentage, 100.0);
    assert_eq!(response.grid_coverage_percentage, 100.0);
}

#[tokio::test]
async fn test_generate_with_obstacle_reports_both_coverage_figures() {
    let (service, _) = service_with_store(300);
    let response = service.generate(corner_obstacle_request()).await.unwrap();

    assert_eq!(response.path_length, 3);
    // Geometric estimate and grid-realized figure happen to agree here:
    // the obstacle covers exactly one of four cells.
    assert_eq!(response.coverage_percentage, 75.0);
    assert_eq!(response.grid_coverage_percentage, 75.0);
}

#[tokio::test]
async fn test_coverage_figures_can_diverge() {
    // A small obstacle knocks out a whole cell: the geometric estimate stays
    // near 99%, the grid-realized figure drops by a full cell.
    let (service, _) = service_with_store(300);
    let response = service
        .generate(GenerateRequest {
            wall_width: 1.0,
            wall_height: 1.0,
            step: 0.5,
            obstacles: vec![Obstacle {
                x: 0.2,
                y: 0.2,
                width: 0.1,
                height: 0.1,
            }],
        })
        .await
        .unwrap();

    assert_eq!(response.coverage_percentage, 99.0);
    assert_eq!(response.grid_coverage_percentage, 75.0);
}

#[tokio::test]
async fn test_generate_persists_trajectory() {
    let (service, store) = service_with_store(300);
    let response = service.generate(corner_obstacle_request()).await.unwrap();

    let record = service.fetch(response.id).await.unwrap().unwrap();
    assert_eq!(record.wall_width, 1.0);
    assert_eq!(record.step, 0.5);
    assert_eq!(record.path_length, 3);
    assert_eq!(record.waypoints, response.waypoints);
    assert_eq!(record.obstacles.len(), 1);
    assert_eq!(record.coverage_percentage, 75.0);

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total_trajectories, 1);
}

#[tokio::test]
async fn test_repeated_request_is_served_from_cache() {
    let (service, store) = service_with_store(300);
    let request = GenerateRequest {
        wall_width: 2.0,
        wall_height: 1.0,
        step: 0.1,
        obstacles: vec![
            Obstacle {
                x: 0.2,
                y: 0.2,
                width: 0.3,
                height: 0.3,
            },
            Obstacle {
                x: 1.2,
                y: 0.4,
                width: 0.4,
                height: 0.2,
            },
        ],
    };

    let first = service.generate(request.clone()).await.unwrap();

    // Same obstacles in a different order: identical as a set, so this must
    // hit the cached response and not persist a second trajectory.
    let mut reordered = request.clone();
    reordered.obstacles.reverse();
    let second = service.generate(reordered).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.waypoints, second.waypoints);
    assert_eq!(service.stats().await.unwrap().total_trajectories, 1);
}

#[tokio::test]
async fn test_expired_response_is_regenerated() {
    // Zero TTL: every response-cache lookup misses, so a second identical
    // request plans (via the memo) and persists again.
    let (service, _) = service_with_store(0);

    let first = service.generate(corner_obstacle_request()).await.unwrap();
    let second = service.generate(corner_obstacle_request()).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.waypoints, second.waypoints);
    assert_eq!(service.stats().await.unwrap().total_trajectories, 2);
}

#[tokio::test]
async fn test_list_returns_newest_first() {
    let (service, _) = service_with_store(0);
    for step in [0.5, 0.25, 0.2] {
        service
            .generate(GenerateRequest {
                wall_width: 2.0,
                wall_height: 2.0,
                step,
                obstacles: vec![],
            })
            .await
            .unwrap();
    }

    let summaries = service.list(TrajectoryFilter::default()).await.unwrap();
    assert_eq!(summaries.len(), 3);
    assert_eq!(summaries[0].step, 0.2);
    assert_eq!(summaries[2].step, 0.5);
}

#[tokio::test]
async fn test_rejects_non_positive_wall() {
    let (service, _) = service_with_store(300);
    expect_validation_error(
        service
            .generate(GenerateRequest {
                wall_width: 0.0,
                wall_height: 1.0,
                step: 0.1,
                obstacles: vec![],
            })
            .await,
    );
}

#[tokio::test]
async fn test_rejects_non_positive_step() {
    let (service, _) = service_with_store(300);
    expect_validation_error(
        service
            .generate(GenerateRequest {
                wall_width: 1.0,
                wall_height: 1.0,
                step: -0.1,
                obstacles: vec![],
            })
            .await,
    );
}

#[tokio::test]
async fn test_rejects_step_larger_than_wall() {
    let (service, _) = service_with_store(300);
    expect_validation_error(
        service
            .generate(GenerateRequest {
                wall_width: 2.0,
                wall_height: 1.0,
                step: 1.5,
                obstacles: vec![],
            })
            .await,
    );
}

#[tokio::test]
async fn test_rejects_obstacle_outside_wall() {
    let (service, _) = service_with_store(300);
    expect_validation_error(
        service
            .generate(GenerateRequest {
                wall_width: 1.0,
                wall_height: 1.0,
                step: 0.1,
                obstacles: vec![Obstacle {
                    x: 0.8,
                    y: 0.8,
                    width: 0.5,
                    height: 0.1,
                }],
            })
            .await,
    );
}

#[tokio::test]
async fn test_rejects_obstacle_with_invalid_dimensions() {
    let (service, _) = service_with_store(300);
    expect_validation_error(
        service
            .generate(GenerateRequest {
                wall_width: 1.0,
                wall_height: 1.0,
                step: 0.1,
                obstacles: vec![Obstacle {
                    x: 0.2,
                    y: 0.2,
                    width: -0.1,
                    height: 0.1,
                }],
            })
            .await,
    );
}

#[tokio::test]
async fn test_fetch_unknown_id_returns_none() {
    let (service, _) = service_with_store(300);
    assert!(service.fetch(999).await.unwrap().is_none());
}
