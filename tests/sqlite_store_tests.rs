use murus::adapters::outbound::SqliteTrajectoryStore;
use murus::config::DatabaseConfig;
use murus::domains::coverage::{
    NewTrajectory, Obstacle, TrajectoryFilter, TrajectoryStore, Waypoint,
};
use tempfile::TempDir;

async fn open_store(dir: &TempDir) -> SqliteTrajectoryStore {
    let config = DatabaseConfig {
        path: dir
            .path()
            .join("trajectories.db")
            .to_string_lossy()
            .into_owned(),
        max_connections: 5,
    };
    SqliteTrajectoryStore::new(&config)
        .await
        .expect("store should initialize")
}

fn new_trajectory(step: f64, coverage: f64, processing_time_ms: i64) -> NewTrajectory {
    NewTrajectory {
        wall_width: 2.0,
        wall_height: 1.0,
        step,
        waypoints: vec![
            Waypoint { x: 0.1, y: 0.1 },
            Waypoint { x: 0.3, y: 0.1 },
            Waypoint { x: 0.5, y: 0.1 },
        ],
        obstacles: vec![Obstacle {
            x: 1.0,
            y: 0.5,
            width: 0.2,
            height: 0.2,
        }],
        coverage_percentage: coverage,
        processing_time_ms,
    }
}

#[tokio::test]
async fn test_store_and_fetch_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let id = store.store(new_trajectory(0.2, 98.0, 12)).await.unwrap();
    assert!(id > 0);

    let record = store.fetch(id).await.unwrap().expect("record should exist");
    assert_eq!(record.id, id);
    assert_eq!(record.wall_width, 2.0);
    assert_eq!(record.wall_height, 1.0);
    assert_eq!(record.step, 0.2);
    assert_eq!(record.path_length, 3);
    assert_eq!(record.waypoints.len(), 3);
    assert_eq!(record.waypoints[1], Waypoint { x: 0.3, y: 0.1 });
    assert_eq!(record.obstacles.len(), 1);
    assert_eq!(record.coverage_percentage, 98.0);
    assert_eq!(record.processing_time_ms, 12);
    assert!(!record.created_at.is_empty());
}

#[tokio::test]
async fn test_fetch_missing_returns_none() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    assert!(store.fetch(42).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_applies_filters_and_pagination() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    store.store(new_trajectory(0.5, 90.0, 10)).await.unwrap();
    store.store(new_trajectory(0.25, 95.0, 20)).await.unwrap();
    store.store(new_trajectory(0.2, 99.0, 30)).await.unwrap();

    let all = store.list(TrajectoryFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    // Newest first.
    assert_eq!(all[0].step, 0.2);

    let high_coverage = store
        .list(TrajectoryFilter {
            min_coverage: Some(95.0),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(high_coverage.len(), 2);
    assert!(high_coverage.iter().all(|s| s.coverage_percentage >= 95.0));

    let paged = store
        .list(TrajectoryFilter {
            limit: 1,
            offset: 1,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(paged.len(), 1);
    assert_eq!(paged[0].step, 0.25);

    let by_width = store
        .list(TrajectoryFilter {
            wall_width: Some(3.0),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(by_width.is_empty());
}

#[tokio::test]
async fn test_stats_aggregates_and_distribution() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let empty = store.stats().await.unwrap();
    assert_eq!(empty.total_trajectories, 0);
    assert!(empty.avg_coverage.is_none());
    assert!(empty.min_processing_time.is_none());

    store.store(new_trajectory(0.5, 90.0, 50)).await.unwrap();
    store.store(new_trajectory(0.25, 94.0, 200)).await.unwrap();
    store.store(new_trajectory(0.2, 98.0, 700)).await.unwrap();

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total_trajectories, 3);
    assert_eq!(stats.avg_wall_width, Some(2.0));
    assert_eq!(stats.avg_coverage, Some(94.0));
    assert_eq!(stats.min_processing_time, Some(50));
    assert_eq!(stats.max_processing_time, Some(700));
    assert_eq!(stats.performance_distribution.fast, 1);
    assert_eq!(stats.performance_distribution.medium, 1);
    assert_eq!(stats.performance_distribution.slow, 1);
}

#[tokio::test]
async fn test_search_by_performance_bounds() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    store.store(new_trajectory(0.5, 90.0, 10)).await.unwrap();
    store.store(new_trajectory(0.25, 94.0, 120)).await.unwrap();
    store.store(new_trajectory(0.2, 98.0, 480)).await.unwrap();

    let mid = store
        .search_by_performance(Some(50), Some(200), 10)
        .await
        .unwrap();
    assert_eq!(mid.len(), 1);
    assert_eq!(mid[0].processing_time_ms, 120);

    let fastest_first = store.search_by_performance(None, None, 2).await.unwrap();
    assert_eq!(fastest_first.len(), 2);
    assert_eq!(fastest_first[0].processing_time_ms, 10);
    assert_eq!(fastest_first[1].processing_time_ms, 120);
}
