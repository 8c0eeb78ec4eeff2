use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Row, SqlitePool};

use crate::common::{DomainError, DomainResult};
use crate::config::DatabaseConfig;
use crate::domains::coverage::{
    NewTrajectory, PerformanceDistribution, TrajectoryFilter, TrajectoryRecord, TrajectoryStats,
    TrajectoryStore, TrajectorySummary,
};

fn db_err(e: sqlx::Error) -> DomainError {
    DomainError::InfrastructureError(format!("sqlite: {}", e))
}

const SUMMARY_COLUMNS: &str = "id, wall_width, wall_height, step, path_length, \
     coverage_percentage, processing_time_ms, created_at";

/// SQLite-backed trajectory store. The pool blocks on acquire when all
/// connections are busy; WAL keeps concurrent readers off the writer's back.
pub struct SqliteTrajectoryStore {
    pool: SqlitePool,
}

impl SqliteTrajectoryStore {
    pub async fn new(config: &DatabaseConfig) -> DomainResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(db_err)?;

        let store = Self { pool };
        store.initialize_schema().await?;
        Ok(store)
    }

    async fn initialize_schema(&self) -> DomainResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS trajectory (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                wall_width REAL NOT NULL,
                wall_height REAL NOT NULL,
                step REAL NOT NULL,
                path TEXT NOT NULL,
                obstacles TEXT NOT NULL DEFAULT '[]',
                path_length INTEGER NOT NULL DEFAULT 0,
                coverage_percentage REAL NOT NULL DEFAULT 0.0,
                processing_time_ms INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        for index in [
            "CREATE INDEX IF NOT EXISTS idx_created_at ON trajectory(created_at)",
            "CREATE INDEX IF NOT EXISTS idx_wall_dims ON trajectory(wall_width, wall_height)",
            "CREATE INDEX IF NOT EXISTS idx_coverage ON trajectory(coverage_percentage)",
            "CREATE INDEX IF NOT EXISTS idx_processing_time ON trajectory(processing_time_ms)",
        ] {
            sqlx::query(index).execute(&self.pool).await.map_err(db_err)?;
        }
        Ok(())
    }
}

fn summary_from_row(row: &SqliteRow) -> DomainResult<TrajectorySummary> {
    Ok(TrajectorySummary {
        id: row.try_get("id").map_err(db_err)?,
        wall_width: row.try_get("wall_width").map_err(db_err)?,
        wall_height: row.try_get("wall_height").map_err(db_err)?,
        step: row.try_get("step").map_err(db_err)?,
        path_length: row.try_get("path_length").map_err(db_err)?,
        coverage_percentage: row.try_get("coverage_percentage").map_err(db_err)?,
        processing_time_ms: row.try_get("processing_time_ms").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

#[async_trait]
impl TrajectoryStore for SqliteTrajectoryStore {
    async fn store(&self, new: NewTrajectory) -> DomainResult<i64> {
        let path = serde_json::to_string(&new.waypoints)?;
        let obstacles = serde_json::to_string(&new.obstacles)?;
        let created_at = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO trajectory (wall_width, wall_height, step, path, obstacles, \
             path_length, coverage_percentage, processing_time_ms, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new.wall_width)
        .bind(new.wall_height)
        .bind(new.step)
        .bind(path)
        .bind(obstacles)
        .bind(new.waypoints.len() as i64)
        .bind(new.coverage_percentage)
        .bind(new.processing_time_ms)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.last_insert_rowid())
    }

    async fn fetch(&self, id: i64) -> DomainResult<Option<TrajectoryRecord>> {
        let row = sqlx::query("SELECT * FROM trajectory WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let path: String = row.try_get("path").map_err(db_err)?;
        let obstacles: String = row.try_get("obstacles").map_err(db_err)?;

        Ok(Some(TrajectoryRecord {
            id: row.try_get("id").map_err(db_err)?,
            wall_width: row.try_get("wall_width").map_err(db_err)?,
            wall_height: row.try_get("wall_height").map_err(db_err)?,
            step: row.try_get("step").map_err(db_err)?,
            waypoints: serde_json::from_str(&path)?,
            obstacles: serde_json::from_str(&obstacles)?,
            path_length: row.try_get("path_length").map_err(db_err)?,
            coverage_percentage: row.try_get("coverage_percentage").map_err(db_err)?,
            processing_time_ms: row.try_get("processing_time_ms").map_err(db_err)?,
            created_at: row.try_get("created_at").map_err(db_err)?,
        }))
    }

    async fn list(&self, filter: TrajectoryFilter) -> DomainResult<Vec<TrajectorySummary>> {
        let mut sql = format!("SELECT {} FROM trajectory", SUMMARY_COLUMNS);
        let mut conditions = Vec::new();
        if filter.wall_width.is_some() {
            conditions.push("wall_width = ?");
        }
        if filter.wall_height.is_some() {
            conditions.push("wall_height = ?");
        }
        if filter.min_coverage.is_some() {
            conditions.push("coverage_percentage >= ?");
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");

        let mut query = sqlx::query(&sql);
        if let Some(w) = filter.wall_width {
            query = query.bind(w);
        }
        if let Some(h) = filter.wall_height {
            query = query.bind(h);
        }
        if let Some(c) = filter.min_coverage {
            query = query.bind(c);
        }
        query = query.bind(filter.limit).bind(filter.offset);

        let rows = query.fetch_all(&self.pool).await.map_err(db_err)?;
        rows.iter().map(summary_from_row).collect()
    }

    async fn stats(&self) -> DomainResult<TrajectoryStats> {
        let row = sqlx::query(
            "SELECT COUNT(*) as total_trajectories, \
                    AVG(wall_width) as avg_wall_width, \
                    AVG(wall_height) as avg_wall_height, \
                    AVG(path_length) as avg_path_length, \
                    AVG(coverage_percentage) as avg_coverage, \
                    AVG(processing_time_ms) as avg_processing_time, \
                    MIN(processing_time_ms) as min_processing_time, \
                    MAX(processing_time_ms) as max_processing_time \
             FROM trajectory",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        let mut stats = TrajectoryStats {
            total_trajectories: row.try_get("total_trajectories").map_err(db_err)?,
            avg_wall_width: row.try_get("avg_wall_width").map_err(db_err)?,
            avg_wall_height: row.try_get("avg_wall_height").map_err(db_err)?,
            avg_path_length: row.try_get("avg_path_length").map_err(db_err)?,
            avg_coverage: row.try_get("avg_coverage").map_err(db_err)?,
            avg_processing_time: row.try_get("avg_processing_time").map_err(db_err)?,
            min_processing_time: row.try_get("min_processing_time").map_err(db_err)?,
            max_processing_time: row.try_get("max_processing_time").map_err(db_err)?,
            performance_distribution: PerformanceDistribution::default(),
        };

        let rows = sqlx::query(
            "SELECT CASE \
                 WHEN processing_time_ms < 100 THEN 'fast' \
                 WHEN processing_time_ms < 500 THEN 'medium' \
                 ELSE 'slow' \
             END as category, COUNT(*) as count \
             FROM trajectory GROUP BY category",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        for row in &rows {
            let category: String = row.try_get("category").map_err(db_err)?;
            let count: i64 = row.try_get("count").map_err(db_err)?;
            match category.as_str() {
                "fast" => stats.performance_distribution.fast = count,
                "medium" => stats.performance_distribution.medium = count,
                _ => stats.performance_distribution.slow = count,
            }
        }

        Ok(stats)
    }

    async fn search_by_performance(
        &self,
        min_processing_time: Option<i64>,
        max_processing_time: Option<i64>,
        limit: i64,
    ) -> DomainResult<Vec<TrajectorySummary>> {
        let mut sql = format!("SELECT {} FROM trajectory", SUMMARY_COLUMNS);
        let mut conditions = Vec::new();
        if min_processing_time.is_some() {
            conditions.push("processing_time_ms >= ?");
        }
        if max_processing_time.is_some() {
            conditions.push("processing_time_ms <= ?");
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY processing_time_ms ASC LIMIT ?");

        let mut query = sqlx::query(&sql);
        if let Some(min) = min_processing_time {
            query = query.bind(min);
        }
        if let Some(max) = max_processing_time {
            query = query.bind(max);
        }
        query = query.bind(limit);

        let rows = query.fetch_all(&self.pool).await.map_err(db_err)?;
        rows.iter().map(summary_from_row).collect()
    }
}
