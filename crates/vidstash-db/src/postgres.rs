use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use vidstash_core::models::{data_url, NewVideo, Video, VideoState};
use vidstash_core::AppError;

use super::repository::VideoRepository;

/// Postgres-backed video store.
///
/// Records live in the `videos` table, likers in the `video_likes` join
/// table (composite primary key, so a user can appear at most once per
/// video). like/unlike run inside a single transaction: the row count of the
/// conflict-detecting insert/delete is the compare-and-set that decides
/// `AlreadyLiked`/`NotLiked`, and the `likes` counter is updated in the same
/// transaction so it always matches the set cardinality.
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
    base_url: String,
}

#[derive(Debug, sqlx::FromRow)]
struct VideoRow {
    id: i64,
    title: String,
    duration: i64,
    content_type: String,
    data_url: String,
    state: String,
    likes: i64,
    created_at: DateTime<Utc>,
}

impl VideoRow {
    fn into_video(self, user_likes: BTreeSet<String>) -> Result<Video, AppError> {
        Ok(Video {
            id: self.id,
            title: self.title,
            duration: self.duration,
            content_type: self.content_type,
            data_url: self.data_url,
            state: VideoState::from_str(&self.state)?,
            likes: self.likes,
            user_likes,
            created_at: self.created_at,
        })
    }
}

impl PgVideoRepository {
    pub fn new(pool: PgPool, base_url: impl Into<String>) -> Self {
        Self {
            pool,
            base_url: base_url.into(),
        }
    }

    /// Liker sets for a batch of video ids in one query (avoids N+1 in
    /// list/search results).
    async fn load_liker_sets(
        &self,
        ids: &[i64],
    ) -> Result<HashMap<i64, BTreeSet<String>>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, String)> = sqlx::query_as(
            "SELECT video_id, user_id FROM video_likes WHERE video_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut sets: HashMap<i64, BTreeSet<String>> = HashMap::new();
        for (video_id, user_id) in rows {
            sets.entry(video_id).or_default().insert(user_id);
        }
        Ok(sets)
    }

    fn rows_to_videos(
        rows: Vec<VideoRow>,
        mut liker_sets: HashMap<i64, BTreeSet<String>>,
    ) -> Result<Vec<Video>, AppError> {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let likers = liker_sets.remove(&row.id).unwrap_or_default();
            out.push(row.into_video(likers)?);
        }
        Ok(out)
    }

    async fn fetch_videos(&self, rows: Vec<VideoRow>) -> Result<Vec<Video>, AppError> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let liker_sets = self.load_liker_sets(&ids).await?;
        Self::rows_to_videos(rows, liker_sets)
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    async fn list(&self) -> Result<Vec<Video>, AppError> {
        let rows: Vec<VideoRow> = sqlx::query_as("SELECT * FROM videos ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        self.fetch_videos(rows).await
    }

    #[tracing::instrument(
        skip(self, metadata),
        fields(db.table = "videos", db.operation = "insert")
    )]
    async fn create(&self, metadata: NewVideo) -> Result<Video, AppError> {
        metadata.validate()?;

        // The id comes from the sequence, so the dataUrl is derived in a
        // second statement inside the same transaction.
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO videos (title, duration, content_type, data_url, state, likes, created_at)
            VALUES ($1, $2, $3, '', $4, 0, $5)
            RETURNING id
            "#,
        )
        .bind(&metadata.title)
        .bind(metadata.duration)
        .bind(&metadata.content_type)
        .bind(VideoState::Created.to_string())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let row: VideoRow =
            sqlx::query_as("UPDATE videos SET data_url = $2 WHERE id = $1 RETURNING *")
                .bind(id)
                .bind(data_url(&self.base_url, id))
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;
        tracing::debug!(video_id = id, "Stored video metadata");
        row.into_video(BTreeSet::new())
    }

    async fn get(&self, id: i64) -> Result<Option<Video>, AppError> {
        let row: Option<VideoRow> = sqlx::query_as("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let likers: Vec<String> = sqlx::query_scalar(
                    "SELECT user_id FROM video_likes WHERE video_id = $1 ORDER BY user_id",
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await?;
                Ok(Some(row.into_video(likers.into_iter().collect())?))
            }
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_likes", db.operation = "insert"))]
    async fn like(&self, id: i64, user: &str) -> Result<Video, AppError> {
        let mut tx = self.pool.begin().await?;

        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM videos WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if found.is_none() {
            return Err(AppError::NotFound(format!("Video {} not found", id)));
        }

        let inserted = sqlx::query(
            "INSERT INTO video_likes (video_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(user)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if inserted == 0 {
            return Err(AppError::AlreadyLiked {
                video_id: id,
                user: user.to_string(),
            });
        }

        let row: VideoRow =
            sqlx::query_as("UPDATE videos SET likes = likes + 1 WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        let likers: Vec<String> = sqlx::query_scalar(
            "SELECT user_id FROM video_likes WHERE video_id = $1 ORDER BY user_id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        row.into_video(likers.into_iter().collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_likes", db.operation = "delete"))]
    async fn unlike(&self, id: i64, user: &str) -> Result<Video, AppError> {
        let mut tx = self.pool.begin().await?;

        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM videos WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if found.is_none() {
            return Err(AppError::NotFound(format!("Video {} not found", id)));
        }

        let removed = sqlx::query("DELETE FROM video_likes WHERE video_id = $1 AND user_id = $2")
            .bind(id)
            .bind(user)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if removed == 0 {
            return Err(AppError::NotLiked {
                video_id: id,
                user: user.to_string(),
            });
        }

        let row: VideoRow =
            sqlx::query_as("UPDATE videos SET likes = likes - 1 WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        let likers: Vec<String> = sqlx::query_scalar(
            "SELECT user_id FROM video_likes WHERE video_id = $1 ORDER BY user_id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        row.into_video(likers.into_iter().collect())
    }

    async fn liked_by(&self, id: i64) -> Result<Option<Vec<String>>, AppError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        if found.is_none() {
            return Ok(None);
        }

        let likers: Vec<String> = sqlx::query_scalar(
            "SELECT user_id FROM video_likes WHERE video_id = $1 ORDER BY user_id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(Some(likers))
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "update"))]
    async fn set_state(&self, id: i64, state: VideoState) -> Result<Video, AppError> {
        let row: Option<VideoRow> =
            sqlx::query_as("UPDATE videos SET state = $2 WHERE id = $1 RETURNING *")
                .bind(id)
                .bind(state.to_string())
                .fetch_optional(&self.pool)
                .await?;

        let row = row.ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;
        let likers: Vec<String> = sqlx::query_scalar(
            "SELECT user_id FROM video_likes WHERE video_id = $1 ORDER BY user_id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        row.into_video(likers.into_iter().collect())
    }

    async fn find_by_name(&self, title: &str) -> Result<Vec<Video>, AppError> {
        let rows: Vec<VideoRow> =
            sqlx::query_as("SELECT * FROM videos WHERE title = $1 ORDER BY id")
                .bind(title)
                .fetch_all(&self.pool)
                .await?;
        self.fetch_videos(rows).await
    }

    async fn find_by_duration_less_than(&self, duration: i64) -> Result<Vec<Video>, AppError> {
        let rows: Vec<VideoRow> =
            sqlx::query_as("SELECT * FROM videos WHERE duration < $1 ORDER BY id")
                .bind(duration)
                .fetch_all(&self.pool)
                .await?;
        self.fetch_videos(rows).await
    }
}
