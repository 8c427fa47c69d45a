use async_trait::async_trait;

use vidstash_core::models::{NewVideo, Video, VideoState};
use vidstash_core::AppError;

/// Store contract for video records.
///
/// Implementations are injected into the API layer as `Arc<dyn
/// VideoRepository>`; handlers never construct a backend themselves.
///
/// Mutating operations that read-modify-write a record (`like`, `unlike`,
/// `set_state`) must apply the whole sequence as one atomic unit per record
/// so concurrent requests cannot lose updates.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// All stored videos in id order; empty when none.
    async fn list(&self) -> Result<Vec<Video>, AppError>;

    /// Assign a fresh id, derive `dataUrl`, persist, and return the stored
    /// record including server-assigned fields.
    async fn create(&self, metadata: NewVideo) -> Result<Video, AppError>;

    /// The record for `id`, or `None` when absent. Absence is not an error.
    async fn get(&self, id: i64) -> Result<Option<Video>, AppError>;

    /// Record a like by `user`.
    ///
    /// Errors: `NotFound` for an unknown id; `AlreadyLiked` when `user`
    /// already liked the video (state unchanged). Exactly one of N
    /// concurrent likes by the same user succeeds.
    async fn like(&self, id: i64, user: &str) -> Result<Video, AppError>;

    /// Remove a like by `user`.
    ///
    /// Errors: `NotFound` for an unknown id; `NotLiked` when `user` never
    /// liked the video (the counter never goes negative).
    async fn unlike(&self, id: i64, user: &str) -> Result<Video, AppError>;

    /// The liker ids for `id`, or `None` for an unknown id.
    async fn liked_by(&self, id: i64) -> Result<Option<Vec<String>>, AppError>;

    /// Transition payload readiness; `NotFound` for an unknown id.
    async fn set_state(&self, id: i64, state: VideoState) -> Result<Video, AppError>;

    /// Videos whose title equals `title` exactly; empty when none match.
    async fn find_by_name(&self, title: &str) -> Result<Vec<Video>, AppError>;

    /// Videos with duration strictly less than `duration`; empty when none.
    async fn find_by_duration_less_than(&self, duration: i64) -> Result<Vec<Video>, AppError>;
}
