use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use vidstash_core::models::{data_url, NewVideo, Video, VideoState};
use vidstash_core::AppError;

use super::repository::VideoRepository;

/// In-memory video store.
///
/// Records live in a `HashMap<i64, Video>` behind a `RwLock`; ids come from
/// an atomic counter so concurrent creates stay unique and monotonic. The
/// write guard is held across every read-modify-write sequence, which is the
/// per-store atomic unit the repository contract requires.
pub struct InMemoryVideoRepository {
    base_url: String,
    next_id: AtomicI64,
    videos: RwLock<HashMap<i64, Video>>,
}

impl InMemoryVideoRepository {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            next_id: AtomicI64::new(0),
            videos: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn list(&self) -> Result<Vec<Video>, AppError> {
        let videos = self.videos.read().await;
        let mut all: Vec<Video> = videos.values().cloned().collect();
        all.sort_by_key(|v| v.id);
        Ok(all)
    }

    async fn create(&self, metadata: NewVideo) -> Result<Video, AppError> {
        metadata.validate()?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let video = Video {
            id,
            title: metadata.title,
            duration: metadata.duration,
            content_type: metadata.content_type,
            data_url: data_url(&self.base_url, id),
            state: VideoState::Created,
            likes: 0,
            user_likes: BTreeSet::new(),
            created_at: Utc::now(),
        };

        let mut videos = self.videos.write().await;
        videos.insert(id, video.clone());
        tracing::debug!(video_id = id, title = %video.title, "Stored video metadata");
        Ok(video)
    }

    async fn get(&self, id: i64) -> Result<Option<Video>, AppError> {
        let videos = self.videos.read().await;
        Ok(videos.get(&id).cloned())
    }

    async fn like(&self, id: i64, user: &str) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        let video = videos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

        if !video.like(user) {
            return Err(AppError::AlreadyLiked {
                video_id: id,
                user: user.to_string(),
            });
        }
        Ok(video.clone())
    }

    async fn unlike(&self, id: i64, user: &str) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        let video = videos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

        if !video.unlike(user) {
            return Err(AppError::NotLiked {
                video_id: id,
                user: user.to_string(),
            });
        }
        Ok(video.clone())
    }

    async fn liked_by(&self, id: i64) -> Result<Option<Vec<String>>, AppError> {
        let videos = self.videos.read().await;
        Ok(videos.get(&id).map(|v| v.liked_by()))
    }

    async fn set_state(&self, id: i64, state: VideoState) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        let video = videos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;
        video.state = state;
        Ok(video.clone())
    }

    async fn find_by_name(&self, title: &str) -> Result<Vec<Video>, AppError> {
        let videos = self.videos.read().await;
        let mut matches: Vec<Video> = videos
            .values()
            .filter(|v| v.title == title)
            .cloned()
            .collect();
        matches.sort_by_key(|v| v.id);
        Ok(matches)
    }

    async fn find_by_duration_less_than(&self, duration: i64) -> Result<Vec<Video>, AppError> {
        let videos = self.videos.read().await;
        let mut matches: Vec<Video> = videos
            .values()
            .filter(|v| v.duration < duration)
            .cloned()
            .collect();
        matches.sort_by_key(|v| v.id);
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const BASE: &str = "http://localhost:8080";

    fn metadata(title: &str, duration: i64) -> NewVideo {
        NewVideo {
            title: title.to_string(),
            duration,
            content_type: "video/mp4".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_monotonic_ids_and_data_url() {
        let repo = InMemoryVideoRepository::new(BASE);

        let first = repo.create(metadata("Intro", 30)).await.unwrap();
        let second = repo.create(metadata("Outro", 45)).await.unwrap();
        let third = repo.create(metadata("Extras", 10)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(third.id, 3);
        assert_eq!(first.data_url, "http://localhost:8080/video/1/data");
        assert_eq!(first.state, VideoState::Created);
        assert_eq!(first.likes, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_negative_duration() {
        let repo = InMemoryVideoRepository::new(BASE);
        let err = repo.create(metadata("Broken", -5)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_returns_all_in_id_order() {
        let repo = InMemoryVideoRepository::new(BASE);
        assert!(repo.list().await.unwrap().is_empty());

        repo.create(metadata("b", 2)).await.unwrap();
        repo.create(metadata("a", 1)).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, 1);
        assert_eq!(all[1].id, 2);
    }

    #[tokio::test]
    async fn test_get_absent_is_none_not_error() {
        let repo = InMemoryVideoRepository::new(BASE);
        assert!(repo.get(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_like_contract() {
        let repo = InMemoryVideoRepository::new(BASE);
        let video = repo.create(metadata("Intro", 30)).await.unwrap();

        let liked = repo.like(video.id, "alice").await.unwrap();
        assert_eq!(liked.likes, 1);
        assert_eq!(liked.liked_by(), vec!["alice".to_string()]);

        let err = repo.like(video.id, "alice").await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyLiked { .. }));
        let unchanged = repo.get(video.id).await.unwrap().unwrap();
        assert_eq!(unchanged.likes, 1);

        let err = repo.like(999, "alice").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unlike_contract() {
        let repo = InMemoryVideoRepository::new(BASE);
        let video = repo.create(metadata("Intro", 30)).await.unwrap();
        repo.like(video.id, "alice").await.unwrap();

        let err = repo.unlike(video.id, "bob").await.unwrap_err();
        assert!(matches!(err, AppError::NotLiked { .. }));
        assert_eq!(repo.get(video.id).await.unwrap().unwrap().likes, 1);

        let unliked = repo.unlike(video.id, "alice").await.unwrap();
        assert_eq!(unliked.likes, 0);
        assert!(unliked.user_likes.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_same_user_likes_resolve_to_one_success() {
        let repo = Arc::new(InMemoryVideoRepository::new(BASE));
        let video = repo.create(metadata("Intro", 30)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let repo = repo.clone();
            handles.push(tokio::spawn(
                async move { repo.like(video.id, "alice").await },
            ));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(repo.get(video.id).await.unwrap().unwrap().likes, 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_keep_ids_unique() {
        let repo = Arc::new(InMemoryVideoRepository::new(BASE));

        let mut handles = Vec::new();
        for i in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.create(metadata(&format!("v{}", i), i)).await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }

    #[tokio::test]
    async fn test_liked_by_distinguishes_absent_from_empty() {
        let repo = InMemoryVideoRepository::new(BASE);
        let video = repo.create(metadata("Intro", 30)).await.unwrap();

        assert_eq!(repo.liked_by(video.id).await.unwrap(), Some(Vec::new()));
        assert_eq!(repo.liked_by(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_state_marks_ready() {
        let repo = InMemoryVideoRepository::new(BASE);
        let video = repo.create(metadata("Intro", 30)).await.unwrap();

        let ready = repo.set_state(video.id, VideoState::Ready).await.unwrap();
        assert_eq!(ready.state, VideoState::Ready);

        let err = repo.set_state(999, VideoState::Ready).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_by_name_is_exact_match() {
        let repo = InMemoryVideoRepository::new(BASE);
        repo.create(metadata("Intro", 30)).await.unwrap();
        repo.create(metadata("Intro", 60)).await.unwrap();
        repo.create(metadata("Introduction", 90)).await.unwrap();

        let matches = repo.find_by_name("Intro").await.unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|v| v.title == "Intro"));

        assert!(repo.find_by_name("Missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_duration_less_than_is_strict() {
        let repo = InMemoryVideoRepository::new(BASE);
        repo.create(metadata("short", 10)).await.unwrap();
        repo.create(metadata("exact", 30)).await.unwrap();
        repo.create(metadata("long", 50)).await.unwrap();

        let matches = repo.find_by_duration_less_than(30).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "short");

        assert!(repo.find_by_duration_less_than(5).await.unwrap().is_empty());
    }
}
