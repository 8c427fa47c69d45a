use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Readiness of a video's binary payload.
///
/// A video is `Created` when only its metadata exists and becomes `Ready`
/// once its binary data has been fully accepted. The data-upload endpoint
/// returns this state as a bare JSON string (`"READY"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoState {
    Created,
    Ready,
}

impl Display for VideoState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            VideoState::Created => write!(f, "CREATED"),
            VideoState::Ready => write!(f, "READY"),
        }
    }
}

impl FromStr for VideoState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(VideoState::Created),
            "READY" => Ok(VideoState::Ready),
            other => Err(AppError::Internal(format!(
                "Unknown video state '{}' in store",
                other
            ))),
        }
    }
}

/// A stored video record: metadata, payload readiness, and like state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Server-assigned identifier, unique and monotonically increasing.
    pub id: i64,
    pub title: String,
    /// Length in seconds.
    pub duration: i64,
    pub content_type: String,
    /// Where the binary payload can be fetched from once the video is ready.
    pub data_url: String,
    pub state: VideoState,
    /// Count of distinct likers; always equals `user_likes.len()`.
    pub likes: i64,
    pub user_likes: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl Video {
    /// Record a like by `user`. Returns false (and leaves the record
    /// unchanged) when the user already liked this video.
    pub fn like(&mut self, user: &str) -> bool {
        let inserted = self.user_likes.insert(user.to_string());
        if inserted {
            self.likes = self.user_likes.len() as i64;
        }
        inserted
    }

    /// Remove a like by `user`. Returns false (and leaves the record
    /// unchanged) when the user never liked this video.
    pub fn unlike(&mut self, user: &str) -> bool {
        let removed = self.user_likes.remove(user);
        if removed {
            self.likes = self.user_likes.len() as i64;
        }
        removed
    }

    /// The liker set as an ordered list of user ids.
    pub fn liked_by(&self) -> Vec<String> {
        self.user_likes.iter().cloned().collect()
    }
}

/// Client-submitted metadata for a new video. Server-assigned fields
/// (`id`, `dataUrl`, `state`, like state) are rejected implicitly by
/// not existing here.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewVideo {
    pub title: String,
    pub duration: i64,
    pub content_type: String,
}

impl NewVideo {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.duration < 0 {
            return Err(AppError::InvalidInput(format!(
                "Duration must be non-negative, got {}",
                self.duration
            )));
        }
        Ok(())
    }
}

/// Derive the payload URL for a video id from the configured public base URL.
pub fn data_url(base_url: &str, id: i64) -> String {
    format!("{}/video/{}/data", base_url.trim_end_matches('/'), id)
}
