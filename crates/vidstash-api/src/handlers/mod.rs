pub mod health;
pub mod video_create;
pub mod video_data;
pub mod video_get;
pub mod video_likes;
pub mod video_search;
