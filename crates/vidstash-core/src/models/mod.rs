pub mod video;

pub use video::{data_url, NewVideo, Video, VideoState};
