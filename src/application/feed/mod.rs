pub mod channel_profile;
pub mod list_videos;
pub mod video_detail;
pub mod views;
pub mod watch_history;
