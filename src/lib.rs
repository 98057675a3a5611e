pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod logger;
pub mod path_utils;
pub mod post_helpers;
pub mod reading_time;
pub mod server;
pub mod text_utils;
pub mod view;
mod test_data;
