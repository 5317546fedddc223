pub mod config;
pub mod error;
pub mod notice;
pub mod result;

pub use config::AppConfig;
pub use error::BoardError;
pub use notice::{Notice, NoticeLevel, NoticeLog};
pub use result::BoardResult;
