pub mod http;
pub mod local;
pub mod traits;

pub use http::HttpTaskApi;
pub use local::LocalTaskApi;
pub use traits::TaskApi;
