pub mod adapter;
pub mod keys;
pub mod serialization;
pub mod store;
pub mod traits;

pub use adapter::CacheAdapter;
pub use serialization::*;
pub use store::*;
pub use traits::*;
