pub mod manager;
pub mod store;

pub use manager::{resolve_cache, CacheLookup, CacheManager};
pub use store::CacheStore;
