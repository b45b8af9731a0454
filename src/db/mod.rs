pub mod memory;
pub mod postgres;
pub mod redis;
pub mod seed;
pub mod store;

pub use memory::{MemoryContentStore, MemoryUserStore};
pub use postgres::{create_pool, run_migrations, PgContentStore, PgUserStore};
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
pub use store::{ContentStore, UserStore};
