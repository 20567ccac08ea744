mod memory;
mod redis;

pub use memory::MemoryKvStore;
pub use redis::RedisKvStore;
