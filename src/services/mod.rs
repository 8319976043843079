pub mod user_store;
pub mod mongo_store;
pub mod memory_store;

pub use user_store::*;
pub use mongo_store::MongoUserStore;
pub use memory_store::MemoryUserStore;
