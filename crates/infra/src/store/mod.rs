pub mod in_memory;
pub mod market;

pub use in_memory::InMemoryStore;
pub use market::MarketStore;
