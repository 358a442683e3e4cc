//! VisualQuest — session event store.
//!
//! Sessions live only for the lifetime of the process, so the sole
//! implementation keeps streams in process memory.

pub mod memory_event_repository;

pub use memory_event_repository::InMemoryEventRepository;
