// Adapters layer: concrete implementations of the domain ports (generative backend, project store).

pub mod memory_store;
pub mod openai;

pub use memory_store::MemoryStore;
pub use openai::OpenAiBackend;
