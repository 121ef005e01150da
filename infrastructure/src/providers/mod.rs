//! Model providers and the id-based registry that builds them.

pub mod fallback;
pub mod mock;
pub mod openai_compat;
pub mod registry;

pub use fallback::FallbackModel;
pub use mock::EchoModel;
pub use openai_compat::OpenAiCompatibleModel;
pub use registry::{ModelRegistry, RegistryError};
