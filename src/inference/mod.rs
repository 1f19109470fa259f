pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{CompletionProvider, ProviderError};
pub use providers::{GeminiProvider, ProxyProvider};
pub use types::{FALLBACK_REPLY, GenerateRequest, GenerateResponse, GenerationConfig};
