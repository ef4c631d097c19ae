//! AI gateway for code generation, explanation, review, and test writing.
//!
//! [`AiGateway`] owns an optional [`CompletionProvider`]. Without a provider
//! credential the gateway is constructed disabled and every capability
//! fails fast with [`AiErrorKind::NotConfigured`].

pub mod anthropic;
pub mod config;
pub mod error;
pub mod gateway;
pub mod provider;

pub use config::AiConfig;
pub use error::{AiError, AiErrorKind};
pub use gateway::{AiGateway, AiStatus, Capability};
pub use provider::{Completion, CompletionProvider, CompletionRequest, TokenUsage};
