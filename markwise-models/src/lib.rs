//! Model access for markwise.
//!
//! This crate provides:
//! - Provider trait for a unified chat-completion interface
//! - An OpenAI-compatible HTTP provider and a scripted provider for tests
//! - Credential management for API keys
//! - Strict parsing of structured (JSON) model output
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  ModelProvider                       │
//! │  ┌──────────────────────┐  ┌──────────────────────┐  │
//! │  │  OpenAiCompatProvider│  │   ScriptedProvider   │  │
//! │  └──────────────────────┘  └──────────────────────┘  │
//! └─────────────────────────────────────────────────────┘
//!            │                            │
//!            ▼                            ▼
//! ┌──────────────────────┐  ┌──────────────────────────┐
//! │   CredentialStore    │  │  structured::parse_*     │
//! │ (Keyring + Env)      │  │  (extract, deserialize,  │
//! │                      │  │   validate)              │
//! └──────────────────────┘  └──────────────────────────┘
//! ```

mod error;

pub mod auth;
pub mod providers;
pub mod structured;

pub use error::{Error, Result};
pub use structured::{Validate, parse_structured};
