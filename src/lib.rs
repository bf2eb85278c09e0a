//! # Abstract Gateway - identity-verification tools over MCP
//!
//! Exposes three validation provider capabilities as tools:
//! - `verify_email`: email format, deliverability and quality checks
//! - `validate_phone`: phone number validity, format, carrier and location
//! - `check_email_reputation`: sender, domain, risk and breach analysis
//!
//! ## Architecture
//!
//! Every tool is an instance of one gateway pattern:
//! ```text
//!                    ┌───────────────────────────────────┐
//!   tools/call   →   │           ToolGateway             │
//!                    │  ┌──────────────┐ ┌─────────────┐ │
//!                    │  │RequestBuilder│ │ Credential  │ │
//!                    │  │              │ │   Store     │ │
//!                    │  └──────────────┘ └─────────────┘ │
//!                    │  ┌──────────────┐ ┌─────────────┐ │
//!                    │  │  Transport   │ │   Error     │ │
//!                    │  │   Invoker    │ │ Normalizer  │ │
//!                    │  └──────────────┘ └─────────────┘ │
//!                    └───────────────────────────────────┘
//! ```
//! The provider's JSON document is returned unmodified; failures surface as a
//! single classified [`Error`].

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod gateway;
pub mod mcp;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;
pub mod validation;

pub use gateway::{Capability, CredentialStore, GatewaySet, ToolGateway};
pub use types::{Config, Error, ErrorKind, Result};
