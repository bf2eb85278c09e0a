//! Tool gateway: credential store, endpoint registry, request builder,
//! transport invoker and error normalizer behind one per-capability gateway.
//!
//! ```text
//!   tool call → ToolGateway → RequestBuilder ──(CredentialStore, EndpointRegistry)
//!                                   │
//!                                   ▼
//!                           TransportInvoker ──► provider (GET)
//!                                   │
//!                        normalizer (on failure)
//!                                   ▼
//!                      provider document | classified Error
//! ```

pub mod capability;
pub mod credential;
pub mod normalizer;
pub mod request;
pub mod tool;
pub mod transport;

pub use capability::{Capability, EndpointRegistry};
pub use credential::{Credential, CredentialStore};
pub use request::{RequestBuilder, RequestDescriptor, ValidationRequest};
pub use tool::{
    CheckEmailReputationArgs, GatewaySet, ToolGateway, ValidatePhoneArgs, VerifyEmailArgs,
};
pub use transport::{HttpTransport, RawResponse, ReqwestTransport, TransportInvoker};
