//! Security for the HTTP gateway.
//!
//! Chat gateways authenticate with a Bearer API key. `/health` is always
//! open.
//!
//! ```rust
//! use wordwar::security::{ApiKeyStore, AuthConfig};
//!
//! let auth = ApiKeyStore::with_keys(AuthConfig::default(), ["my-secret-key"]);
//! assert!(auth.is_valid("my-secret-key"));
//! assert_eq!(auth.extract_key("Bearer abc"), Some("abc".to_string()));
//! ```

pub mod auth;

pub use auth::{auth_middleware, generate_api_key, ApiKeyStore, AuthConfig};
