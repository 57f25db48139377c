//! Authentication and session-token lifecycle.
//!
//! Credential verification, signed-token issuance with distinct
//! access/refresh lifetimes, refresh-token persistence with single-use
//! rotation, and revocation.

pub mod handlers;
pub mod password;
pub mod service;
pub mod token;

pub use service::{AuthService, RefreshTokenStore, SessionTokens, UserStore};
pub use token::{Claims, TokenCodec, TokenPair};
