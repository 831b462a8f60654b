//! # justspace-auth
//!
//! JWT issuance and verification for justspace. The realtime hub treats
//! verification as an opaque collaborator: bearer token in, subject
//! identifier out.

pub mod jwt;

pub use jwt::claims::Claims;
pub use jwt::decoder::JwtDecoder;
pub use jwt::encoder::JwtEncoder;
