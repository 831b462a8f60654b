//! Accept-time authentication — verifies the bearer token presented with
//! the upgrade request before any connection state exists.

use std::sync::Arc;

use justspace_auth::JwtDecoder;
use justspace_core::error::AppError;

/// Identity extracted from a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    /// User the connection belongs to.
    pub user_id: String,
}

/// Authenticates inbound realtime connections using JWT bearer tokens.
#[derive(Clone)]
pub struct WsAuthenticator {
    /// JWT decoder.
    decoder: Arc<JwtDecoder>,
}

impl std::fmt::Debug for WsAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsAuthenticator").finish()
    }
}

impl WsAuthenticator {
    /// Creates a new authenticator.
    pub fn new(decoder: Arc<JwtDecoder>) -> Self {
        Self { decoder }
    }

    /// Verifies the token and extracts the subject identifier.
    ///
    /// Tokens with an empty subject claim are rejected: every connection
    /// must be attributable to a user.
    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedClient, AppError> {
        let claims = self.decoder.decode(token)?;

        if claims.sub.is_empty() {
            return Err(AppError::authentication("Token has no subject"));
        }

        Ok(AuthenticatedClient {
            user_id: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use justspace_auth::JwtEncoder;
    use justspace_core::config::AuthConfig;
    use justspace_core::error::ErrorKind;

    fn authenticator_with_encoder() -> (WsAuthenticator, JwtEncoder) {
        let config = AuthConfig {
            jwt_secret: "ws-auth-test-secret".to_string(),
            ..AuthConfig::default()
        };
        (
            WsAuthenticator::new(Arc::new(JwtDecoder::new(&config))),
            JwtEncoder::new(&config),
        )
    }

    #[test]
    fn test_valid_token_yields_subject() {
        let (authenticator, encoder) = authenticator_with_encoder();
        let token = encoder.issue("u1").expect("issue");

        let client = authenticator.authenticate(&token).expect("authenticate");
        assert_eq!(client.user_id, "u1");
    }

    #[test]
    fn test_empty_subject_rejected() {
        let (authenticator, encoder) = authenticator_with_encoder();
        let token = encoder.issue("").expect("issue");

        let err = authenticator.authenticate(&token).expect_err("must reject");
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_malformed_token_rejected() {
        let (authenticator, _) = authenticator_with_encoder();
        let err = authenticator
            .authenticate("definitely.not.valid")
            .expect_err("must reject");
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}
