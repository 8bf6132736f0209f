use crate::api::ClientError;

/// Bearer credential and acting user, as handed over by the authentication
/// collaborator.
///
/// The client treats both as given: issuing, refreshing and expiring tokens
/// happens elsewhere. Construction fails closed when either value is absent,
/// so no request can ever go out unauthenticated.
#[derive(Clone, Debug)]
pub struct Credentials {
    token: String,
    username: String,
}

impl Credentials {
    pub fn new(token: &str, username: &str) -> Result<Self, ClientError> {
        let token = token.trim();
        let username = username.trim();
        if token.is_empty() || username.is_empty() {
            return Err(ClientError::Unauthorized);
        }
        Ok(Self {
            token: token.to_string(),
            username: username.to_lowercase(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Acting user's identifier, lowercased like every username in the
    /// system.
    pub fn username(&self) -> &str {
        &self.username
    }
}
