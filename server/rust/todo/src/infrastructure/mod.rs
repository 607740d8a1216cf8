pub mod config;

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entity::identity::AuthenticatedIdentity;

pub use todo_auth::AuthError;

/// TokenVerifier はトークン検証を抽象化するトレイト。
/// ミドルウェアが資格情報エラー（401）と基盤エラー（5xx）を区別できる
/// よう、型付きの AuthError をそのまま返す。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<AuthenticatedIdentity, AuthError>;
}

/// JwksVerifierAdapter はライブラリの JwksVerifier をサーバーの
/// TokenVerifier に適合させる。
pub struct JwksVerifierAdapter {
    verifier: Arc<todo_auth::JwksVerifier>,
}

impl JwksVerifierAdapter {
    pub fn new(verifier: Arc<todo_auth::JwksVerifier>) -> Self {
        Self { verifier }
    }
}

#[async_trait]
impl TokenVerifier for JwksVerifierAdapter {
    async fn verify_token(&self, token: &str) -> Result<AuthenticatedIdentity, AuthError> {
        let claims = self.verifier.verify_token(token).await?;
        Ok(convert_claims(claims))
    }
}

fn convert_claims(c: todo_auth::Claims) -> AuthenticatedIdentity {
    AuthenticatedIdentity {
        id: c.sub,
        // email はライブラリ側で必須クレームとして検証済み
        email: c.email.unwrap_or_default(),
        name: c.name,
        picture: c.picture,
    }
}
