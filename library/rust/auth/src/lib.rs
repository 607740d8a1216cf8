//! todo-auth: OIDC トークン検証 + 署名鍵管理ライブラリ
//!
//! IdP が公開する JWKS エンドポイントから署名鍵を取得・キャッシュし、
//! Bearer トークンの署名・クレーム検証を行う。JWKS エンドポイントは
//! 明示設定または OIDC ディスカバリ文書から解決する。
//!
//! # 使い方
//!
//! ```ignore
//! use todo_auth::{JwksVerifier, JwksVerifierConfig};
//!
//! let verifier = JwksVerifier::new(JwksVerifierConfig::new(
//!     "https://accounts.google.com",
//!     "my-client-id",
//! ));
//!
//! let claims = verifier.verify_token("eyJ...").await?;
//! ```

pub mod claims;
pub mod discovery;
pub mod jwks;
pub mod verifier;

pub use claims::Claims;
pub use jwks::{JwkKey, JwksFetcher};
pub use verifier::{AuthError, JwksVerifier, JwksVerifierConfig};
