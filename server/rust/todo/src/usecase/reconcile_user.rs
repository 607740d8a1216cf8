use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::entity::identity::AuthenticatedIdentity;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;

/// last_login をこの秒数より古いままにしない。アクティブなセッションで
/// リクエストごとに書き込みが発生しないための閾値。
pub const RECONCILE_STALENESS_SECS: i64 = 300;

#[derive(Debug, thiserror::Error)]
pub enum ReconcileUserError {
    #[error("storage error: {0}")]
    Storage(String),
}

/// ReconcileUserUseCase は認証済み identity をローカルのユーザーレコードに
/// 同期するユースケース。初回認証で作成し、プロフィールの変化または
/// last_login の陳腐化があったときだけ更新する。
///
/// 呼び出し側（認証ミドルウェア）は失敗をログに残して破棄してよい。
/// 認証は既に暗号学的に成功しており、認可判断はトークンのクレームを使う
/// ため、レコードの遅れは許容される。
pub struct ReconcileUserUseCase {
    repo: Arc<dyn UserRepository>,
}

impl ReconcileUserUseCase {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        identity: &AuthenticatedIdentity,
    ) -> Result<(), ReconcileUserError> {
        let now = Utc::now();

        let existing = self
            .repo
            .find_by_id(&identity.id)
            .await
            .map_err(|e| ReconcileUserError::Storage(e.to_string()))?;

        let Some(existing) = existing else {
            let user = User {
                id: identity.id.clone(),
                email: identity.email.clone(),
                name: identity.name.clone(),
                picture: identity.picture.clone(),
                last_login: now,
            };
            return self
                .repo
                .upsert(&user)
                .await
                .map_err(|e| ReconcileUserError::Storage(e.to_string()));
        };

        let info_changed = existing.email != identity.email
            || existing.name != identity.name
            || existing.picture != identity.picture;
        let stale = now.signed_duration_since(existing.last_login)
            > Duration::seconds(RECONCILE_STALENESS_SECS);

        if !info_changed && !stale {
            return Ok(());
        }

        let user = User {
            id: identity.id.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            picture: identity.picture.clone(),
            last_login: now,
        };
        self.repo
            .upsert(&user)
            .await
            .map_err(|e| ReconcileUserError::Storage(e.to_string()))
    }
}
