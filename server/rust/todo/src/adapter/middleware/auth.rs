use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error, warn};

use crate::adapter::handler::{AppState, ErrorResponse};
use crate::infrastructure::{AuthError, TokenVerifier};

/// AuthState は認証ミドルウェアが使用する共有状態。
/// issuer / audience が設定されている場合にのみ構築される。
#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Authorization ヘッダーから Bearer トークンを取り出すヘルパー。
/// 成功した場合はトークン文字列を返す。ヘッダーがない・形式が違う場合は None を返す。
pub fn extract_bearer_token<B>(req: &Request<B>) -> Option<String> {
    let auth_header = req.headers().get(header::AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// auth_middleware は Bearer トークンを検証し、認証済み identity を
/// リクエスト拡張に格納する axum ミドルウェア。
///
/// - 認証未設定（issuer / audience 不足）は 501 を返す。検証を黙って
///   スキップすることはない。
/// - トークンなし・無効なトークンは 401 と WWW-Authenticate: Bearer。
///   資格情報エラーの詳細な原因はクライアントに開示しない。
/// - 鍵取得・ディスカバリの基盤障害は 500。資格情報エラーと区別する。
/// - 検証成功後にユーザーレコードを同期する。同期の失敗はログに残して
///   握りつぶし、認証済みリクエストを落とさない。
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(ref auth) = state.auth else {
        return (
            StatusCode::NOT_IMPLEMENTED,
            Json(ErrorResponse::new(
                "TODO_AUTH_NOT_CONFIGURED",
                "OIDC authentication is not configured on this server",
            )),
        )
            .into_response();
    };

    let token = match extract_bearer_token(&req) {
        Some(t) => t,
        None => {
            return unauthorized(
                "TODO_AUTH_MISSING_TOKEN",
                "Authorization header with Bearer token is required",
            );
        }
    };

    match auth.verifier.verify_token(&token).await {
        Ok(identity) => {
            if let Err(e) = state.reconcile_user_uc.execute(&identity).await {
                // 認証は既に成功しているため、レコード同期の失敗でリクエストは落とさない
                warn!(user_id = %identity.id, error = %e, "user reconciliation failed");
            }
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(e @ AuthError::DiscoveryFailed { .. }) | Err(e @ AuthError::JwksFetchFailed(_)) => {
            error!(error = %e, "token validation infrastructure failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "TODO_AUTH_JWKS_ERROR",
                    "Failed to reach the identity provider",
                )),
            )
                .into_response()
        }
        Err(e) => {
            debug!(error = %e, "token validation failed");
            unauthorized("TODO_AUTH_INVALID_TOKEN", "Token validation failed")
        }
    }
}

fn unauthorized(code: &str, message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        Json(ErrorResponse::new(code, message)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;

    fn make_request_with_header(header_value: &str) -> Request<Body> {
        Request::builder()
            .header("Authorization", header_value)
            .body(Body::empty())
            .unwrap()
    }

    fn make_request_without_auth() -> Request<Body> {
        Request::builder().body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_bearer_token_valid() {
        let req = make_request_with_header("Bearer my-secret-token");
        let token = extract_bearer_token(&req);
        assert_eq!(token, Some("my-secret-token".to_string()));
    }

    #[test]
    fn test_extract_bearer_token_no_header() {
        let req = make_request_without_auth();
        let token = extract_bearer_token(&req);
        assert_eq!(token, None);
    }

    #[test]
    fn test_extract_bearer_token_wrong_scheme() {
        let req = make_request_with_header("Basic dXNlcjpwYXNz");
        let token = extract_bearer_token(&req);
        assert_eq!(token, None);
    }

    #[test]
    fn test_extract_bearer_token_empty_token() {
        let req = make_request_with_header("Bearer ");
        let token = extract_bearer_token(&req);
        assert_eq!(token, None);
    }

    #[test]
    fn test_extract_bearer_token_bearer_only_no_space() {
        // "Bearer" だけで後のスペースも値もない場合
        let req = make_request_with_header("Bearer");
        let token = extract_bearer_token(&req);
        assert_eq!(token, None);
    }

    mod middleware_tests {
        use super::*;
        use crate::adapter::handler::AppState;
        use crate::domain::entity::identity::AuthenticatedIdentity;
        use crate::domain::repository::todo_repository::MockTodoRepository;
        use crate::domain::repository::user_repository::MockUserRepository;
        use crate::infrastructure::MockTokenVerifier;
        use axum::middleware;
        use axum::routing::get;
        use axum::{Extension, Router};
        use std::sync::Arc;
        use tower::ServiceExt;

        fn make_identity() -> AuthenticatedIdentity {
            AuthenticatedIdentity {
                id: "user-sub-1234".to_string(),
                email: "taro@example.com".to_string(),
                name: None,
                picture: None,
            }
        }

        fn make_state(
            verifier: Option<MockTokenVerifier>,
            user_repo: MockUserRepository,
        ) -> AppState {
            AppState::new(
                Arc::new(MockTodoRepository::new()),
                Arc::new(user_repo),
                verifier.map(|v| AuthState {
                    verifier: Arc::new(v),
                }),
                None,
            )
        }

        fn make_app(state: AppState) -> Router {
            Router::new()
                .route(
                    "/protected",
                    get(|Extension(identity): Extension<AuthenticatedIdentity>| async move {
                        axum::Json(serde_json::json!({"id": identity.id}))
                    }),
                )
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                ))
                .with_state(state)
        }

        #[tokio::test]
        async fn missing_token_returns_401_with_www_authenticate() {
            let state = make_state(Some(MockTokenVerifier::new()), MockUserRepository::new());
            let app = make_app(state);

            let req = Request::builder()
                .uri("/protected")
                .body(Body::empty())
                .unwrap();
            let resp = app.oneshot(req).await.unwrap();

            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                resp.headers().get("www-authenticate").unwrap(),
                "Bearer"
            );

            let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
                .await
                .unwrap();
            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["error"]["code"], "TODO_AUTH_MISSING_TOKEN");
        }

        #[tokio::test]
        async fn invalid_token_returns_401() {
            let mut verifier = MockTokenVerifier::new();
            verifier
                .expect_verify_token()
                .returning(|_| Err(AuthError::InvalidToken("bad signature".into())));

            let state = make_state(Some(verifier), MockUserRepository::new());
            let app = make_app(state);

            let req = Request::builder()
                .uri("/protected")
                .header("Authorization", "Bearer invalid-token")
                .body(Body::empty())
                .unwrap();
            let resp = app.oneshot(req).await.unwrap();

            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

            let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
                .await
                .unwrap();
            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["error"]["code"], "TODO_AUTH_INVALID_TOKEN");
        }

        #[tokio::test]
        async fn jwks_failure_returns_500() {
            let mut verifier = MockTokenVerifier::new();
            verifier
                .expect_verify_token()
                .returning(|_| Err(AuthError::JwksFetchFailed("connection refused".into())));

            let state = make_state(Some(verifier), MockUserRepository::new());
            let app = make_app(state);

            let req = Request::builder()
                .uri("/protected")
                .header("Authorization", "Bearer some-token")
                .body(Body::empty())
                .unwrap();
            let resp = app.oneshot(req).await.unwrap();

            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

            let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
                .await
                .unwrap();
            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["error"]["code"], "TODO_AUTH_JWKS_ERROR");
        }

        #[tokio::test]
        async fn not_configured_returns_501_even_with_token() {
            let state = make_state(None, MockUserRepository::new());
            let app = make_app(state);

            let req = Request::builder()
                .uri("/protected")
                .header("Authorization", "Bearer some-token")
                .body(Body::empty())
                .unwrap();
            let resp = app.oneshot(req).await.unwrap();

            assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);

            let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
                .await
                .unwrap();
            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["error"]["code"], "TODO_AUTH_NOT_CONFIGURED");
        }

        #[tokio::test]
        async fn valid_token_passes_identity_and_reconciles() {
            let mut verifier = MockTokenVerifier::new();
            verifier
                .expect_verify_token()
                .returning(|_| Ok(make_identity()));

            let mut user_repo = MockUserRepository::new();
            user_repo
                .expect_find_by_id()
                .withf(|id| id == "user-sub-1234")
                .times(1)
                .returning(|_| Ok(None));
            user_repo.expect_upsert().times(1).returning(|_| Ok(()));

            let state = make_state(Some(verifier), user_repo);
            let app = make_app(state);

            let req = Request::builder()
                .uri("/protected")
                .header("Authorization", "Bearer valid-token")
                .body(Body::empty())
                .unwrap();
            let resp = app.oneshot(req).await.unwrap();

            assert_eq!(resp.status(), StatusCode::OK);

            let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
                .await
                .unwrap();
            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["id"], "user-sub-1234");
        }

        #[tokio::test]
        async fn reconciliation_failure_does_not_fail_request() {
            let mut verifier = MockTokenVerifier::new();
            verifier
                .expect_verify_token()
                .returning(|_| Ok(make_identity()));

            let mut user_repo = MockUserRepository::new();
            user_repo
                .expect_find_by_id()
                .returning(|_| Err(anyhow::anyhow!("storage down")));

            let state = make_state(Some(verifier), user_repo);
            let app = make_app(state);

            let req = Request::builder()
                .uri("/protected")
                .header("Authorization", "Bearer valid-token")
                .body(Body::empty())
                .unwrap();
            let resp = app.oneshot(req).await.unwrap();

            assert_eq!(resp.status(), StatusCode::OK);
        }
    }
}
