//! トークン検証器: kid の照合、署名・クレーム検証、鍵ローテーション回復。

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};

use crate::claims::Claims;
use crate::discovery::KeyEndpointResolver;
use crate::jwks::{DefaultJwksFetcher, JwkKey, JwksCache, JwksFetcher};

/// AuthError はトークン検証・鍵取得に関するエラーを表す。
/// 資格情報の問題（InvalidToken / TokenExpired）と基盤側の失敗
/// （DiscoveryFailed / JwksFetchFailed）を呼び出し側が区別できるよう分ける。
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("discovery failed for {url}: {reason}")]
    DiscoveryFailed { url: String, reason: String },

    #[error("JWKS fetch failed: {0}")]
    JwksFetchFailed(String),

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    InvalidToken(String),
}

/// JwksVerifier の構築設定。
#[derive(Debug, Clone)]
pub struct JwksVerifierConfig {
    /// 期待する発行者。ディスカバリの起点でもある。
    pub issuer: String,
    /// 期待するオーディエンス。
    pub audience: String,
    /// JWKS エンドポイントの明示指定。None の場合はディスカバリで解決する。
    pub jwks_url: Option<String>,
    /// 鍵キャッシュの TTL。
    pub cache_ttl: Duration,
    /// ディスカバリ・鍵フェッチ共通の HTTP タイムアウト。
    pub fetch_timeout: Duration,
}

impl JwksVerifierConfig {
    pub fn new(issuer: &str, audience: &str) -> Self {
        Self {
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            jwks_url: None,
            cache_ttl: Duration::from_secs(3600),
            fetch_timeout: Duration::from_secs(5),
        }
    }
}

/// JwksVerifier は IdP の署名鍵でトークンを検証し、Claims を返す。
pub struct JwksVerifier {
    issuer: String,
    audience: String,
    cache: JwksCache,
}

impl JwksVerifier {
    /// 新しい JwksVerifier を生成する。
    pub fn new(config: JwksVerifierConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .unwrap_or_default();
        let fetcher = Arc::new(DefaultJwksFetcher::new(client.clone()));
        Self::build(config, client, fetcher)
    }

    /// カスタムフェッチャーを使う JwksVerifier を生成する（テスト用）。
    pub fn with_fetcher(config: JwksVerifierConfig, fetcher: Arc<dyn JwksFetcher>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .unwrap_or_default();
        Self::build(config, client, fetcher)
    }

    fn build(
        config: JwksVerifierConfig,
        client: reqwest::Client,
        fetcher: Arc<dyn JwksFetcher>,
    ) -> Self {
        let resolver = KeyEndpointResolver::new(&config.issuer, config.jwks_url.clone(), client);
        let cache = JwksCache::new(resolver, config.cache_ttl, fetcher);
        Self {
            issuer: config.issuer,
            audience: config.audience,
            cache,
        }
    }

    /// JWT トークン文字列を検証し、Claims を返す。
    ///
    /// 鍵が見つからない場合は一度だけ強制リフレッシュして再走査する
    /// （キャッシュがローテーション後の鍵より古いケースの回復）。署名や
    /// クレームの検証失敗はリトライしない。
    pub async fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let header =
            decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("missing kid in header".into()))?;

        let keys = self.cache.get_keys(false).await?;

        let jwk = match find_key(&keys, &kid) {
            Some(k) => k,
            None => {
                let keys = self.cache.get_keys(true).await?;
                find_key(&keys, &kid)
                    .ok_or_else(|| AuthError::InvalidToken(format!("unknown kid: {kid}")))?
            }
        };

        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken(e.to_string()),
        })?;

        if data.claims.email.is_none() {
            return Err(AuthError::InvalidToken(
                "missing required claim: email".into(),
            ));
        }

        Ok(data.claims)
    }
}

fn find_key(keys: &[JwkKey], kid: &str) -> Option<JwkKey> {
    keys.iter().find(|k| k.kid == kid).cloned()
}
