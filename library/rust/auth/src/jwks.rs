//! JWKS キャッシュ: 署名鍵セットの取得・TTL キャッシュ・stale フォールバック。

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::discovery::KeyEndpointResolver;
use crate::verifier::AuthError;

/// JWKS レスポンスの構造体。
#[derive(Debug, Clone, Deserialize)]
struct JwksResponse {
    keys: Vec<RawJwk>,
}

/// エンドポイントが返す個々の鍵。RSA 以外の鍵種も届き得るため
/// フィールドはすべて Option で受け、変換時に選別する。
#[derive(Debug, Clone, Deserialize)]
struct RawJwk {
    kid: Option<String>,
    kty: Option<String>,
    #[serde(rename = "use")]
    key_use: Option<String>,
    n: Option<String>,
    e: Option<String>,
}

/// JwkKey は取得した RSA 署名鍵の公開情報。IdP から供給され、永続化されない。
#[derive(Debug, Clone)]
pub struct JwkKey {
    pub kid: String,
    pub kty: String,
    pub key_use: Option<String>,
    pub n: String,
    pub e: String,
}

/// KeySet はある時点で取得した鍵の集合。更新時は丸ごと置き換え、
/// fetched_at は置き換えごとに単調増加する。
#[derive(Debug, Clone)]
pub struct KeySet {
    pub keys: Vec<JwkKey>,
    pub fetched_at: Instant,
}

/// JwksFetcher は JWKS エンドポイントからの鍵取得を抽象化するトレイト。
#[async_trait::async_trait]
pub trait JwksFetcher: Send + Sync {
    async fn fetch_keys(&self, jwks_url: &str) -> Result<Vec<JwkKey>, AuthError>;
}

/// DefaultJwksFetcher は HTTP 経由で JWKS を取得するデフォルト実装。
pub struct DefaultJwksFetcher {
    client: reqwest::Client,
}

impl DefaultJwksFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl JwksFetcher for DefaultJwksFetcher {
    async fn fetch_keys(&self, jwks_url: &str) -> Result<Vec<JwkKey>, AuthError> {
        let response = self
            .client
            .get(jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::JwksFetchFailed(format!("{jwks_url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::JwksFetchFailed(format!(
                "{jwks_url}: non-success status: {status}"
            )));
        }

        let jwks: JwksResponse = response
            .json()
            .await
            .map_err(|e| AuthError::JwksFetchFailed(format!("{jwks_url}: {e}")))?;

        let mut keys = Vec::new();
        for raw in jwks.keys {
            match (raw.kid, raw.kty, raw.n, raw.e) {
                (Some(kid), Some(kty), Some(n), Some(e)) if kty == "RSA" => {
                    debug!(kid = %kid, "loaded JWK");
                    keys.push(JwkKey {
                        kid,
                        kty,
                        key_use: raw.key_use,
                        n,
                        e,
                    });
                }
                (kid, kty, _, _) => {
                    warn!(kid = ?kid, kty = ?kty, "skipping unusable JWK");
                }
            }
        }

        Ok(keys)
    }
}

/// JwksCache は鍵セットの TTL キャッシュ。
/// リフレッシュ失敗時に過去の鍵セットが残っていればそれを返す
/// （stale-while-revalidate）。一時的な IdP 障害でキャッシュ済みの鍵で
/// 署名されたトークンの検証を止めないための方針。
pub struct JwksCache {
    resolver: KeyEndpointResolver,
    ttl: Duration,
    cache: RwLock<Option<KeySet>>,
    fetcher: Arc<dyn JwksFetcher>,
}

impl JwksCache {
    pub fn new(resolver: KeyEndpointResolver, ttl: Duration, fetcher: Arc<dyn JwksFetcher>) -> Self {
        Self {
            resolver,
            ttl,
            cache: RwLock::new(None),
            fetcher,
        }
    }

    /// 鍵セットを取得する。
    /// force_refresh が false で TTL 内のキャッシュがあればネットワーク
    /// アクセスなしで返す。リフレッシュに失敗した場合、過去の鍵セットが
    /// あれば警告ログと共にそれを返し、初回フェッチの失敗のみエラーとする。
    pub async fn get_keys(&self, force_refresh: bool) -> Result<Vec<JwkKey>, AuthError> {
        if !force_refresh {
            // Read lock でキャッシュを確認
            let cache = self.cache.read().await;
            if let Some(ref c) = *cache {
                if c.fetched_at.elapsed() < self.ttl {
                    return Ok(c.keys.clone());
                }
            }
        }

        // Write lock で再取得
        let mut cache = self.cache.write().await;

        // ダブルチェック（強制リフレッシュ時は飛ばす）
        if !force_refresh {
            if let Some(ref c) = *cache {
                if c.fetched_at.elapsed() < self.ttl {
                    return Ok(c.keys.clone());
                }
            }
        }

        let fetched = match self.resolver.resolve().await {
            Ok(url) => self.fetcher.fetch_keys(&url).await,
            Err(e) => Err(e),
        };

        match fetched {
            Ok(keys) => {
                *cache = Some(KeySet {
                    keys: keys.clone(),
                    fetched_at: Instant::now(),
                });
                Ok(keys)
            }
            Err(e) => {
                if let Some(ref stale) = *cache {
                    warn!(
                        error = %e,
                        age_secs = stale.fetched_at.elapsed().as_secs(),
                        "JWKS refresh failed, serving stale key set"
                    );
                    Ok(stale.keys.clone())
                } else {
                    Err(e)
                }
            }
        }
    }
}
