//! JWKS エンドポイントの解決（明示設定または OIDC ディスカバリ）。

use serde::Deserialize;

use crate::verifier::AuthError;

/// OIDC ディスカバリ文書のうち、このライブラリが使用するフィールド。
#[derive(Debug, Clone, Deserialize)]
struct DiscoveryDocument {
    jwks_uri: String,
}

/// issuer からディスカバリ文書の URL を構築する。
/// issuer 末尾のスラッシュは除去し、二重スラッシュを作らない。
pub fn discovery_url(issuer: &str) -> String {
    format!(
        "{}/.well-known/openid-configuration",
        issuer.trim_end_matches('/')
    )
}

/// KeyEndpointResolver は JWKS エンドポイント URL を解決する。
/// 明示的に URL が設定されていればそれを返し、なければ issuer の
/// ディスカバリ文書を取得して jwks_uri を抽出する。
/// 解決結果はこのコンポーネントではキャッシュしない（鍵フェッチごとに
/// 一度だけ呼ばれる）。
pub struct KeyEndpointResolver {
    jwks_url: Option<String>,
    issuer: String,
    client: reqwest::Client,
}

impl KeyEndpointResolver {
    pub fn new(issuer: &str, jwks_url: Option<String>, client: reqwest::Client) -> Self {
        Self {
            jwks_url,
            issuer: issuer.to_string(),
            client,
        }
    }

    /// JWKS エンドポイント URL を解決する。
    /// 明示設定がある場合はネットワークアクセスなしで返す。
    pub async fn resolve(&self) -> Result<String, AuthError> {
        if let Some(ref url) = self.jwks_url {
            return Ok(url.clone());
        }

        let url = discovery_url(&self.issuer);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AuthError::DiscoveryFailed {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::DiscoveryFailed {
                url,
                reason: format!("non-success status: {status}"),
            });
        }

        let doc: DiscoveryDocument =
            response
                .json()
                .await
                .map_err(|e| AuthError::DiscoveryFailed {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;

        Ok(doc.jwks_uri)
    }
}
