use chrono::{DateTime, Utc};

/// User は認証済み identity に対応する永続ユーザーレコード。
/// 主キーは IdP の subject。初回認証時に作成され、プロフィールの変化
/// または last_login の陳腐化で更新される。このコアからは削除しない。
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub last_login: DateTime<Utc>,
}
