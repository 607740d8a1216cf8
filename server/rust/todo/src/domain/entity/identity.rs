/// AuthenticatedIdentity は検証済みトークンから導出した認証済みユーザー。
/// リクエスト処理の間だけ生きる値で、リクエスト拡張に格納され、
/// リソース層は id を所有者フィルタとして読む。
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}
