//! todo-server: OIDC Bearer トークン認証付き Todo API サーバー。
//!
//! 認証済みユーザーごとに Todo リソースをスコープする REST API。
//! トークン検証と鍵管理は todo-auth ライブラリに委譲し、このクレートは
//! 認証ミドルウェア・ユーザーレコードの同期・CRUD を提供する。

pub mod adapter;
pub mod domain;
pub mod infrastructure;
pub mod usecase;
