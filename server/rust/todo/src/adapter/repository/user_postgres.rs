use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;

/// UserPostgresRepository は PostgreSQL ベースのユーザーリポジトリ。
/// todo.users テーブルへの参照と upsert を提供する。
pub struct UserPostgresRepository {
    pool: PgPool,
}

impl UserPostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// UserRow は todo.users テーブルの行を表す中間構造体。
#[derive(Debug, Clone, sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    name: Option<String>,
    picture: Option<String>,
    last_login: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            picture: row.picture,
            last_login: row.last_login,
        }
    }
}

#[async_trait]
impl UserRepository for UserPostgresRepository {
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, name, picture, last_login FROM todo.users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn upsert(&self, user: &User) -> anyhow::Result<()> {
        // 同一 identity の並行 reconcile は last-write-wins で冪等
        sqlx::query(
            "INSERT INTO todo.users (id, email, name, picture, last_login) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET \
             email = EXCLUDED.email, name = EXCLUDED.name, \
             picture = EXCLUDED.picture, last_login = EXCLUDED.last_login",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.picture)
        .bind(user.last_login)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
