use chrono::{DateTime, Utc};
use uuid::Uuid;

/// タイトルの最大長。
pub const TITLE_MAX_LEN: usize = 200;

/// 説明文の最大長。
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// Todo はユーザーが所有するタスク項目。owner_id は認証済みユーザーの
/// subject であり、リソース層のテナントキーとして扱う。
#[derive(Debug, Clone)]
pub struct Todo {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn new(
        owner_id: String,
        title: String,
        description: Option<String>,
        completed: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title,
            description,
            completed,
            created_at: now,
            updated_at: now,
        }
    }
}

/// タイトルを検証する。空文字と長すぎる値を拒否する。
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.is_empty() {
        return Err("title must not be empty".to_string());
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(format!("title must be at most {TITLE_MAX_LEN} characters"));
    }
    Ok(())
}

/// 説明文を検証する。
pub fn validate_description(description: Option<&str>) -> Result<(), String> {
    if let Some(d) = description {
        if d.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(format!(
                "description must be at most {DESCRIPTION_MAX_LEN} characters"
            ));
        }
    }
    Ok(())
}
