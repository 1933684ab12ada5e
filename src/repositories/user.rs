use crate::{
    database::Database,
    error::{AppError, AppResult},
    models::User,
};
use sqlx::PgConnection;
use uuid::Uuid;

const COLUMNS: &str = "id, username, email, password_hash, created_at";

/// 用户仓库
#[derive(Clone)]
pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 创建用户（在调用方事务中执行）
    pub async fn create(
        conn: &mut PgConnection,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> AppResult<User> {
        let query = format!(
            "INSERT INTO users (id, username, email, password_hash, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .bind(chrono::Utc::now())
            .fetch_one(conn)
            .await
            .map_err(|e| AppError::unique_violation(e, "用户名或邮箱已被注册"))
    }

    /// 根据ID查找用户
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(user)
    }

    /// 根据用户名查找用户（区分大小写）
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(user)
    }

    /// 删除用户；其样本、审计记录与指派关系中的引用被置空
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
