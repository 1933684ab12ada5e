use crate::{
    database::Database,
    error::AppResult,
    models::{AuditEntry, AuditEntryView},
};
use sqlx::PgConnection;
use uuid::Uuid;

const VIEW_QUERY: &str = "SELECT a.id, a.sample_id, u.username AS actor_username, a.action, a.timestamp
                          FROM audit_entries a
                          LEFT JOIN users u ON u.id = a.actor_id";

/// 审计日志仓库：只提供追加与查询，不提供修改和删除
#[derive(Clone)]
pub struct AuditRepository {
    db: Database,
}

impl AuditRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 追加一条审计日志（在样本变更所在的事务中执行）
    pub async fn append(
        conn: &mut PgConnection,
        sample_id: Uuid,
        actor_id: Option<Uuid>,
        action: &str,
    ) -> AppResult<AuditEntry> {
        let entry = sqlx::query_as::<_, AuditEntry>(
            r#"
            INSERT INTO audit_entries (id, sample_id, actor_id, action, timestamp)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, sample_id, actor_id, action, timestamp
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sample_id)
        .bind(actor_id)
        .bind(action)
        .bind(chrono::Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(entry)
    }

    /// 查询单个样本的审计历史，按创建时间升序
    pub async fn list_for_sample(&self, sample_id: Uuid) -> AppResult<Vec<AuditEntryView>> {
        let query = format!("{VIEW_QUERY} WHERE a.sample_id = $1 ORDER BY a.timestamp, a.seq");
        let entries = sqlx::query_as::<_, AuditEntryView>(&query)
            .bind(sample_id)
            .fetch_all(self.db.pool())
            .await?;

        Ok(entries)
    }

    /// 批量查询多个样本的审计历史，按样本、创建时间升序
    pub async fn list_for_samples(&self, sample_ids: &[Uuid]) -> AppResult<Vec<AuditEntryView>> {
        if sample_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "{VIEW_QUERY} WHERE a.sample_id = ANY($1) ORDER BY a.sample_id, a.timestamp, a.seq"
        );
        let entries = sqlx::query_as::<_, AuditEntryView>(&query)
            .bind(sample_ids)
            .fetch_all(self.db.pool())
            .await?;

        Ok(entries)
    }
}
