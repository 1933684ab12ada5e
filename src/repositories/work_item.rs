use crate::{
    database::Database,
    error::{AppError, AppResult},
    models::{CreateWorkItemRequest, UpdateWorkItemRequest, WorkItem, WorkItemFilter},
};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

const COLUMNS: &str = "w.id, w.sample_id, w.kind, w.name, w.status, w.priority, w.due_date, \
                       w.analyst_id, w.result_text, w.result_numeric, w.created_at, w.updated_at";

/// 工作项仓库
///
/// 工作项没有独立的归属检查：所有读写都通过连接父样本并匹配 `samples.owner_id` 完成。
#[derive(Clone)]
pub struct WorkItemRepository {
    db: Database,
}

impl WorkItemRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 在样本下创建工作项（调用方须已确认父样本归属请求者）
    pub async fn insert(
        &self,
        sample_pk: Uuid,
        request: &CreateWorkItemRequest,
    ) -> AppResult<WorkItem> {
        let now = chrono::Utc::now();
        let query = format!(
            "INSERT INTO work_items AS w (
                id, sample_id, kind, name, status, priority, due_date,
                analyst_id, result_text, result_numeric, created_at, updated_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, WorkItem>(&query)
            .bind(Uuid::new_v4())
            .bind(sample_pk)
            .bind(request.kind.unwrap_or_default())
            .bind(request.name.trim())
            .bind(request.status.unwrap_or_default())
            .bind(request.priority.unwrap_or_default())
            .bind(request.due_date)
            .bind(request.analyst_id)
            .bind(request.result_text.as_deref())
            .bind(request.result_numeric)
            .bind(now)
            .bind(now)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| AppError::foreign_key_violation(e, "样本或指派的分析员不存在"))
    }

    /// 列出样本下的工作项（父样本不属于请求者时为空），按创建时间升序
    pub async fn list_for_sample(
        &self,
        sample_pk: Uuid,
        owner_id: Uuid,
        filter: &WorkItemFilter,
    ) -> AppResult<Vec<WorkItem>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM work_items w
             JOIN samples s ON s.id = w.sample_id
             WHERE w.sample_id = "
        ));
        builder.push_bind(sample_pk);
        builder.push(" AND s.owner_id = ");
        builder.push_bind(owner_id);

        if let Some(status) = filter.status {
            builder.push(" AND w.status = ");
            builder.push_bind(status);
        }
        if let Some(priority) = filter.priority {
            builder.push(" AND w.priority = ");
            builder.push_bind(priority);
        }
        if let Some(analyst_id) = filter.analyst_id {
            builder.push(" AND w.analyst_id = ");
            builder.push_bind(analyst_id);
        }

        builder.push(" ORDER BY w.created_at, w.id");

        let items = builder
            .build_query_as::<WorkItem>()
            .fetch_all(self.db.pool())
            .await?;

        Ok(items)
    }

    /// 查找样本下的单个工作项
    pub async fn find_for_sample(
        &self,
        id: Uuid,
        sample_pk: Uuid,
        owner_id: Uuid,
    ) -> AppResult<Option<WorkItem>> {
        let query = format!(
            "SELECT {COLUMNS} FROM work_items w
             JOIN samples s ON s.id = w.sample_id
             WHERE w.id = $1 AND w.sample_id = $2 AND s.owner_id = $3"
        );
        let item = sqlx::query_as::<_, WorkItem>(&query)
            .bind(id)
            .bind(sample_pk)
            .bind(owner_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(item)
    }

    /// 更新样本下的工作项；不存在或父样本不属于请求者时返回 None
    ///
    /// 可置空字段按"是否提供"与"提供的值"分别绑定，显式 `null` 会清空该列。
    pub async fn update(
        &self,
        id: Uuid,
        sample_pk: Uuid,
        owner_id: Uuid,
        request: &UpdateWorkItemRequest,
    ) -> AppResult<Option<WorkItem>> {
        let query = format!(
            "UPDATE work_items AS w SET
                name = COALESCE($4, w.name),
                kind = COALESCE($5, w.kind),
                status = COALESCE($6, w.status),
                priority = COALESCE($7, w.priority),
                due_date = CASE WHEN $8 THEN $9 ELSE w.due_date END,
                analyst_id = CASE WHEN $10 THEN $11 ELSE w.analyst_id END,
                result_text = CASE WHEN $12 THEN $13 ELSE w.result_text END,
                result_numeric = CASE WHEN $14 THEN $15 ELSE w.result_numeric END,
                updated_at = $16
             FROM samples s
             WHERE w.id = $1 AND w.sample_id = $2 AND s.id = w.sample_id AND s.owner_id = $3
             RETURNING {COLUMNS}"
        );

        let item = sqlx::query_as::<_, WorkItem>(&query)
            .bind(id)
            .bind(sample_pk)
            .bind(owner_id)
            .bind(request.name.as_deref().map(str::trim))
            .bind(request.kind)
            .bind(request.status)
            .bind(request.priority)
            .bind(request.due_date.is_some())
            .bind(request.due_date.flatten())
            .bind(request.analyst_id.is_some())
            .bind(request.analyst_id.flatten())
            .bind(request.result_text.is_some())
            .bind(request.result_text.as_ref().and_then(|v| v.as_deref()))
            .bind(request.result_numeric.is_some())
            .bind(request.result_numeric.flatten())
            .bind(chrono::Utc::now())
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| AppError::foreign_key_violation(e, "指派的分析员不存在"))?;

        Ok(item)
    }

    /// 删除样本下的工作项；不存在或父样本不属于请求者时返回 false
    pub async fn delete_for_sample(
        &self,
        id: Uuid,
        sample_pk: Uuid,
        owner_id: Uuid,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM work_items w USING samples s
             WHERE w.id = $1 AND w.sample_id = $2 AND s.id = w.sample_id AND s.owner_id = $3",
        )
        .bind(id)
        .bind(sample_pk)
        .bind(owner_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
