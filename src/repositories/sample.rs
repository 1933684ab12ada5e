use crate::{
    database::Database,
    error::{AppError, AppResult},
    models::{
        CreateSampleRequest, PagedResult, Pagination, Sample, SampleFilter, UpdateSampleRequest,
    },
};
use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

const COLUMNS: &str = "id, sample_id, name, owner_id, status, created_at, updated_at";

/// 样本仓库
///
/// 除插入外，所有查询都带有 `owner_id = 请求者` 条件，未归属请求者的样本对其不可见。
#[derive(Clone)]
pub struct SampleRepository {
    db: Database,
}

impl SampleRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 创建样本（在调用方事务中执行）
    pub async fn insert(
        conn: &mut PgConnection,
        owner_id: Uuid,
        request: &CreateSampleRequest,
    ) -> AppResult<Sample> {
        let now = chrono::Utc::now();
        let sample_id = request.sample_id.trim();

        let query = format!(
            "INSERT INTO samples (id, sample_id, name, owner_id, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sample>(&query)
            .bind(Uuid::new_v4())
            .bind(sample_id)
            .bind(request.name.trim())
            .bind(owner_id)
            .bind(request.status.unwrap_or_default())
            .bind(now)
            .bind(now)
            .fetch_one(conn)
            .await
            .map_err(|e| {
                AppError::unique_violation(e, &format!("样本编号 {} 已存在", sample_id))
            })
    }

    /// 根据ID查找请求者拥有的样本
    pub async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<Sample>> {
        let query = format!("SELECT {COLUMNS} FROM samples WHERE id = $1 AND owner_id = $2");
        let sample = sqlx::query_as::<_, Sample>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(sample)
    }

    /// 在调用方事务中锁定请求者拥有的样本行（SELECT ... FOR UPDATE）
    ///
    /// 同一样本的并发更新在此串行化，保证读取到的旧状态即为上一次提交的状态。
    pub async fn lock_owned(
        conn: &mut PgConnection,
        id: Uuid,
        owner_id: Uuid,
    ) -> AppResult<Option<Sample>> {
        let query = format!(
            "SELECT {COLUMNS} FROM samples WHERE id = $1 AND owner_id = $2 FOR UPDATE"
        );
        let sample = sqlx::query_as::<_, Sample>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(conn)
            .await?;

        Ok(sample)
    }

    /// 分页查询请求者拥有的样本，按创建时间倒序
    pub async fn list_owned(
        &self,
        owner_id: Uuid,
        filter: &SampleFilter,
        pagination: &Pagination,
    ) -> AppResult<PagedResult<Sample>> {
        let mut query_builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM samples WHERE owner_id = "));
        query_builder.push_bind(owner_id);

        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM samples WHERE owner_id = ");
        count_builder.push_bind(owner_id);

        // 应用过滤条件
        Self::apply_filter(&mut query_builder, filter);
        Self::apply_filter(&mut count_builder, filter);

        query_builder.push(" ORDER BY created_at DESC, id");
        query_builder.push(" LIMIT ");
        query_builder.push_bind(pagination.limit());
        query_builder.push(" OFFSET ");
        query_builder.push_bind(pagination.offset());

        let samples = query_builder
            .build_query_as::<Sample>()
            .fetch_all(self.db.pool())
            .await?;

        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(self.db.pool())
            .await?;

        Ok(PagedResult::new(
            samples,
            total,
            pagination.page,
            pagination.page_size,
        ))
    }

    /// 更新样本（在调用方事务中执行，调用方须先通过 lock_owned 锁定该行）
    pub async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        request: &UpdateSampleRequest,
    ) -> AppResult<Sample> {
        let sample_id = request.sample_id.as_deref().map(str::trim);

        let query = format!(
            "UPDATE samples SET
                sample_id = COALESCE($2, sample_id),
                name = COALESCE($3, name),
                status = COALESCE($4, status),
                updated_at = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sample>(&query)
            .bind(id)
            .bind(sample_id)
            .bind(request.name.as_deref().map(str::trim))
            .bind(request.status)
            .bind(chrono::Utc::now())
            .fetch_one(conn)
            .await
            .map_err(|e| {
                AppError::unique_violation(
                    e,
                    &format!("样本编号 {} 已存在", sample_id.unwrap_or_default()),
                )
            })
    }

    /// 删除请求者拥有的样本；工作项与审计日志由外键级联删除
    pub async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM samples WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 应用过滤条件
    fn apply_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &SampleFilter) {
        if let Some(status) = filter.status {
            builder.push(" AND status = ");
            builder.push_bind(status);
        }

        if let Some(search) = filter.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                let pattern = format!("%{}%", escape_like(search));
                builder.push(" AND (sample_id ILIKE ");
                builder.push_bind(pattern.clone());
                builder.push(" OR name ILIKE ");
                builder.push_bind(pattern);
                builder.push(")");
            }
        }
    }
}

/// 转义 LIKE 模式中的通配符
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
