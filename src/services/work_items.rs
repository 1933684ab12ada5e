use uuid::Uuid;

use crate::{
    database::Database,
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{CreateWorkItemRequest, UpdateWorkItemRequest, WorkItem, WorkItemFilter},
    repositories::{SampleRepository, WorkItemRepository},
    services::ownership::OwnershipGuard,
};

const WORK_ITEM_NOT_FOUND: &str = "工作项不存在";

/// 工作项服务，所有操作都经由父样本的所有者限定范围
pub struct WorkItemService {
    samples: SampleRepository,
    work_items: WorkItemRepository,
}

impl WorkItemService {
    pub fn new(db: Database) -> Self {
        Self {
            samples: SampleRepository::new(db.clone()),
            work_items: WorkItemRepository::new(db),
        }
    }

    /// 列出样本下的工作项；父样本不属于请求者时返回空列表
    pub async fn list(
        &self,
        user: &AuthUser,
        sample_pk: Uuid,
        filter: &WorkItemFilter,
    ) -> AppResult<Vec<WorkItem>> {
        self.work_items
            .list_for_sample(sample_pk, user.id, filter)
            .await
    }

    /// 在样本下创建工作项；父样本不存在或不属于请求者时返回验证错误
    pub async fn create(
        &self,
        user: &AuthUser,
        sample_pk: Uuid,
        request: CreateWorkItemRequest,
    ) -> AppResult<WorkItem> {
        request.validate().map_err(AppError::validation)?;

        let parent = self.samples.find_owned(sample_pk, user.id).await?;
        let parent = OwnershipGuard::require_parent_for_create(parent, user.id)?;

        let item = self.work_items.insert(parent.id, &request).await?;
        tracing::info!(
            work_item_id = %item.id,
            sample_id = %parent.id,
            user_id = %user.id,
            kind = ?item.kind,
            "工作项创建成功"
        );
        Ok(item)
    }

    pub async fn get(&self, user: &AuthUser, sample_pk: Uuid, id: Uuid) -> AppResult<WorkItem> {
        self.work_items
            .find_for_sample(id, sample_pk, user.id)
            .await?
            .ok_or_else(|| AppError::not_found(WORK_ITEM_NOT_FOUND))
    }

    pub async fn update(
        &self,
        user: &AuthUser,
        sample_pk: Uuid,
        id: Uuid,
        request: UpdateWorkItemRequest,
    ) -> AppResult<WorkItem> {
        request.validate().map_err(AppError::validation)?;

        let item = self
            .work_items
            .update(id, sample_pk, user.id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(WORK_ITEM_NOT_FOUND))?;

        tracing::info!(work_item_id = %item.id, user_id = %user.id, "工作项更新成功");
        Ok(item)
    }

    pub async fn delete(&self, user: &AuthUser, sample_pk: Uuid, id: Uuid) -> AppResult<()> {
        if !self
            .work_items
            .delete_for_sample(id, sample_pk, user.id)
            .await?
        {
            return Err(AppError::not_found(WORK_ITEM_NOT_FOUND));
        }

        tracing::info!(work_item_id = %id, user_id = %user.id, "工作项已删除");
        Ok(())
    }
}
