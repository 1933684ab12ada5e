use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    database::Database,
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{
        AuditEntryView, CreateSampleRequest, PagedResult, Pagination, Sample, SampleDetail,
        SampleFilter, UpdateSampleRequest, WorkItemFilter,
    },
    repositories::{AuditRepository, SampleRepository, WorkItemRepository},
    services::{
        hooks::{SampleEvent, SampleHookChain},
        ownership::{OwnershipGuard, SAMPLE_NOT_FOUND},
    },
};

/// 样本服务
///
/// 所有操作都以请求者为范围：请求者只能看到并修改自己拥有的样本。
/// 创建与更新在单个事务中完成写入与钩子执行（审计记录与样本变更同时提交或同时回滚）。
pub struct SampleService {
    db: Database,
    samples: SampleRepository,
    audits: AuditRepository,
    work_items: WorkItemRepository,
    hooks: Arc<SampleHookChain>,
}

impl SampleService {
    pub fn new(db: Database, hooks: Arc<SampleHookChain>) -> Self {
        Self {
            samples: SampleRepository::new(db.clone()),
            audits: AuditRepository::new(db.clone()),
            work_items: WorkItemRepository::new(db.clone()),
            db,
            hooks,
        }
    }

    /// 登记新样本，所有者为请求者
    pub async fn create(
        &self,
        user: &AuthUser,
        request: CreateSampleRequest,
    ) -> AppResult<SampleDetail> {
        request.validate().map_err(AppError::validation)?;

        let mut tx = self.db.pool().begin().await?;
        let sample = SampleRepository::insert(&mut *tx, user.id, &request).await?;
        self.hooks
            .run(&mut *tx, user.id, SampleEvent::Registered { sample: &sample })
            .await?;
        tx.commit().await?;

        tracing::info!(
            sample_id = %sample.id,
            external_id = %sample.sample_id,
            user_id = %user.id,
            "样本登记成功"
        );

        self.detail(user, sample, false).await
    }

    /// 更新样本
    ///
    /// 先在事务中锁定样本行并读取旧值，写入后将新旧值交给钩子链，
    /// 同一样本的并发更新因此按行串行化。
    pub async fn update(
        &self,
        user: &AuthUser,
        id: Uuid,
        request: UpdateSampleRequest,
    ) -> AppResult<SampleDetail> {
        request.validate().map_err(AppError::validation)?;

        let mut tx = self.db.pool().begin().await?;
        let locked = SampleRepository::lock_owned(&mut *tx, id, user.id).await?;
        let before = OwnershipGuard::require_owned(locked, user.id)?;

        let after = SampleRepository::update(&mut *tx, id, &request).await?;
        self.hooks
            .run(
                &mut *tx,
                user.id,
                SampleEvent::Updated {
                    before: &before,
                    after: &after,
                },
            )
            .await?;
        tx.commit().await?;

        tracing::info!(
            sample_id = %after.id,
            user_id = %user.id,
            old_status = %before.status,
            new_status = %after.status,
            "样本更新成功"
        );

        self.detail(user, after, false).await
    }

    /// 获取样本详情（含审计历史，可选含工作项）
    pub async fn get(
        &self,
        user: &AuthUser,
        id: Uuid,
        include_work_items: bool,
    ) -> AppResult<SampleDetail> {
        let sample = self.samples.find_owned(id, user.id).await?;
        let sample = OwnershipGuard::require_owned(sample, user.id)?;
        self.detail(user, sample, include_work_items).await
    }

    /// 分页列出请求者拥有的样本，每个样本附带审计历史
    pub async fn list(
        &self,
        user: &AuthUser,
        filter: &SampleFilter,
        pagination: &Pagination,
    ) -> AppResult<PagedResult<SampleDetail>> {
        let page = self.samples.list_owned(user.id, filter, pagination).await?;

        let ids: Vec<Uuid> = page.items.iter().map(|sample| sample.id).collect();
        let mut logs: HashMap<Uuid, Vec<AuditEntryView>> = HashMap::new();
        for entry in self.audits.list_for_samples(&ids).await? {
            logs.entry(entry.sample_id).or_default().push(entry);
        }

        Ok(page.map(|sample| {
            let audit_logs = logs.remove(&sample.id).unwrap_or_default();
            SampleDetail::assemble(sample, Some(user.username.clone()), audit_logs, None)
        }))
    }

    /// 删除样本，工作项与审计历史随之删除
    pub async fn delete(&self, user: &AuthUser, id: Uuid) -> AppResult<()> {
        if !self.samples.delete_owned(id, user.id).await? {
            return Err(AppError::not_found(SAMPLE_NOT_FOUND));
        }

        tracing::info!(sample_id = %id, user_id = %user.id, "样本已删除");
        Ok(())
    }

    /// 样本的审计历史，按创建时间升序
    pub async fn audit_log(&self, user: &AuthUser, id: Uuid) -> AppResult<Vec<AuditEntryView>> {
        let sample = self.samples.find_owned(id, user.id).await?;
        let sample = OwnershipGuard::require_owned(sample, user.id)?;
        self.audits.list_for_sample(sample.id).await
    }

    async fn detail(
        &self,
        user: &AuthUser,
        sample: Sample,
        include_work_items: bool,
    ) -> AppResult<SampleDetail> {
        let audit_logs = self.audits.list_for_sample(sample.id).await?;
        let work_items = if include_work_items {
            Some(
                self.work_items
                    .list_for_sample(sample.id, user.id, &WorkItemFilter::default())
                    .await?,
            )
        } else {
            None
        };

        // 可见的样本必然属于请求者
        Ok(SampleDetail::assemble(
            sample,
            Some(user.username.clone()),
            audit_logs,
            work_items,
        ))
    }
}
