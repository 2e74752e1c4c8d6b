// visibility-backend/src/service/visibility_service.rs

use crate::api::dto::employee_dto::{EmployeeRecord, ViewerReason, ViewerRecord};
use crate::domain::visibility_snapshot::{DelegationSnapshot, VisibilitySnapshot};
use crate::error::{AppError, AppResult};
use crate::log_with_context;
use crate::service::visibility_resolver::{expand_actors, resolve_visible_ids, VisibilityError};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

/// 可視性計算に必要なデータを一貫したスナップショットとして読み出す
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn load_snapshot(&self, requester: &str) -> Result<VisibilitySnapshot, VisibilityError>;

    async fn load_delegations(&self, requester: &str)
        -> Result<DelegationSnapshot, VisibilityError>;
}

/// ログイン側の数値ID → 社員番号
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn resolve_employee_id(&self, account_id: i64)
        -> Result<Option<String>, VisibilityError>;
}

/// 社員番号 → 表示用レコード
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn find_records(&self, ids: &[String]) -> Result<Vec<EmployeeRecord>, VisibilityError>;
}

/// 可視性判定の唯一の入口
///
/// どの操作もエラーを返さず、失敗時は安全側の既定値に落とす。
#[derive(Clone)]
pub struct VisibilityService {
    snapshots: Arc<dyn SnapshotSource>,
    identities: Arc<dyn IdentityLookup>,
    directory: Arc<dyn EmployeeDirectory>,
}

impl VisibilityService {
    pub fn new(
        snapshots: Arc<dyn SnapshotSource>,
        identities: Arc<dyn IdentityLookup>,
        directory: Arc<dyn EmployeeDirectory>,
    ) -> Self {
        Self {
            snapshots,
            identities,
            directory,
        }
    }

    async fn try_visible_ids(&self, requester: &str) -> Result<BTreeSet<String>, VisibilityError> {
        let snapshot = self.snapshots.load_snapshot(requester).await?;
        resolve_visible_ids(&snapshot, requester)
    }

    /// 依頼者が閲覧できる社員番号の集合。失敗時は `{requester}`。
    pub async fn get_visible_ids(&self, requester: &str) -> BTreeSet<String> {
        let requester = requester.trim();
        if requester.is_empty() {
            return BTreeSet::new();
        }

        match self.try_visible_ids(requester).await {
            Ok(ids) => {
                log_with_context!(
                    tracing::Level::DEBUG,
                    "Visible ids resolved",
                    "requester" => requester,
                    "count" => ids.len(),
                );
                ids
            }
            Err(e) => {
                log_with_context!(
                    tracing::Level::WARN,
                    "Visibility resolution failed, falling back to self only",
                    "requester" => requester,
                    "error" => e.to_string(),
                );
                BTreeSet::from([requester.to_string()])
            }
        }
    }

    pub async fn can_view(&self, requester: &str, target: &str) -> bool {
        let requester = requester.trim();
        let target = target.trim();
        if requester.is_empty() || target.is_empty() {
            return false;
        }
        if requester == target {
            return true;
        }

        self.get_visible_ids(requester).await.contains(target)
    }

    /// 数値IDでの閲覧可否。どちらかが解決できなければ false。
    pub async fn can_view_by_id(&self, requester_account_id: i64, target_account_id: i64) -> bool {
        let requester = self.resolve_identity(requester_account_id).await;
        let target = self.resolve_identity(target_account_id).await;

        match (requester, target) {
            (Some(requester), Some(target)) => self.can_view(&requester, &target).await,
            _ => false,
        }
    }

    async fn resolve_identity(&self, account_id: i64) -> Option<String> {
        match self.identities.resolve_employee_id(account_id).await {
            Ok(id) => id.filter(|id| !id.trim().is_empty()),
            Err(e) => {
                log_with_context!(
                    tracing::Level::WARN,
                    "Identity lookup failed",
                    "account_id" => account_id,
                    "error" => e.to_string(),
                );
                None
            }
        }
    }

    /// 依頼者が先頭、続いて有効な delegator
    pub async fn get_effective_actors(&self, requester: &str) -> Vec<String> {
        let requester = requester.trim();
        if requester.is_empty() {
            return Vec::new();
        }

        match self.snapshots.load_delegations(requester).await {
            Ok(snapshot) => expand_actors(requester, &snapshot.delegations, snapshot.today),
            Err(e) => {
                log_with_context!(
                    tracing::Level::WARN,
                    "Actor expansion failed, falling back to requester",
                    "requester" => requester,
                    "error" => e.to_string(),
                );
                vec![requester.to_string()]
            }
        }
    }

    /// 閲覧できる従業員の表示用レコード（表示名順）
    pub async fn get_visible_employees(&self, requester: &str) -> Vec<EmployeeRecord> {
        let ids: Vec<String> = self.get_visible_ids(requester).await.into_iter().collect();
        if ids.is_empty() {
            return Vec::new();
        }

        match self.directory.find_records(&ids).await {
            Ok(mut records) => {
                records.sort_by(|a, b| {
                    a.display_name
                        .cmp(&b.display_name)
                        .then_with(|| a.employee_id.cmp(&b.employee_id))
                });
                records
            }
            Err(e) => {
                log_with_context!(
                    tracing::Level::ERROR,
                    "Failed to load visible employee records",
                    "requester" => requester.trim(),
                    "error" => e.to_string(),
                );
                Vec::new()
            }
        }
    }

    /// 対象者を閲覧できる人（直属の上司）
    pub async fn get_viewers(&self, target: &str) -> Vec<ViewerRecord> {
        let target = target.trim();
        if target.is_empty() {
            return Vec::new();
        }

        match self.try_viewers(target).await {
            Ok(viewers) => viewers,
            Err(e) => {
                log_with_context!(
                    tracing::Level::WARN,
                    "Failed to resolve viewers",
                    "target" => target,
                    "error" => e.to_string(),
                );
                Vec::new()
            }
        }
    }

    async fn try_viewers(&self, target: &str) -> Result<Vec<ViewerRecord>, VisibilityError> {
        let records = self.directory.find_records(&[target.to_string()]).await?;
        let Some(manager_id) = records.into_iter().find_map(|r| r.manager_id) else {
            return Ok(Vec::new());
        };

        let managers = self.directory.find_records(&[manager_id]).await?;
        Ok(managers
            .into_iter()
            .map(|m| ViewerRecord {
                employee_id: m.employee_id,
                display_name: m.display_name,
                job_title: m.job_title,
                reason: ViewerReason::DirectManager,
            })
            .collect())
    }

    /// 閲覧権限を確認したうえで従業員レコードを返す
    pub async fn get_employee_for(&self, requester: &str, target: &str) -> AppResult<EmployeeRecord> {
        if !self.can_view(requester, target).await {
            log_with_context!(
                tracing::Level::WARN,
                "Employee access denied by visibility rules",
                "requester" => requester.trim(),
                "target" => target.trim(),
            );
            return Err(AppError::Forbidden(
                "You are not allowed to view this employee".to_string(),
            ));
        }

        let target = target.trim().to_string();
        self.directory
            .find_records(std::slice::from_ref(&target))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", target)))
    }
}
