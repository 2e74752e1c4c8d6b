// visibility-backend/src/service/org_unit_service.rs

use crate::api::dto::org_unit_dto::{OrgUnitDetail, OrgUnitPreview, OrgUnitTreeNode};
use crate::domain::{area_permit_model::AreaScope, org_unit_model};
use crate::error::AppResult;
use crate::repository::{
    employee_repository::EmployeeRepository, org_unit_repository::OrgUnitRepository,
};
use crate::service::visibility_resolver::collect_org_units;
use crate::utils::error_helper::{bad_request_error, internal_server_error, not_found_error};
use sea_orm::DbConn;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// プレビューで返すサンプルの上限
pub const PREVIEW_SAMPLE_LIMIT: u64 = 50;

pub struct OrgUnitService {
    org_unit_repo: Arc<OrgUnitRepository>,
    employee_repo: Arc<EmployeeRepository>,
}

impl OrgUnitService {
    pub fn new(db: DbConn) -> Self {
        Self {
            org_unit_repo: Arc::new(OrgUnitRepository::new(db.clone())),
            employee_repo: Arc::new(EmployeeRepository::new(db)),
        }
    }

    /// 在籍者数付きの組織ツリー
    pub async fn get_tree(&self) -> AppResult<Vec<OrgUnitTreeNode>> {
        let units = self.org_unit_repo.find_all().await.map_err(|e| {
            internal_server_error(e, "org_unit_service::get_tree", "Failed to load org units")
        })?;
        let counts: HashMap<i64, i64> = self
            .employee_repo
            .count_active_by_org_unit()
            .await?
            .into_iter()
            .collect();

        Ok(build_tree(&units, &counts))
    }

    pub async fn get_unit(&self, id: i64) -> AppResult<OrgUnitDetail> {
        let unit = self
            .org_unit_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Org unit", &id.to_string(), "org_unit_service::get_unit"))?;
        let direct_count = self.employee_repo.count_active_in_org_units(&[id]).await?;

        Ok(OrgUnitDetail::new(unit, direct_count))
    }

    /// 指定範囲でエリア権限を付与した場合に見える在籍者の件数とサンプル
    pub async fn preview(&self, id: i64, scope: Option<&str>) -> AppResult<OrgUnitPreview> {
        const CONTEXT: &str = "org_unit_service::preview";
        let scope = match scope.map(str::trim) {
            None | Some("") => AreaScope::default(),
            Some(raw) => AreaScope::parse(raw)
                .ok_or_else(|| bad_request_error("scope must be SUBTREE or NODE_ONLY", CONTEXT))?,
        };

        if self.org_unit_repo.find_by_id(id).await?.is_none() {
            return Err(not_found_error("Org unit", &id.to_string(), CONTEXT));
        }

        let units = self.org_unit_repo.find_all().await?;
        let mut unit_ids: Vec<i64> = collect_org_units(id, scope, &units).into_iter().collect();
        unit_ids.sort_unstable();

        let total = self.employee_repo.count_active_in_org_units(&unit_ids).await?;
        let sample = self
            .employee_repo
            .find_active_in_org_units(&unit_ids, PREVIEW_SAMPLE_LIMIT)
            .await?;

        Ok(OrgUnitPreview {
            org_unit_id: id,
            scope: scope.to_string(),
            total,
            sample,
        })
    }
}

/// 親が存在しないノードはルート扱い。循環していて到達できないノードも最後にルートとして拾う。
pub fn build_tree(
    units: &[org_unit_model::Model],
    counts: &HashMap<i64, i64>,
) -> Vec<OrgUnitTreeNode> {
    let known: HashSet<i64> = units.iter().map(|u| u.id).collect();
    let mut children: HashMap<i64, Vec<&org_unit_model::Model>> = HashMap::new();
    let mut roots: Vec<&org_unit_model::Model> = Vec::new();

    for unit in units {
        match unit.parent_id {
            Some(parent) if known.contains(&parent) && parent != unit.id => {
                children.entry(parent).or_default().push(unit);
            }
            _ => roots.push(unit),
        }
    }

    let mut visited: HashSet<i64> = HashSet::new();
    let mut tree: Vec<OrgUnitTreeNode> = roots
        .into_iter()
        .filter_map(|root| build_node(root, &children, counts, &mut visited))
        .collect();

    for unit in units {
        if !visited.contains(&unit.id) {
            if let Some(node) = build_node(unit, &children, counts, &mut visited) {
                tree.push(node);
            }
        }
    }

    tree
}

fn build_node(
    unit: &org_unit_model::Model,
    children: &HashMap<i64, Vec<&org_unit_model::Model>>,
    counts: &HashMap<i64, i64>,
    visited: &mut HashSet<i64>,
) -> Option<OrgUnitTreeNode> {
    if !visited.insert(unit.id) {
        return None;
    }

    let child_nodes: Vec<OrgUnitTreeNode> = children
        .get(&unit.id)
        .into_iter()
        .flatten()
        .filter_map(|child| build_node(child, children, counts, visited))
        .collect();

    let direct_count = counts.get(&unit.id).copied().unwrap_or(0);
    let total_count = direct_count + child_nodes.iter().map(|c| c.total_count).sum::<i64>();

    Some(OrgUnitTreeNode {
        id: unit.id,
        name: unit.name.clone(),
        kind: unit.kind.clone(),
        parent_id: unit.parent_id,
        direct_count,
        total_count,
        children: child_nodes,
    })
}
