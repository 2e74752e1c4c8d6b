// visibility-backend/src/service/visibility_resolver.rs

//! 可視性の解決ロジック
//!
//! すべてスナップショットに対する純粋関数。I/O は `SnapshotSource` 側で完結させる。
//!
//! ```text
//! Visible = (Hierarchy ∪ Allow ∪ Area ∪ Actors ∪ Admin) \ Deny
//! ```

use crate::domain::{
    area_permit_model::{self, AreaScope},
    delegation_model, employee_model,
    employee_permit_model::{self, AccessType},
    org_unit_model,
    validity::ValidityWindow,
    visibility_snapshot::VisibilitySnapshot,
};
use crate::error::AppError;
use chrono::NaiveDate;
use sea_orm::DbErr;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisibilityError {
    #[error("Store error: {0}")]
    Store(#[from] DbErr),

    #[error("Reporting hierarchy contains a cycle at employee {0}")]
    HierarchyCycle(String),

    #[error("Malformed row: {0}")]
    MalformedRow(String),
}

impl From<VisibilityError> for AppError {
    fn from(err: VisibilityError) -> Self {
        match err {
            VisibilityError::Store(db_err) => AppError::DbErr(db_err),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

/// 前後空白を除き、空なら None
fn normalize(id: &str) -> Option<&str> {
    let id = id.trim();
    (!id.is_empty()).then_some(id)
}

/// 依頼者と、依頼者に可視性を代理委任している delegator の列
///
/// 依頼者が先頭。代理は1段のみで、delegator の delegator は含めない。
pub fn expand_actors(
    requester: &str,
    delegations: &[delegation_model::Model],
    today: NaiveDate,
) -> Vec<String> {
    let Some(requester) = normalize(requester) else {
        return Vec::new();
    };

    let mut actors = vec![requester.to_string()];
    let mut seen: HashSet<&str> = HashSet::from([requester]);

    for delegation in delegations {
        if !delegation.is_in_force(today) || delegation.delegate_id.trim() != requester {
            continue;
        }
        if let Some(delegator) = normalize(&delegation.delegator_id) {
            if seen.insert(delegator) {
                actors.push(delegator.to_string());
            }
        }
    }

    actors
}

/// アクターから上司エッジを下方向にたどって到達できる部下（深さ無制限）
pub fn reachable_subordinates(
    actors: &[String],
    employees: &[employee_model::Model],
) -> Result<BTreeSet<String>, VisibilityError> {
    let active: Vec<&employee_model::Model> = employees.iter().filter(|e| e.is_active).collect();

    let mut reports: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut manager_of: HashMap<&str, &str> = HashMap::new();
    for employee in &active {
        let Some(id) = normalize(&employee.employee_id) else {
            continue;
        };
        if let Some(manager) = employee.manager_ref() {
            reports.entry(manager).or_default().push(id);
            manager_of.insert(id, manager);
        }
    }

    let mut reached: BTreeSet<&str> = BTreeSet::new();
    let mut expanded: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = actors.iter().map(|a| a.trim()).collect();

    while let Some(manager) = queue.pop_front() {
        if !expanded.insert(manager) {
            continue;
        }
        for &report in reports.get(manager).into_iter().flatten() {
            if reached.insert(report) {
                queue.push_back(report);
            }
        }
    }

    let component: HashSet<&str> = reached
        .iter()
        .copied()
        .chain(actors.iter().map(|a| a.trim()))
        .collect();
    detect_manager_cycle(&reached, &component, &manager_of)?;

    Ok(reached.into_iter().map(str::to_string).collect())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum WalkState {
    OnPath,
    Done,
}

// 到達した部下から上司チェーンを component 内でさかのぼり、同じ経路上の再訪を循環とみなす
fn detect_manager_cycle(
    starts: &BTreeSet<&str>,
    component: &HashSet<&str>,
    manager_of: &HashMap<&str, &str>,
) -> Result<(), VisibilityError> {
    let mut state: HashMap<&str, WalkState> = HashMap::new();

    for &start in starts {
        let mut path = Vec::new();
        let mut current = Some(start);

        while let Some(id) = current {
            if !component.contains(id) {
                break;
            }
            match state.get(id) {
                Some(WalkState::Done) => break,
                Some(WalkState::OnPath) => {
                    return Err(VisibilityError::HierarchyCycle(id.to_string()));
                }
                None => {}
            }
            state.insert(id, WalkState::OnPath);
            path.push(id);
            current = manager_of.get(id).copied();
        }

        for id in path {
            state.insert(id, WalkState::Done);
        }
    }

    Ok(())
}

/// 組織ノード `root` から範囲に含まれるノードID
///
/// SUBTREE は子孫すべて、NODE_ONLY はルートのみ。ルートが存在しなくても空集合にはせずルート自身を返す。
pub fn collect_org_units(
    root: i64,
    scope: AreaScope,
    org_units: &[org_unit_model::Model],
) -> HashSet<i64> {
    let mut units = HashSet::from([root]);
    if scope == AreaScope::NodeOnly {
        return units;
    }

    let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
    for unit in org_units {
        if let Some(parent) = unit.parent_id {
            children.entry(parent).or_default().push(unit.id);
        }
    }

    let mut stack = vec![root];
    while let Some(unit) = stack.pop() {
        for &child in children.get(&unit).into_iter().flatten() {
            if units.insert(child) {
                stack.push(child);
            }
        }
    }

    units
}

/// 有効なエリア権限（grantee がアクター）で見える在籍中の従業員
pub fn resolve_area_grants(
    actors: &[String],
    area_permits: &[area_permit_model::Model],
    org_units: &[org_unit_model::Model],
    employees: &[employee_model::Model],
    today: NaiveDate,
) -> Result<BTreeSet<String>, VisibilityError> {
    let actor_set: HashSet<&str> = actors.iter().map(|a| a.trim()).collect();

    let mut units: HashSet<i64> = HashSet::new();
    for permit in area_permits {
        if !permit.is_in_force(today) || !actor_set.contains(permit.grantee_id.trim()) {
            continue;
        }
        let scope = permit.area_scope().ok_or_else(|| {
            VisibilityError::MalformedRow(format!(
                "area permit {} has unknown scope '{}'",
                permit.id, permit.scope
            ))
        })?;
        units.extend(collect_org_units(permit.root_org_unit_id, scope, org_units));
    }

    if units.is_empty() {
        return Ok(BTreeSet::new());
    }

    Ok(employees
        .iter()
        .filter(|e| e.is_active)
        .filter(|e| e.org_unit_id.is_some_and(|unit| units.contains(&unit)))
        .filter_map(|e| normalize(&e.employee_id).map(str::to_string))
        .collect())
}

/// 個別権限の集計結果。allow と deny は互いに素。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointGrants {
    pub allow: BTreeSet<String>,
    pub deny: BTreeSet<String>,
}

pub fn resolve_point_grants(
    actors: &[String],
    employee_permits: &[employee_permit_model::Model],
    today: NaiveDate,
) -> Result<PointGrants, VisibilityError> {
    let actor_set: HashSet<&str> = actors.iter().map(|a| a.trim()).collect();
    let mut grants = PointGrants::default();

    for permit in employee_permits {
        if !permit.is_in_force(today) || !actor_set.contains(permit.grantee_id.trim()) {
            continue;
        }
        let Some(target) = normalize(&permit.target_id) else {
            continue;
        };
        match permit.effective_access_type() {
            Some(AccessType::Allow) => {
                grants.allow.insert(target.to_string());
            }
            Some(AccessType::Deny) => {
                grants.deny.insert(target.to_string());
            }
            None => {
                return Err(VisibilityError::MalformedRow(format!(
                    "employee permit {} has unknown access type {:?}",
                    permit.id, permit.access_type
                )));
            }
        }
    }

    let deny = grants.deny.clone();
    grants.allow.retain(|target| !deny.contains(target));
    Ok(grants)
}

/// アクターの誰かが在籍中の管理者なら在籍中の全従業員
pub fn admin_override(
    actors: &[String],
    employees: &[employee_model::Model],
) -> BTreeSet<String> {
    let actor_set: HashSet<&str> = actors.iter().map(|a| a.trim()).collect();

    let is_admin = employees
        .iter()
        .any(|e| e.is_active && e.has_admin_role() && actor_set.contains(e.id()));
    if !is_admin {
        return BTreeSet::new();
    }

    employees
        .iter()
        .filter(|e| e.is_active)
        .filter_map(|e| normalize(&e.employee_id).map(str::to_string))
        .collect()
}

/// 各ソースの結果
#[derive(Debug, Clone, Default)]
pub struct VisibilityParts {
    pub actors: Vec<String>,
    pub hierarchy: BTreeSet<String>,
    pub area: BTreeSet<String>,
    pub admin: BTreeSet<String>,
    pub point: PointGrants,
}

/// 正の集合の和から deny を最後に無条件で差し引く
pub fn aggregate(parts: VisibilityParts) -> BTreeSet<String> {
    let VisibilityParts {
        actors,
        hierarchy,
        area,
        admin,
        point,
    } = parts;

    actors
        .into_iter()
        .chain(hierarchy)
        .chain(point.allow)
        .chain(area)
        .chain(admin)
        .filter_map(|id| normalize(&id).map(str::to_string))
        .filter(|id| !point.deny.contains(id))
        .collect()
}

/// スナップショットから依頼者の可視IDを計算
pub fn resolve_visible_ids(
    snapshot: &VisibilitySnapshot,
    requester: &str,
) -> Result<BTreeSet<String>, VisibilityError> {
    let actors = expand_actors(requester, &snapshot.delegations, snapshot.today);
    if actors.is_empty() {
        return Ok(BTreeSet::new());
    }

    let hierarchy = reachable_subordinates(&actors, &snapshot.employees)?;
    let area = resolve_area_grants(
        &actors,
        &snapshot.area_permits,
        &snapshot.org_units,
        &snapshot.employees,
        snapshot.today,
    )?;
    let point = resolve_point_grants(&actors, &snapshot.employee_permits, snapshot.today)?;
    let admin = admin_override(&actors, &snapshot.employees);

    Ok(aggregate(VisibilityParts {
        actors,
        hierarchy,
        area,
        admin,
        point,
    }))
}
