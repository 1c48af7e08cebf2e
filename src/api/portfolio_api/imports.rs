use super::*;

use std::collections::HashSet;

use serde_json::json;

use crate::importer::field_mapper::{FieldMapper, ImportOutcome, RawTable};
use crate::importer::schema::TableKind;

/// 单表导入结果
///
/// 行级错误不阻断导入: 合法行照常合入,错误原样返回给调用方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub table: String,
    pub inserted: usize,
    pub updated: usize,
    pub errors: Vec<String>,
}

impl ImportSummary {
    pub fn imported(&self) -> usize {
        self.inserted + self.updated
    }
}

/// 按主键合并: 已存在的整条替换,新主键追加（保持原有顺序）
fn merge_by_key<T>(
    existing: &mut Vec<T>,
    incoming: Vec<T>,
    key_of: impl Fn(&T) -> String,
) -> (usize, usize) {
    let mut inserted = 0;
    let mut updated = 0;
    for record in incoming {
        let key = key_of(&record);
        match existing.iter().position(|e| key_of(e) == key) {
            Some(idx) => {
                existing[idx] = record;
                updated += 1;
            }
            None => {
                existing.push(record);
                inserted += 1;
            }
        }
    }
    (inserted, updated)
}

impl PortfolioApi {
    // ==========================================
    // 表格导入
    // ==========================================
    // 表头不合法 -> 整表拒绝（ImportError）;行级错误收集在 ImportSummary.errors

    /// 导入战略优先级（导入后按总资本派生资本配置）
    pub fn import_priorities(&mut self, table: &RawTable, actor: &str) -> ApiResult<ImportSummary> {
        require_actor(actor)?;
        let outcome = FieldMapper::new(actor).map_priorities(table)?;
        let (errors, records) = split(outcome);

        let (inserted, updated) =
            merge_by_key(&mut self.state.priorities, records, |p| p.id.clone());
        let total_capital = self.state.total_capital;
        self.balancer
            .derive_allocations(&mut self.state.priorities, total_capital);

        self.finish_import(TableKind::Priorities, inserted, updated, errors, actor)
    }

    pub fn import_opportunities(
        &mut self,
        table: &RawTable,
        actor: &str,
    ) -> ApiResult<ImportSummary> {
        require_actor(actor)?;
        let outcome = FieldMapper::new(actor).map_opportunities(table)?;
        let (errors, records) = split(outcome);

        let (inserted, updated) =
            merge_by_key(&mut self.state.opportunities, records, |o| o.id.clone());

        self.finish_import(TableKind::Opportunities, inserted, updated, errors, actor)
    }

    pub fn import_projects(&mut self, table: &RawTable, actor: &str) -> ApiResult<ImportSummary> {
        require_actor(actor)?;
        let outcome = FieldMapper::new(actor).map_projects(table)?;
        let (mut errors, records) = split(outcome);

        // 同一机会只能对应一个项目（主键相同视为更新）,本表内的重复同样拒绝
        let mut accepted = Vec::with_capacity(records.len());
        let mut claimed: HashSet<String> = HashSet::new();
        for project in records {
            let conflict = claimed.contains(&project.opportunity_id)
                || self
                    .state
                    .projects
                    .iter()
                    .any(|p| p.opportunity_id == project.opportunity_id && p.id != project.id);
            if conflict {
                errors.push(format!(
                    "项目 {}: 机会 {} 已存在对应项目",
                    project.id, project.opportunity_id
                ));
                continue;
            }
            claimed.insert(project.opportunity_id.clone());
            accepted.push(project);
        }

        let (inserted, updated) =
            merge_by_key(&mut self.state.projects, accepted, |p| p.id.clone());

        self.finish_import(TableKind::Projects, inserted, updated, errors, actor)
    }

    pub fn import_sectors(&mut self, table: &RawTable, actor: &str) -> ApiResult<ImportSummary> {
        require_actor(actor)?;
        let outcome = FieldMapper::new(actor).map_sectors(table)?;
        let (errors, records) = split(outcome);

        let (inserted, updated) = merge_by_key(&mut self.state.sectors, records, |s| s.id.clone());

        self.finish_import(TableKind::Sectors, inserted, updated, errors, actor)
    }

    /// 导入配置约束
    ///
    /// 同一板块可有多条约束;板块、类型、阈值与软硬属性全部相同才视为同一条
    pub fn import_constraints(
        &mut self,
        table: &RawTable,
        actor: &str,
    ) -> ApiResult<ImportSummary> {
        require_actor(actor)?;
        let outcome = FieldMapper::new(actor).map_constraints(table)?;
        let (errors, records) = split(outcome);

        let (inserted, updated) = merge_by_key(&mut self.state.constraints, records, |c| {
            format!(
                "{}:{}:{}:{}",
                c.sector_id, c.constraint_type, c.value, c.is_hard
            )
        });

        self.finish_import(TableKind::Constraints, inserted, updated, errors, actor)
    }

    fn finish_import(
        &mut self,
        kind: TableKind,
        inserted: usize,
        updated: usize,
        errors: Vec<String>,
        actor: &str,
    ) -> ApiResult<ImportSummary> {
        let summary = ImportSummary {
            table: kind.to_string(),
            inserted,
            updated,
            errors,
        };

        info!(
            table = %kind,
            inserted,
            updated,
            errors = summary.errors.len(),
            "表格导入完成"
        );

        self.commit(
            ActionLog::new(ActionType::Import, actor, None).with_payload(json!({
                "table": summary.table,
                "inserted": inserted,
                "updated": updated,
                "errors": summary.errors.len(),
            })),
        )?;

        Ok(summary)
    }
}

fn split<T>(outcome: ImportOutcome<T>) -> (Vec<String>, Vec<T>) {
    (outcome.errors, outcome.records)
}
