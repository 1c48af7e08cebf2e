// ==========================================
// 资本配置决策系统 - 板块配置引擎
// ==========================================
// 职责: A/B 级项目按板块聚合,计算当前配置比例与绩效;评估约束
// 输入: 板块主数据 + 校验项目 + 配置约束
// 输出: SectorAllocation 列表 / 约束评估结果
// ==========================================
// 归类规则（大小写不敏感）:
//   1) 业务单元包含板块名称,或板块名称包含业务单元
//   2) 命中关键字表中该板块的任一关键字
// 说明: 归类为尽力而为,非外键;
//       一个项目可命中多个板块（各板块分别计入,不去重）,不命中则不计入
// ==========================================

use crate::domain::project::ValidatedProject;
use crate::domain::sector::{
    AllocationConstraint, ConstraintViolation, Sector, SectorAllocation, SectorConstraintStatus,
    SectorPerformance,
};
use crate::domain::types::{ConstraintType, SectorStatus};
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

// ==========================================
// SectorKeywordTable - 板块关键字表
// ==========================================
// 键: 板块名称（小写）; 值: 业务单元关键字
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorKeywordTable {
    entries: HashMap<String, Vec<String>>,
}

impl Default for SectorKeywordTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert("Renewable Energy", &["Green", "Solar", "Wind"]);
        table.insert("Ports & Logistics", &["Ports"]);
        table.insert("Airports", &["Airport"]);
        table.insert("Data Centers", &["Connex"]);
        table
    }
}

impl SectorKeywordTable {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn from_map(map: HashMap<String, Vec<String>>) -> Self {
        let mut table = Self::empty();
        for (sector, keywords) in map {
            let refs: Vec<&str> = keywords.iter().map(|s| s.as_str()).collect();
            table.insert(&sector, &refs);
        }
        table
    }

    pub fn insert(&mut self, sector_name: &str, keywords: &[&str]) {
        self.entries.insert(
            sector_name.trim().to_lowercase(),
            keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        );
    }

    pub fn keywords_for(&self, sector_name: &str) -> &[String] {
        self.entries
            .get(&sector_name.trim().to_lowercase())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==========================================
// SectorClassifier - 项目板块归类
// ==========================================
pub struct SectorClassifier {
    keywords: SectorKeywordTable,
}

impl SectorClassifier {
    pub fn new(keywords: SectorKeywordTable) -> Self {
        Self { keywords }
    }

    /// 业务单元是否归属该板块
    ///
    /// 业务单元包含板块名称,或包含该板块的任一关键字（均不区分大小写）
    pub fn matches(&self, business_unit: &str, sector: &Sector) -> bool {
        let unit = business_unit.trim().to_lowercase();
        if unit.is_empty() {
            return false;
        }
        let name = sector.name.trim().to_lowercase();

        if !name.is_empty() && unit.contains(&name) {
            return true;
        }

        self.keywords
            .keywords_for(&sector.name)
            .iter()
            .any(|k| unit.contains(k.as_str()))
    }

    /// 返回项目命中的全部板块 ID（0 个或多个）
    pub fn classify(&self, project: &ValidatedProject, sectors: &[Sector]) -> Vec<String> {
        sectors
            .iter()
            .filter(|s| self.matches(&project.business_unit, s))
            .map(|s| s.id.clone())
            .collect()
    }
}

// ==========================================
// SectorAllocator - 板块配置引擎
// ==========================================
pub struct SectorAllocator {
    classifier: SectorClassifier,
}

impl Default for SectorAllocator {
    fn default() -> Self {
        Self::new(SectorKeywordTable::default())
    }
}

impl SectorAllocator {
    pub fn new(keywords: SectorKeywordTable) -> Self {
        Self {
            classifier: SectorClassifier::new(keywords),
        }
    }

    pub fn classifier(&self) -> &SectorClassifier {
        &self.classifier
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 聚合生成板块配置
    ///
    /// current_allocation = 板块资本 / A+B 级项目总资本 × 100（总资本为 0 时为 0）
    pub fn allocate(
        &self,
        sectors: &[Sector],
        projects: &[ValidatedProject],
    ) -> Vec<SectorAllocation> {
        let eligible: Vec<&ValidatedProject> = projects
            .iter()
            .filter(|p| p.investment_grade.is_allocatable())
            .collect();
        let total_capital: f64 = eligible.iter().map(|p| p.capex).sum();

        let unmatched = eligible
            .iter()
            .filter(|p| self.classifier.classify(p, sectors).is_empty())
            .count();
        if unmatched > 0 {
            warn!(unmatched, "部分 A/B 级项目未归入任何板块");
        }

        let allocations: Vec<SectorAllocation> = sectors
            .iter()
            .map(|sector| {
                let matched: Vec<ValidatedProject> = eligible
                    .iter()
                    .filter(|p| self.classifier.matches(&p.business_unit, sector))
                    .map(|p| (*p).clone())
                    .collect();

                let allocated_capital: f64 = matched.iter().map(|p| p.capex).sum();
                let current_allocation = if total_capital > 0.0 {
                    allocated_capital / total_capital * 100.0
                } else {
                    0.0
                };

                debug!(
                    sector_id = %sector.id,
                    project_count = matched.len(),
                    allocated_capital,
                    current_allocation,
                    "板块聚合"
                );

                SectorAllocation {
                    sector_id: sector.id.clone(),
                    sector: sector.clone(),
                    current_allocation,
                    target_allocation: sector.target_allocation,
                    min_allocation: sector.min_allocation,
                    max_allocation: sector.max_allocation,
                    allocated_capital,
                    project_count: matched.len(),
                    performance: performance_of(&matched),
                    projects: matched,
                }
            })
            .collect();

        info!(
            sectors = allocations.len(),
            eligible_projects = eligible.len(),
            total_capital,
            "板块配置计算完成"
        );

        allocations
    }

    /// 评估全部板块的约束状态
    ///
    /// 任一违反的约束为硬约束 -> critical;仅软约束违反 -> warning;否则 ok
    pub fn evaluate_constraints(
        &self,
        allocations: &[SectorAllocation],
        constraints: &[AllocationConstraint],
    ) -> Vec<SectorConstraintStatus> {
        allocations
            .iter()
            .map(|allocation| {
                let violations: Vec<ConstraintViolation> = constraints
                    .iter()
                    .filter(|c| c.sector_id == allocation.sector_id)
                    .filter(|c| c.is_violated_by(allocation.current_allocation))
                    .map(|c| ConstraintViolation {
                        constraint: c.clone(),
                        current_allocation: allocation.current_allocation,
                        message: violation_message(allocation, c),
                    })
                    .collect();

                let status = if violations.iter().any(|v| v.constraint.is_hard) {
                    SectorStatus::Critical
                } else if !violations.is_empty() {
                    SectorStatus::Warning
                } else {
                    SectorStatus::Ok
                };

                if status != SectorStatus::Ok {
                    warn!(
                        sector_id = %allocation.sector_id,
                        status = %status,
                        violations = violations.len(),
                        "板块配置违反约束"
                    );
                }

                SectorConstraintStatus {
                    sector_id: allocation.sector_id.clone(),
                    status,
                    violations,
                }
            })
            .collect()
    }

    /// 一键再平衡: 当前配置重置为目标配置（非约束优化）
    pub fn rebalance(&self, allocations: &mut [SectorAllocation]) {
        for allocation in allocations.iter_mut() {
            allocation.current_allocation = allocation.target_allocation;
        }
        info!(sectors = allocations.len(), "板块配置已重置为目标值");
    }

    /// 人工调整单个板块配置（截断到 [0,100],不重新归一化其他板块）
    pub fn set_manual_allocation(
        &self,
        allocations: &mut [SectorAllocation],
        sector_id: &str,
        value: f64,
    ) -> EngineResult<f64> {
        if !value.is_finite() {
            return Err(EngineError::InvalidInput(format!(
                "配置比例不是有效数值: {}",
                value
            )));
        }

        let allocation = allocations
            .iter_mut()
            .find(|a| a.sector_id == sector_id)
            .ok_or_else(|| EngineError::not_found("SectorAllocation", sector_id))?;

        let clamped = value.clamp(0.0, 100.0);
        allocation.current_allocation = clamped;

        let total: f64 = allocations.iter().map(|a| a.current_allocation).sum();
        if total > 100.0 {
            warn!(sector_id, total, "人工调整后配置合计超过 100%");
        }

        Ok(clamped)
    }
}

/// 板块绩效（空板块返回 0）
fn performance_of(projects: &[ValidatedProject]) -> SectorPerformance {
    if projects.is_empty() {
        return SectorPerformance::default();
    }
    let n = projects.len() as f64;
    SectorPerformance {
        avg_irr: projects.iter().map(|p| p.irr).sum::<f64>() / n,
        avg_npv: projects.iter().map(|p| p.npv).sum::<f64>() / n,
        avg_risk: projects.iter().map(|p| p.risk_score).sum::<f64>() / n,
    }
}

fn violation_message(allocation: &SectorAllocation, constraint: &AllocationConstraint) -> String {
    let bound = match constraint.constraint_type {
        ConstraintType::Min => "低于下限",
        ConstraintType::Max => "高于上限",
    };
    let kind = if constraint.is_hard { "硬约束" } else { "软约束" };
    format!(
        "{} 当前配置 {:.2}% {} {:.2}%（{}: {}）",
        allocation.sector.name,
        allocation.current_allocation,
        bound,
        constraint.value,
        kind,
        constraint.reason
    )
}
