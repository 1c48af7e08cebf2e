// ==========================================
// 资本配置决策系统 - 板块配置领域模型
// ==========================================
// 说明: SectorAllocation 完全由 ValidatedProject 派生,重算而非独立维护
// ==========================================

use crate::domain::project::ValidatedProject;
use crate::domain::types::{ConstraintType, SectorStatus};
use serde::{Deserialize, Serialize};

// ==========================================
// Sector - 板块主数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub id: String,
    pub name: String,
    pub target_allocation: f64, // %
    pub min_allocation: f64,    // %
    pub max_allocation: f64,    // %
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorPerformance {
    pub avg_irr: f64,
    pub avg_npv: f64,
    pub avg_risk: f64,
}

// ==========================================
// SectorAllocation - 板块配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorAllocation {
    pub sector_id: String,
    pub sector: Sector,
    pub current_allocation: f64, // %
    pub target_allocation: f64,  // %
    pub min_allocation: f64,
    pub max_allocation: f64,
    pub allocated_capital: f64,
    pub project_count: usize,
    pub projects: Vec<ValidatedProject>,
    pub performance: SectorPerformance,
}

impl SectorAllocation {
    /// 目标偏差（百分点）
    pub fn deviation(&self) -> f64 {
        self.current_allocation - self.target_allocation
    }
}

// ==========================================
// AllocationConstraint - 配置约束
// ==========================================
// 同一板块可叠加多条约束
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationConstraint {
    pub sector_id: String,
    pub constraint_type: ConstraintType,
    pub value: f64, // %
    pub is_hard: bool,
    pub reason: String,
}

impl AllocationConstraint {
    /// 当前配置是否违反该约束
    pub fn is_violated_by(&self, current_allocation: f64) -> bool {
        match self.constraint_type {
            ConstraintType::Min => current_allocation < self.value,
            ConstraintType::Max => current_allocation > self.value,
        }
    }
}

// ==========================================
// 约束评估结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintViolation {
    pub constraint: AllocationConstraint,
    pub current_allocation: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorConstraintStatus {
    pub sector_id: String,
    pub status: SectorStatus,
    pub violations: Vec<ConstraintViolation>,
}
