// ==========================================
// 资本配置决策系统 - 组合状态
// ==========================================
// 职责: 应用状态的显式载体,整体交由持久化端口读写
// 约束: 序列化/反序列化往返无损（含日期字段）
// ==========================================

use crate::domain::opportunity::Opportunity;
use crate::domain::priority::InvestmentPriority;
use crate::domain::project::ValidatedProject;
use crate::domain::quality::{DataQualityIssue, ValidationRule};
use crate::domain::sector::{AllocationConstraint, Sector, SectorAllocation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioState {
    pub total_capital: f64,
    #[serde(default)]
    pub priorities: Vec<InvestmentPriority>,
    #[serde(default)]
    pub opportunities: Vec<Opportunity>,
    #[serde(default)]
    pub projects: Vec<ValidatedProject>,
    #[serde(default)]
    pub sectors: Vec<Sector>,
    #[serde(default)]
    pub constraints: Vec<AllocationConstraint>,
    #[serde(default)]
    pub allocations: Vec<SectorAllocation>,
    #[serde(default)]
    pub issues: Vec<DataQualityIssue>,
    #[serde(default)]
    pub rules: Vec<ValidationRule>,
}

impl PortfolioState {
    pub fn new(total_capital: f64) -> Self {
        Self {
            total_capital,
            ..Default::default()
        }
    }

    /// 已转换为项目的机会 ID
    pub fn existing_opportunity_ids(&self) -> Vec<String> {
        self.projects
            .iter()
            .map(|p| p.opportunity_id.clone())
            .collect()
    }

    pub fn find_opportunity(&self, id: &str) -> Option<&Opportunity> {
        self.opportunities.iter().find(|o| o.id == id)
    }

    pub fn find_project(&self, id: &str) -> Option<&ValidatedProject> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
            && self.opportunities.is_empty()
            && self.projects.is_empty()
            && self.sectors.is_empty()
    }
}
