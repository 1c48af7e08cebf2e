// ==========================================
// 资本配置决策系统 - 投资机会领域模型
// ==========================================
// 生命周期: 外部寻源创建 -> 状态流转 -> 批准后转为校验项目
// ==========================================

use crate::domain::types::OpportunityStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// InvestmentRange - 投资额区间
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRange {
    pub min: f64,
    pub max: f64,
}

impl InvestmentRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// min ≤ max
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

// ==========================================
// Opportunity - 投资机会
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub source: String,
    pub sponsor: String,
    pub business_unit: String,            // 业务单元（板块归类依据）
    pub status: OpportunityStatus,
    pub investment_range: InvestmentRange,
    pub estimated_start: NaiveDate,
    pub duration: u32,                    // 月
    pub strategic_fit_score: f64,         // 0-100
    pub preliminary_risk_score: f64,      // 0-100
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub approved_by: Option<String>,
    pub updated_by: String,
    pub updated_date: DateTime<Utc>,
}

impl Opportunity {
    pub fn is_approved(&self) -> bool {
        self.status == OpportunityStatus::Approved
    }
}
