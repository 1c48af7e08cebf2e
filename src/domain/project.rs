// ==========================================
// 资本配置决策系统 - 校验项目领域模型
// ==========================================
// 约束: 每个 opportunity_id 至多一个 ValidatedProject
// 约束: opportunity_id 为反向引用,不拥有机会对象
// ==========================================

use crate::domain::types::{InvestmentGrade, ValidationStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ScoringBreakdown - 评分构成
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringBreakdown {
    pub strategic_alignment: f64,
    pub financial_score: f64,
    pub risk_adjustment: f64,
    pub synergy_score: f64,
    pub composite_score: f64,
}

// ==========================================
// 商业计划 - 风险登记
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Market,    // 市场风险
    Execution, // 执行风险
    Financial, // 财务风险
    Regulatory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskItem {
    pub category: RiskCategory,
    pub description: String,
    pub probability: f64, // 0-1
    pub impact: ImpactLevel,
    pub mitigation: String,
}

// ==========================================
// 商业计划 - 协同效应
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynergyType {
    Revenue, // 收入协同
    Cost,    // 成本协同
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynergyItem {
    pub synergy_type: SynergyType,
    pub description: String,
    pub estimated_value: f64,
    pub realization_years: u32,
}

// ==========================================
// 商业计划 - 年度财务预测
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProjection {
    pub year: u32,
    pub revenue: f64,
    pub opex: f64,
    pub capex: f64,
    pub net_cash_flow: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessPlan {
    #[serde(default)]
    pub executive_summary: String,
    #[serde(default)]
    pub risks: Vec<RiskItem>,
    #[serde(default)]
    pub synergies: Vec<SynergyItem>,
    #[serde(default)]
    pub financials: Vec<FinancialProjection>,
}

// ==========================================
// ValidatedProject - 校验项目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedProject {
    pub id: String,
    pub opportunity_id: String,
    pub name: String,
    pub sponsor: String,
    pub business_unit: String,
    pub estimated_start: NaiveDate,
    pub duration_months: u32,

    // ===== 财务字段 =====
    pub capex: f64,
    pub opex: f64,
    pub revenue_potential: f64,
    pub npv: f64,
    pub irr: f64,
    pub mirr: f64,
    pub payback_years: f64,

    // ===== 评分与等级 =====
    pub composite_score: f64,
    pub investment_grade: InvestmentGrade,
    pub risk_score: f64,
    pub scoring_breakdown: ScoringBreakdown,

    pub business_plan: BusinessPlan,
    pub validation_status: ValidationStatus,
    #[serde(default)]
    pub validated_by: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl ValidatedProject {
    pub fn has_synergies(&self) -> bool {
        !self.business_plan.synergies.is_empty()
    }
}
