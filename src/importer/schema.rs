// ==========================================
// 资本配置决策系统 - 导入表头结构
// ==========================================
// 列名固定,匹配时大小写不敏感;缺列则整表拒绝
// 多出的列忽略
// ==========================================

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Priorities,
    Opportunities,
    Projects,
    Sectors,
    Constraints,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableKind::Priorities => "priorities",
            TableKind::Opportunities => "opportunities",
            TableKind::Projects => "projects",
            TableKind::Sectors => "sectors",
            TableKind::Constraints => "constraints",
        };
        write!(f, "{}", name)
    }
}

impl TableKind {
    /// 必需列（小写）
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            TableKind::Priorities => &[
                "id",
                "name",
                "weight",
                "time_horizon",
                "min_roi",
                "max_payback",
                "risk_appetite",
                "strategic_importance",
            ],
            TableKind::Opportunities => &[
                "id",
                "name",
                "description",
                "source",
                "sponsor",
                "business_unit",
                "status",
                "investment_min",
                "investment_max",
                "estimated_start",
                "duration",
                "strategic_fit_score",
                "preliminary_risk_score",
            ],
            TableKind::Projects => &[
                "id",
                "opportunity_id",
                "name",
                "sponsor",
                "business_unit",
                "estimated_start",
                "duration_months",
                "capex",
                "opex",
                "revenue_potential",
                "npv",
                "irr",
                "mirr",
                "payback_years",
                "composite_score",
                "risk_score",
                "investment_grade",
                "strategic_alignment",
                "financial_score",
                "risk_adjustment",
                "synergy_score",
                "executive_summary",
                "validation_status",
            ],
            TableKind::Sectors => &[
                "id",
                "name",
                "target_allocation",
                "min_allocation",
                "max_allocation",
            ],
            TableKind::Constraints => &["sector_id", "constraint_type", "value", "is_hard", "reason"],
        }
    }
}
