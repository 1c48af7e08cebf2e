// ==========================================
// 资本配置决策系统 - 演示组合
// ==========================================
// 职责: 数据库为空时写入一套可直接跑通流水线的演示数据
// ==========================================

use chrono::{NaiveDate, Utc};

use crate::domain::opportunity::{InvestmentRange, Opportunity};
use crate::domain::portfolio::PortfolioState;
use crate::domain::priority::InvestmentPriority;
use crate::domain::sector::{AllocationConstraint, Sector};
use crate::domain::types::{ConstraintType, OpportunityStatus, RiskAppetite};
use crate::engine::quality::default_rules;

pub const SEED_ACTOR: &str = "system";

/// 演示组合
///
/// 优先级 50/30/20;四个默认板块;六个机会（四个已批准）
pub fn demo_portfolio(total_capital: f64) -> PortfolioState {
    let mut state = PortfolioState::new(total_capital);

    state.priorities = vec![
        priority("PRI-ENERGY", "能源转型", 50.0, "10-15 years", 10.0, 10.0, RiskAppetite::Moderate, 9),
        priority("PRI-INFRA", "基础设施", 30.0, "5-10 years", 12.0, 8.0, RiskAppetite::Conservative, 8),
        priority("PRI-DIGITAL", "数字化", 20.0, "3-5 years", 15.0, 5.0, RiskAppetite::Aggressive, 7),
    ];
    for p in state.priorities.iter_mut() {
        p.derive_capital_allocation(total_capital);
    }

    state.sectors = vec![
        sector("SEC-RENEW", "Renewable Energy", 35.0, 25.0, 45.0),
        sector("SEC-PORTS", "Ports & Logistics", 25.0, 15.0, 35.0),
        sector("SEC-AIR", "Airports", 20.0, 10.0, 30.0),
        sector("SEC-DC", "Data Centers", 20.0, 10.0, 30.0),
    ];

    state.constraints = vec![
        constraint("SEC-RENEW", ConstraintType::Min, 25.0, true, "能源转型承诺"),
        constraint("SEC-PORTS", ConstraintType::Max, 40.0, false, "集中度控制"),
        constraint("SEC-DC", ConstraintType::Max, 30.0, true, "技术风险敞口"),
    ];

    state.opportunities = vec![
        opportunity(
            "OPP-001",
            "海上风电一期",
            "Green Energy",
            OpportunityStatus::Approved,
            (100_000_000.0, 150_000_000.0),
            36,
            (90.0, 25.0),
        ),
        opportunity(
            "OPP-002",
            "集装箱码头扩建",
            "Ports & Logistics",
            OpportunityStatus::Approved,
            (300_000_000.0, 450_000_000.0),
            48,
            (70.0, 35.0),
        ),
        opportunity(
            "OPP-003",
            "区域机场航站楼",
            "Airport Holdings",
            OpportunityStatus::Approved,
            (50_000_000.0, 80_000_000.0),
            60,
            (60.0, 55.0),
        ),
        opportunity(
            "OPP-004",
            "超大规模数据中心",
            "Connex Digital",
            OpportunityStatus::Approved,
            (200_000_000.0, 600_000_000.0),
            30,
            (85.0, 20.0),
        ),
        opportunity(
            "OPP-005",
            "屋顶光伏组合",
            "Solar",
            OpportunityStatus::UnderReview,
            (20_000_000.0, 40_000_000.0),
            18,
            (70.0, 30.0),
        ),
        opportunity(
            "OPP-006",
            "物流园区",
            "Ports & Logistics",
            OpportunityStatus::New,
            (80_000_000.0, 120_000_000.0),
            24,
            (55.0, 45.0),
        ),
    ];

    state.rules = default_rules();
    state
}

#[allow(clippy::too_many_arguments)]
fn priority(
    id: &str,
    name: &str,
    weight: f64,
    time_horizon: &str,
    min_roi: f64,
    max_payback: f64,
    risk_appetite: RiskAppetite,
    strategic_importance: u8,
) -> InvestmentPriority {
    InvestmentPriority {
        id: id.to_string(),
        name: name.to_string(),
        weight,
        capital_allocation: 0.0,
        time_horizon: time_horizon.to_string(),
        min_roi,
        max_payback,
        risk_appetite,
        strategic_importance,
    }
}

fn sector(id: &str, name: &str, target: f64, min: f64, max: f64) -> Sector {
    Sector {
        id: id.to_string(),
        name: name.to_string(),
        target_allocation: target,
        min_allocation: min,
        max_allocation: max,
    }
}

fn constraint(
    sector_id: &str,
    constraint_type: ConstraintType,
    value: f64,
    is_hard: bool,
    reason: &str,
) -> AllocationConstraint {
    AllocationConstraint {
        sector_id: sector_id.to_string(),
        constraint_type,
        value,
        is_hard,
        reason: reason.to_string(),
    }
}

/// (fit, risk) = (strategic_fit_score, preliminary_risk_score)
fn opportunity(
    id: &str,
    name: &str,
    business_unit: &str,
    status: OpportunityStatus,
    (min, max): (f64, f64),
    duration: u32,
    (fit, risk): (f64, f64),
) -> Opportunity {
    Opportunity {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{} 演示机会", name),
        source: "投资委员会".to_string(),
        sponsor: "CIO".to_string(),
        business_unit: business_unit.to_string(),
        status,
        investment_range: InvestmentRange::new(min, max),
        estimated_start: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap_or_default(),
        duration,
        strategic_fit_score: fit,
        preliminary_risk_score: risk,
        recommendations: Vec::new(),
        approved_by: match status {
            OpportunityStatus::Approved => Some(SEED_ACTOR.to_string()),
            _ => None,
        },
        updated_by: SEED_ACTOR.to_string(),
        updated_date: Utc::now(),
    }
}
