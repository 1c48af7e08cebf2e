// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{NaiveDate, Utc};
use capital_allocation::domain::opportunity::{InvestmentRange, Opportunity};
use capital_allocation::domain::priority::InvestmentPriority;
use capital_allocation::domain::project::{
    BusinessPlan, ScoringBreakdown, SynergyItem, SynergyType, ValidatedProject,
};
use capital_allocation::domain::sector::{AllocationConstraint, Sector};
use capital_allocation::domain::types::{
    ConstraintType, InvestmentGrade, OpportunityStatus, RiskAppetite, ValidationStatus,
};

// ==========================================
// Opportunity 构建器
// ==========================================

pub struct OpportunityBuilder {
    id: String,
    business_unit: String,
    status: OpportunityStatus,
    min: f64,
    max: f64,
    duration: u32,
    fit: f64,
    risk: f64,
}

impl OpportunityBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            business_unit: "Ports".to_string(),
            status: OpportunityStatus::Approved,
            min: 100_000_000.0,
            max: 150_000_000.0,
            duration: 24,
            fit: 90.0,
            risk: 25.0,
        }
    }

    pub fn business_unit(mut self, unit: &str) -> Self {
        self.business_unit = unit.to_string();
        self
    }

    pub fn status(mut self, status: OpportunityStatus) -> Self {
        self.status = status;
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn duration(mut self, months: u32) -> Self {
        self.duration = months;
        self
    }

    pub fn scores(mut self, fit: f64, risk: f64) -> Self {
        self.fit = fit;
        self.risk = risk;
        self
    }

    pub fn build(self) -> Opportunity {
        Opportunity {
            name: format!("机会 {}", self.id),
            id: self.id,
            description: "测试机会".to_string(),
            source: "测试".to_string(),
            sponsor: "CFO".to_string(),
            business_unit: self.business_unit,
            status: self.status,
            investment_range: InvestmentRange::new(self.min, self.max),
            estimated_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            duration: self.duration,
            strategic_fit_score: self.fit,
            preliminary_risk_score: self.risk,
            recommendations: vec![],
            approved_by: None,
            updated_by: "tester".to_string(),
            updated_date: Utc::now(),
        }
    }
}

// ==========================================
// ValidatedProject 构建器
// ==========================================

pub struct ProjectBuilder {
    id: String,
    business_unit: String,
    capex: f64,
    irr: f64,
    risk_score: f64,
    duration_months: u32,
    grade: InvestmentGrade,
    composite_score: f64,
    with_synergy: bool,
}

impl ProjectBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            business_unit: "Ports".to_string(),
            capex: 100_000_000.0,
            irr: 20.0,
            risk_score: 25.0,
            duration_months: 24,
            grade: InvestmentGrade::A,
            composite_score: 85.0,
            with_synergy: false,
        }
    }

    pub fn business_unit(mut self, unit: &str) -> Self {
        self.business_unit = unit.to_string();
        self
    }

    pub fn capex(mut self, capex: f64) -> Self {
        self.capex = capex;
        self
    }

    pub fn irr(mut self, irr: f64) -> Self {
        self.irr = irr;
        self
    }

    pub fn risk(mut self, risk: f64) -> Self {
        self.risk_score = risk;
        self
    }

    pub fn duration_months(mut self, months: u32) -> Self {
        self.duration_months = months;
        self
    }

    pub fn grade(mut self, grade: InvestmentGrade) -> Self {
        self.grade = grade;
        self
    }

    pub fn composite(mut self, score: f64) -> Self {
        self.composite_score = score;
        self
    }

    pub fn with_synergy(mut self) -> Self {
        self.with_synergy = true;
        self
    }

    pub fn build(self) -> ValidatedProject {
        let synergies = if self.with_synergy {
            vec![SynergyItem {
                synergy_type: SynergyType::Revenue,
                description: "交叉销售".to_string(),
                estimated_value: self.capex * 0.1,
                realization_years: 3,
            }]
        } else {
            vec![]
        };

        ValidatedProject {
            opportunity_id: format!("OPP-{}", self.id),
            name: format!("项目 {}", self.id),
            id: self.id,
            sponsor: "CFO".to_string(),
            business_unit: self.business_unit,
            estimated_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            duration_months: self.duration_months,
            capex: self.capex,
            opex: self.capex * 0.1,
            revenue_potential: self.capex * 1.5,
            npv: self.capex * 0.3,
            irr: self.irr,
            mirr: self.irr - 3.0,
            payback_years: 5.0,
            composite_score: self.composite_score,
            investment_grade: self.grade,
            risk_score: self.risk_score,
            scoring_breakdown: ScoringBreakdown {
                strategic_alignment: self.composite_score,
                financial_score: self.composite_score,
                risk_adjustment: self.composite_score,
                synergy_score: self.composite_score,
                composite_score: self.composite_score,
            },
            business_plan: BusinessPlan {
                executive_summary: "测试项目".to_string(),
                synergies,
                ..BusinessPlan::default()
            },
            validation_status: ValidationStatus::Pending,
            validated_by: None,
            created_date: Utc::now(),
            updated_date: Utc::now(),
        }
    }
}

// ==========================================
// 简单构造函数
// ==========================================

pub fn priority(id: &str, weight: f64) -> InvestmentPriority {
    InvestmentPriority {
        id: id.to_string(),
        name: id.to_string(),
        weight,
        capital_allocation: 0.0,
        time_horizon: "5-10 years".to_string(),
        min_roi: 12.0,
        max_payback: 8.0,
        risk_appetite: RiskAppetite::Moderate,
        strategic_importance: 7,
    }
}

pub fn sector(id: &str, name: &str, target: f64) -> Sector {
    Sector {
        id: id.to_string(),
        name: name.to_string(),
        target_allocation: target,
        min_allocation: (target - 10.0).max(0.0),
        max_allocation: target + 10.0,
    }
}

pub fn default_sectors() -> Vec<Sector> {
    vec![
        sector("SEC-RENEW", "Renewable Energy", 40.0),
        sector("SEC-PORTS", "Ports & Logistics", 30.0),
        sector("SEC-AIR", "Airports", 15.0),
        sector("SEC-DC", "Data Centers", 15.0),
    ]
}

pub fn constraint(
    sector_id: &str,
    constraint_type: ConstraintType,
    value: f64,
    is_hard: bool,
) -> AllocationConstraint {
    AllocationConstraint {
        sector_id: sector_id.to_string(),
        constraint_type,
        value,
        is_hard,
        reason: "测试约束".to_string(),
    }
}
