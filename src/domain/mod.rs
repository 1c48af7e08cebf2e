// ==========================================
// 资本配置决策系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod opportunity;
pub mod portfolio;
pub mod priority;
pub mod project;
pub mod quality;
pub mod scenario;
pub mod sector;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use opportunity::{InvestmentRange, Opportunity};
pub use portfolio::PortfolioState;
pub use priority::InvestmentPriority;
pub use project::{
    BusinessPlan, FinancialProjection, ImpactLevel, RiskCategory, RiskItem, ScoringBreakdown,
    SynergyItem, SynergyType, ValidatedProject,
};
pub use quality::{
    DataQualityIssue, QualityMetrics, QualityReport, RuleId, ValidationRule,
};
pub use scenario::{
    MetricsDelta, Scenario, ScenarioComparison, ScenarioDiff, ScenarioMetrics, ScenarioParams,
};
pub use sector::{
    AllocationConstraint, ConstraintViolation, Sector, SectorAllocation, SectorConstraintStatus,
    SectorPerformance,
};
pub use types::{
    ConstraintType, InvestmentGrade, IssueStatus, OpportunityStatus, RiskAppetite, RuleCategory,
    SectorStatus, Severity, ValidationStatus,
};
