// ==========================================
// 资本配置决策系统 - 领域类型定义
// ==========================================
// 职责: 状态/等级/严重度等枚举
// 序列化格式: snake_case（与持久化快照一致）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 机会状态 (Opportunity Status)
// ==========================================
// 流转: new -> under_review -> {approved, rejected}
// 红线: rejected 为终态,不可再修改
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityStatus {
    New,         // 新建
    UnderReview, // 评审中
    Approved,    // 已批准
    Rejected,    // 已否决
}

impl fmt::Display for OpportunityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl OpportunityStatus {
    /// 从字符串解析状态（大小写不敏感）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "new" => Some(OpportunityStatus::New),
            "under_review" => Some(OpportunityStatus::UnderReview),
            "approved" => Some(OpportunityStatus::Approved),
            "rejected" => Some(OpportunityStatus::Rejected),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            OpportunityStatus::New => "new",
            OpportunityStatus::UnderReview => "under_review",
            OpportunityStatus::Approved => "approved",
            OpportunityStatus::Rejected => "rejected",
        }
    }

    /// 是否允许流转到目标状态
    pub fn can_transition_to(&self, target: OpportunityStatus) -> bool {
        use OpportunityStatus::*;
        matches!(
            (self, target),
            (New, UnderReview) | (UnderReview, Approved) | (UnderReview, Rejected)
        )
    }
}

// ==========================================
// 风险偏好 (Risk Appetite)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskAppetite {
    Conservative, // 保守
    Moderate,     // 稳健
    Aggressive,   // 进取
}

impl fmt::Display for RiskAppetite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskAppetite::Conservative => write!(f, "conservative"),
            RiskAppetite::Moderate => write!(f, "moderate"),
            RiskAppetite::Aggressive => write!(f, "aggressive"),
        }
    }
}

impl RiskAppetite {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "conservative" => Some(RiskAppetite::Conservative),
            "moderate" => Some(RiskAppetite::Moderate),
            "aggressive" => Some(RiskAppetite::Aggressive),
            _ => None,
        }
    }
}

// ==========================================
// 投资等级 (Investment Grade)
// ==========================================
// 依据: 等级分类规则表（A/B/C/非投资级）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvestmentGrade {
    A,
    B,
    C,
    #[serde(rename = "Non-Investment")]
    NonInvestment,
}

impl fmt::Display for InvestmentGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl InvestmentGrade {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "A" => Some(InvestmentGrade::A),
            "B" => Some(InvestmentGrade::B),
            "C" => Some(InvestmentGrade::C),
            "NON-INVESTMENT" | "NON_INVESTMENT" | "NONINVESTMENT" => {
                Some(InvestmentGrade::NonInvestment)
            }
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            InvestmentGrade::A => "A",
            InvestmentGrade::B => "B",
            InvestmentGrade::C => "C",
            InvestmentGrade::NonInvestment => "Non-Investment",
        }
    }

    /// 是否进入资本配置（A/B 级）
    pub fn is_allocatable(&self) -> bool {
        matches!(self, InvestmentGrade::A | InvestmentGrade::B)
    }
}

// ==========================================
// 项目校验状态 (Validation Status)
// ==========================================
// 流转: pending -> in_review -> {validated, rejected}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Pending,   // 待校验
    InReview,  // 校验中
    Validated, // 已校验
    Rejected,  // 已否决
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Pending => write!(f, "pending"),
            ValidationStatus::InReview => write!(f, "in_review"),
            ValidationStatus::Validated => write!(f, "validated"),
            ValidationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl ValidationStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(ValidationStatus::Pending),
            "in_review" => Some(ValidationStatus::InReview),
            "validated" => Some(ValidationStatus::Validated),
            "rejected" => Some(ValidationStatus::Rejected),
            _ => None,
        }
    }

    pub fn can_transition_to(&self, target: ValidationStatus) -> bool {
        use ValidationStatus::*;
        matches!(
            (self, target),
            (Pending, InReview) | (InReview, Validated) | (InReview, Rejected)
        )
    }
}

// ==========================================
// 问题严重度 (Issue Severity)
// ==========================================
// 顺序: Info < Warning < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

// ==========================================
// 规则类别 (Rule Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Financial,    // 财务
    Completeness, // 完整性
    Consistency,  // 一致性
    Accuracy,     // 准确性
    Compliance,   // 合规
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Financial => write!(f, "financial"),
            RuleCategory::Completeness => write!(f, "completeness"),
            RuleCategory::Consistency => write!(f, "consistency"),
            RuleCategory::Accuracy => write!(f, "accuracy"),
            RuleCategory::Compliance => write!(f, "compliance"),
        }
    }
}

// ==========================================
// 问题状态 (Issue Status)
// ==========================================
// resolved/ignored 由人工设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Open,
    Resolved,
    Ignored,
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueStatus::Open => write!(f, "open"),
            IssueStatus::Resolved => write!(f, "resolved"),
            IssueStatus::Ignored => write!(f, "ignored"),
        }
    }
}

// ==========================================
// 约束类型 (Constraint Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintType {
    Min, // 下限
    Max, // 上限
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintType::Min => write!(f, "min"),
            ConstraintType::Max => write!(f, "max"),
        }
    }
}

impl ConstraintType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "min" => Some(ConstraintType::Min),
            "max" => Some(ConstraintType::Max),
            _ => None,
        }
    }
}

// ==========================================
// 板块配置状态 (Sector Status)
// ==========================================
// 顺序: Ok < Warning < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorStatus {
    Ok,       // 满足全部约束
    Warning,  // 仅违反软约束
    Critical, // 违反硬约束
}

impl fmt::Display for SectorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectorStatus::Ok => write!(f, "ok"),
            SectorStatus::Warning => write!(f, "warning"),
            SectorStatus::Critical => write!(f, "critical"),
        }
    }
}
