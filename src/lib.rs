// ==========================================
// 资本配置决策系统 - 核心库
// ==========================================
// 流水线: 机会评分 -> 分级 -> 项目校验 -> 板块配置 -> 数据质量 -> 情景比较
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配与演示数据
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    ConstraintType, InvestmentGrade, IssueStatus, OpportunityStatus, RiskAppetite, Severity,
    ValidationStatus,
};

// 领域实体
pub use domain::{
    ActionLog, ActionType, AllocationConstraint, DataQualityIssue, InvestmentPriority,
    Opportunity, PortfolioState, Sector, SectorAllocation, ValidatedProject,
};

// 引擎
pub use engine::{
    DataQualityValidator, GradeClassifier, ProjectValidator, ScenarioFilter, ScoringEngine,
    SectorAllocator,
};

// API
pub use api::{ApiError, ApiResult, PortfolioApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "资本配置决策系统";
