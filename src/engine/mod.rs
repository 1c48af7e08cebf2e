// ==========================================
// 资本配置决策系统 - 引擎层
// ==========================================
// 职责: 实现评分/分级/转换/配置/质量/情景规则,不拼 SQL
// 红线: 引擎无持久化副作用,状态由调用方传入传出
// 红线: 业务规则违反以数据形式返回,不作为错误
// ==========================================

pub mod error;
pub mod grading;
pub mod opportunity_workflow;
pub mod priority_weights;
pub mod project_validator;
pub mod quality;
pub mod scenario;
pub mod scoring;
pub mod sector_allocator;

// 重导出核心引擎
pub use error::{EngineError, EngineResult};
pub use grading::GradeClassifier;
pub use opportunity_workflow::OpportunityWorkflow;
pub use priority_weights::PriorityWeightBalancer;
pub use project_validator::ProjectValidator;
pub use quality::{
    carry_over_statuses, compute_metrics, default_rules, AutoFixOutcome, DataQualityValidator,
    QualityAutoFixer, QualityContext,
};
pub use scenario::{find_preset, preset_scenarios, ScenarioFilter};
pub use scoring::{FixedSynergy, ScoringEngine, ScoringWeights, SeededSynergy, SynergySource};
pub use sector_allocator::{SectorAllocator, SectorClassifier, SectorKeywordTable};
