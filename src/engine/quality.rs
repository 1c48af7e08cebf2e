// ==========================================
// 资本配置决策系统 - 数据质量引擎
// ==========================================
// 职责: 按规则目录检查优先级/机会/项目/板块配置,输出问题与质量指标
// 红线: 规则判定只读,不修改输入;修复仅通过 QualityAutoFixer 显式执行
// ==========================================

mod autofix;
mod core;
pub mod rules;

#[cfg(test)]
mod tests;

pub use autofix::{suggestion_for, AutoFixOutcome, QualityAutoFixer};
pub use core::{carry_over_statuses, compute_metrics, DataQualityValidator, QualityContext};
pub use rules::{default_rules, rule_definition, RuleTarget};
