// ==========================================
// 资本配置决策系统 - 数据质量自动修复
// ==========================================
// 可自动修复: CONS-001 / CONS-002 / CONS-003 / ACC-001
// 修复直接作用于组合状态,不改变问题状态（由调用方决定）
// ==========================================

use crate::domain::portfolio::PortfolioState;
use crate::domain::quality::{DataQualityIssue, RuleId, ValidationRule};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::priority_weights::PriorityWeightBalancer;
use crate::engine::project_validator::ProjectValidator;
use crate::engine::scoring::{ScoringEngine, ScoringWeights};
use serde::{Deserialize, Serialize};
use tracing::info;

/// 自动修复结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoFixOutcome {
    pub rule_id: RuleId,
    pub fixed_items: Vec<String>,
    pub detail: String,
}

/// 问题生成时附带的修复建议
pub fn suggestion_for(rule: &ValidationRule) -> Option<String> {
    if !rule.auto_fixable {
        return None;
    }
    let text = match rule.id {
        RuleId::Cons001 => "按现有比例将全部优先级权重归一化到 100",
        RuleId::Cons002 => "按总资本与权重重新派生资本配置金额",
        RuleId::Cons003 => "按综合评分与风险评分重新分级",
        RuleId::Acc001 => "按评分构成重新计算综合评分",
        _ => return None,
    };
    Some(text.to_string())
}

pub struct QualityAutoFixer {
    balancer: PriorityWeightBalancer,
    validator: ProjectValidator,
}

impl Default for QualityAutoFixer {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

impl QualityAutoFixer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            balancer: PriorityWeightBalancer::new(),
            validator: ProjectValidator::with_scoring(ScoringEngine::with_weights(weights)),
        }
    }

    /// 对单个问题执行修复
    pub fn apply(
        &self,
        issue: &DataQualityIssue,
        state: &mut PortfolioState,
    ) -> EngineResult<AutoFixOutcome> {
        let total_capital = state.total_capital;

        let (fixed_items, detail) = match issue.rule_id {
            RuleId::Cons001 => {
                if state.priorities.is_empty() {
                    return Err(EngineError::InvalidInput(
                        "没有战略优先级,无法归一化权重".to_string(),
                    ));
                }
                self.balancer.normalize(&mut state.priorities, total_capital);
                (
                    state.priorities.iter().map(|p| p.id.clone()).collect(),
                    "优先级权重已归一化".to_string(),
                )
            }
            RuleId::Cons002 => {
                self.balancer
                    .derive_allocations(&mut state.priorities, total_capital);
                (
                    state.priorities.iter().map(|p| p.id.clone()).collect(),
                    "优先级资本配置已重新派生".to_string(),
                )
            }
            RuleId::Cons003 => {
                let fixed = self.for_affected_projects(issue, state, |v, p| {
                    v.regrade(p);
                })?;
                (fixed, "项目等级已重算".to_string())
            }
            RuleId::Acc001 => {
                let fixed = self.for_affected_projects(issue, state, |v, p| {
                    v.recompute_composite(p);
                })?;
                (fixed, "综合评分已重新计算".to_string())
            }
            other => {
                return Err(EngineError::InvalidInput(format!(
                    "规则 {} 不支持自动修复",
                    other
                )))
            }
        };

        info!(
            rule_id = %issue.rule_id,
            fixed = fixed_items.len(),
            "数据质量问题已自动修复"
        );

        Ok(AutoFixOutcome {
            rule_id: issue.rule_id,
            fixed_items,
            detail,
        })
    }

    fn for_affected_projects<F>(
        &self,
        issue: &DataQualityIssue,
        state: &mut PortfolioState,
        fix: F,
    ) -> EngineResult<Vec<String>>
    where
        F: Fn(&ProjectValidator, &mut crate::domain::project::ValidatedProject),
    {
        let mut fixed = Vec::new();
        for item in &issue.affected_items {
            let project = state
                .projects
                .iter_mut()
                .find(|p| &p.id == item)
                .ok_or_else(|| EngineError::not_found("ValidatedProject", item))?;
            fix(&self.validator, project);
            fixed.push(item.clone());
        }
        Ok(fixed)
    }
}
