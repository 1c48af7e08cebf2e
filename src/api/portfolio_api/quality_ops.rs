use super::*;

use chrono::Utc;
use serde_json::json;

use crate::domain::quality::{QualityReport, RuleId};
use crate::domain::types::IssueStatus;
use crate::engine::quality::{carry_over_statuses, compute_metrics, AutoFixOutcome, QualityContext};

impl PortfolioApi {
    // ==========================================
    // 数据质量检查
    // ==========================================

    /// 执行全量质量检查并替换问题列表
    ///
    /// # 说明
    /// - preserve_resolutions 开启时,上一轮已处置的同一问题保持其状态
    /// - 指标在延续状态后重新计算（只统计 open 问题）
    pub fn run_quality_check(&mut self, actor: &str) -> ApiResult<QualityReport> {
        require_actor(actor)?;

        let ctx = QualityContext {
            priorities: &self.state.priorities,
            opportunities: &self.state.opportunities,
            projects: &self.state.projects,
            allocations: &self.state.allocations,
            constraints: &self.state.constraints,
        };
        let mut report = self.quality.validate(&ctx, &self.state.rules);

        if self.settings.preserve_resolutions {
            let carried = carry_over_statuses(&self.state.issues, &mut report.issues);
            if carried > 0 {
                report.metrics = compute_metrics(&report.issues);
                debug!(carried, "已延续上一轮的人工处置状态");
            }
        }

        self.state.issues = report.issues.clone();

        self.commit(
            ActionLog::new(ActionType::RunQualityCheck, actor, None).with_payload(json!({
                "overall_score": report.metrics.overall_score,
                "critical": report.metrics.critical_count,
                "warning": report.metrics.warning_count,
                "info": report.metrics.info_count,
            })),
        )?;

        Ok(report)
    }

    /// 当前问题列表的指标
    pub fn quality_report(&self) -> QualityReport {
        QualityReport {
            issues: self.state.issues.clone(),
            metrics: compute_metrics(&self.state.issues),
            run_at: Utc::now(),
        }
    }

    /// 处置单个问题（resolved / ignored / 重新打开）
    pub fn update_issue_status(
        &mut self,
        issue_id: &str,
        status: IssueStatus,
        actor: &str,
    ) -> ApiResult<()> {
        require_actor(actor)?;

        let issue = self
            .state
            .issues
            .iter_mut()
            .find(|i| i.id == issue_id)
            .ok_or_else(|| ApiError::NotFound(format!("质量问题(id={})不存在", issue_id)))?;

        let from = issue.status;
        issue.status = status;

        self.commit(
            ActionLog::new(ActionType::UpdateIssueStatus, actor, Some(issue_id))
                .with_payload(json!({ "from": from.to_string(), "to": status.to_string() })),
        )
    }

    /// 启用/停用规则
    pub fn toggle_rule(&mut self, rule_id: RuleId, enabled: bool, actor: &str) -> ApiResult<()> {
        require_actor(actor)?;

        let rule = self
            .state
            .rules
            .iter_mut()
            .find(|r| r.id == rule_id)
            .ok_or_else(|| ApiError::NotFound(format!("规则(id={})不存在", rule_id)))?;
        rule.enabled = enabled;

        info!(rule_id = %rule_id, enabled, "规则启停状态已修改");

        self.commit(
            ActionLog::new(ActionType::ToggleRule, actor, Some(rule_id.as_str()))
                .with_payload(json!({ "enabled": enabled })),
        )
    }

    /// 对单个问题执行自动修复,成功后问题标记为 resolved
    pub fn apply_auto_fix(&mut self, issue_id: &str, actor: &str) -> ApiResult<AutoFixOutcome> {
        require_actor(actor)?;

        let issue = self
            .state
            .issues
            .iter()
            .find(|i| i.id == issue_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("质量问题(id={})不存在", issue_id)))?;

        let auto_fixable = self
            .state
            .rules
            .iter()
            .any(|r| r.id == issue.rule_id && r.auto_fixable);
        if !auto_fixable {
            return Err(ApiError::BusinessRuleViolation(format!(
                "规则 {} 不支持自动修复",
                issue.rule_id
            )));
        }

        let outcome = self.autofixer.apply(&issue, &mut self.state)?;

        if let Some(target) = self.state.issues.iter_mut().find(|i| i.id == issue_id) {
            target.status = IssueStatus::Resolved;
        }

        self.commit(
            ActionLog::new(ActionType::ApplyAutoFix, actor, Some(issue_id))
                .with_payload(json!({
                    "rule_id": outcome.rule_id.as_str(),
                    "fixed_items": outcome.fixed_items,
                }))
                .with_detail(outcome.detail.clone()),
        )?;

        Ok(outcome)
    }
}
