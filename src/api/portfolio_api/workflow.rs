use super::*;

use std::collections::HashSet;

use serde_json::json;

use crate::domain::project::ValidatedProject;
use crate::domain::types::{OpportunityStatus, ValidationStatus};

impl PortfolioApi {
    // ==========================================
    // 优先级权重
    // ==========================================

    /// 修改优先级权重（其余按比例分摊,合计保持 100）
    pub fn update_priority_weight(
        &mut self,
        priority_id: &str,
        new_weight: f64,
        actor: &str,
    ) -> ApiResult<()> {
        require_actor(actor)?;

        let total_capital = self.state.total_capital;
        self.balancer.update_weight(
            &mut self.state.priorities,
            priority_id,
            new_weight,
            total_capital,
        )?;

        let weights: Vec<_> = self
            .state
            .priorities
            .iter()
            .map(|p| json!({ "id": p.id, "weight": p.weight }))
            .collect();

        self.commit(
            ActionLog::new(ActionType::UpdatePriorityWeight, actor, Some(priority_id))
                .with_payload(json!({ "requested": new_weight, "weights": weights })),
        )
    }

    // ==========================================
    // 机会状态流转
    // ==========================================

    pub fn transition_opportunity(
        &mut self,
        opportunity_id: &str,
        target: OpportunityStatus,
        actor: &str,
    ) -> ApiResult<()> {
        require_actor(actor)?;

        let opportunity = self
            .state
            .opportunities
            .iter_mut()
            .find(|o| o.id == opportunity_id)
            .ok_or_else(|| ApiError::NotFound(format!("机会(id={})不存在", opportunity_id)))?;

        let from = opportunity.status;
        self.workflow.transition(opportunity, target, actor)?;

        self.commit(
            ActionLog::new(ActionType::TransitionOpportunity, actor, Some(opportunity_id))
                .with_payload(json!({ "from": from.to_db_str(), "to": target.to_db_str() })),
        )
    }

    // ==========================================
    // 机会转项目
    // ==========================================

    /// 将单个已批准机会转为校验项目
    pub fn convert_opportunity(
        &mut self,
        opportunity_id: &str,
        actor: &str,
    ) -> ApiResult<ValidatedProject> {
        require_actor(actor)?;

        let opportunity = self
            .state
            .find_opportunity(opportunity_id)
            .ok_or_else(|| ApiError::NotFound(format!("机会(id={})不存在", opportunity_id)))?;

        let existing: HashSet<String> = self.state.existing_opportunity_ids().into_iter().collect();
        let project = self.validator.convert(
            opportunity,
            &self.state.priorities,
            &existing,
            self.synergy.as_mut(),
        )?;

        self.state.projects.push(project.clone());

        self.commit(
            ActionLog::new(ActionType::ConvertOpportunity, actor, Some(&project.id)).with_payload(
                json!({
                    "opportunity_id": opportunity_id,
                    "composite_score": project.composite_score,
                    "grade": project.investment_grade.to_db_str(),
                }),
            ),
        )?;

        Ok(project)
    }

    /// 批量转换全部已批准且尚未转换的机会
    ///
    /// # 返回
    /// - affected: 新建项目ID
    /// - skipped: 已批准但已存在项目的机会数
    pub fn convert_all_approved(&mut self, actor: &str) -> ApiResult<BatchResult> {
        require_actor(actor)?;

        let existing: HashSet<String> = self.state.existing_opportunity_ids().into_iter().collect();
        let approved = self
            .state
            .opportunities
            .iter()
            .filter(|o| o.is_approved())
            .count();

        let created = self.validator.convert_all(
            &self.state.opportunities,
            &self.state.priorities,
            &existing,
            self.synergy.as_mut(),
        );

        let result = BatchResult {
            affected: created.iter().map(|p| p.id.clone()).collect(),
            skipped: approved - created.len(),
        };

        if created.is_empty() {
            debug!(approved, "没有需要转换的机会");
            return Ok(result);
        }

        let logs: Vec<ActionLog> = created
            .iter()
            .map(|p| {
                ActionLog::new(ActionType::ConvertOpportunity, actor, Some(&p.id)).with_payload(
                    json!({
                        "opportunity_id": p.opportunity_id,
                        "composite_score": p.composite_score,
                        "grade": p.investment_grade.to_db_str(),
                    }),
                )
            })
            .collect();

        self.state.projects.extend(created);
        self.persist()?;
        if let Some(repo) = &self.action_log_repo {
            repo.batch_insert(&logs)?;
        }

        info!(
            created = result.affected.len(),
            skipped = result.skipped,
            "已批准机会批量转换完成"
        );
        Ok(result)
    }

    // ==========================================
    // 项目校验状态流转
    // ==========================================

    pub fn transition_project(
        &mut self,
        project_id: &str,
        target: ValidationStatus,
        actor: &str,
    ) -> ApiResult<()> {
        require_actor(actor)?;

        let project = self
            .state
            .projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(|| ApiError::NotFound(format!("项目(id={})不存在", project_id)))?;

        let from = project.validation_status;
        self.validator.transition(project, target, actor)?;

        self.commit(
            ActionLog::new(ActionType::TransitionProject, actor, Some(project_id))
                .with_payload(json!({ "from": from.to_string(), "to": target.to_string() })),
        )
    }
}
