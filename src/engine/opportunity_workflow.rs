// ==========================================
// 资本配置决策系统 - 机会状态流转
// ==========================================
// 流转: new -> under_review -> {approved, rejected}
// 红线: rejected 为终态;流转均为显式人工操作
// ==========================================

use crate::domain::opportunity::Opportunity;
use crate::domain::types::OpportunityStatus;
use crate::engine::error::{EngineError, EngineResult};
use chrono::Utc;
use tracing::info;

pub struct OpportunityWorkflow {
    // 无状态引擎
}

impl Default for OpportunityWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl OpportunityWorkflow {
    pub fn new() -> Self {
        Self {}
    }

    /// 执行状态流转
    ///
    /// 批准时记录 approved_by;每次流转更新 updated_by/updated_date
    pub fn transition(
        &self,
        opportunity: &mut Opportunity,
        target: OpportunityStatus,
        actor: &str,
    ) -> EngineResult<()> {
        if !opportunity.status.can_transition_to(target) {
            return Err(EngineError::InvalidStateTransition {
                entity: "Opportunity".to_string(),
                id: opportunity.id.clone(),
                from: opportunity.status.to_string(),
                to: target.to_string(),
            });
        }

        let from = opportunity.status;
        opportunity.status = target;
        if target == OpportunityStatus::Approved {
            opportunity.approved_by = Some(actor.to_string());
        }
        opportunity.updated_by = actor.to_string();
        opportunity.updated_date = Utc::now();

        info!(
            opportunity_id = %opportunity.id,
            from = %from,
            to = %target,
            actor,
            "机会状态流转"
        );

        Ok(())
    }
}
