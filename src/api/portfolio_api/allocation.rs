use super::*;

use serde_json::json;

use crate::domain::sector::{SectorAllocation, SectorConstraintStatus};

impl PortfolioApi {
    // ==========================================
    // 板块配置
    // ==========================================

    /// 按当前项目重算全部板块配置
    pub fn recalculate_allocations(&mut self, actor: &str) -> ApiResult<&[SectorAllocation]> {
        require_actor(actor)?;

        self.state.allocations = self
            .allocator
            .allocate(&self.state.sectors, &self.state.projects);

        let summary: Vec<_> = self
            .state
            .allocations
            .iter()
            .map(|a| {
                json!({
                    "sector_id": a.sector_id,
                    "current_allocation": a.current_allocation,
                    "project_count": a.project_count,
                })
            })
            .collect();

        self.commit(
            ActionLog::new(ActionType::RecalculateAllocation, actor, None)
                .with_payload(json!({ "sectors": summary })),
        )?;

        Ok(&self.state.allocations)
    }

    /// 评估板块约束（只读,不落库）
    pub fn evaluate_constraints(&self) -> Vec<SectorConstraintStatus> {
        self.allocator
            .evaluate_constraints(&self.state.allocations, &self.state.constraints)
    }

    /// 一键再平衡: 全部板块当前配置重置为目标配置
    pub fn rebalance(&mut self, actor: &str) -> ApiResult<()> {
        require_actor(actor)?;

        if self.state.allocations.is_empty() {
            return Err(ApiError::BusinessRuleViolation(
                "尚未计算板块配置,无法再平衡".to_string(),
            ));
        }

        self.allocator.rebalance(&mut self.state.allocations);

        self.commit(
            ActionLog::new(ActionType::Rebalance, actor, None)
                .with_detail(format!("{} 个板块已重置为目标配置", self.state.allocations.len())),
        )
    }

    /// 人工调整单个板块配置
    ///
    /// # 返回
    /// - Ok(f64): 截断到 [0,100] 后实际写入的值
    pub fn set_manual_allocation(
        &mut self,
        sector_id: &str,
        value: f64,
        actor: &str,
    ) -> ApiResult<f64> {
        require_actor(actor)?;

        let applied = self
            .allocator
            .set_manual_allocation(&mut self.state.allocations, sector_id, value)?;

        self.commit(
            ActionLog::new(ActionType::ManualAllocation, actor, Some(sector_id))
                .with_payload(json!({ "requested": value, "applied": applied })),
        )?;

        Ok(applied)
    }
}
