// ==========================================
// 资本配置决策系统 - 优先级权重平衡器
// ==========================================
// 红线: 任意单次权重修改后,权重之和恒为 100（误差 < 0.01）
// 规则: 被修改项取新值（截断到 [0,100]）,
//       其余项按原权重比例分摊剩余额度;原权重全为 0 时平均分摊
// ==========================================

use crate::domain::priority::{total_weight, InvestmentPriority};
use crate::engine::error::{EngineError, EngineResult};
use tracing::{debug, info};

pub struct PriorityWeightBalancer {
    // 无状态引擎
}

impl Default for PriorityWeightBalancer {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityWeightBalancer {
    pub fn new() -> Self {
        Self {}
    }

    /// 修改单个优先级权重并重新分摊其余权重
    ///
    /// # 参数
    /// - `priorities`: 全部优先级（原地更新）
    /// - `priority_id`: 被修改项
    /// - `new_weight`: 新权重
    /// - `total_capital`: 总资本（用于重算 capital_allocation）
    pub fn update_weight(
        &self,
        priorities: &mut [InvestmentPriority],
        priority_id: &str,
        new_weight: f64,
        total_capital: f64,
    ) -> EngineResult<()> {
        if !new_weight.is_finite() {
            return Err(EngineError::InvalidInput(format!(
                "权重不是有效数值: {}",
                new_weight
            )));
        }

        let idx = priorities
            .iter()
            .position(|p| p.id == priority_id)
            .ok_or_else(|| EngineError::not_found("InvestmentPriority", priority_id))?;

        // 仅有一个优先级时权重固定为 100
        let new_weight = if priorities.len() == 1 {
            100.0
        } else {
            new_weight.clamp(0.0, 100.0)
        };
        let remaining = 100.0 - new_weight;

        let others_total: f64 = priorities
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, p)| p.weight.max(0.0))
            .sum();
        let others_count = priorities.len() - 1;

        for (i, p) in priorities.iter_mut().enumerate() {
            if i == idx {
                p.weight = new_weight;
            } else if others_total > 0.0 {
                p.weight = p.weight.max(0.0) / others_total * remaining;
            } else {
                p.weight = remaining / others_count as f64;
            }
            p.derive_capital_allocation(total_capital);
        }

        debug!(
            priority_id,
            new_weight,
            total = total_weight(priorities),
            "优先级权重已重新分摊"
        );

        Ok(())
    }

    /// 按比例归一化到 100（全为 0 时平均分配）
    pub fn normalize(&self, priorities: &mut [InvestmentPriority], total_capital: f64) {
        if priorities.is_empty() {
            return;
        }

        let before = total_weight(priorities);
        let positive_total: f64 = priorities.iter().map(|p| p.weight.max(0.0)).sum();
        let count = priorities.len() as f64;

        for p in priorities.iter_mut() {
            p.weight = if positive_total > 0.0 {
                p.weight.max(0.0) / positive_total * 100.0
            } else {
                100.0 / count
            };
            p.derive_capital_allocation(total_capital);
        }

        info!(before, after = total_weight(priorities), "优先级权重已归一化");
    }

    /// 按总资本重算全部 capital_allocation
    pub fn derive_allocations(&self, priorities: &mut [InvestmentPriority], total_capital: f64) {
        for p in priorities.iter_mut() {
            p.derive_capital_allocation(total_capital);
        }
    }
}
