// ==========================================
// 资本配置决策系统 - 综合评分引擎
// ==========================================
// 输入: 投资机会（战略契合度、投资规模、初步风险）+ 协同评分源
// 输出: ScoringBreakdown（含综合评分）
// ==========================================
// 公式:
//   strategic_alignment = strategic_fit_score
//   financial_score     = min(100, investment_range.min / 10_000_000 × 10)
//   risk_adjustment     = 100 - preliminary_risk_score
//   synergy_score       = 协同评分源抽样 [50, 80)
//   composite_score     = 0.4×SA + 0.3×FS + 0.2×RA + 0.1×SS （不做二次截断）
// ==========================================

use crate::domain::opportunity::Opportunity;
use crate::domain::priority::InvestmentPriority;
use crate::domain::project::ScoringBreakdown;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// financial_score 的规模基数（每 1000 万得 10 分）
pub const FINANCIAL_SCALE_UNIT: f64 = 10_000_000.0;

/// 协同评分默认区间 [50, 80)
pub const DEFAULT_SYNERGY_MIN: f64 = 50.0;
pub const DEFAULT_SYNERGY_MAX: f64 = 80.0;

// ==========================================
// ScoringWeights - 评分权重
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringWeights {
    pub strategic: f64,
    pub financial: f64,
    pub risk: f64,
    pub synergy: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            strategic: 0.4,
            financial: 0.3,
            risk: 0.2,
            synergy: 0.1,
        }
    }
}

impl ScoringWeights {
    /// 按权重合成综合评分
    pub fn composite(
        &self,
        strategic_alignment: f64,
        financial_score: f64,
        risk_adjustment: f64,
        synergy_score: f64,
    ) -> f64 {
        self.strategic * strategic_alignment
            + self.financial * financial_score
            + self.risk * risk_adjustment
            + self.synergy * synergy_score
    }

    /// 由评分构成重新计算综合评分
    pub fn recompute(&self, breakdown: &ScoringBreakdown) -> f64 {
        self.composite(
            breakdown.strategic_alignment,
            breakdown.financial_score,
            breakdown.risk_adjustment,
            breakdown.synergy_score,
        )
    }

    /// 权重之和是否为 1
    pub fn is_normalized(&self) -> bool {
        let sum = self.strategic + self.financial + self.risk + self.synergy;
        (sum - 1.0).abs() < 1e-6
    }
}

// ==========================================
// SynergySource - 协同评分源
// ==========================================
// 评分引擎唯一的非确定性来源,注入以便测试固定
pub trait SynergySource {
    fn next_synergy(&mut self) -> f64;
}

/// 随机协同评分（可指定种子）
pub struct SeededSynergy {
    rng: StdRng,
    min: f64,
    max: f64,
}

impl SeededSynergy {
    pub fn new(seed: u64) -> Self {
        Self::with_range(seed, DEFAULT_SYNERGY_MIN, DEFAULT_SYNERGY_MAX)
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            min: DEFAULT_SYNERGY_MIN,
            max: DEFAULT_SYNERGY_MAX,
        }
    }

    /// 区间非法（min >= max）时回退默认区间
    pub fn with_range(seed: u64, min: f64, max: f64) -> Self {
        let (min, max) = if min < max {
            (min, max)
        } else {
            (DEFAULT_SYNERGY_MIN, DEFAULT_SYNERGY_MAX)
        };
        Self {
            rng: StdRng::seed_from_u64(seed),
            min,
            max,
        }
    }
}

impl SynergySource for SeededSynergy {
    fn next_synergy(&mut self) -> f64 {
        self.rng.gen_range(self.min..self.max)
    }
}

/// 固定协同评分
#[derive(Debug, Clone, Copy)]
pub struct FixedSynergy(pub f64);

impl SynergySource for FixedSynergy {
    fn next_synergy(&mut self) -> f64 {
        self.0
    }
}

// ==========================================
// ScoringEngine - 综合评分引擎
// ==========================================
pub struct ScoringEngine {
    weights: ScoringWeights,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// 规模分（按最低投资额线性放大,上限 100）
    pub fn financial_score(min_investment: f64) -> f64 {
        (min_investment / FINANCIAL_SCALE_UNIT * 10.0).min(100.0)
    }

    /// 计算评分构成
    ///
    /// # 参数
    /// - `opportunity`: 投资机会
    /// - `_priorities`: 优先级列表（当前公式不使用）
    /// - `synergy`: 协同评分源
    pub fn score(
        &self,
        opportunity: &Opportunity,
        _priorities: &[InvestmentPriority],
        synergy: &mut dyn SynergySource,
    ) -> ScoringBreakdown {
        let strategic_alignment = opportunity.strategic_fit_score;
        let financial_score = Self::financial_score(opportunity.investment_range.min);
        let risk_adjustment = 100.0 - opportunity.preliminary_risk_score;
        let synergy_score = synergy.next_synergy();

        let composite_score = self.weights.composite(
            strategic_alignment,
            financial_score,
            risk_adjustment,
            synergy_score,
        );

        debug!(
            opportunity_id = %opportunity.id,
            strategic_alignment,
            financial_score,
            risk_adjustment,
            synergy_score,
            composite_score,
            "综合评分完成"
        );

        ScoringBreakdown {
            strategic_alignment,
            financial_score,
            risk_adjustment,
            synergy_score,
            composite_score,
        }
    }

    /// 仅返回综合评分
    pub fn composite_score(
        &self,
        opportunity: &Opportunity,
        priorities: &[InvestmentPriority],
        synergy: &mut dyn SynergySource,
    ) -> f64 {
        self.score(opportunity, priorities, synergy).composite_score
    }
}
