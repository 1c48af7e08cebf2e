// ==========================================
// 资本配置决策系统 - 投资等级分类器
// ==========================================
// 规则表（按序匹配,首条命中即返回,均不命中为非投资级）:
// | 等级 | composite_score | risk_score |
// | A    | > 80            | < 30       |
// | B    | [60, 80]        | [30, 50]   |
// | C    | [40, 60]        | [50, 70]   |
// 红线: 边界运算符必须严格保持（A 为严格大于/小于,B/C 为闭区间）
// ==========================================

use crate::domain::types::InvestmentGrade;

pub struct GradeClassifier {
    // 无状态,规则表固定
}

impl Default for GradeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl GradeClassifier {
    pub fn new() -> Self {
        Self {}
    }

    /// 分类（全函数: 任意输入恰好返回一个等级）
    pub fn classify(&self, composite_score: f64, risk_score: f64) -> InvestmentGrade {
        if composite_score > 80.0 && risk_score < 30.0 {
            return InvestmentGrade::A;
        }

        if (60.0..=80.0).contains(&composite_score) && (30.0..=50.0).contains(&risk_score) {
            return InvestmentGrade::B;
        }

        if (40.0..=60.0).contains(&composite_score) && (50.0..=70.0).contains(&risk_score) {
            return InvestmentGrade::C;
        }

        InvestmentGrade::NonInvestment
    }
}
