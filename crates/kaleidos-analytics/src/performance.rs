//! 성과 지표 계산 모듈
//!
//! 변화율(수익률) 시계열에서 전략 성과를 측정하는 지표를 제공합니다:
//! - 누적 수익률 / 연평균 성장률 (CAGR)
//! - 샤프 비율 (Sharpe Ratio): 위험 대비 수익률 측정
//! - 소르티노 비율 (Sortino Ratio): 하방 위험 대비 수익률 측정
//! - 연간 변동성
//! - 최대 낙폭 (Maximum Drawdown): 고점 대비 최대 하락폭
//! - 최고/최저 기간 수익률, 승률
//!
//! 유한하지 않은 수익률(NaN, ±inf)은 계산에서 제외되고
//! [`PerformanceMetrics::non_finite`]에 개수가 기록됩니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use kaleidos_analytics::{pct_change, PerformanceMetrics, TRADING_DAYS_PER_YEAR};
//!
//! let returns = pct_change(&value_history)?;
//! let metrics = PerformanceMetrics::from_returns(returns.values(), 0.0, TRADING_DAYS_PER_YEAR);
//!
//! println!("샤프 비율: {:.2}", metrics.sharpe_ratio);
//! ```

use serde::{Deserialize, Serialize};

/// 연간 거래일 수 (연율화 계산에 사용)
///
/// 암호화폐 시장(365일)의 경우 설정에서 조정할 수 있습니다.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// 기본 무위험 이자율 (연간)
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.0;

/// 수익률 시계열의 성과 지표.
///
/// 모든 비율 값은 소수(0.1 = 10%)입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// 계산에 사용된 기간 수 (유한한 수익률만)
    pub periods: usize,
    /// 계산에서 제외된 유한하지 않은 수익률 수
    pub non_finite: usize,
    /// 누적 수익률 (복리)
    pub cumulative_return: f64,
    /// 연평균 성장률
    pub cagr: f64,
    /// 샤프 비율 (연율화)
    pub sharpe_ratio: f64,
    /// 소르티노 비율 (연율화)
    pub sortino_ratio: f64,
    /// 연간 변동성
    pub volatility: f64,
    /// 최대 낙폭 (음수, 예: -0.25)
    pub max_drawdown: f64,
    /// 최고 기간 수익률
    pub best_period: f64,
    /// 최저 기간 수익률
    pub worst_period: f64,
    /// 승률 (0이 아닌 수익률 중 양수 비율)
    pub win_rate: f64,
}

impl PerformanceMetrics {
    /// 변화율 시계열에서 성과 지표를 계산합니다.
    ///
    /// # 매개변수
    ///
    /// * `returns` - 기간별 변화율 (비율)
    /// * `risk_free_rate` - 연간 무위험 이자율 (예: 0.02 = 2%)
    /// * `periods_per_year` - 연간 기간 수 (일봉 252)
    pub fn from_returns(returns: &[f64], risk_free_rate: f64, periods_per_year: u32) -> Self {
        let clean: Vec<f64> = returns.iter().copied().filter(|r| r.is_finite()).collect();
        let non_finite = returns.len() - clean.len();

        let cumulative_return = Self::compounded_return(&clean);
        let (best_period, worst_period) = Self::best_and_worst(&clean);

        Self {
            periods: clean.len(),
            non_finite,
            cumulative_return,
            cagr: Self::annualize_return(cumulative_return, clean.len(), periods_per_year),
            sharpe_ratio: Self::calculate_sharpe_ratio(&clean, risk_free_rate, periods_per_year),
            sortino_ratio: Self::calculate_sortino_ratio(&clean, risk_free_rate, periods_per_year),
            volatility: Self::annualized_volatility(&clean, periods_per_year),
            max_drawdown: Self::calculate_max_drawdown(&clean),
            best_period,
            worst_period,
            win_rate: Self::win_rate(&clean),
        }
    }

    /// 복리 누적 수익률.
    pub fn compounded_return(returns: &[f64]) -> f64 {
        returns
            .iter()
            .filter(|r| r.is_finite())
            .fold(1.0, |acc, r| acc * (1.0 + r))
            - 1.0
    }

    /// 누적 수익률을 연율화합니다.
    ///
    /// CAGR = (1 + 누적 수익률)^(연간 기간 수 / 기간 수) - 1
    fn annualize_return(total_return: f64, periods: usize, periods_per_year: u32) -> f64 {
        if periods == 0 || total_return <= -1.0 {
            return 0.0;
        }
        (1.0 + total_return).powf(f64::from(periods_per_year) / periods as f64) - 1.0
    }

    /// 연간 무위험 이자율을 기간 이자율로 변환합니다.
    fn per_period_rate(risk_free_rate: f64, periods_per_year: u32) -> f64 {
        if risk_free_rate == 0.0 || periods_per_year == 0 {
            return 0.0;
        }
        (1.0 + risk_free_rate).powf(1.0 / f64::from(periods_per_year)) - 1.0
    }

    fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// 표본 표준편차: √(Σ(ri - mean)² / (n-1))
    fn sample_std(values: &[f64]) -> f64 {
        let mean = Self::mean(values);
        let variance = values.iter().map(|r| (r - mean).powi(2)).sum::<f64>()
            / (values.len() as f64 - 1.0);
        variance.sqrt()
    }

    /// 샤프 비율을 계산합니다.
    ///
    /// # 계산 공식
    ///
    /// Sharpe = 평균 초과 수익률 / 표준편차 × √(연간 기간 수)
    ///
    /// 초과 수익률은 각 기간 수익률에서 기간 무위험 이자율을 뺀 값입니다.
    /// 데이터가 2개 미만이거나 표준편차가 0이면 0을 반환합니다.
    ///
    /// # 해석
    ///
    /// - 1.0 이상: 양호 (위험 대비 적절한 수익)
    /// - 2.0 이상: 우수 (위험 대비 높은 수익)
    pub fn calculate_sharpe_ratio(
        returns: &[f64],
        risk_free_rate: f64,
        periods_per_year: u32,
    ) -> f64 {
        // 최소 2개의 수익률 데이터 필요 (표준편차 계산용)
        if returns.len() < 2 {
            return 0.0;
        }

        let rf = Self::per_period_rate(risk_free_rate, periods_per_year);
        let excess: Vec<f64> = returns.iter().map(|r| r - rf).collect();

        let std_dev = Self::sample_std(&excess);
        if std_dev == 0.0 || !std_dev.is_finite() {
            return 0.0;
        }

        Self::mean(&excess) / std_dev * f64::from(periods_per_year).sqrt()
    }

    /// 소르티노 비율을 계산합니다.
    ///
    /// # 계산 공식
    ///
    /// Sortino = 평균 초과 수익률 / 하방 편차 × √(연간 기간 수)
    ///
    /// 여기서 하방 편차 = √(Σ min(ri, 0)² / n)
    ///
    /// 손실 기간이 없으면 0을 반환합니다.
    pub fn calculate_sortino_ratio(
        returns: &[f64],
        risk_free_rate: f64,
        periods_per_year: u32,
    ) -> f64 {
        if returns.len() < 2 {
            return 0.0;
        }

        let rf = Self::per_period_rate(risk_free_rate, periods_per_year);
        let excess: Vec<f64> = returns.iter().map(|r| r - rf).collect();

        // 하방 편차: 음수 수익률만 사용
        let downside_squared_sum: f64 = excess.iter().filter(|r| **r < 0.0).map(|r| r * r).sum();
        let downside_dev = (downside_squared_sum / excess.len() as f64).sqrt();

        if downside_dev == 0.0 {
            return 0.0;
        }

        Self::mean(&excess) / downside_dev * f64::from(periods_per_year).sqrt()
    }

    /// 연간 변동성 = 표본 표준편차 × √(연간 기간 수)
    pub fn annualized_volatility(returns: &[f64], periods_per_year: u32) -> f64 {
        if returns.len() < 2 {
            return 0.0;
        }
        Self::sample_std(returns) * f64::from(periods_per_year).sqrt()
    }

    /// 복리 자산 곡선에서 최대 낙폭을 계산합니다.
    ///
    /// # 계산 공식
    ///
    /// MDD = min(자산 / 직전 고점 - 1)
    ///
    /// # 예시
    ///
    /// 1.0 → 1.2(고점) → 1.08(저점) → 1.3
    /// MDD = 1.08 / 1.2 - 1 = -10%
    pub fn calculate_max_drawdown(returns: &[f64]) -> f64 {
        // 시작 자산 1.0을 첫 고점으로 사용
        let mut equity = 1.0_f64;
        let mut peak = 1.0_f64;
        let mut max_drawdown = 0.0_f64;

        for r in returns {
            equity *= 1.0 + r;
            if equity > peak {
                peak = equity;
            }
            if peak > 0.0 {
                max_drawdown = max_drawdown.min(equity / peak - 1.0);
            }
        }

        max_drawdown
    }

    fn best_and_worst(returns: &[f64]) -> (f64, f64) {
        if returns.is_empty() {
            return (0.0, 0.0);
        }
        let best = returns.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = returns.iter().copied().fold(f64::INFINITY, f64::min);
        (best, worst)
    }

    fn win_rate(returns: &[f64]) -> f64 {
        let non_zero = returns.iter().filter(|r| **r != 0.0).count();
        if non_zero == 0 {
            return 0.0;
        }
        let wins = returns.iter().filter(|r| **r > 0.0).count();
        wins as f64 / non_zero as f64
    }

    /// 성과 요약을 문자열로 반환합니다.
    pub fn summary(&self) -> String {
        format!(
            "기간: {} | 누적: {:.2}% | CAGR: {:.2}% | 샤프: {:.2} | 소르티노: {:.2} | MDD: {:.2}%",
            self.periods,
            self.cumulative_return * 100.0,
            self.cagr * 100.0,
            self.sharpe_ratio,
            self.sortino_ratio,
            self.max_drawdown * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compounded_return() {
        let total = PerformanceMetrics::compounded_return(&[0.1, 0.1, -0.1]);
        assert!((total - 0.089).abs() < 1e-9);
    }

    #[test]
    fn test_sharpe_ratio() {
        let returns = [0.01, 0.02, -0.01, 0.015, 0.005];
        let sharpe = PerformanceMetrics::calculate_sharpe_ratio(&returns, 0.0, 252);

        // mean 0.008, 표본 분산 5.3e-4 / 4
        let expected = 0.008 / (5.3e-4_f64 / 4.0).sqrt() * 252f64.sqrt();
        assert!((sharpe - expected).abs() < 1e-6);
    }

    #[test]
    fn test_sharpe_ratio_degenerate() {
        assert_eq!(PerformanceMetrics::calculate_sharpe_ratio(&[0.01], 0.0, 252), 0.0);
        assert_eq!(
            PerformanceMetrics::calculate_sharpe_ratio(&[0.01, 0.01, 0.01], 0.0, 252),
            0.0
        );
    }

    #[test]
    fn test_risk_free_rate_lowers_sharpe() {
        let returns = [0.01, 0.02, -0.01, 0.015, 0.005];
        let base = PerformanceMetrics::calculate_sharpe_ratio(&returns, 0.0, 252);
        let with_rf = PerformanceMetrics::calculate_sharpe_ratio(&returns, 0.05, 252);
        assert!(with_rf < base);
    }

    #[test]
    fn test_sortino_ratio() {
        let returns = [0.02, -0.01, 0.03, -0.02];
        let sortino = PerformanceMetrics::calculate_sortino_ratio(&returns, 0.0, 252);
        assert!(sortino > 0.0);

        assert_eq!(
            PerformanceMetrics::calculate_sortino_ratio(&[0.01, 0.02], 0.0, 252),
            0.0
        );
    }

    #[test]
    fn test_max_drawdown() {
        // 1.0 → 1.2 → 1.08 → 1.3
        let returns = [0.2, -0.1, 1.3 / 1.08 - 1.0];
        let mdd = PerformanceMetrics::calculate_max_drawdown(&returns);
        assert!((mdd + 0.1).abs() < 1e-9);

        assert_eq!(PerformanceMetrics::calculate_max_drawdown(&[0.1, 0.2]), 0.0);
    }

    #[test]
    fn test_from_returns_filters_non_finite() {
        let metrics =
            PerformanceMetrics::from_returns(&[0.1, f64::NAN, 0.1, f64::INFINITY, -0.1], 0.0, 252);

        assert_eq!(metrics.periods, 3);
        assert_eq!(metrics.non_finite, 2);
        assert!((metrics.cumulative_return - 0.089).abs() < 1e-9);
        assert_eq!(metrics.best_period, 0.1);
        assert_eq!(metrics.worst_period, -0.1);
        assert!((metrics.win_rate - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_returns_empty() {
        let metrics = PerformanceMetrics::from_returns(&[], 0.0, 252);
        assert_eq!(metrics, PerformanceMetrics::default());
    }

    #[test]
    fn test_cagr_one_year() {
        let returns = vec![0.001; 252];
        let metrics = PerformanceMetrics::from_returns(&returns, 0.0, 252);
        assert!((metrics.cagr - metrics.cumulative_return).abs() < 1e-9);
    }

    #[test]
    fn test_summary() {
        let metrics = PerformanceMetrics::from_returns(&[0.1, -0.05], 0.0, 252);
        assert!(metrics.summary().contains("샤프"));
    }
}
