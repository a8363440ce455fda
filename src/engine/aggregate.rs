// ==========================================
// OEE 驾驶舱 - 多班次汇总
// ==========================================
// 职责: 按产线/全厂汇总多个班次的 OEE
// 口径: 先汇总计数,再按同一公式计算（不对百分比取平均）
// ==========================================
// 换型宽限按班次分别扣除
// 汇总理论节拍 = Σ运行时间 / Σ(运行时间_i / 节拍_i),
// 使汇总性能 = Σ实际产量 / Σ理论产量 × 100
// Reject 策略下逐班次先做范围检查, 汇总结果不会出现任何班次都没有的性能
// ==========================================

use crate::domain::metrics::OeeMetrics;
use crate::domain::shift::{ShiftCounters, ShiftObservation};
use crate::domain::types::{MetricKind, RangePolicy};
use crate::engine::calculator::OeeCalculator;
use crate::engine::error::{OeeError, OeeResult};
use tracing::instrument;

pub struct OeeAggregator<'a> {
    calculator: &'a OeeCalculator,
}

impl<'a> OeeAggregator<'a> {
    pub fn new(calculator: &'a OeeCalculator) -> Self {
        Self { calculator }
    }

    /// 合并多个班次的计数集
    pub fn combine_counters<'o, I>(&self, observations: I) -> OeeResult<ShiftCounters>
    where
        I: IntoIterator<Item = &'o ShiftObservation>,
    {
        let mut total = ShiftCounters::default();
        let mut theoretical_production = 0.0;
        let mut fallback_cycle_time = None;
        let mut count = 0usize;

        for obs in observations {
            if self.calculator.range_policy() == RangePolicy::Reject {
                self.calculator.check_observation(obs)?;
            }
            let c = self.calculator.counters_for(obs);
            if c.ideal_cycle_time_min == 0.0 {
                return Err(OeeError::DivisionByZero {
                    metric: MetricKind::Performance,
                    denominator: "ideal_cycle_time",
                });
            }

            total.planned_time_min += c.planned_time_min;
            total.downtime_min += c.downtime_min;
            total.actual_production += c.actual_production;
            total.rework += c.rework;
            total.scrap += c.scrap;
            total.lost_packages += c.lost_packages;
            total.setup_raw_min += c.setup_raw_min;
            total.setup_counted_min += c.setup_counted_min;

            theoretical_production += c.operating_time_min() / c.ideal_cycle_time_min;
            fallback_cycle_time.get_or_insert(c.ideal_cycle_time_min);
            count += 1;
        }

        if count == 0 {
            return Err(OeeError::NoObservations);
        }

        // 运行时间合计为 0: 按停线处理, 节拍取首个班次
        // 理论产量合计为 0 而运行时间不为 0: 仅在 Clamp/Passthrough 下
        // 正负运行时间相互抵消时出现, 无法折算节拍
        let operating_time = total.operating_time_min();
        total.ideal_cycle_time_min = if operating_time == 0.0 {
            fallback_cycle_time.unwrap_or_default()
        } else if theoretical_production == 0.0 {
            return Err(OeeError::DivisionByZero {
                metric: MetricKind::Performance,
                denominator: "theoretical_production",
            });
        } else {
            operating_time / theoretical_production
        };

        Ok(total)
    }

    /// 汇总并计算指标
    #[instrument(skip_all)]
    pub fn aggregate<'o, I>(&self, observations: I) -> OeeResult<OeeMetrics>
    where
        I: IntoIterator<Item = &'o ShiftObservation>,
    {
        let total = self.combine_counters(observations)?;
        self.calculator.calculate_counters(&total)
    }
}
