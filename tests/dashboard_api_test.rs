// ==========================================
// DashboardApi 集成测试
// ==========================================
// 测试目标: 验证租户隔离、时间/产线过滤、校验模式、汇总口径
// ==========================================

mod test_helpers;

use oee_dashboard::api::{ApiError, DashboardApi, DashboardQuery, ValidationMode};
use oee_dashboard::config::ConfigManager;
use oee_dashboard::domain::{LineFilter, RangePolicy, ShiftCode, ShiftObservation, TenantContext, TimeRange};
use oee_dashboard::engine::OeeCalculator;
use test_helpers::{assert_close, create_baseline_observation, create_test_observation, date};

// ==========================================
// 测试辅助函数
// ==========================================

fn query(time_range: TimeRange, line_filter: LineFilter) -> DashboardQuery {
    DashboardQuery {
        time_range,
        today: date(2026, 3, 18),
        line_filter,
    }
}

/// 两个租户、两条产线、跨两天的记录
fn sample_observations() -> Vec<ShiftObservation> {
    let mut l1_night = create_test_observation("C1", "L1", date(2026, 3, 18), ShiftCode::Night);
    l1_night.stoppage_min = 48.0;

    let mut l2_prev = create_test_observation("C1", "L2", date(2026, 3, 17), ShiftCode::Morning);
    l2_prev.actual_production = 600.0;
    l2_prev.ideal_cycle_time_min = 0.8;

    vec![
        create_baseline_observation("C1", "L1"),
        l1_night,
        l2_prev,
        create_test_observation("C2", "L1", date(2026, 3, 18), ShiftCode::Morning),
    ]
}

// ==========================================
// 测试用例
// ==========================================

#[test]
fn test_summary_scoped_to_tenant_and_today() {
    let api = DashboardApi::default();
    let ctx = TenantContext::new("C1").with_user("operator-7");

    let summary = api
        .get_dashboard_summary(&ctx, &sample_observations(), &query(TimeRange::Today, LineFilter::All))
        .unwrap();

    assert_eq!(summary.company_id, "C1");
    assert_eq!(summary.date_from, date(2026, 3, 18));
    assert_eq!(summary.shifts.len(), 2);
    assert_eq!(summary.lines.len(), 1);
    assert_eq!(summary.lines[0].line_id, "L1");
    assert_eq!(summary.lines[0].shift_count, 2);
    assert!(summary.skipped.is_empty());

    // 班次排序: 早班在夜班之前
    assert_eq!(summary.shifts[0].shift, ShiftCode::Morning);
    assert_close(summary.shifts[0].metrics.oee_pct, 72.916_666_666_666_66);
}

#[test]
fn test_line_rollup_sums_counters() {
    let api = DashboardApi::default();
    let ctx = TenantContext::new("C1");

    let summary = api
        .get_dashboard_summary(&ctx, &sample_observations(), &query(TimeRange::Today, LineFilter::All))
        .unwrap();

    // L1 合计: 计划 960, 停机 45 + 48 = 93
    let l1 = &summary.lines[0].metrics;
    assert_eq!(l1.downtime_min, 93.0);
    assert_close(l1.availability_pct, (960.0 - 93.0) / 960.0 * 100.0);
    // 理论产量 435/0.4 + 432/0.4 = 2167.5, 实际 920 + 1000
    assert_close(l1.performance_pct, 1920.0 / 2167.5 * 100.0);
    // 损失 45
    assert_close(l1.quality_pct, (1920.0 - 45.0) / 1920.0 * 100.0);
    assert_eq!(summary.overall, *l1);
}

#[test]
fn test_week_range_with_line_filter() {
    let api = DashboardApi::default();
    let ctx = TenantContext::new("C1");

    let summary = api
        .get_dashboard_summary(
            &ctx,
            &sample_observations(),
            &query(TimeRange::Week, LineFilter::Line("L2".to_string())),
        )
        .unwrap();

    assert_eq!(summary.shifts.len(), 1);
    assert_eq!(summary.lines[0].line_id, "L2");
    assert_close(summary.overall.performance_pct, 600.0 / 600.0 * 100.0);
    assert_close(summary.overall.oee_pct, 100.0);
}

#[test]
fn test_overall_across_lines_sorted() {
    let api = DashboardApi::default();
    let ctx = TenantContext::new("C1");

    let summary = api
        .get_dashboard_summary(&ctx, &sample_observations(), &query(TimeRange::Week, LineFilter::All))
        .unwrap();

    let line_ids: Vec<&str> = summary.lines.iter().map(|l| l.line_id.as_str()).collect();
    assert_eq!(line_ids, vec!["L1", "L2"]);
    assert_eq!(summary.shifts.len(), 3);
    assert_eq!(summary.shifts[0].shift_date, date(2026, 3, 17));
}

#[test]
fn test_no_matching_records_is_not_found() {
    let api = DashboardApi::default();
    let ctx = TenantContext::new("C3");

    let result = api.get_dashboard_summary(
        &ctx,
        &sample_observations(),
        &query(TimeRange::Month, LineFilter::All),
    );
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[test]
fn test_empty_tenant_rejected() {
    let api = DashboardApi::default();
    let ctx = TenantContext::new("  ");
    let result = api.get_dashboard_summary(&ctx, &[], &query(TimeRange::Today, LineFilter::All));
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[test]
fn test_inverted_custom_range_rejected() {
    let api = DashboardApi::default();
    let ctx = TenantContext::new("C1");
    let range = TimeRange::Custom {
        from: date(2026, 3, 18),
        to: date(2026, 3, 1),
    };
    let result = api.get_dashboard_summary(&ctx, &sample_observations(), &query(range, LineFilter::All));
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[test]
fn test_strict_mode_fails_on_invalid_record() {
    let api = DashboardApi::default();
    let ctx = TenantContext::new("C1");

    let mut observations = sample_observations();
    observations[1].stoppage_min = 600.0; // 停机超计划

    match api.get_dashboard_summary(&ctx, &observations, &query(TimeRange::Today, LineFilter::All)) {
        Err(ApiError::ObservationValidationError { violations, .. }) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].violation_type, "OUT_OF_RANGE");
            assert_eq!(violations[0].record_key, "L1@2026-03-18/NIGHT");
        }
        other => panic!("Expected ObservationValidationError, got {:?}", other),
    }
}

#[test]
fn test_skip_mode_drops_invalid_record() {
    let api = DashboardApi::new(OeeCalculator::new(), ValidationMode::SkipInvalid);
    let ctx = TenantContext::new("C1");

    let mut observations = sample_observations();
    observations[1].ideal_cycle_time_min = 0.0;

    let summary = api
        .get_dashboard_summary(&ctx, &observations, &query(TimeRange::Today, LineFilter::All))
        .unwrap();

    assert_eq!(summary.shifts.len(), 1);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].violation_type, "NON_POSITIVE");
    assert_close(summary.overall.oee_pct, 72.916_666_666_666_66);
}

#[test]
fn test_stopped_shift_with_output_kept_out_of_line_rollup() {
    let ctx = TenantContext::new("C1");
    let mut observations = sample_observations();
    // L1 夜班: 停机占满计划时间, 产量却为 1000
    observations[1].stoppage_min = 480.0;

    let strict = DashboardApi::default().get_dashboard_summary(
        &ctx,
        &observations,
        &query(TimeRange::Today, LineFilter::All),
    );
    match strict {
        Err(ApiError::ObservationValidationError { violations, .. }) => {
            assert_eq!(violations[0].violation_type, "OUT_OF_RANGE");
            assert_eq!(violations[0].record_key, "L1@2026-03-18/NIGHT");
        }
        other => panic!("Expected ObservationValidationError, got {:?}", other),
    }

    let api = DashboardApi::new(OeeCalculator::new(), ValidationMode::SkipInvalid);
    let summary = api
        .get_dashboard_summary(&ctx, &observations, &query(TimeRange::Today, LineFilter::All))
        .unwrap();

    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.lines[0].shift_count, 1);
    // 产线汇总与唯一保留班次一致
    let line = &summary.lines[0].metrics;
    assert_close(line.performance_pct, summary.shifts[0].metrics.performance_pct);
    assert_close(line.performance_pct, 84.597_701_149_425_29);
    assert_close(line.oee_pct, 72.916_666_666_666_66);
}

#[test]
fn test_clamp_policy_via_settings() {
    let config = ConfigManager::from_map([("range_policy", "CLAMP")]).unwrap();
    let settings = config.load_settings().unwrap();
    let api = DashboardApi::from_settings(&settings);
    assert_eq!(api.calculator().range_policy(), RangePolicy::Clamp);

    let ctx = TenantContext::new("C1");
    let mut obs = create_test_observation("C1", "L1", date(2026, 3, 18), ShiftCode::Morning);
    obs.actual_production = 1500.0; // 快于理论节拍

    let record = api.evaluate_shift(&ctx, &obs).unwrap();
    assert_eq!(record.metrics.performance_pct, 100.0);
    assert_close(record.metrics.oee_pct, 100.0);
}

#[test]
fn test_evaluate_shift_other_tenant_forbidden() {
    let api = DashboardApi::default();
    let ctx = TenantContext::new("C2");
    let obs = create_baseline_observation("C1", "L1");
    assert!(matches!(api.evaluate_shift(&ctx, &obs), Err(ApiError::Forbidden(_))));
}
