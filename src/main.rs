// ==========================================
// OEE 驾驶舱 - 命令行入口
// ==========================================
// 用法:
//   oee-dashboard <input.csv|input.json> [company_id] [config.json]
//
// 读取班次记录文件, 按租户输出分产线 OEE 汇总表
// 未指定 company_id 时输出文件内全部租户
// ==========================================

use anyhow::{bail, Context};
use oee_dashboard::api::{DashboardApi, DashboardQuery, DashboardSummary};
use oee_dashboard::config::{get_default_config_path, ConfigManager};
use oee_dashboard::importer::ShiftImporter;
use oee_dashboard::{logging, LineFilter, OeeMetrics, TenantContext, TimeRange};
use std::collections::BTreeSet;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let input = match args.next() {
        Some(path) => PathBuf::from(path),
        None => bail!("用法: oee-dashboard <input.csv|input.json> [company_id] [config.json]"),
    };
    let company_arg = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let config_arg = args.next().map(PathBuf::from);

    tracing::info!("{} v{}", oee_dashboard::APP_NAME, oee_dashboard::VERSION);

    // 加载配置: 显式路径 > 默认路径（存在时）> 内置缺省
    let config = match config_arg {
        Some(path) => ConfigManager::from_file(&path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?,
        None => {
            let default_path = get_default_config_path();
            if default_path.exists() {
                ConfigManager::from_file(&default_path)?
            } else {
                ConfigManager::new()
            }
        }
    };
    let settings = config.load_settings()?;
    tracing::info!(snapshot = %config.get_config_snapshot()?, "生效配置");

    let outcome = ShiftImporter::new()
        .import_file(&input)
        .with_context(|| format!("导入失败: {}", input.display()))?;

    for rejection in &outcome.rejected {
        println!("跳过第 {} 行: {}", rejection.row, rejection.reason);
    }

    let (date_from, date_to) = match (
        outcome.observations.iter().map(|o| o.shift_date).min(),
        outcome.observations.iter().map(|o| o.shift_date).max(),
    ) {
        (Some(from), Some(to)) => (from, to),
        _ => bail!("文件中没有可用的班次记录: {}", input.display()),
    };

    let companies: Vec<String> = match company_arg {
        Some(company) => vec![company],
        None => outcome
            .observations
            .iter()
            .map(|o| o.company_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
    };

    let api = DashboardApi::from_settings(&settings);
    let query = DashboardQuery {
        time_range: TimeRange::Custom {
            from: date_from,
            to: date_to,
        },
        today: date_to,
        line_filter: LineFilter::All,
    };

    for company in companies {
        let ctx = TenantContext::new(company);
        let summary = api.get_dashboard_summary(&ctx, &outcome.observations, &query)?;
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &DashboardSummary) {
    println!();
    println!(
        "租户 {}  {} ~ {}  班次数 {}",
        summary.company_id,
        summary.date_from,
        summary.date_to,
        summary.shifts.len()
    );
    println!(
        "{:<12} {:>6} {:>9} {:>9} {:>9} {:>9}  {}",
        "LINE", "SHIFTS", "AVAIL%", "PERF%", "QUAL%", "OEE%", "RATING"
    );
    for line in &summary.lines {
        print_row(&line.line_id, line.shift_count, &line.metrics);
    }
    print_row("ALL", summary.shifts.len(), &summary.overall);

    for violation in &summary.skipped {
        println!("已剔除 {}: {}", violation.record_key, violation.reason);
    }
}

fn print_row(label: &str, shifts: usize, m: &OeeMetrics) {
    println!(
        "{:<12} {:>6} {:>9.2} {:>9.2} {:>9.2} {:>9.2}  {}",
        label, shifts, m.availability_pct, m.performance_pct, m.quality_pct, m.oee_pct, m.rating
    );
}
