use analyzer_core::export::{self, ReportHeader};
use analyzer_core::{Category, ComparisonReport, Locale, analyze_targets};
use anyhow::Context;
use chrono::Local;
use tracing::{info, warn};

use super::CommandOutcome;
use crate::app::CliApp;
use crate::cli::CompareArgs;

/// 执行结构对比并输出结果
pub fn run_compare(app: &CliApp, args: &CompareArgs) -> anyhow::Result<CommandOutcome> {
    let config = app.effective_config(args);
    let locale = config.report.locale;

    // 连接串在任何比较器运行前校验
    let (master, division) = config.targets()?;
    let options = config.to_options();

    info!("📊 数据库结构对比");
    info!("==================");
    info!("   主数据库 ({}): {}", master.kind(), master.describe());
    info!("   分数据库 ({}): {}", division.kind(), division.describe());

    let report = analyze_targets(&master, &division, options).context("数据库结构对比失败")?;

    print!("{}", render_listing(&report, locale));
    info!("{}", render_summary(&report, locale));

    for failure in report.failures() {
        warn!("⚠️  {} 未完成: {}", failure.comparator, failure.message);
    }

    if let Some(output) = &args.output {
        let master_desc = master.describe();
        let division_desc = division.describe();
        let header = ReportHeader {
            master: &master_desc,
            division: &division_desc,
            locale,
            generated_at: Local::now(),
        };
        let written = export::write_report(&report, &header, args.format, output)
            .with_context(|| format!("导出报告失败: {}", output.display()))?;
        if !written {
            info!("💡 没有可导出的结果，未生成 {}", output.display());
        }
    }

    // collect 模式下有比较器失败时报告不完整，不能当作成功
    if !report.is_complete() {
        warn!(
            "❌ {} 个比较器失败，对比结果不完整",
            report.failures().len()
        );
        return Ok(CommandOutcome::Incomplete);
    }

    if args.fail_on_drift && report.has_drift() {
        warn!("❗ 主数据库与分数据库存在差异");
        return Ok(CommandOutcome::Drift);
    }

    Ok(CommandOutcome::Success)
}

/// 三列清单：项目 / 主数据库 / 分数据库
pub fn render_listing(report: &ComparisonReport, locale: Locale) -> String {
    let (item, master, division) = match locale {
        Locale::Zh => ("项目", "主数据库", "分数据库"),
        Locale::En => ("Item", "Master", "Division"),
    };

    let rows: String = report
        .iter()
        .map(|entry| {
            format!(
                "{}\t{}\t{}\n",
                entry.category().caption(locale),
                entry.master(),
                entry.division().render(locale)
            )
        })
        .collect();

    format!("{item}\t{master}\t{division}\n{rows}")
}

/// 一行汇总：各类差异的条目数
pub fn render_summary(report: &ComparisonReport, locale: Locale) -> String {
    let counts = report.count_by_category();
    let parts: Vec<String> = Category::ALL
        .iter()
        .filter(|category| !category.is_count())
        .filter_map(|category| {
            counts
                .get(category)
                .map(|n| format!("{} {}", category.caption(locale), n))
        })
        .collect();

    match (locale, report.has_drift()) {
        (Locale::Zh, false) => "✅ 未发现差异".to_string(),
        (Locale::En, false) => "✅ No differences found".to_string(),
        (Locale::Zh, true) if parts.is_empty() => "📋 汇总: 表或存储过程个数不一致".to_string(),
        (Locale::En, true) if parts.is_empty() => {
            "📋 Summary: table or stored procedure counts differ".to_string()
        }
        (Locale::Zh, true) => format!("📋 汇总: {}", parts.join(", ")),
        (Locale::En, true) => format!("📋 Summary: {}", parts.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyzer_core::{DiffEntry, DiffValue};

    fn sample_report() -> ComparisonReport {
        ComparisonReport::new(vec![
            DiffEntry::new(Category::TableCount, "2", DiffValue::Present("1".to_string())),
            DiffEntry::new(Category::SpCount, "1", DiffValue::Present("1".to_string())),
            DiffEntry::missing(Category::MissingTable, "[B]"),
            DiffEntry::missing(Category::MissingColumn, "[B].[Id](NO,int,,,10,10)"),
            DiffEntry::missing(Category::MissingColumn, "[B].[Name](YES,varchar,,50,,)"),
        ])
    }

    #[test]
    fn test_render_listing() {
        let listing = render_listing(&sample_report(), Locale::Zh);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[0], "项目\t主数据库\t分数据库");
        assert_eq!(lines[1], "表个数\t2\t1");
        assert_eq!(lines[3], "缺少的表\t[B]\t缺");
        assert_eq!(lines.len(), 6);

        let listing = render_listing(&sample_report(), Locale::En);
        assert!(listing.contains("Missing table\t[B]\tmissing\n"));
    }

    #[test]
    fn test_render_summary() {
        assert_eq!(
            render_summary(&sample_report(), Locale::Zh),
            "📋 汇总: 缺少的表 1, 缺少的列 2"
        );

        let clean = ComparisonReport::new(vec![
            DiffEntry::new(Category::TableCount, "2", DiffValue::Present("2".to_string())),
            DiffEntry::new(Category::SpCount, "1", DiffValue::Present("1".to_string())),
        ]);
        assert_eq!(render_summary(&clean, Locale::En), "✅ No differences found");

        let counts_only = ComparisonReport::new(vec![
            DiffEntry::new(Category::TableCount, "2", DiffValue::Present("3".to_string())),
            DiffEntry::new(Category::SpCount, "1", DiffValue::Present("1".to_string())),
        ]);
        assert_eq!(
            render_summary(&counts_only, Locale::Zh),
            "📋 汇总: 表或存储过程个数不一致"
        );
    }

    fn create_db(dir: &std::path::Path, name: &str, ddl: &str) -> String {
        let path = dir.join(name);
        let conn = duckdb::Connection::open(&path).unwrap();
        conn.execute_batch(ddl).unwrap();
        drop(conn);
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_run_compare_on_duckdb_files() {
        let temp = tempfile::TempDir::new().unwrap();
        let master = create_db(
            temp.path(),
            "master.duckdb",
            "CREATE TABLE a (id INTEGER); CREATE TABLE b (id INTEGER);",
        );
        let division = create_db(temp.path(), "division.duckdb", "CREATE TABLE a (id INTEGER);");
        let output = temp.path().join("report.json");

        let args = CompareArgs {
            master: Some(master),
            division: Some(division),
            kind: Some(analyzer_core::DatabaseKind::DuckDb),
            output: Some(output.clone()),
            format: analyzer_core::ExportFormat::Json,
            fail_on_drift: true,
            ..Default::default()
        };
        let app = CliApp::from_compare_args(&args).unwrap();

        let outcome = run_compare(&app, &args).unwrap();
        assert_eq!(outcome, CommandOutcome::Drift);
        assert_eq!(outcome.exit_code(), 3);

        let json = std::fs::read_to_string(&output).unwrap();
        assert!(json.contains("\"missing-table\""));
        assert!(json.contains("[b]"));
    }

    #[test]
    fn test_run_compare_rejects_empty_target() {
        let args = CompareArgs {
            master: Some("a.duckdb".to_string()),
            division: Some(String::new()),
            kind: Some(analyzer_core::DatabaseKind::DuckDb),
            ..Default::default()
        };
        let app = CliApp::from_compare_args(&args).unwrap();

        let err = run_compare(&app, &args).unwrap_err();
        let source = err.downcast_ref::<analyzer_core::AnalyzerError>().unwrap();
        assert_eq!(source.kind(), analyzer_core::ErrorKind::InvalidConnectionTarget);
    }

    #[test]
    fn test_run_compare_with_failed_comparators_is_not_success() {
        let temp = tempfile::TempDir::new().unwrap();
        let master = create_db(temp.path(), "master.duckdb", "CREATE TABLE a (id INTEGER);");
        let division = temp.path().join("absent.duckdb");
        let output = temp.path().join("report.txt");

        let mut config = analyzer_core::AnalyzerConfig::default();
        config.master.kind = analyzer_core::DatabaseKind::DuckDb;
        config.master.connection = master;
        config.division.kind = analyzer_core::DatabaseKind::DuckDb;
        config.division.connection = division.to_string_lossy().to_string();
        config.compare.failure_policy = analyzer_core::FailurePolicy::Collect;
        let app = CliApp::with_config(config);

        let args = CompareArgs {
            output: Some(output.clone()),
            fail_on_drift: true,
            ..Default::default()
        };

        let outcome = run_compare(&app, &args).unwrap();
        assert_eq!(outcome, CommandOutcome::Incomplete);
        assert_eq!(outcome.exit_code(), 1);
        // 所有比较器都失败，报告为空，不导出文件
        assert!(!output.exists());
    }
}
