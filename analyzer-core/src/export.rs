//! 报告导出：文本格式与 JSON 格式

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::compare::Comparator;
use crate::constants::report::{ENTRY_END, SEPARATOR};
use crate::error::Result;
use crate::report::{Category, ComparisonReport, DiffValue, Locale};

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("不支持的导出格式: {other}")),
        }
    }
}

/// 报告头信息
#[derive(Debug, Clone)]
pub struct ReportHeader<'a> {
    pub master: &'a str,
    pub division: &'a str,
    pub locale: Locale,
    pub generated_at: DateTime<Local>,
}

struct Labels {
    title: &'static str,
    master: &'static str,
    division: &'static str,
    item: &'static str,
    date_format: &'static str,
}

fn labels(locale: Locale) -> Labels {
    match locale {
        Locale::Zh => Labels {
            title: "数据库对比分析报告",
            master: "主数据库:",
            division: "分数据库:",
            item: "项目:",
            date_format: "%Y年%-m月%-d日",
        },
        Locale::En => Labels {
            title: "Schema comparison report",
            master: "Master:",
            division: "Division:",
            item: "Item:",
            date_format: "%A, %B %-d, %Y",
        },
    }
}

/// 文本报告，按导出格式逐行输出
struct TextReport<'a> {
    report: &'a ComparisonReport,
    header: &'a ReportHeader<'a>,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let locale = self.header.locale;
        let labels = labels(locale);

        writeln!(
            f,
            "{} {}",
            labels.title,
            self.header.generated_at.format(labels.date_format)
        )?;
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "{}\n{}", labels.master, self.header.master)?;
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "{}\n{}", labels.division, self.header.division)?;
        writeln!(f, "{SEPARATOR}")?;

        for (index, entry) in self.report.iter().enumerate() {
            writeln!(f, "{}.", index + 1)?;
            writeln!(f, "{}{}", labels.item, entry.category().caption(locale))?;
            writeln!(f, "{}\n{}", labels.master, entry.master())?;
            writeln!(f, "{}\n{}", labels.division, entry.division().render(locale))?;
            writeln!(f, "{ENTRY_END}\n")?;
        }

        Ok(())
    }
}

/// 渲染文本报告
pub fn render_text(report: &ComparisonReport, header: &ReportHeader<'_>) -> String {
    TextReport { report, header }.to_string()
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    master: &'a str,
    division: &'a str,
    complete: bool,
    entries: Vec<JsonEntry<'a>>,
    failures: Vec<JsonFailure<'a>>,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    category: Category,
    caption: &'static str,
    master: &'a str,
    /// 分库缺失时为 null
    division: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonFailure<'a> {
    comparator: Comparator,
    message: &'a str,
}

/// 渲染 JSON 报告 (带缩进)
pub fn render_json(report: &ComparisonReport, header: &ReportHeader<'_>) -> Result<String> {
    let document = JsonReport {
        generated_at: header.generated_at.to_rfc3339(),
        master: header.master,
        division: header.division,
        complete: report.is_complete(),
        entries: report
            .iter()
            .map(|entry| JsonEntry {
                category: entry.category(),
                caption: entry.category().caption(header.locale),
                master: entry.master(),
                division: match entry.division() {
                    DiffValue::Present(value) => Some(value.as_str()),
                    DiffValue::Missing => None,
                },
            })
            .collect(),
        failures: report
            .failures()
            .iter()
            .map(|failure| JsonFailure {
                comparator: failure.comparator,
                message: &failure.message,
            })
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&document)?)
}

/// 把报告写入文件
///
/// 报告为空时不写文件并返回 false。
pub fn write_report<P: AsRef<Path>>(
    report: &ComparisonReport,
    header: &ReportHeader<'_>,
    format: ExportFormat,
    path: P,
) -> Result<bool> {
    if report.is_empty() {
        info!("报告为空，不导出文件");
        return Ok(false);
    }

    let content = match format {
        ExportFormat::Text => render_text(report, header),
        ExportFormat::Json => render_json(report, header)?,
    };

    fs::write(&path, content)?;
    info!("💾 报告已导出: {}", path.as_ref().display());
    Ok(true)
}
