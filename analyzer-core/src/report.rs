use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::compare::ComparatorFailure;
use crate::constants::report::{MISSING_EN, MISSING_ZH};

/// 对比项目类别 (固定的七种)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    TableCount,
    SpCount,
    MissingTable,
    MissingSp,
    MissingColumn,
    ChangedColumn,
    MissingKeyConstraint,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::TableCount,
        Category::SpCount,
        Category::MissingTable,
        Category::MissingSp,
        Category::MissingColumn,
        Category::ChangedColumn,
        Category::MissingKeyConstraint,
    ];

    /// 稳定的英文标识
    pub fn id(self) -> &'static str {
        match self {
            Category::TableCount => "table-count",
            Category::SpCount => "sp-count",
            Category::MissingTable => "missing-table",
            Category::MissingSp => "missing-sp",
            Category::MissingColumn => "missing-column",
            Category::ChangedColumn => "changed-column",
            Category::MissingKeyConstraint => "missing-key-constraint",
        }
    }

    /// 报告中显示的标题
    pub fn caption(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Category::TableCount, Locale::Zh) => "表个数",
            (Category::SpCount, Locale::Zh) => "存储过程个数",
            (Category::MissingTable, Locale::Zh) => "缺少的表",
            (Category::MissingSp, Locale::Zh) => "缺少的存储过程",
            (Category::MissingColumn, Locale::Zh) => "缺少的列",
            (Category::ChangedColumn, Locale::Zh) => "变更的列",
            (Category::MissingKeyConstraint, Locale::Zh) => "缺少的键约束",
            (Category::TableCount, Locale::En) => "Table count",
            (Category::SpCount, Locale::En) => "Stored procedure count",
            (Category::MissingTable, Locale::En) => "Missing table",
            (Category::MissingSp, Locale::En) => "Missing stored procedure",
            (Category::MissingColumn, Locale::En) => "Missing column",
            (Category::ChangedColumn, Locale::En) => "Changed column",
            (Category::MissingKeyConstraint, Locale::En) => "Missing key constraint",
        }
    }

    pub fn is_count(self) -> bool {
        matches!(self, Category::TableCount | Category::SpCount)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// 报告语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Zh => "zh",
            Locale::En => "en",
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zh" | "zh-cn" | "cn" => Ok(Locale::Zh),
            "en" | "en-us" => Ok(Locale::En),
            other => Err(format!("不支持的语言: {other}")),
        }
    }
}

/// 分库一侧的值：存在时为文本，缺失时为占位
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffValue {
    Present(String),
    Missing,
}

impl DiffValue {
    pub fn render(&self, locale: Locale) -> &str {
        match (self, locale) {
            (DiffValue::Present(value), _) => value,
            (DiffValue::Missing, Locale::Zh) => MISSING_ZH,
            (DiffValue::Missing, Locale::En) => MISSING_EN,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, DiffValue::Missing)
    }
}

impl fmt::Display for DiffValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render(Locale::En))
    }
}

impl From<String> for DiffValue {
    fn from(value: String) -> Self {
        DiffValue::Present(value)
    }
}

/// 一条对比结果，创建后不再修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    category: Category,
    master: String,
    division: DiffValue,
}

impl DiffEntry {
    pub fn new(category: Category, master: impl Into<String>, division: DiffValue) -> Self {
        Self {
            category,
            master: master.into(),
            division,
        }
    }

    /// 分库缺失的条目
    pub fn missing(category: Category, master: impl Into<String>) -> Self {
        Self::new(category, master, DiffValue::Missing)
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn master(&self) -> &str {
        &self.master
    }

    pub fn division(&self) -> &DiffValue {
        &self.division
    }
}

/// 对比报告：按比较器执行顺序、再按发现顺序排列
#[derive(Debug, Default)]
pub struct ComparisonReport {
    entries: Vec<DiffEntry>,
    failures: Vec<ComparatorFailure>,
}

impl ComparisonReport {
    pub fn new(entries: Vec<DiffEntry>) -> Self {
        Self {
            entries,
            failures: Vec::new(),
        }
    }

    pub(crate) fn with_failures(entries: Vec<DiffEntry>, failures: Vec<ComparatorFailure>) -> Self {
        Self { entries, failures }
    }

    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiffEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &DiffEntry> {
        self.entries
            .iter()
            .filter(move |e| e.category() == category)
    }

    /// 各类别的条目数，没有条目的类别不出现
    pub fn count_by_category(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.category()).or_insert(0) += 1;
        }
        counts
    }

    /// 是否存在差异：计数不一致或存在任何缺失/变更条目
    pub fn has_drift(&self) -> bool {
        self.entries.iter().any(|entry| {
            if entry.category().is_count() {
                entry.division().render(Locale::En) != entry.master()
            } else {
                true
            }
        })
    }

    /// collect 模式下失败的比较器
    pub fn failures(&self) -> &[ComparatorFailure] {
        &self.failures
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn into_entries(self) -> Vec<DiffEntry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a ComparisonReport {
    type Item = &'a DiffEntry;
    type IntoIter = std::slice::Iter<'a, DiffEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
