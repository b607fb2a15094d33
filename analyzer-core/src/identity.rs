//! 目录行的标识规范化。
//!
//! 把目录行转换成可比较的值记录。比较按字段进行，`Display` 输出方括号形式的
//! 规范文本（如 `[Users].[Name]`），报告里展示的就是这段文本。

use serde::Serialize;
use std::fmt;

use crate::catalog::CatalogRow;
use crate::error::Result;

/// 表标识 `[TABLE_NAME]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TableKey {
    pub table: String,
}

/// 存储过程标识 `[PROCEDURE_NAME]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProcedureKey {
    pub procedure: String,
}

/// 列标识 `[TABLE_NAME].[COLUMN_NAME]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ColumnKey {
    pub table: String,
    pub column: String,
}

/// 约束标识 `[TABLE_NAME].[CONSTRAINT_NAME]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConstraintKey {
    pub table: String,
    pub constraint: String,
}

/// 列目录中的一列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub table: String,
    pub column: String,
    pub is_nullable: String,
    pub data_type: String,
    pub default_value: Option<String>,
    pub max_char_length: Option<String>,
    pub numeric_precision: Option<String>,
    pub numeric_precision_radix: Option<String>,
}

/// 列签名：列标识加全部描述属性，只用于判断列是否变更
///
/// 可空属性在构造时已把 NULL 规范成空字符串，两边同为"空"时一定相等。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnSignature {
    pub key: ColumnKey,
    pub is_nullable: String,
    pub data_type: String,
    pub default_value: String,
    pub max_char_length: String,
    pub numeric_precision: String,
    pub numeric_precision_radix: String,
}

pub fn table_key(row: &CatalogRow) -> Result<TableKey> {
    Ok(TableKey {
        table: row.text("TABLE_NAME")?,
    })
}

pub fn procedure_key(row: &CatalogRow) -> Result<ProcedureKey> {
    Ok(ProcedureKey {
        procedure: row.text("PROCEDURE_NAME")?,
    })
}

pub fn column_key(row: &CatalogRow) -> Result<ColumnKey> {
    Ok(ColumnKey {
        table: row.text("TABLE_NAME")?,
        column: row.text("COLUMN_NAME")?,
    })
}

pub fn constraint_key(row: &CatalogRow) -> Result<ConstraintKey> {
    Ok(ConstraintKey {
        table: row.text("TABLE_NAME")?,
        constraint: row.text("CONSTRAINT_NAME")?,
    })
}

pub fn column_signature(row: &CatalogRow) -> Result<ColumnSignature> {
    Ok(ColumnDescriptor::from_row(row)?.signature())
}

impl ColumnDescriptor {
    pub fn from_row(row: &CatalogRow) -> Result<Self> {
        Ok(Self {
            table: row.text("TABLE_NAME")?,
            column: row.text("COLUMN_NAME")?,
            is_nullable: row.text("IS_NULLABLE")?,
            data_type: row.text("DATA_TYPE")?,
            default_value: row.optional("COLUMN_DEFAULT")?,
            max_char_length: row.optional("CHARACTER_MAXIMUM_LENGTH")?,
            numeric_precision: row.optional("NUMERIC_PRECISION")?,
            numeric_precision_radix: row.optional("NUMERIC_PRECISION_RADIX")?,
        })
    }

    pub fn key(&self) -> ColumnKey {
        ColumnKey {
            table: self.table.clone(),
            column: self.column.clone(),
        }
    }

    pub fn signature(&self) -> ColumnSignature {
        ColumnSignature {
            key: self.key(),
            is_nullable: self.is_nullable.clone(),
            data_type: self.data_type.clone(),
            default_value: self.default_value.clone().unwrap_or_default(),
            max_char_length: self.max_char_length.clone().unwrap_or_default(),
            numeric_precision: self.numeric_precision.clone().unwrap_or_default(),
            numeric_precision_radix: self.numeric_precision_radix.clone().unwrap_or_default(),
        }
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.table)
    }
}

impl fmt::Display for ProcedureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.procedure)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}].[{}]", self.table, self.column)
    }
}

impl fmt::Display for ConstraintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}].[{}]", self.table, self.constraint)
    }
}

impl fmt::Display for ColumnSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({},{},{},{},{},{})",
            self.key,
            self.is_nullable,
            self.data_type,
            self.default_value,
            self.max_char_length,
            self.numeric_precision,
            self.numeric_precision_radix
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_row(
        table: &str,
        column: &str,
        nullable: &str,
        data_type: &str,
        max_len: Option<&str>,
    ) -> CatalogRow {
        CatalogRow::new()
            .with("TABLE_NAME", Some(table))
            .with("COLUMN_NAME", Some(column))
            .with("IS_NULLABLE", Some(nullable))
            .with("DATA_TYPE", Some(data_type))
            .with("COLUMN_DEFAULT", None)
            .with("CHARACTER_MAXIMUM_LENGTH", max_len)
            .with("NUMERIC_PRECISION", None)
            .with("NUMERIC_PRECISION_RADIX", None)
    }

    #[test]
    fn test_key_layouts() {
        let row = CatalogRow::new()
            .with("TABLE_NAME", Some("Orders"))
            .with("COLUMN_NAME", Some("Id"))
            .with("CONSTRAINT_NAME", Some("PK_Orders"))
            .with("PROCEDURE_NAME", Some("usp_Load;1"));

        assert_eq!(table_key(&row).unwrap().to_string(), "[Orders]");
        assert_eq!(column_key(&row).unwrap().to_string(), "[Orders].[Id]");
        assert_eq!(
            constraint_key(&row).unwrap().to_string(),
            "[Orders].[PK_Orders]"
        );
        assert_eq!(procedure_key(&row).unwrap().to_string(), "[usp_Load;1]");
    }

    #[test]
    fn test_signature_renders_nulls_as_empty() {
        let row = column_row("A", "X", "YES", "varchar", Some("50"));
        let signature = column_signature(&row).unwrap();
        assert_eq!(signature.to_string(), "[A].[X](YES,varchar,,50,,)");
    }

    #[test]
    fn test_signature_is_deterministic() {
        let row = column_row("A", "X", "NO", "int", None);
        let first = column_signature(&row).unwrap();
        let second = column_signature(&row).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_null_and_empty_default_compare_equal() {
        let with_null = column_row("A", "X", "NO", "int", None);
        let with_empty = with_null.clone().with("COLUMN_DEFAULT", Some(""));
        assert_eq!(
            column_signature(&with_null).unwrap(),
            column_signature(&with_empty).unwrap()
        );
    }

    #[test]
    fn test_field_wise_equality_has_no_delimiter_collision() {
        // 文本拼接时这两个标识都会渲染成 [a].[b].[c]
        let left = ColumnKey {
            table: "a].[b".to_string(),
            column: "c".to_string(),
        };
        let right = ColumnKey {
            table: "a".to_string(),
            column: "b].[c".to_string(),
        };
        assert_eq!(left.to_string(), right.to_string());
        assert_ne!(left, right);
    }

    #[test]
    fn test_type_names_are_not_normalized() {
        let varchar = column_signature(&column_row("A", "X", "YES", "varchar", Some("50"))).unwrap();
        let nvarchar =
            column_signature(&column_row("A", "X", "YES", "nvarchar", Some("50"))).unwrap();
        assert_ne!(varchar, nvarchar);
    }
}
