/// 配置文件相关常量
pub mod config {
    use std::path::{Path, PathBuf};

    /// 默认配置文件名
    pub const CONFIG_FILE_NAME: &str = "db-analyzer.toml";

    /// 按优先级查找的配置文件名
    pub const CONFIG_SEARCH_NAMES: [&str; 2] = ["db-analyzer.toml", ".db-analyzer.toml"];

    /// 获取默认配置文件路径
    pub fn get_config_file_path() -> PathBuf {
        Path::new(".").join(CONFIG_FILE_NAME)
    }
}

/// 对比相关常量
pub mod compare {
    /// 统计存储过程个数时使用的默认所有者
    pub const DEFAULT_PROCEDURE_OWNER: &str = "dbo";
}

/// 报告相关常量
pub mod report {
    /// 分库缺失时的占位值 (中文)
    pub const MISSING_ZH: &str = "缺";

    /// 分库缺失时的占位值 (英文)
    pub const MISSING_EN: &str = "missing";

    /// 文本报告中的分隔线
    pub const SEPARATOR: &str = "/*******************************/";

    /// 每个条目结尾的分隔线
    pub const ENTRY_END: &str = "----";

    /// 默认导出文件名
    pub const DEFAULT_TEXT_FILE_NAME: &str = "数据库对比分析报告.txt";
}

/// 目录查询语句
pub mod catalog {
    /// SQL Server 目录查询
    pub mod mssql {
        pub const COUNT_TABLES: &str = "select count(*) from INFORMATION_SCHEMA.TABLES";
        pub const ALL_TABLES: &str = "select * from INFORMATION_SCHEMA.TABLES";
        pub const ALL_PROCEDURES: &str = "EXEC sp_stored_procedures";
        pub const ALL_COLUMNS: &str = "select * from INFORMATION_SCHEMA.COLUMNS";
        pub const ALL_CONSTRAINT_TABLE_USAGES: &str =
            "select * from INFORMATION_SCHEMA.CONSTRAINT_TABLE_USAGE";
    }

    /// DuckDB 目录查询，列名与 SQL Server 的 INFORMATION_SCHEMA 保持一致
    pub mod duckdb {
        pub const ALL_TABLES: &str = r#"
            SELECT table_catalog, table_schema, table_name, table_type
            FROM information_schema.tables
            WHERE table_catalog = current_database()
            ORDER BY table_schema, table_name
        "#;

        pub const ALL_PROCEDURES: &str = r#"
            SELECT database_name AS procedure_qualifier,
                   schema_name AS procedure_owner,
                   function_name AS procedure_name
            FROM duckdb_functions()
            WHERE function_type IN ('macro', 'table_macro')
              AND NOT internal
              AND database_name = current_database()
            ORDER BY schema_name, function_name
        "#;

        pub const ALL_COLUMNS: &str = r#"
            SELECT table_schema, table_name, column_name, column_default, is_nullable,
                   data_type, character_maximum_length, numeric_precision,
                   numeric_precision_radix
            FROM information_schema.columns
            WHERE table_catalog = current_database()
            ORDER BY table_name, ordinal_position
        "#;

        pub const ALL_CONSTRAINT_TABLE_USAGES: &str = r#"
            SELECT table_schema, table_name, constraint_name
            FROM information_schema.table_constraints
            WHERE table_catalog = current_database()
              AND constraint_type IN ('PRIMARY KEY', 'FOREIGN KEY', 'UNIQUE')
            ORDER BY table_name, constraint_name
        "#;
    }
}
