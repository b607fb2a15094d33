/// DB Analyzer 项目信息模块
///
/// db-analyzer 是面向用户的主程序，项目元数据统一在这里定义

/// 项目元数据（自动从 Cargo.toml 同步）
pub mod metadata {
    /// 项目名称
    pub const PROJECT_NAME: &str = env!("CARGO_PKG_NAME");

    /// 项目描述
    pub const PROJECT_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

    /// 项目作者
    pub const PROJECT_AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

    /// 用户友好的显示名称（手动维护）
    pub mod display {
        pub const FRIENDLY_NAME: &str = "DB Analyzer";

        /// 项目详细描述
        pub const DESCRIPTION_LONG: &str = "对比主数据库与分数据库的结构差异：表个数、存储过程个数、缺少的表、缺少的存储过程、缺少或变更的列以及缺少的键约束，支持 SQL Server 与 DuckDB";
    }
}

/// 版本信息
pub mod version_info {
    /// CLI 版本
    pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// 获取版本信息字符串
pub fn get_version_string() -> String {
    format!(
        "{} v{}",
        metadata::display::FRIENDLY_NAME,
        version_info::CLI_VERSION
    )
}
