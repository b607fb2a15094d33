use analyzer_core::{config::AnalyzerConfig, constants::config, error::Result};
use std::path::Path;
use tracing::{info, warn};

/// 运行独立的初始化流程：生成配置文件模板
pub fn run_init(force: bool) -> Result<()> {
    info!("🗄️  DB Analyzer 初始化");
    info!("======================");

    let path = config::get_config_file_path();
    if !write_config_template(&path, force)? {
        warn!("⚠️  配置文件已存在: {}", path.display());
        info!("如果您要重新生成，请使用 --force 参数");
        info!("示例: db-analyzer init --force");
        return Ok(());
    }

    info!("   ✅ 创建配置文件: {}", path.display());
    info!("👉 下一步:");
    info!("   1. 编辑 [master] 与 [division] 中的连接串");
    info!("   2. 运行 db-analyzer compare 查看对比结果");
    Ok(())
}

/// 写入默认配置，文件已存在且未指定 force 时返回 false
fn write_config_template(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }

    AnalyzerConfig::default().save_to_file(path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_config_template_respects_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(config::CONFIG_FILE_NAME);

        assert!(write_config_template(&path, false).unwrap());
        assert_eq!(
            AnalyzerConfig::load_from_file(&path).unwrap(),
            AnalyzerConfig::default()
        );

        std::fs::write(&path, "# edited").unwrap();
        assert!(!write_config_template(&path, false).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# edited");

        assert!(write_config_template(&path, true).unwrap());
        assert!(AnalyzerConfig::load_from_file(&path).is_ok());
    }
}
