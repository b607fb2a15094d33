use tracing::debug;

use crate::catalog::{CatalogConnector, CatalogQuery};
use crate::error::Result;
use crate::report::{Category, DiffEntry, DiffValue};

/// 比较表个数，两侧计数原样输出，不做判断
pub fn compare_table_count(
    master: &dyn CatalogConnector,
    division: &dyn CatalogConnector,
) -> Result<DiffEntry> {
    let master_total = master.count_tables()?;
    let division_total = division.count_tables()?;
    debug!("表个数: 主库 {} / 分库 {}", master_total, division_total);

    Ok(DiffEntry::new(
        Category::TableCount,
        master_total.to_string(),
        DiffValue::Present(division_total.to_string()),
    ))
}

/// 比较存储过程个数，owner 为 None 时统计全部所有者
pub fn compare_sp_count(
    master: &dyn CatalogConnector,
    division: &dyn CatalogConnector,
    owner: Option<&str>,
) -> Result<DiffEntry> {
    let master_total = count_procedures(master, owner)?;
    let division_total = count_procedures(division, owner)?;
    debug!(
        "存储过程个数 (所有者: {}): 主库 {} / 分库 {}",
        owner.unwrap_or("*"),
        master_total,
        division_total
    );

    Ok(DiffEntry::new(
        Category::SpCount,
        master_total.to_string(),
        DiffValue::Present(division_total.to_string()),
    ))
}

fn count_procedures(connector: &dyn CatalogConnector, owner: Option<&str>) -> Result<u64> {
    let rows = connector.fetch(CatalogQuery::AllProcedures)?;
    let Some(owner) = owner else {
        return Ok(rows.len() as u64);
    };

    let mut total = 0;
    for row in &rows {
        if row.text("PROCEDURE_OWNER")? == owner {
            total += 1;
        }
    }
    Ok(total)
}
