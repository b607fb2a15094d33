use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;
use tracing::debug;

use crate::catalog::{CatalogConnector, CatalogQuery, CatalogRow};
use crate::error::Result;
use crate::identity::{procedure_key, table_key};
use crate::report::{Category, DiffEntry, Locale};

/// 查找主库有而分库没有的表
pub fn missing_tables(
    master: &dyn CatalogConnector,
    division: &dyn CatalogConnector,
) -> Result<Vec<DiffEntry>> {
    missing_keys(
        master,
        division,
        CatalogQuery::AllTables,
        table_key,
        Category::MissingTable,
    )
}

/// 查找主库有而分库没有的存储过程
pub fn missing_procedures(
    master: &dyn CatalogConnector,
    division: &dyn CatalogConnector,
) -> Result<Vec<DiffEntry>> {
    missing_keys(
        master,
        division,
        CatalogQuery::AllProcedures,
        procedure_key,
        Category::MissingSp,
    )
}

/// 按主库目录的返回顺序，输出分库中不存在的标识
///
/// 标识按原样比较，不做大小写折叠。
pub(super) fn missing_keys<K, F>(
    master: &dyn CatalogConnector,
    division: &dyn CatalogConnector,
    query: CatalogQuery,
    key_of: F,
    category: Category,
) -> Result<Vec<DiffEntry>>
where
    K: Eq + Hash + Display,
    F: Fn(&CatalogRow) -> Result<K>,
{
    let master_keys = collect_keys(master, query, &key_of)?;
    let division_keys: HashSet<K> = collect_keys(division, query, &key_of)?
        .into_iter()
        .collect();

    let missing = master_keys
        .into_iter()
        .filter(|key| !division_keys.contains(key))
        .map(|key| {
            debug!("发现{}: {}", category.caption(Locale::Zh), key);
            DiffEntry::missing(category, key.to_string())
        })
        .collect();

    Ok(missing)
}

fn collect_keys<K, F>(
    connector: &dyn CatalogConnector,
    query: CatalogQuery,
    key_of: &F,
) -> Result<Vec<K>>
where
    F: Fn(&CatalogRow) -> Result<K>,
{
    connector.fetch(query)?.iter().map(key_of).collect()
}
