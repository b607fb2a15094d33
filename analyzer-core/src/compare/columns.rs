use std::collections::HashSet;
use tracing::debug;

use super::ColumnMatching;
use crate::catalog::{CatalogConnector, CatalogQuery};
use crate::error::Result;
use crate::identity::{ColumnKey, ColumnSignature, column_signature};
use crate::report::{Category, DiffEntry, DiffValue};

/// 查找缺少的列和变更的列
///
/// 对主库的每一列：
/// - 分库没有同一 `[表].[列]` 时输出一条"缺少的列"，主库值为完整签名；
/// - 主库签名不在分库签名集合中时，分库里每个匹配到的行各输出一条"变更的列"。
///
/// 分库同一标识出现多行时 (例如同名表分属不同 schema)，一列可能产生多条变更。
pub fn compare_columns(
    master: &dyn CatalogConnector,
    division: &dyn CatalogConnector,
    matching: ColumnMatching,
) -> Result<Vec<DiffEntry>> {
    let master_columns = fetch_signatures(master)?;
    let division_columns = fetch_signatures(division)?;

    let division_keys: HashSet<&ColumnKey> = division_columns.iter().map(|s| &s.key).collect();
    let division_signatures: HashSet<&ColumnSignature> = division_columns.iter().collect();

    let mut entries = Vec::new();
    for signature in &master_columns {
        if !division_keys.contains(&signature.key) {
            debug!("发现缺少的列: {}", signature);
            entries.push(DiffEntry::missing(
                Category::MissingColumn,
                signature.to_string(),
            ));
        }

        if division_signatures.contains(signature) {
            continue;
        }

        let master_key_text = signature.key.to_string();
        for candidate in &division_columns {
            let matched = match matching {
                ColumnMatching::Exact => candidate.key == signature.key,
                ColumnMatching::Substring => candidate.to_string().contains(&master_key_text),
            };

            if matched {
                debug!("发现变更的列: {} -> {}", signature, candidate);
                entries.push(DiffEntry::new(
                    Category::ChangedColumn,
                    signature.to_string(),
                    DiffValue::Present(candidate.to_string()),
                ));
            }
        }
    }

    Ok(entries)
}

/// 读取列目录，保持目录返回顺序
fn fetch_signatures(connector: &dyn CatalogConnector) -> Result<Vec<ColumnSignature>> {
    connector
        .fetch(CatalogQuery::AllColumns)?
        .iter()
        .map(column_signature)
        .collect()
}
