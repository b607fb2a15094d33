use super::missing::missing_keys;
use crate::catalog::{CatalogConnector, CatalogQuery};
use crate::error::Result;
use crate::identity::constraint_key;
use crate::report::{Category, DiffEntry};

/// 查找主库有而分库没有的键约束
///
/// 只按 `[表].[约束名]` 比较，不区分主键、外键或唯一约束。
pub fn missing_key_constraints(
    master: &dyn CatalogConnector,
    division: &dyn CatalogConnector,
) -> Result<Vec<DiffEntry>> {
    missing_keys(
        master,
        division,
        CatalogQuery::AllConstraintTableUsages,
        constraint_key,
        Category::MissingKeyConstraint,
    )
}
