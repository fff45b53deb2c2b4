use sea_orm::entity::prelude::*;

/// Key/value configuration owned by the catalog-editing bot flow.
/// Read-only from this service; loaded fresh on every request so odds and
/// allotment changes take effect without a restart.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "config_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
