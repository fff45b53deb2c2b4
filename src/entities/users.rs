use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

/// One row per Telegram user, created on first contact.
/// `free_spins` is only ever mutated through conditional updates in the
/// ledger service and stays >= 0 at all observable times.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    pub free_spins: i64,
    /// Calendar day (UTC) of the last allowance refresh; NULL = never.
    pub last_free_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
