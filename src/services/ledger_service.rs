use crate::entities::{spin_entity as spins, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::PrizeEntry;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, Set, TransactionTrait,
};

/// Outcome of an atomic spend attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendResult {
    /// The balance check passed and the decrement committed; carries the
    /// balance after the decrement.
    Committed(i64),
    /// Balance was zero; nothing was mutated.
    Rejected,
}

/// Owns all mutation of per-user spin balances. Every state change is a
/// single conditional UPDATE keyed by user id, so concurrent requests for
/// the same user linearize inside the database and different users never
/// contend with each other.
#[derive(Clone)]
pub struct LedgerService {
    pool: DatabaseConnection,
}

impl LedgerService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Idempotently creates the user row on first contact, with a zero
    /// balance and no refresh date.
    pub async fn ensure(&self, user_id: i64) -> AppResult<()> {
        let res = users::Entity::insert(users::ActiveModel {
            user_id: Set(user_id),
            free_spins: Set(0),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(users::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec(&self.pool)
        .await;

        match res {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Resets the balance to the daily allotment the first time the user is
    /// seen on a new day. A reset, not an accrual: unused spins from prior
    /// days are discarded. The date guard in the WHERE clause makes repeated
    /// calls on the same day no-ops.
    pub async fn refresh_if_needed(
        &self,
        user_id: i64,
        today: NaiveDate,
        daily_allotment: i64,
    ) -> AppResult<()> {
        users::Entity::update_many()
            .col_expr(users::Column::FreeSpins, Expr::value(daily_allotment))
            .col_expr(users::Column::LastFreeDate, Expr::value(today))
            .filter(users::Column::UserId.eq(user_id))
            .filter(
                Condition::any()
                    .add(users::Column::LastFreeDate.is_null())
                    .add(users::Column::LastFreeDate.ne(today)),
            )
            .exec(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn balance(&self, user_id: i64) -> AppResult<i64> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::InternalError(format!("user {user_id} missing after ensure")))?;
        Ok(user.free_spins)
    }

    /// Atomic check-and-decrement as one standalone transaction.
    pub async fn try_spend(&self, user_id: i64) -> AppResult<SpendResult> {
        let txn = self.pool.begin().await?;
        let result = self.try_spend_on(&txn, user_id).await?;
        txn.commit().await?;
        Ok(result)
    }

    /// Atomic check-and-decrement against a caller-supplied connection, so
    /// the orchestrator can join it with the audit insert in one
    /// transaction.
    ///
    /// The check and the decrement are a single conditional UPDATE
    /// (`... SET free_spins = free_spins - 1 WHERE free_spins > 0`), never a
    /// read followed by a write: two concurrent requests can therefore never
    /// both observe a positive balance and drive it negative.
    pub async fn try_spend_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> AppResult<SpendResult> {
        let res = users::Entity::update_many()
            .col_expr(
                users::Column::FreeSpins,
                Expr::col(users::Column::FreeSpins).sub(1),
            )
            .filter(users::Column::UserId.eq(user_id))
            .filter(users::Column::FreeSpins.gt(0))
            .exec(conn)
            .await?;

        if res.rows_affected == 0 {
            return Ok(SpendResult::Rejected);
        }

        let user = users::Entity::find_by_id(user_id)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::InternalError(format!("user {user_id} vanished mid-spend")))?;
        Ok(SpendResult::Committed(user.free_spins))
    }

    /// Appends one immutable audit row carrying the prize snapshot. Runs on
    /// the same connection as the decrement so both commit or roll back
    /// together.
    pub async fn record_spin_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        prize: &PrizeEntry,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        spins::ActiveModel {
            user_id: Set(user_id),
            prize_name: Set(prize.name.clone()),
            prize_sticker: Set(prize.sticker.clone()),
            created_at: Set(Some(at)),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        Ok(())
    }
}
