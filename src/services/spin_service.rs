use crate::error::{AppError, AppResult};
use crate::external::TelegramService;
use crate::models::{GiftSummary, PrizeEntry, SpinResponse, StateResponse, WonGift};
use crate::services::{CatalogService, LedgerService, SpendResult};
use crate::utils::{InitDataVerifier, selector};
use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};

/// Bounded retries for the spend transaction on transient storage failures
/// (e.g. SQLite busy). The transaction either fully commits or fully rolls
/// back, so a retry can never double-decrement.
const SPEND_TXN_ATTEMPTS: u32 = 3;

/// Composes verification, catalog, ledger and delivery into the two
/// externally visible operations.
#[derive(Clone)]
pub struct SpinService {
    pool: DatabaseConnection,
    verifier: InitDataVerifier,
    catalog: CatalogService,
    ledger: LedgerService,
    telegram: TelegramService,
}

impl SpinService {
    pub fn new(
        pool: DatabaseConnection,
        verifier: InitDataVerifier,
        catalog: CatalogService,
        ledger: LedgerService,
        telegram: TelegramService,
    ) -> Self {
        Self {
            pool,
            verifier,
            catalog,
            ledger,
            telegram,
        }
    }

    /// Current balance plus a name/weight projection of the catalog.
    pub async fn get_state(&self, init_data: &str) -> AppResult<StateResponse> {
        let user = self.verifier.verify(init_data)?;
        self.ledger.ensure(user.id).await?;
        let catalog = self.catalog.load().await?;
        let today = Utc::now().date_naive();
        self.ledger
            .refresh_if_needed(user.id, today, catalog.daily_free_spins)
            .await?;
        let free_spins = self.ledger.balance(user.id).await?;

        Ok(StateResponse {
            ok: true,
            free_spins,
            required_channel: catalog.required_channel,
            gifts: catalog
                .prizes
                .iter()
                .map(|p| GiftSummary {
                    name: p.name.clone(),
                    weight: p.weight,
                })
                .collect(),
        })
    }

    /// Spend one spin and award a prize. The decrement, the weighted draw
    /// and the audit row commit as one transaction; sticker delivery happens
    /// strictly afterwards and is fire-and-forget.
    pub async fn spin(&self, init_data: &str) -> AppResult<SpinResponse> {
        let user = self.verifier.verify(init_data)?;
        self.ledger.ensure(user.id).await?;
        let catalog = self.catalog.load().await?;
        let today = Utc::now().date_naive();
        self.ledger
            .refresh_if_needed(user.id, today, catalog.daily_free_spins)
            .await?;

        let (free_spins, segment_index, prize) =
            self.spend_and_award(user.id, &catalog.prizes).await?;

        if !prize.sticker.is_empty() {
            let telegram = self.telegram.clone();
            let sticker = prize.sticker.clone();
            let chat_id = user.id;
            tokio::spawn(async move {
                if let Err(e) = telegram.send_sticker(chat_id, &sticker).await {
                    log::warn!("Prize sticker delivery to {chat_id} failed: {e}");
                }
            });
        }

        Ok(SpinResponse {
            ok: true,
            free_spins,
            gift: WonGift { name: prize.name },
            segment_index: segment_index as i64,
        })
    }

    async fn spend_and_award(
        &self,
        user_id: i64,
        prizes: &[PrizeEntry],
    ) -> AppResult<(i64, usize, PrizeEntry)> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.spend_and_award_once(user_id, prizes).await {
                Ok(res) => return Ok(res),
                Err(AppError::DatabaseError(e)) if attempt < SPEND_TXN_ATTEMPTS => {
                    log::warn!("Spend transaction attempt {attempt} failed, retrying: {e}");
                    tokio::time::sleep(std::time::Duration::from_millis(25 * attempt as u64))
                        .await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn spend_and_award_once(
        &self,
        user_id: i64,
        prizes: &[PrizeEntry],
    ) -> AppResult<(i64, usize, PrizeEntry)> {
        let txn = self.pool.begin().await?;

        let free_spins = match self.ledger.try_spend_on(&txn, user_id).await? {
            SpendResult::Committed(balance) => balance,
            // Dropping the transaction rolls it back; nothing was mutated.
            SpendResult::Rejected => return Err(AppError::NoSpinsLeft),
        };

        let (segment_index, prize) = selector::draw(prizes)?;
        let prize = prize.clone();
        self.ledger
            .record_spin_on(&txn, user_id, &prize, Utc::now())
            .await?;

        txn.commit().await?;
        Ok((free_spins, segment_index, prize))
    }
}
