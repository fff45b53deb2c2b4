/// One configured wheel segment, materialized from the config table.
/// `index` is the stable 1-based catalog position; selection walks entries
/// in this order, so a fixed configuration always yields the same
/// probability partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrizeEntry {
    pub index: usize,
    pub name: String,
    pub weight: i64,
    /// Sticker file id delivered through the Bot API on a win; empty means
    /// nothing to deliver.
    pub sticker: String,
}

/// Consistent snapshot of the whole catalog configuration, taken in a single
/// read so odds cannot change between selection and audit.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub prizes: Vec<PrizeEntry>,
    pub daily_free_spins: i64,
    pub required_channel: String,
}
