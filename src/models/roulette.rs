use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of both `/state` and `/spin`: the raw signed payload from
/// `window.Telegram.WebApp.initData`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InitDataRequest {
    #[serde(rename = "initData")]
    pub init_data: String,
}

/// Name/weight projection of one catalog entry. Sticker ids are withheld
/// from this read-only view.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GiftSummary {
    pub name: String,
    pub weight: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StateResponse {
    pub ok: bool,
    pub free_spins: i64,
    pub required_channel: String,
    pub gifts: Vec<GiftSummary>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WonGift {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpinResponse {
    pub ok: bool,
    /// Balance after the committed spend.
    pub free_spins: i64,
    pub gift: WonGift,
    /// Zero-based catalog position of the winning segment.
    pub segment_index: i64,
}
