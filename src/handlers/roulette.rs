use crate::models::{InitDataRequest, SpinResponse, StateResponse};
use crate::services::SpinService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/state",
    tag = "roulette",
    request_body = InitDataRequest,
    responses(
        (status = 200, description = "Current spin balance and prize catalog", body = StateResponse),
        (status = 401, description = "Init data failed verification")
    )
)]
/// Balance and catalog view for the wheel screen. Refreshes the daily
/// allowance first, so a fresh user on a fresh day already sees today's
/// allotment.
pub async fn state(
    service: web::Data<SpinService>,
    body: web::Json<InitDataRequest>,
) -> Result<HttpResponse> {
    match service.get_state(&body.init_data).await {
        Ok(data) => Ok(HttpResponse::Ok().json(data)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/spin",
    tag = "roulette",
    request_body = InitDataRequest,
    responses(
        (status = 200, description = "Spin committed", body = SpinResponse),
        (status = 401, description = "Init data failed verification"),
        (status = 403, description = "No spins left today")
    )
)]
/// Spend one spin: atomic decrement, weighted prize draw, audit record,
/// then best-effort sticker delivery.
pub async fn spin(
    service: web::Data<SpinService>,
    body: web::Json<InitDataRequest>,
) -> Result<HttpResponse> {
    match service.spin(&body.init_data).await {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn roulette_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/state", web::post().to(state))
        .route("/spin", web::post().to(spin));
}
