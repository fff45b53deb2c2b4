use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::roulette::state, handlers::roulette::spin),
    components(
        schemas(
            InitDataRequest,
            StateResponse,
            SpinResponse,
            GiftSummary,
            WonGift,
        )
    ),
    tags(
        (name = "roulette", description = "Gift roulette API"),
    ),
    info(
        title = "Gift Roulette Backend API",
        version = "1.0.0",
        description = "Backend for the Telegram gift roulette mini app"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
