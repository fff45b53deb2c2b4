use actix_cors::Cors;

/// The mini app is served from a Telegram-hosted origin, so the allowed
/// origin cannot be pinned to one domain here.
pub fn create_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|_, _req_head| true)
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_any_header()
        .max_age(3600)
}
