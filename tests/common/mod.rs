use gift_roulette_backend::config::TelegramConfig;
use gift_roulette_backend::entities::config_entity;
use gift_roulette_backend::external::TelegramService;
use gift_roulette_backend::services::{CatalogService, LedgerService, SpinService};
use gift_roulette_backend::utils::InitDataVerifier;
use hmac::{Hmac, Mac};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sha2::Sha256;

pub const BOT_TOKEN: &str = "123456:integration-test-token";

/// In-memory SQLite capped at one connection so every handle sees the same
/// database.
pub async fn test_pool() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1).sqlx_logging(false);
    let pool = Database::connect(opt).await.expect("connect in-memory sqlite");
    Migrator::up(&pool, None).await.expect("run migrations");
    pool
}

pub async fn set_config(pool: &DatabaseConnection, key: &str, value: &str) {
    use sea_orm::EntityTrait;
    let existing = config_entity::Entity::find_by_id(key.to_string())
        .one(pool)
        .await
        .expect("read config");
    match existing {
        Some(model) => {
            let mut am: config_entity::ActiveModel = model.into();
            am.value = Set(value.to_string());
            am.update(pool).await.expect("update config");
        }
        None => {
            config_entity::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value.to_string()),
            }
            .insert(pool)
            .await
            .expect("insert config");
        }
    }
}

pub fn spin_service(pool: DatabaseConnection) -> SpinService {
    let telegram = TelegramService::new(TelegramConfig {
        bot_token: BOT_TOKEN.to_string(),
        // Unroutable on purpose: delivery is best effort and must not
        // affect test outcomes.
        api_base: "http://127.0.0.1:1".to_string(),
        send_timeout_secs: 1,
    });
    SpinService::new(
        pool.clone(),
        InitDataVerifier::new(BOT_TOKEN),
        CatalogService::new(pool.clone()),
        LedgerService::new(pool),
        telegram,
    )
}

/// Signs key/value pairs the way the Telegram WebApp SDK does.
pub fn signed_init_data(pairs: &[(&str, &str)], bot_token: &str) -> String {
    type HmacSha256 = Hmac<Sha256>;

    let mut sorted: Vec<_> = pairs.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let data_check_string = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut secret = HmacSha256::new_from_slice(b"WebAppData").expect("hmac key");
    secret.update(bot_token.as_bytes());
    let secret = secret.finalize().into_bytes();

    let mut mac = HmacSha256::new_from_slice(&secret).expect("hmac key");
    mac.update(data_check_string.as_bytes());
    let hash = hex::encode(mac.finalize().into_bytes());

    let mut ser = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs {
        ser.append_pair(k, v);
    }
    ser.append_pair("hash", &hash);
    ser.finish()
}

pub fn init_data_for(user_id: i64) -> String {
    let user = format!(r#"{{"id":{user_id},"first_name":"Test"}}"#);
    signed_init_data(&[("user", &user), ("auth_date", "1735689600")], BOT_TOKEN)
}
