use crate::error::{AppError, AppResult};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Identity recovered from a successfully verified init-data payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedUser {
    pub id: i64,
}

/// The `user` field of the payload is a JSON object; only the id matters
/// here, everything else is display data for the mini app itself.
#[derive(Debug, Deserialize)]
struct WebAppUser {
    id: i64,
}

/// Validates the signed `initData` string the Telegram WebApp SDK attaches
/// to every request, per the Mini App auth scheme: the signing secret is
/// HMAC-SHA256 keyed with the literal "WebAppData" over the bot token, and
/// the signature covers the remaining fields sorted by key and joined as
/// `key=value` lines.
///
/// Verification is pure and must run before any balance read; an unsigned
/// or forged payload never reaches the ledger.
#[derive(Clone)]
pub struct InitDataVerifier {
    secret: Vec<u8>,
}

impl InitDataVerifier {
    pub fn new(bot_token: &str) -> Self {
        let mut mac =
            HmacSha256::new_from_slice(b"WebAppData").expect("HMAC accepts any key length");
        mac.update(bot_token.as_bytes());
        Self {
            secret: mac.finalize().into_bytes().to_vec(),
        }
    }

    pub fn verify(&self, init_data: &str) -> AppResult<VerifiedUser> {
        let mut pairs: Vec<(String, String)> = url::form_urlencoded::parse(init_data.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let hash_pos = pairs
            .iter()
            .position(|(k, _)| k == "hash")
            .ok_or_else(|| AppError::AuthError("missing hash field".into()))?;
        let (_, provided_hex) = pairs.remove(hash_pos);
        let provided = hex::decode(provided_hex.as_bytes())
            .map_err(|_| AppError::AuthError("hash is not valid hex".into()))?;

        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        let data_check_string = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("\n");

        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(data_check_string.as_bytes());
        // verify_slice is a constant-time comparison
        mac.verify_slice(&provided)
            .map_err(|_| AppError::AuthError("signature mismatch".into()))?;

        let user_json = pairs
            .iter()
            .find(|(k, _)| k == "user")
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| AppError::AuthError("missing user field".into()))?;
        let user: WebAppUser = serde_json::from_str(user_json)
            .map_err(|_| AppError::AuthError("malformed user field".into()))?;

        Ok(VerifiedUser { id: user.id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::form_urlencoded::Serializer;

    const TOKEN: &str = "123456:test-bot-token";

    /// Builds a correctly signed init-data string from raw key/value pairs,
    /// the way the WebApp SDK would.
    fn sign(pairs: &[(&str, &str)], bot_token: &str) -> String {
        let mut sorted: Vec<_> = pairs.to_vec();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        let data_check_string = sorted
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("\n");

        let mut secret =
            HmacSha256::new_from_slice(b"WebAppData").expect("HMAC accepts any key length");
        secret.update(bot_token.as_bytes());
        let secret = secret.finalize().into_bytes();

        let mut mac = HmacSha256::new_from_slice(&secret).expect("HMAC accepts any key length");
        mac.update(data_check_string.as_bytes());
        let hash = hex::encode(mac.finalize().into_bytes());

        let mut ser = Serializer::new(String::new());
        for (k, v) in pairs {
            ser.append_pair(k, v);
        }
        ser.append_pair("hash", &hash);
        ser.finish()
    }

    #[test]
    fn valid_payload_recovers_user_id() {
        let verifier = InitDataVerifier::new(TOKEN);
        let init_data = sign(
            &[
                ("user", r#"{"id":987654321,"first_name":"Ann","username":"ann"}"#),
                ("auth_date", "1735689600"),
                ("query_id", "AAF9tZ8NAAAAAH21nw2Wcrns"),
            ],
            TOKEN,
        );
        let user = verifier.verify(&init_data).unwrap();
        assert_eq!(user.id, 987654321);
    }

    #[test]
    fn field_order_does_not_matter() {
        let verifier = InitDataVerifier::new(TOKEN);
        let init_data = sign(
            &[
                ("query_id", "AAF9tZ8NAAAAAH21nw2Wcrns"),
                ("auth_date", "1735689600"),
                ("user", r#"{"id":7,"first_name":"Bo"}"#),
            ],
            TOKEN,
        );
        assert_eq!(verifier.verify(&init_data).unwrap().id, 7);
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let verifier = InitDataVerifier::new(TOKEN);
        let init_data = sign(
            &[("user", r#"{"id":1,"first_name":"A"}"#), ("auth_date", "1")],
            TOKEN,
        );
        // Change the embedded id after signing
        let forged = init_data.replace("%22id%22%3A1", "%22id%22%3A2");
        assert_ne!(forged, init_data);
        assert!(matches!(
            verifier.verify(&forged),
            Err(AppError::AuthError(_))
        ));
    }

    #[test]
    fn tampered_hash_is_rejected() {
        let verifier = InitDataVerifier::new(TOKEN);
        let init_data = sign(
            &[("user", r#"{"id":1,"first_name":"A"}"#), ("auth_date", "1")],
            TOKEN,
        );
        // Flip the final hex digit of the hash
        let mut forged = init_data.clone();
        let last = forged.pop().unwrap();
        forged.push(if last == '0' { '1' } else { '0' });
        assert!(matches!(
            verifier.verify(&forged),
            Err(AppError::AuthError(_))
        ));
    }

    #[test]
    fn wrong_bot_token_is_rejected() {
        let verifier = InitDataVerifier::new(TOKEN);
        let init_data = sign(
            &[("user", r#"{"id":1,"first_name":"A"}"#), ("auth_date", "1")],
            "999999:other-token",
        );
        assert!(matches!(
            verifier.verify(&init_data),
            Err(AppError::AuthError(_))
        ));
    }

    #[test]
    fn missing_hash_is_rejected() {
        let verifier = InitDataVerifier::new(TOKEN);
        assert!(matches!(
            verifier.verify("user=%7B%22id%22%3A1%7D&auth_date=1"),
            Err(AppError::AuthError(_))
        ));
    }

    #[test]
    fn missing_user_field_is_rejected() {
        let verifier = InitDataVerifier::new(TOKEN);
        let init_data = sign(&[("auth_date", "1735689600")], TOKEN);
        assert!(matches!(
            verifier.verify(&init_data),
            Err(AppError::AuthError(_))
        ));
    }

    #[test]
    fn malformed_user_json_is_rejected() {
        let verifier = InitDataVerifier::new(TOKEN);
        // Correctly signed, but the user field is not a JSON object
        let init_data = sign(&[("user", "not-json"), ("auth_date", "1")], TOKEN);
        assert!(matches!(
            verifier.verify(&init_data),
            Err(AppError::AuthError(_))
        ));
    }
}
