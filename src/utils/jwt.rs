use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN: &str = "access";
pub const REFRESH_TOKEN: &str = "refresh";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // 用户 ID
    pub role: String,       // 用户角色
    pub token_type: String, // "access" 或 "refresh"
    pub exp: usize,         // 过期时间
    pub iat: usize,         // 签发时间
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    fn encode_with_secret(
        secret: &str,
        user_id: i64,
        role: &str,
        token_type: &str,
        expiry: chrono::TimeDelta,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            exp: (now + expiry).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    fn decode_with_secret(
        secret: &str,
        token: &str,
        expected_type: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?
        .claims;
        if claims.token_type != expected_type {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    /// Access Token 有效期（秒）
    pub fn access_token_ttl_secs() -> i64 {
        AppConfig::get().jwt.access_token_expiry * 60
    }

    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        Self::encode_with_secret(
            Self::secret(),
            user_id,
            role,
            ACCESS_TOKEN,
            chrono::TimeDelta::seconds(Self::access_token_ttl_secs()),
        )
    }

    /// 未指定有效期时使用配置中的 refresh_token_expiry（天）
    pub fn generate_refresh_token(
        user_id: i64,
        role: &str,
        expiry: Option<chrono::TimeDelta>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let expiry = expiry
            .unwrap_or_else(|| chrono::TimeDelta::days(AppConfig::get().jwt.refresh_token_expiry));
        Self::encode_with_secret(Self::secret(), user_id, role, REFRESH_TOKEN, expiry)
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        refresh_expiry: Option<chrono::TimeDelta>,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::generate_refresh_token(user_id, role, refresh_expiry)?,
        })
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_with_secret(Self::secret(), token, ACCESS_TOKEN)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_with_secret(Self::secret(), token, REFRESH_TOKEN)
    }

    /// 登录时的 refresh 有效期，“记住我”使用更长的期限
    pub fn refresh_expiry(remember_me: bool) -> chrono::TimeDelta {
        let jwt = &AppConfig::get().jwt;
        if remember_me {
            chrono::TimeDelta::days(jwt.refresh_token_remember_me_expiry)
        } else {
            chrono::TimeDelta::days(jwt.refresh_token_expiry)
        }
    }

    pub fn create_refresh_token_cookie(
        refresh_token: &str,
        max_age: chrono::TimeDelta,
    ) -> Cookie<'static> {
        Cookie::build(REFRESH_TOKEN_COOKIE, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(
                max_age.num_seconds(),
            ))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    /// 注销或 refresh 失效时清除 cookie
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Cookie::build(REFRESH_TOKEN_COOKIE, "")
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_encode_decode_access_token() {
        let token = JwtUtils::encode_with_secret(
            SECRET,
            42,
            "TEACHER",
            ACCESS_TOKEN,
            chrono::TimeDelta::minutes(5),
        )
        .expect("encode");
        let claims = JwtUtils::decode_with_secret(SECRET, &token, ACCESS_TOKEN).expect("decode");
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, "TEACHER");
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let token = JwtUtils::encode_with_secret(
            SECRET,
            1,
            "STUDENT",
            REFRESH_TOKEN,
            chrono::TimeDelta::days(1),
        )
        .expect("encode");
        assert!(JwtUtils::decode_with_secret(SECRET, &token, ACCESS_TOKEN).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtUtils::encode_with_secret(
            SECRET,
            1,
            "ADMIN",
            ACCESS_TOKEN,
            chrono::TimeDelta::minutes(5),
        )
        .expect("encode");
        assert!(JwtUtils::decode_with_secret("other-secret", &token, ACCESS_TOKEN).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // 超过默认 60 秒 leeway
        let token = JwtUtils::encode_with_secret(
            SECRET,
            1,
            "ADMIN",
            ACCESS_TOKEN,
            chrono::TimeDelta::minutes(-5),
        )
        .expect("encode");
        assert!(JwtUtils::decode_with_secret(SECRET, &token, ACCESS_TOKEN).is_err());
    }
}
