use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

fn hasher(memory_cost: u32, time_cost: u32, parallelism: u32) -> Result<Argon2<'static>> {
    let params = Params::new(memory_cost, time_cost, parallelism, None)
        .map_err(|e| LmsError::validation(format!("Invalid argon2 parameters: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// 使用配置中的 argon2 参数哈希密码
pub fn hash_password(password: &str) -> Result<String> {
    let cfg = &AppConfig::get().argon2;
    hash_with(
        &hasher(cfg.memory_cost, cfg.time_cost, cfg.parallelism)?,
        password,
    )
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| LmsError::validation(format!("Password hashing failed: {e}")))
}

/// 参数从哈希串本身读取，调整配置不影响旧密码
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let argon2 = hasher(1024, 1, 1).expect("params");
        let hash = hash_with(&argon2, "SecurePass123").expect("hash");
        assert!(verify_password("SecurePass123", &hash));
        assert!(!verify_password("WrongPass123", &hash));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
