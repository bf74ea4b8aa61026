use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::NewUser;
use crate::storage::Storage;
use crate::utils::password::hash_password;

const FALLBACK_CACHE: &str = "moka";
const ADMIN_USERNAME: &str = "admin";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn build_cache(name: &str) -> Result<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name).ok_or_else(|| {
        LmsError::cache_plugin_not_found(format!("Cache backend '{name}' is not registered"))
    })?;
    let cache = constructor().await?;
    Ok(Arc::from(cache))
}

/// 按配置创建缓存，失败时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();
    warn!("Attempting to create {} cache backend", cache_type);

    match build_cache(cache_type).await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", cache_type);
            Ok(cache)
        }
        Err(e) if cache_type != FALLBACK_CACHE => {
            warn!(
                "Failed to create {} cache: {}, falling back to {}",
                cache_type, e, FALLBACK_CACHE
            );
            build_cache(FALLBACK_CACHE).await
        }
        Err(e) => Err(e),
    }
}

fn generate_random_password(length: usize) -> String {
    const CHARSET: &[u8] =
        b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// 用户表为空时创建默认管理员
async fn seed_admin(storage: &Arc<dyn Storage>) -> Result<()> {
    let count = storage.count_users().await?;
    if count > 0 {
        debug!("Database already has {} user(s), skipping admin seed", count);
        return Ok(());
    }
    info!("No users found in database, creating default admin account...");

    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(pwd) if !pwd.is_empty() => pwd,
        _ => {
            let pwd = generate_random_password(16);
            // 只输出这一次
            warn!("==========================================================");
            warn!("  ADMIN_PASSWORD not set, generated admin password: {}", pwd);
            warn!("  Save it now or set ADMIN_PASSWORD before the next start");
            warn!("==========================================================");
            pwd
        }
    };

    let admin = storage
        .create_user(NewUser {
            username: ADMIN_USERNAME.to_string(),
            email: "admin@localhost".to_string(),
            password_hash: hash_password(&password)?,
            role: UserRole::Admin,
            full_name: Some("Administrator".to_string()),
            avatar_url: None,
        })
        .await?;
    info!(
        "Default admin account created (ID: {}, username: {})",
        admin.id, admin.username
    );
    Ok(())
}

/// 启动前准备：存储与迁移、管理员账号、缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // redis 与数据库驱动共用 rustls，重复安装时忽略
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    if let Err(e) = seed_admin(&storage).await {
        warn!("Failed to seed admin account: {}", e);
    }

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    #[test]
    fn test_generated_password_shape() {
        let pwd = generate_random_password(16);
        assert_eq!(pwd.chars().count(), 16);
        assert_ne!(pwd, generate_random_password(16));
    }

    #[tokio::test]
    async fn test_seed_admin_only_on_empty_database() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await);

        seed_admin(&storage).await.expect("seed");
        assert_eq!(storage.count_users().await.expect("count"), 1);
        let admin = storage
            .get_user_by_username(ADMIN_USERNAME)
            .await
            .expect("query")
            .expect("admin exists");
        assert_eq!(admin.role, UserRole::Admin);

        seed_admin(&storage).await.expect("second seed");
        assert_eq!(storage.count_users().await.expect("count"), 1);
    }

    #[tokio::test]
    async fn test_unknown_cache_backend_is_reported() {
        let err = build_cache("memcached").await.err().expect("should fail");
        assert_eq!(err.code(), "E002");
    }
}
