//! Database Module
//!
//! Embedded SurrealDB storage: connection setup, index definitions and
//! startup seeding.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::db::models::User;
use crate::db::repository::UserRepository;
use crate::utils::AppError;

/// Database service: owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database at the given path
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("snug")
            .use_db("booking")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_indexes(&db).await?;

        tracing::info!("Database connection established (SurrealDB RocksDB)");

        Ok(Self { db })
    }
}

/// 定义唯一索引 (迁移的替代品；IF NOT EXISTS 保证幂等)
async fn define_indexes(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query("DEFINE INDEX IF NOT EXISTS user_email ON TABLE user FIELDS email UNIQUE")
        .query("DEFINE INDEX IF NOT EXISTS closed_day_date ON TABLE closed_day FIELDS date UNIQUE")
        .query("DEFINE INDEX IF NOT EXISTS booking_date ON TABLE booking FIELDS date")
        .await
        .map_err(|e| AppError::database(format!("Failed to define indexes: {e}")))?;
    Ok(())
}

/// 按环境变量创建管理员账号
///
/// `ADMIN_SEED_EMAILS` (逗号分隔) + `ADMIN_SEED_PASSWORD`；
/// 已存在的邮箱跳过。两个变量缺一则整体跳过 (与原部署约定一致)。
pub async fn seed_admin_users(db: &Surreal<Db>) -> Result<(), AppError> {
    let emails: Vec<String> = std::env::var("ADMIN_SEED_EMAILS")
        .unwrap_or_default()
        .split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect();
    let password = std::env::var("ADMIN_SEED_PASSWORD").unwrap_or_default();

    if emails.is_empty() || password.is_empty() {
        tracing::info!("Admin seed skipped: set ADMIN_SEED_EMAILS & ADMIN_SEED_PASSWORD");
        return Ok(());
    }

    let hash = User::hash_password(&password)
        .map_err(|e| AppError::internal(format!("Failed to hash seed password: {e}")))?;

    let repo = UserRepository::new(db.clone());
    for email in emails {
        if repo
            .find_by_email(&email)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .is_some()
        {
            continue;
        }
        repo.create(&email, &hash, "admin")
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        tracing::info!(email = %email, "Seeded admin user");
    }

    Ok(())
}
