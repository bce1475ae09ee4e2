use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::capacity::CapacityChecker;
use crate::core::Config;
use crate::db::DbService;
use crate::services::MailerService;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是预订后端的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | mailer | MailerService | 确认邮件投递 |
/// | checker | Arc<CapacityChecker> | 容量准入检查器 (由 BookingPolicy 构建) |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 确认邮件投递服务
    pub mailer: MailerService,
    /// 容量准入检查器 (进程启动时由配置构建，之后不可变)
    pub checker: Arc<CapacityChecker>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`initialize()`](Self::initialize) 方法代替
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        mailer: MailerService,
        checker: Arc<CapacityChecker>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            mailer,
            checker,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/snug.db)，含索引定义与管理员种子
    /// 3. 各服务 (JWT, Mailer, CapacityChecker)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败或 BookingPolicy 非法时 panic
    pub async fn initialize(config: &Config) -> Self {
        // 0. Ensure work_dir structure exists
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        // 1. Initialize DB
        let db_path = config.database_dir().join("snug.db");
        let db_path_str = db_path.to_string_lossy();

        let db_service = DbService::new(&db_path_str)
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        // 2. Seed admin users from env (original deployment convention)
        if let Err(e) = crate::db::seed_admin_users(&db).await {
            tracing::error!("Admin seeding failed: {}", e);
        }

        // 3. Initialize Services
        let jwt_service = Arc::new(JwtService::default());
        let mailer = MailerService::new(config.mail.clone());
        let checker = Arc::new(
            CapacityChecker::from_policy(&config.booking)
                .expect("Invalid booking policy configuration"),
        );

        tracing::info!(
            capacity = config.booking.capacity_per_slot,
            slots = checker.grid().len(),
            "Capacity checker ready ({} - {}, {}min slots)",
            config.booking.opens,
            config.booking.last_seating,
            config.booking.slot_minutes
        );

        Self::new(config.clone(), db, jwt_service, mailer, checker)
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 获取容量准入检查器
    pub fn checker(&self) -> &CapacityChecker {
        &self.checker
    }

    /// 获取邮件服务
    pub fn mailer(&self) -> &MailerService {
        &self.mailer
    }
}
