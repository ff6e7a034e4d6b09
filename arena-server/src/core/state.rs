use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::services::NotifierService;

/// 服务器状态 — 持有所有共享组件
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 (WAL) |
/// | notifier | Best-effort webhook 通知 |
///
/// Clone 是浅拷贝 (pool 内部是 Arc)，handler 里随便 clone。
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub notifier: NotifierService,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool, notifier: NotifierService) -> Self {
        Self {
            config,
            pool,
            notifier,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/arena.db，含迁移)
    /// 3. 通知服务
    ///
    /// # Panics
    ///
    /// 工作目录或数据库初始化失败时 panic — 没有库就没有服务
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("arena.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let notifier = NotifierService::new(config.notify_webhook_url.clone());

        Self::new(config.clone(), db_service.pool, notifier)
    }
}
