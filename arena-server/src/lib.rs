//! KickArena Server - 射门技巧场馆排队与计分引擎
//!
//! # 架构概述
//!
//! - **排队叫号** (`api/queue`): 持久化序号发号、叫号、过期、退票兑换
//! - **比赛管理** (`api/competitions`): individual/team/match/solo 四种赛制
//! - **计分引擎** (`db/repository/scoring`): 单事务更新参赛者/团队聚合/全场镜像
//! - **回合追踪** (`db/repository/turn`): match/solo 踢球额度递减
//! - **每日抽奖** (`db/repository/raffle`): 场馆时区当日 PLAYED 票均匀抽取
//!
//! # 模块结构
//!
//! ```text
//! arena-server/src/
//! ├── core/          # 配置、状态、服务器装配
//! ├── auth/          # 操作人身份提取、管理员校验
//! ├── services/      # Webhook 通知
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 错误、日志、时区、校验
//! └── db/            # SQLite 连接池、迁移、repository
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{AdminGuard, CurrentStaff};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: dotenv + 日志
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __ __ _      __   ___
   / //_/(_)____/ /__/   |  ________  ____  ____ _
  / ,<  / / ___/ //_/ /| | / ___/ _ \/ __ \/ __ `/
 / /| |/ / /__/ ,< / ___ |/ /  /  __/ / / / /_/ /
/_/ |_/_/\___/_/|_/_/  |_/_/   \___/_/ /_/\__,_/
    "#
    );
}
