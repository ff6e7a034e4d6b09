//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`queue`] - 排队叫号接口
//! - [`competitions`] - 比赛管理接口 (含排行榜/动态)
//! - [`scoring`] - 计分接口 (log score / log turn / 全场榜单)
//! - [`raffle`] - 每日抽奖接口

pub mod competitions;
pub mod health;
pub mod queue;
pub mod raffle;
pub mod scoring;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
