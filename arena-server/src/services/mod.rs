//! 后台服务模块

mod notifier;

pub use notifier::NotifierService;
