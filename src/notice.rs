//! Operator-facing toast messages.
use tracing::{error, info, warn};

pub const MSG_DELETED: &str = "删除成功";
pub const MSG_MISSING_FIELDS: &str = "请添加标题和内容";
pub const MSG_SAVE_FAILED: &str = "保存失败";
pub const MSG_SAVED: &str = "保存成功";

pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Emits notices as log events; the CLI's only feedback channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(notice = "success", "{}", message);
    }

    fn warning(&self, message: &str) {
        warn!(notice = "warning", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(notice = "error", "{}", message);
    }
}
