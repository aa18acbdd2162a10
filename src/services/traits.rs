use crate::domain::Notification;
use crate::errors::HeraldResult;

#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send {
    /// Deliver one notification to a webhook URL
    fn send(&mut self, webhook_url: &str, notification: &Notification) -> HeraldResult<()>;
}
