pub mod notification;

pub use notification::{Notification, NotificationLevel, NotificationManager};
