//! Infrastructure layer: storage adapters and the approval notification worker.

pub mod memory;
pub mod notify;
pub mod postgres;

pub use memory::InMemoryStore;
pub use notify::{
    ChannelNotifier, LoggingMailSender, MailError, MailSender, WorkerHandle,
    spawn_notification_worker,
};
pub use postgres::PgStore;
