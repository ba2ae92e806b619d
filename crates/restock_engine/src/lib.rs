//! Restock engine: probe pipeline, notification fan-out, and persistence.
mod channels;
mod check;
mod fetch;
mod message;
mod notify;
mod probe;
mod store;
mod target;

pub use channels::{SignedWebhookChannel, TelegramChannel};
pub use check::{CheckReport, Monitor, NowFn};
pub use fetch::{FetchSettings, PageFetcher, PageSnapshot, ReqwestFetcher};
pub use message::{error_message, restock_message};
pub use notify::{notify_all, Channel, NotifyError, NotifyReport};
pub use probe::{probe, ProbeSettings};
pub use store::{ensure_state_dir, AtomicFileWriter, PersistError, RonFileStore, StateStore};
pub use target::{TargetSpec, TargetSpecError};
