use std::sync::Arc;

use futures_util::future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("channel rejected message: http status {0}")]
    HttpStatus(u16),
}

/// One configured messaging destination. Implementations own their wire
/// format and authentication; a non-2xx response surfaces as a local
/// failure, never a panic or a propagated probe error.
#[async_trait::async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;
    async fn send(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Aggregated outcome of one fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotifyReport {
    pub attempted: usize,
    pub sent: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl NotifyReport {
    /// True when at least one channel accepted the message.
    pub fn delivered(&self) -> bool {
        self.sent > 0
    }
}

/// Sends `title`/`body` to every channel concurrently and joins all sends
/// regardless of individual failure; one channel's error never prevents
/// delivery attempts to the others. An empty channel set returns all-zero
/// counts without attempting anything.
pub async fn notify_all(channels: &[Arc<dyn Channel>], title: &str, body: &str) -> NotifyReport {
    if channels.is_empty() {
        return NotifyReport::default();
    }

    let sends = channels.iter().map(|channel| {
        let channel = Arc::clone(channel);
        async move {
            let result = channel.send(title, body).await;
            (channel.name().to_string(), result)
        }
    });
    let results = future::join_all(sends).await;

    let mut report = NotifyReport {
        attempted: channels.len(),
        ..NotifyReport::default()
    };
    for (name, result) in results {
        match result {
            Ok(()) => report.sent += 1,
            Err(err) => {
                report.failed += 1;
                report.errors.push(format!("{name}: {err}"));
            }
        }
    }
    report
}
