//! Optional time bound on awaiting a command's reply

use super::sender::{PendingResponse, Reply};
use crate::error::CommandError;
use tokio::time::Duration;

/// Wait for a reply, giving up after `limit` when one is set
pub async fn await_reply(
    pending: PendingResponse,
    limit: Option<Duration>,
) -> Result<Reply, CommandError> {
    match limit {
        None => pending.wait().await,
        Some(limit) => match tokio::time::timeout(limit, pending.wait()).await {
            Ok(reply) => reply,
            Err(_) => Err(CommandError::Timeout(limit)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csms_shared::{CallError, ErrorCode};
    use tokio::sync::oneshot;

    #[tokio::test(start_paused = true)]
    async fn test_times_out_without_reply() {
        let (_tx, rx) = oneshot::channel::<Reply>();
        let pending = PendingResponse::new("CS001", "1", rx);

        let result = await_reply(pending, Some(Duration::from_secs(3))).await;
        assert!(matches!(result, Err(CommandError::Timeout(d)) if d == Duration::from_secs(3)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_before_deadline() {
        let (tx, rx) = oneshot::channel::<Reply>();
        let pending = PendingResponse::new("CS001", "1", rx);
        tx.send(Err(CallError::new(ErrorCode::NotSupported, "no")))
            .expect("send");

        let result = await_reply(pending, Some(Duration::from_secs(3))).await;
        assert!(matches!(result, Ok(Err(_))));
    }
}
