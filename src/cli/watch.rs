//! The `watch` command: stream subscribed events to stdout.

use crate::error::{Result, SwaylinkError};
use crate::ipc::SwayClient;
use crate::ipc::protocol::EventKind;

pub async fn watch(client: &SwayClient, event_names: &[String]) -> Result<()> {
    let kinds: Vec<EventKind> = if event_names.is_empty() {
        EventKind::ALL.to_vec()
    } else {
        event_names
            .iter()
            .map(|name| {
                EventKind::from_name(name).ok_or_else(|| {
                    SwaylinkError::Configuration(format!("unknown event kind: {}", name))
                })
            })
            .collect::<Result<_>>()?
    };

    client
        .subscribe(
            &kinds,
            Box::new(|kind, payload| {
                // One JSON object per line, easy to pipe into jq.
                println!(
                    "{}",
                    serde_json::json!({"event": kind.name(), "payload": payload})
                );
            }),
        )
        .await?;

    tokio::signal::ctrl_c().await?;
    client.unsubscribe().await;
    Ok(())
}
