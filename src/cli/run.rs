//! The `run` command: dispatch a compositor command and report outcomes.

use crate::error::Result;
use crate::ipc::SwayClient;
use crate::ipc::protocol::CommandKind;
use crate::output;

pub async fn run(client: &SwayClient, command: &str, json: bool) -> Result<()> {
    if json {
        let (_, payload) = client.request(CommandKind::RunCommand, command).await?;
        println!("{}", output::format_json(&payload));
        return Ok(());
    }

    let outcomes = client.run_command(command).await?;
    for (index, outcome) in outcomes.iter().enumerate() {
        if outcome.success {
            println!("[{}] ok", index);
        } else {
            println!(
                "[{}] failed: {}",
                index,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    Ok(())
}
