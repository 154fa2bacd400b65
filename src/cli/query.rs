//! Query commands: one-shot reads of compositor state.

use crate::error::Result;
use crate::ipc::protocol::CommandKind;
use crate::ipc::SwayClient;
use crate::output;

pub async fn workspaces(client: &SwayClient, json: bool) -> Result<()> {
    if json {
        let (_, payload) = client.request(CommandKind::GetWorkspaces, "").await?;
        println!("{}", output::format_json(&payload));
    } else {
        let workspaces = client.workspaces().await?;
        println!("{}", output::format_workspaces(&workspaces));
    }
    Ok(())
}

pub async fn outputs(client: &SwayClient, json: bool) -> Result<()> {
    if json {
        let (_, payload) = client.request(CommandKind::GetOutputs, "").await?;
        println!("{}", output::format_json(&payload));
    } else {
        let outputs = client.outputs().await?;
        println!("{}", output::format_outputs(&outputs));
    }
    Ok(())
}

pub async fn version(client: &SwayClient, json: bool) -> Result<()> {
    if json {
        let (_, payload) = client.request(CommandKind::GetVersion, "").await?;
        println!("{}", output::format_json(&payload));
    } else {
        let version = client.version().await?;
        println!("{}", version.human_readable);
    }
    Ok(())
}
