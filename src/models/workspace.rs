//! Typed views of compositor payloads.
//!
//! The wire carries generic JSON; these structs cover the fields the bar
//! widgets actually consume. Unknown fields are ignored so newer
//! compositors stay compatible.

use serde::{Deserialize, Serialize};

/// One workspace, as returned by GET_WORKSPACES and embedded in WORKSPACE
/// events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub name: String,
    /// Workspace number; named workspaces report -1 (mapped to `None`).
    #[serde(default, deserialize_with = "negative_as_none")]
    pub num: Option<i64>,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub urgent: bool,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub output: Option<String>,
}

fn negative_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let num = Option::<i64>::deserialize(deserializer)?;
    Ok(num.filter(|n| *n >= 0))
}

/// Payload of a WORKSPACE event: what changed, and the workspace(s)
/// involved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceEvent {
    pub change: String,
    #[serde(default)]
    pub current: Option<Workspace>,
    #[serde(default)]
    pub old: Option<Workspace>,
}

/// One output, as returned by GET_OUTPUTS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputInfo {
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub current_workspace: Option<String>,
}

/// GET_VERSION response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub human_readable: String,
    #[serde(default)]
    pub loaded_config_file_name: Option<String>,
}

/// One entry of a RUN_COMMAND response; the compositor reports one outcome
/// per command in the submitted command list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub success: bool,
    #[serde(default)]
    pub parse_error: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_deserializes_from_compositor_payload() {
        let payload = serde_json::json!({
            "id": 4,
            "name": "2",
            "num": 2,
            "focused": true,
            "urgent": false,
            "visible": true,
            "output": "eDP-1",
            "rect": {"x": 0, "y": 0, "width": 1920, "height": 1080}
        });

        let workspace: Workspace = serde_json::from_value(payload).unwrap();
        assert_eq!(workspace.name, "2");
        assert_eq!(workspace.num, Some(2));
        assert!(workspace.focused);
        assert_eq!(workspace.output.as_deref(), Some("eDP-1"));
    }

    #[test]
    fn named_workspace_num_maps_to_none() {
        let payload = serde_json::json!({"name": "mail", "num": -1});
        let workspace: Workspace = serde_json::from_value(payload).unwrap();
        assert_eq!(workspace.num, None);
    }

    #[test]
    fn workspace_event_deserializes() {
        let payload = serde_json::json!({
            "change": "focus",
            "current": {"name": "2", "num": 2, "focused": true},
            "old": {"name": "1", "num": 1}
        });

        let event: WorkspaceEvent = serde_json::from_value(payload).unwrap();
        assert_eq!(event.change, "focus");
        assert_eq!(event.current.unwrap().name, "2");
        assert_eq!(event.old.unwrap().name, "1");
    }

    #[test]
    fn command_outcome_covers_failure_shape() {
        let payload = serde_json::json!([
            {"success": true},
            {"success": false, "parse_error": true, "error": "Unknown/invalid command"}
        ]);

        let outcomes: Vec<CommandOutcome> = serde_json::from_value(payload).unwrap();
        assert!(outcomes[0].success);
        assert!(!outcomes[1].success);
        assert_eq!(outcomes[1].parse_error, Some(true));
    }

    #[test]
    fn version_deserializes() {
        let payload = serde_json::json!({
            "major": 1, "minor": 10, "patch": 0,
            "human_readable": "sway version 1.10",
            "loaded_config_file_name": "/home/user/.config/sway/config"
        });

        let version: Version = serde_json::from_value(payload).unwrap();
        assert_eq!(version.major, 1);
        assert_eq!(version.human_readable, "sway version 1.10");
    }
}
