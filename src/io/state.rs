use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Persisted UI state, saved on exit and restored on the next launch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiState {
    /// Grouping mode name ("flat" / "status" / "section").
    #[serde(default)]
    pub grouping: Option<String>,
    /// Active tab descriptor: "today", "project:<id>", or "label:<name>".
    #[serde(default)]
    pub tab: Option<String>,
}

/// State directory: `<user state dir>/tuido` (also hosts the log files).
pub fn state_dir() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|d| d.join("tuido"))
}

fn state_file() -> Option<PathBuf> {
    state_dir().map(|d| d.join("state.json"))
}

/// Read saved UI state. Any failure (absent file, stale format) simply
/// yields None.
pub fn read_ui_state() -> Option<UiState> {
    let text = fs::read_to_string(state_file()?).ok()?;
    serde_json::from_str(&text).ok()
}

/// Best-effort save; the TUI exits the same way whether or not this lands.
pub fn write_ui_state(state: &UiState) {
    let Some(path) = state_file() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(text) = serde_json::to_string_pretty(state) {
        let _ = fs::write(path, text);
    }
}
