//! WebSocket message DTOs for live collection watches.

use serde::{Deserialize, Serialize};

use super::http::RecordDto;

/// Message type enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    Snapshot,
    Error,
}

/// Full contents of a watched collection, sent on connect and after every change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMessage {
    pub r#type: MessageType,
    pub path: String,
    pub records: Vec<RecordDto>,
}

/// Sent when the server cannot produce a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub r#type: MessageType,
    pub error: String,
}

/// Any server → client frame
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerFrame {
    Snapshot(SnapshotMessage),
    Error(ErrorMessage),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_frame_distinguishes_snapshot_and_error() {
        // テスト項目: フレームの形からスナップショットとエラーを判別できる
        // given (前提条件):
        let snapshot = r#"{"type":"snapshot","path":"artifacts/site/public/data/messages","records":[]}"#;
        let error = r#"{"type":"error","error":"boom"}"#;

        // when (操作):
        let snapshot: ServerFrame = serde_json::from_str(snapshot).unwrap();
        let error: ServerFrame = serde_json::from_str(error).unwrap();

        // then (期待する結果):
        assert!(matches!(snapshot, ServerFrame::Snapshot(ref s) if s.records.is_empty()));
        assert!(matches!(error, ServerFrame::Error(ref e) if e.error == "boom"));
    }
}
