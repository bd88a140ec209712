// crates/rpc/src/models.rs
//! Download job shapes returned by `aria2.tellActive` / `aria2.tellWaiting`.
//!
//! aria2 encodes every byte count as a decimal string. Those strings are
//! parsed into `u64` as part of deserialization so the rest of the program
//! never re-parses them.

use serde::{Deserialize, Serialize};

/// Status of a download job as reported by aria2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Waiting,
    Paused,
    Error,
    Complete,
    Removed,
}

/// One file belonging to a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WireFile")]
pub struct FileEntry {
    pub path: String,
    pub completed_length: u64,
    pub length: u64,
}

/// A download job. Recreated on every query, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WireJob")]
pub struct JobRecord {
    pub gid: String,
    pub status: JobStatus,
    pub total_length: u64,
    pub completed_length: u64,
    pub download_speed: u64,
    pub dir: String,
    pub connections: u64,
    pub files: Vec<FileEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFile {
    path: String,
    completed_length: String,
    length: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireJob {
    gid: String,
    status: JobStatus,
    total_length: String,
    completed_length: String,
    download_speed: String,
    #[serde(default)]
    dir: String,
    #[serde(default)]
    connections: Option<String>,
    #[serde(default)]
    files: Vec<FileEntry>,
}

fn parse_count(field: &str, raw: &str) -> Result<u64, String> {
    raw.parse::<u64>()
        .map_err(|e| format!("{field}: expected decimal byte count, got {raw:?} ({e})"))
}

impl TryFrom<WireFile> for FileEntry {
    type Error = String;

    fn try_from(wire: WireFile) -> Result<Self, Self::Error> {
        Ok(Self {
            completed_length: parse_count("completedLength", &wire.completed_length)?,
            length: parse_count("length", &wire.length)?,
            path: wire.path,
        })
    }
}

impl TryFrom<WireJob> for JobRecord {
    type Error = String;

    fn try_from(wire: WireJob) -> Result<Self, Self::Error> {
        let connections = match wire.connections.as_deref() {
            Some(raw) => parse_count("connections", raw)?,
            None => 0,
        };
        Ok(Self {
            total_length: parse_count("totalLength", &wire.total_length)?,
            completed_length: parse_count("completedLength", &wire.completed_length)?,
            download_speed: parse_count("downloadSpeed", &wire.download_speed)?,
            connections,
            gid: wire.gid,
            status: wire.status,
            dir: wire.dir,
            files: wire.files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_job_record_parses_decimal_strings() {
        let job: JobRecord = serde_json::from_value(json!({
            "gid": "2089b05ecca3d829",
            "status": "active",
            "totalLength": "34896138",
            "completedLength": "1048576",
            "downloadSpeed": "524288",
            "dir": "/downloads",
            "connections": "4",
            "files": [{
                "index": "1",
                "path": "/downloads/file.iso",
                "completedLength": "1048576",
                "length": "34896138",
                "selected": "true",
                "uris": []
            }],
            "numPieces": "34"
        }))
        .unwrap();

        assert_eq!(
            job,
            JobRecord {
                gid: "2089b05ecca3d829".to_string(),
                status: JobStatus::Active,
                total_length: 34_896_138,
                completed_length: 1_048_576,
                download_speed: 524_288,
                dir: "/downloads".to_string(),
                connections: 4,
                files: vec![FileEntry {
                    path: "/downloads/file.iso".to_string(),
                    completed_length: 1_048_576,
                    length: 34_896_138,
                }],
            }
        );
    }

    #[test]
    fn test_job_record_accepts_u64_max() {
        let job: JobRecord = serde_json::from_value(json!({
            "gid": "a",
            "status": "paused",
            "totalLength": "18446744073709551615",
            "completedLength": "0",
            "downloadSpeed": "0",
        }))
        .unwrap();
        assert_eq!(job.total_length, u64::MAX);
        assert_eq!(job.connections, 0);
        assert!(job.files.is_empty());
    }

    #[test]
    fn test_job_record_rejects_overflow() {
        let err = serde_json::from_value::<JobRecord>(json!({
            "gid": "a",
            "status": "active",
            "totalLength": "18446744073709551616",
            "completedLength": "0",
            "downloadSpeed": "0",
        }))
        .unwrap_err();
        assert!(err.to_string().contains("totalLength"));
    }

    #[test]
    fn test_job_record_rejects_unknown_status() {
        let result = serde_json::from_value::<JobRecord>(json!({
            "gid": "a",
            "status": "exploded",
            "totalLength": "0",
            "completedLength": "0",
            "downloadSpeed": "0",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_job_record_serializes_numbers() {
        let job = JobRecord {
            gid: "g".to_string(),
            status: JobStatus::Waiting,
            total_length: 10,
            completed_length: 5,
            download_speed: 1,
            dir: "/tmp".to_string(),
            connections: 2,
            files: vec![],
        };
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["status"], "waiting");
        assert_eq!(value["totalLength"], 10);
        assert_eq!(value["downloadSpeed"], 1);
    }
}
