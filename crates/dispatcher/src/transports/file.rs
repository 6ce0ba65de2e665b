//! FileTransport - spools messages to a JSON-lines file

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use contracts::{Message, Transport, TransportError};
use serde::Serialize;
use tracing::{debug, instrument};

/// Configuration for FileTransport
#[derive(Debug, Clone)]
pub struct FileTransportConfig {
    /// Spool file path
    pub path: PathBuf,
}

impl FileTransportConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Option<Self> {
        params.get("path").map(|path| Self {
            path: PathBuf::from(path),
        })
    }
}

/// One spooled line
#[derive(Serialize)]
struct SpoolRecord<'a> {
    spooled_at: String,
    transport: &'a str,
    message: &'a Message,
}

/// Transport that appends each message to a spool file
pub struct FileTransport {
    name: String,
    config: FileTransportConfig,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl FileTransport {
    /// Create a new FileTransport; the file is opened on `start`
    pub fn new(name: impl Into<String>, config: FileTransportConfig) -> Self {
        Self {
            name: name.into(),
            config,
            writer: Mutex::new(None),
        }
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, TransportError> {
        let name = name.into();
        let config = FileTransportConfig::from_params(params)
            .ok_or_else(|| TransportError::start(&name, "missing 'path' param"))?;
        Ok(Self::new(name, config))
    }

    fn writer(&self) -> MutexGuard<'_, Option<BufWriter<File>>> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn open(&self) -> std::io::Result<BufWriter<File>> {
        if let Some(parent) = self.config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.path)?;
        Ok(BufWriter::new(file))
    }

    fn write_record(writer: &mut BufWriter<File>, record: &SpoolRecord<'_>) -> std::io::Result<()> {
        serde_json::to_writer(&mut *writer, record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

impl Transport for FileTransport {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_started(&self) -> bool {
        self.writer().is_some()
    }

    #[instrument(
        name = "file_transport_start",
        skip(self),
        fields(transport = %self.name, path = %self.config.path.display())
    )]
    fn start(&self) -> Result<(), TransportError> {
        let mut guard = self.writer();
        if guard.is_none() {
            let writer = self
                .open()
                .map_err(|e| TransportError::start(&self.name, e.to_string()))?;
            *guard = Some(writer);
            debug!(transport = %self.name, "Spool file opened");
        }
        Ok(())
    }

    #[instrument(name = "file_transport_stop", skip(self), fields(transport = %self.name))]
    fn stop(&self) -> Result<(), TransportError> {
        if let Some(mut writer) = self.writer().take() {
            writer
                .flush()
                .map_err(|e| TransportError::stop(&self.name, e.to_string()))?;
        }
        Ok(())
    }

    #[instrument(
        name = "file_transport_send",
        skip(self, message),
        fields(transport = %self.name, message_id = %message.id)
    )]
    fn send(&self, message: &Message) -> Result<usize, TransportError> {
        let mut guard = self.writer();
        let writer = guard
            .as_mut()
            .ok_or_else(|| TransportError::send(&self.name, "transport not started"))?;

        let record = SpoolRecord {
            spooled_at: Utc::now().to_rfc3339(),
            transport: &self.name,
            message,
        };
        Self::write_record(writer, &record)
            .map_err(|e| TransportError::send(&self.name, e.to_string()))?;

        Ok(message.recipient_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_message(id: &str) -> Message {
        Message::new(id, "ops@example.com", vec!["a@example.com".into()])
            .with_subject("report")
            .with_body("hello")
    }

    #[test]
    fn test_file_transport_spools_json_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spool").join("out.jsonl");
        let transport = FileTransport::new(
            "spool",
            FileTransportConfig { path: path.clone() },
        );

        transport.start().unwrap();
        assert_eq!(transport.send(&sample_message("m1")).unwrap(), 1);
        assert_eq!(transport.send(&sample_message("m2")).unwrap(), 1);
        transport.stop().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["transport"], "spool");
        assert_eq!(first["message"]["id"], "m1");
        assert!(first["spooled_at"].is_string());
    }

    #[test]
    fn test_file_transport_send_when_stopped_fails() {
        let dir = tempdir().unwrap();
        let transport = FileTransport::new(
            "spool",
            FileTransportConfig {
                path: dir.path().join("out.jsonl"),
            },
        );
        let err = transport.send(&sample_message("m1")).unwrap_err();
        assert!(matches!(err, TransportError::Send { .. }));
    }

    #[test]
    fn test_file_transport_appends_across_restarts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let transport = FileTransport::new("spool", FileTransportConfig { path: path.clone() });

        for id in ["m1", "m2"] {
            transport.start().unwrap();
            assert!(transport.is_started());
            transport.send(&sample_message(id)).unwrap();
            transport.stop().unwrap();
            assert!(!transport.is_started());
        }

        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_file_transport_start_fails_on_directory_path() {
        let dir = tempdir().unwrap();
        let transport = FileTransport::new(
            "spool",
            FileTransportConfig {
                path: dir.path().to_path_buf(),
            },
        );
        let err = transport.start().unwrap_err();
        assert!(matches!(err, TransportError::Start { .. }));
        assert!(!transport.is_started());
    }

    #[test]
    fn test_from_params_requires_path() {
        let result = FileTransport::from_params("spool", &HashMap::new());
        assert!(result.is_err());
    }
}
