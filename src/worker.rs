/// worker support structs shared by the in-process provider workers
///
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

pub type JsonString = String;

pub const OK: &str = "ok";
pub const DOWN: &str = "down";

/// the length of generated worker ids
pub const ID_LEN: usize = 16;

/// create a random alpha-numeric worker id
pub fn create_id() -> String {
    (0..ID_LEN).map(|_| fastrand::alphanumeric()).collect()
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerState {
    #[default]
    Idle,
    Busy,
    Broken,
    Shutdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerStatus {
    pub worker_id: String,
    pub status: String,
    pub state: WorkerState,
    pub uptime: String,
    pub error_count: u16,
}

impl WorkerStatus {
    pub fn new(
        worker_id: String,
        status: String,
        state: WorkerState,
        uptime: String,
        error_count: u16,
    ) -> WorkerStatus {
        WorkerStatus {
            worker_id,
            status,
            state,
            uptime,
            error_count,
        }
    }
}

/// time since a worker started, displayed as `0 days, 00:00:05`
#[derive(Debug, Clone, Copy)]
pub struct Uptime {
    started: Instant,
}

impl Uptime {
    pub fn new() -> Uptime {
        Uptime {
            started: Instant::now(),
        }
    }

    pub fn get_uptime_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

impl Default for Uptime {
    fn default() -> Self {
        Uptime::new()
    }
}

impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.get_uptime_seconds();
        let days = secs / 86_400;
        let hours = (secs % 86_400) / 3600;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;

        write!(f, "{} days, {:02}:{:02}:{:02}", days, hours, minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_ids() {
        let id = create_id();
        assert_eq!(id.len(), ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, create_id());
    }

    #[test]
    fn uptime() {
        let uptime = Uptime::new();
        assert_eq!(uptime.get_uptime_seconds(), 0);
        assert!(uptime.to_string().starts_with("0 days, 00:00"));
    }

    #[test]
    fn status_json() {
        let status = WorkerStatus::new(
            create_id(),
            OK.to_string(),
            WorkerState::Idle,
            Uptime::new().to_string(),
            0,
        );

        let js = serde_json::to_string(&status).expect("should serialize");
        let back: WorkerStatus = serde_json::from_str(&js).expect("should parse");
        assert_eq!(back.status, OK);
        assert_eq!(back.state, WorkerState::Idle);
        assert_eq!(back.error_count, 0);
    }
}
