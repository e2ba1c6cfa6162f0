#![allow(dead_code)]

pub mod config_test_utils;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use gin_sync::common::StatusEvent;
use gin_sync::pipeline::StatusSender;
use gin_sync::producer::Producer;

/// Producer that replays a fixed list of events, yielding between sends.
pub struct ScriptedProducer {
    events: Vec<StatusEvent>,
    delay: Option<Duration>,
    seen_paths: Mutex<Option<Vec<String>>>,
}

impl ScriptedProducer {
    pub fn new(events: Vec<StatusEvent>) -> Arc<Self> {
        Arc::new(Self {
            events,
            delay: None,
            seen_paths: Mutex::new(None),
        })
    }

    pub fn with_delay(events: Vec<StatusEvent>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            events,
            delay: Some(delay),
            seen_paths: Mutex::new(None),
        })
    }

    pub fn seen_paths(&self) -> Option<Vec<String>> {
        self.seen_paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl Producer for ScriptedProducer {
    async fn produce(&self, paths: Vec<String>, status: StatusSender) {
        *self.seen_paths.lock().unwrap() = Some(paths);
        for event in &self.events {
            status.send(event.clone());
            match self.delay {
                Some(delay) => tokio::time::sleep(delay).await,
                None => tokio::task::yield_now().await,
            }
        }
    }
}

pub fn downloading(file: &str, progress: &str) -> StatusEvent {
    StatusEvent::progress(file, "Downloading", progress, "")
}
