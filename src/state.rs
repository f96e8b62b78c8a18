use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;

use crate::config::Config;
use crate::session::SessionHandle;

#[derive(Clone)]
pub struct AppState {
    session: SessionHandle,
    config: Arc<Config>,
    shutdown_tx: broadcast::Sender<()>,
    started_at: Instant,
    sse_connections: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(session: SessionHandle, config: &Config, shutdown_tx: broadcast::Sender<()>) -> Self {
        Self {
            session,
            config: Arc::new(config.clone()),
            shutdown_tx,
            started_at: Instant::now(),
            sse_connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn shutdown_rx(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn shutdown_tx(&self) -> &broadcast::Sender<()> {
        &self.shutdown_tx
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// 占用一个 SSE 名额；已达上限时返回 `None`，守卫析构时释放
    pub fn acquire_sse_slot(&self) -> Option<SseSlot> {
        let max = self.config.limits.max_sse_connections;
        let current = self.sse_connections.fetch_add(1, Ordering::SeqCst);
        if current >= max {
            self.sse_connections.fetch_sub(1, Ordering::SeqCst);
            return None;
        }
        Some(SseSlot {
            counter: self.sse_connections.clone(),
        })
    }

    pub fn sse_connections(&self) -> usize {
        self.sse_connections.load(Ordering::SeqCst)
    }
}

pub struct SseSlot {
    counter: Arc<AtomicUsize>,
}

impl Drop for SseSlot {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}
