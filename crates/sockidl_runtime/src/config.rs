//! Tunables for generated clients and servers.
//!
//! Defaults match the values every generated binding assumes; override them with the `with_*` builders.

use std::time::Duration;

/// How long a client call waits for its response.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// How often blocked readers wake up to check for shutdown.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How often the accept loop checks for new connections and shutdown.
pub const DEFAULT_ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Largest frame payload accepted from a peer.
pub const DEFAULT_MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Client-side settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub call_timeout: Duration,
    pub poll_interval: Duration,
    pub connect_timeout: Option<Duration>,
    pub max_frame_len: usize,
    /// Start the listener thread as part of `connect`.
    pub auto_listen: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            connect_timeout: None,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            auto_listen: true,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_max_frame_len(mut self, len: usize) -> Self {
        self.max_frame_len = len;
        self
    }

    pub fn with_auto_listen(mut self, auto_listen: bool) -> Self {
        self.auto_listen = auto_listen;
        self
    }
}

/// Server-side settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub poll_interval: Duration,
    pub accept_poll_interval: Duration,
    pub max_frame_len: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            accept_poll_interval: DEFAULT_ACCEPT_POLL_INTERVAL,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_accept_poll_interval(mut self, interval: Duration) -> Self {
        self.accept_poll_interval = interval;
        self
    }

    pub fn with_max_frame_len(mut self, len: usize) -> Self {
        self.max_frame_len = len;
        self
    }
}
