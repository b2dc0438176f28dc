//! Client core shared by every generated client.
//!
//! A [`ClientCore`] owns one TCP connection and, once listening, a background thread that reads frames. Frames
//! whose id is in the client's push set (callbacks and observer notifications) are dispatched to the generated
//! handler right away. A frame carrying the response id of the call in flight is queued for it; any other
//! frame is logged and dropped.
//!
//! ## State machine
//! ```text
//! Disconnected --connect--> Connected --start_listening--> Listening
//!      ^                        |                              |
//!      +-------- disconnect ----+---------- disconnect --------+
//! ```
//!
//! ## Notes
//! - Responses are matched by message id only. The send lock is held from the moment a request is written until
//!   its response arrives or the call times out, so one client never has two calls in flight.
//! - Dispatch runs on the listener thread; a slow handler delays responses behind it.

use std::collections::{HashSet, VecDeque};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::ClientConfig;
use crate::errors::{RpcError, TransportError, WireError};
use crate::frame::{FrameReader, write_frame};
use crate::wire::peek_message_id;

/// Connection state of a [`ClientCore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientState {
    Disconnected,
    Connected,
    Listening,
}

/// Callback that decodes a pushed payload and invokes the matching handler.
pub type NotificationDispatch = Arc<dyn Fn(u32, &[u8]) -> Result<(), WireError> + Send + Sync>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Response queue
// ============================================================================

/// Responses that arrived on the listener thread, waiting to be claimed by a call.
#[derive(Debug, Default)]
pub struct ResponseQueue {
    entries: Mutex<VecDeque<(u32, Vec<u8>)>>,
    arrived: Condvar,
}

impl ResponseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, id: u32, payload: Vec<u8>) {
        lock(&self.entries).push_back((id, payload));
        self.arrived.notify_all();
    }

    /// Remove and return the oldest entry with `id`, waiting up to `timeout` for one to arrive.
    ///
    /// Entries with other ids stay queued.
    pub fn wait_for(&self, id: u32, timeout: Duration) -> Option<Vec<u8>> {
        let deadline = Instant::now() + timeout;
        let mut entries = lock(&self.entries);
        loop {
            if let Some(index) = entries.iter().position(|(queued, _)| *queued == id) {
                return entries.remove(index).map(|(_, payload)| payload);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            entries = self
                .arrived
                .wait_timeout(entries, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Drop every queued entry with `id`. Returns how many were dropped.
    pub fn discard(&self, id: u32) -> usize {
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|(queued, _)| *queued != id);
        before - entries.len()
    }

    pub fn clear(&self) {
        lock(&self.entries).clear();
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Client core
// ============================================================================

struct Shared {
    config: ClientConfig,
    push_ids: HashSet<u32>,
    dispatch: NotificationDispatch,
    state: Mutex<ClientState>,
    /// Held for a whole call: request write through response wait.
    send_lock: Mutex<()>,
    writer: Mutex<Option<TcpStream>>,
    responses: ResponseQueue,
    /// Response id of the call in flight.
    awaiting: Mutex<Option<u32>>,
    listening: AtomicBool,
}

/// Connection, listener thread and response correlation for one generated client.
pub struct ClientCore {
    shared: Arc<Shared>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl ClientCore {
    /// Create a disconnected client.
    ///
    /// ## Parameters
    /// - `push_ids`: message ids the server pushes unprompted; these go to `dispatch` instead of the queue.
    pub fn new(config: ClientConfig, push_ids: impl IntoIterator<Item = u32>, dispatch: NotificationDispatch) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                push_ids: push_ids.into_iter().collect(),
                dispatch,
                state: Mutex::new(ClientState::Disconnected),
                send_lock: Mutex::new(()),
                writer: Mutex::new(None),
                responses: ResponseQueue::new(),
                awaiting: Mutex::new(None),
                listening: AtomicBool::new(false),
            }),
            listener: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }

    pub fn state(&self) -> ClientState {
        *lock(&self.shared.state)
    }

    pub fn is_connected(&self) -> bool {
        self.state() != ClientState::Disconnected
    }

    /// Whether `id` is dispatched to handlers rather than queued.
    pub fn is_push_id(&self, id: u32) -> bool {
        self.shared.push_ids.contains(&id)
    }

    /// Open the connection. Starts listening when the config asks for it.
    #[tracing::instrument(skip_all)]
    pub fn connect(&self, addr: impl ToSocketAddrs) -> Result<(), TransportError> {
        if self.is_connected() {
            self.disconnect();
        }

        let stream = match self.shared.config.connect_timeout {
            Some(timeout) => connect_with_timeout(addr, timeout)?,
            None => TcpStream::connect(addr)?,
        };
        stream.set_nodelay(true)?;
        tracing::info!(peer = ?stream.peer_addr().ok(), "connected");

        *lock(&self.shared.writer) = Some(stream);
        *lock(&self.shared.state) = ClientState::Connected;

        if self.shared.config.auto_listen {
            self.start_listening()?;
        }
        Ok(())
    }

    /// Start the background reader. A no-op when already listening.
    pub fn start_listening(&self) -> Result<(), TransportError> {
        let mut listener = lock(&self.listener);
        if listener.is_some() && self.shared.listening.load(Ordering::SeqCst) {
            return Ok(());
        }
        if let Some(stale) = listener.take() {
            let _ = stale.join();
        }

        let stream = lock(&self.shared.writer)
            .as_ref()
            .ok_or(TransportError::NotConnected)?
            .try_clone()?;
        stream.set_read_timeout(Some(self.shared.config.poll_interval))?;

        self.shared.listening.store(true, Ordering::SeqCst);
        *lock(&self.shared.state) = ClientState::Listening;

        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name("sockidl-client-listener".to_string())
            .spawn(move || listen_loop(shared, stream));
        match handle {
            Ok(handle) => {
                *listener = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.shared.listening.store(false, Ordering::SeqCst);
                *lock(&self.shared.state) = ClientState::Connected;
                Err(e.into())
            }
        }
    }

    /// Stop the background reader and wait for it to exit. The connection stays open.
    pub fn stop_listening(&self) {
        self.shared.listening.store(false, Ordering::SeqCst);
        if let Some(handle) = lock(&self.listener).take() {
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
        let mut state = lock(&self.shared.state);
        if *state == ClientState::Listening {
            *state = ClientState::Connected;
        }
    }

    /// Close the connection, stop listening and drop queued responses.
    pub fn disconnect(&self) {
        self.shared.listening.store(false, Ordering::SeqCst);
        if let Some(stream) = lock(&self.shared.writer).take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
        self.stop_listening();
        self.shared.responses.clear();
        *lock(&self.shared.state) = ClientState::Disconnected;
        tracing::debug!("disconnected");
    }

    /// Send a payload that expects no response.
    pub fn send(&self, payload: &[u8]) -> Result<(), RpcError> {
        let _guard = lock(&self.shared.send_lock);
        self.write(payload)
    }

    /// Send a request and wait for the payload with `response_id`.
    pub fn call(&self, payload: &[u8], response_id: u32) -> Result<Vec<u8>, RpcError> {
        let _guard = lock(&self.shared.send_lock);

        // With the send lock held nothing else is waiting on this id, so anything queued is left over from an
        // earlier call that timed out.
        let stale = self.shared.responses.discard(response_id);
        if stale > 0 {
            tracing::debug!(response_id, stale, "discarded late responses");
        }

        *lock(&self.shared.awaiting) = Some(response_id);
        let result = self.write(payload).and_then(|()| {
            if self.state() != ClientState::Listening {
                tracing::warn!(response_id, "call made while not listening; the response cannot be read");
            }
            let timeout = self.shared.config.call_timeout;
            self.shared
                .responses
                .wait_for(response_id, timeout)
                .ok_or_else(|| RpcError::Timeout {
                    request_id: peek_message_id(payload).unwrap_or_default(),
                    response_id,
                    timeout,
                })
        });
        *lock(&self.shared.awaiting) = None;
        result
    }

    fn write(&self, payload: &[u8]) -> Result<(), RpcError> {
        let mut writer = lock(&self.shared.writer);
        let stream = writer.as_mut().ok_or(RpcError::NotConnected)?;
        write_frame(stream, payload)?;
        Ok(())
    }

    /// Number of responses waiting to be claimed.
    pub fn queued_responses(&self) -> usize {
        self.shared.responses.len()
    }
}

impl Drop for ClientCore {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn connect_with_timeout(addr: impl ToSocketAddrs, timeout: Duration) -> Result<TcpStream, TransportError> {
    let mut last_err = None;
    for addr in addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err
        .map(TransportError::Io)
        .unwrap_or(TransportError::NotConnected))
}

fn listen_loop(shared: Arc<Shared>, stream: TcpStream) {
    let mut reader = FrameReader::new(stream, shared.config.max_frame_len);
    tracing::debug!("listener started");

    while shared.listening.load(Ordering::SeqCst) {
        match reader.read_frame() {
            Ok(None) => continue,
            Ok(Some(payload)) => route(&shared, payload),
            Err(TransportError::Closed) => {
                tracing::info!("server closed the connection");
                break;
            }
            Err(e) => {
                if shared.listening.load(Ordering::SeqCst) {
                    tracing::warn!(error = %e, "listener stopped");
                }
                break;
            }
        }
    }

    shared.listening.store(false, Ordering::SeqCst);
    let mut state = lock(&shared.state);
    if *state == ClientState::Listening {
        *state = ClientState::Connected;
    }
    tracing::debug!("listener exited");
}

fn route(shared: &Shared, payload: Vec<u8>) {
    let id = match peek_message_id(&payload) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "dropping malformed frame");
            return;
        }
    };

    if shared.push_ids.contains(&id) {
        if let Err(e) = (shared.dispatch)(id, &payload) {
            tracing::warn!(id, error = %e, "dropping undecodable push");
        }
    } else if *lock(&shared.awaiting) == Some(id) {
        shared.responses.push(id, payload);
    } else {
        tracing::debug!(id, len = payload.len(), "dropping frame no call is waiting for");
    }
}
