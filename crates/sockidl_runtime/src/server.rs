//! Server core shared by every generated server.
//!
//! One accept thread plus one worker thread per connection. Workers read whole frames, look the message id up
//! in a [`HandlerTable`] and write back whatever response the handler produces. Broadcasts fan a payload out
//! to every live connection while holding the registry lock, so a connection cannot be added or removed
//! halfway through.
//!
//! ## Notes
//! - Frames with an unknown id are read in full and dropped, keeping the stream aligned.
//! - Handlers run on the worker of the connection that sent the request; [`current_client`] tells them which
//!   one, so a push can exclude the originator.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::config::ServerConfig;
use crate::errors::{TransportError, WireError};
use crate::frame::{FrameReader, write_frame};
use crate::wire::peek_message_id;

/// Server-assigned identifier of one client connection.
pub type ClientId = u64;

/// Decodes a request payload, runs the service method and returns the encoded response, if any.
pub type Handler = Box<dyn Fn(&[u8]) -> Result<Option<Vec<u8>>, WireError> + Send + Sync>;

thread_local! {
    static CURRENT_CLIENT: Cell<Option<ClientId>> = const { Cell::new(None) };
}

/// The client whose request is being handled on this thread, if any.
pub fn current_client() -> Option<ClientId> {
    CURRENT_CLIENT.with(Cell::get)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Connection lifecycle hooks.
pub trait ConnectionEvents: Send + Sync {
    fn client_connected(&self, _client: ClientId) {}
    fn client_disconnected(&self, _client: ClientId) {}
}

/// Hooks that do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoConnectionEvents;

impl ConnectionEvents for NoConnectionEvents {}

// ============================================================================
// Handler table
// ============================================================================

/// Request handlers keyed by request message id.
#[derive(Default)]
pub struct HandlerTable {
    handlers: HashMap<u32, Handler>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `id`, replacing any previous one.
    pub fn insert(&mut self, id: u32, handler: Handler) {
        self.handlers.insert(id, handler);
    }

    pub fn get(&self, id: u32) -> Option<&Handler> {
        self.handlers.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.handlers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.handlers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerTable").field("ids", &self.ids()).finish()
    }
}

// ============================================================================
// Server core
// ============================================================================

struct Connection {
    id: ClientId,
    peer: SocketAddr,
    writer: Mutex<TcpStream>,
}

impl Connection {
    fn send(&self, payload: &[u8]) -> Result<(), TransportError> {
        let mut stream = lock(&self.writer);
        write_frame(&mut *stream, payload)
    }

    fn close(&self) {
        let _ = lock(&self.writer).shutdown(Shutdown::Both);
    }
}

struct Shared {
    config: ServerConfig,
    running: AtomicBool,
    next_client: AtomicU64,
    clients: Mutex<BTreeMap<ClientId, Arc<Connection>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    handlers: HandlerTable,
    events: Arc<dyn ConnectionEvents>,
    stopped: Mutex<bool>,
    stopped_cv: Condvar,
}

struct Running {
    shared: Arc<Shared>,
    local_addr: SocketAddr,
    accept: Option<JoinHandle<()>>,
}

/// Listener, connection registry and dispatch for one generated server.
pub struct ServerCore {
    config: ServerConfig,
    running: Mutex<Option<Running>>,
}

impl ServerCore {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            running: Mutex::new(None),
        }
    }

    /// Bind `addr` and start accepting connections in the background.
    ///
    /// ## Returns
    /// The bound address (useful with port 0).
    ///
    /// ## Errors
    /// - [`TransportError::AlreadyRunning`] if `start` was already called without `stop`.
    /// - [`TransportError::Io`] if binding fails.
    #[tracing::instrument(skip_all)]
    pub fn start(
        &self,
        addr: impl ToSocketAddrs,
        handlers: HandlerTable,
        events: Arc<dyn ConnectionEvents>,
    ) -> Result<SocketAddr, TransportError> {
        let mut running = lock(&self.running);
        if running.is_some() {
            return Err(TransportError::AlreadyRunning);
        }

        // std sets SO_REUSEADDR on Unix listeners.
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;

        let shared = Arc::new(Shared {
            config: self.config.clone(),
            running: AtomicBool::new(true),
            next_client: AtomicU64::new(1),
            clients: Mutex::new(BTreeMap::new()),
            workers: Mutex::new(Vec::new()),
            handlers,
            events,
            stopped: Mutex::new(false),
            stopped_cv: Condvar::new(),
        });

        let accept_shared = Arc::clone(&shared);
        let accept = thread::Builder::new()
            .name("sockidl-accept".to_string())
            .spawn(move || accept_loop(accept_shared, listener))?;

        tracing::info!(%local_addr, "server listening");
        *running = Some(Running {
            shared,
            local_addr,
            accept: Some(accept),
        });
        Ok(local_addr)
    }

    /// Block until [`stop`](Self::stop) has finished on another thread.
    ///
    /// The accept thread stays owned by `stop`, which joins it before closing connections.
    pub fn wait(&self) {
        let Some(shared) = self.shared() else {
            return;
        };
        let mut stopped = lock(&shared.stopped);
        while !*stopped {
            stopped = shared.stopped_cv.wait(stopped).unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn is_running(&self) -> bool {
        lock(&self.running)
            .as_ref()
            .is_some_and(|r| r.shared.running.load(Ordering::SeqCst))
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        lock(&self.running).as_ref().map(|r| r.local_addr)
    }

    /// Number of live connections.
    pub fn client_count(&self) -> usize {
        self.shared().map_or(0, |shared| lock(&shared.clients).len())
    }

    /// Ids of live connections in connection order.
    pub fn clients(&self) -> Vec<ClientId> {
        self.shared()
            .map(|shared| lock(&shared.clients).keys().copied().collect())
            .unwrap_or_default()
    }

    /// Send `payload` to every live connection except `exclude`.
    ///
    /// ## Returns
    /// How many connections the payload was written to. Write failures are logged and skipped; the failing
    /// connection's worker notices the broken socket and deregisters it.
    pub fn broadcast(&self, payload: &[u8], exclude: Option<ClientId>) -> usize {
        let Some(shared) = self.shared() else {
            return 0;
        };
        let clients = lock(&shared.clients);
        let mut delivered = 0;
        for (id, conn) in clients.iter() {
            if Some(*id) == exclude {
                continue;
            }
            match conn.send(payload) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(client = id, peer = %conn.peer, error = %e, "broadcast write failed"),
            }
        }
        delivered
    }

    /// Send `payload` to one connection.
    pub fn send_to(&self, client: ClientId, payload: &[u8]) -> Result<(), TransportError> {
        let conn = self
            .shared()
            .and_then(|shared| lock(&shared.clients).get(&client).cloned())
            .ok_or(TransportError::NotConnected)?;
        conn.send(payload)
    }

    /// Stop accepting, close every connection and join all threads.
    ///
    /// No handler runs after this returns, except one that called `stop` itself.
    pub fn stop(&self) {
        let Some(mut running) = lock(&self.running).take() else {
            return;
        };
        let shared = running.shared;
        shared.running.store(false, Ordering::SeqCst);

        if let Some(accept) = running.accept.take() {
            let _ = accept.join();
        }

        for conn in lock(&shared.clients).values() {
            conn.close();
        }

        let workers: Vec<_> = lock(&shared.workers).drain(..).collect();
        let me = thread::current().id();
        for worker in workers {
            if worker.thread().id() != me {
                let _ = worker.join();
            }
        }
        *lock(&shared.stopped) = true;
        shared.stopped_cv.notify_all();
        tracing::info!(addr = %running.local_addr, "server stopped");
    }

    #[cfg(test)]
    fn retained_workers(&self) -> usize {
        self.shared().map_or(0, |shared| lock(&shared.workers).len())
    }

    fn shared(&self) -> Option<Arc<Shared>> {
        lock(&self.running).as_ref().map(|r| Arc::clone(&r.shared))
    }
}

impl Drop for ServerCore {
    fn drop(&mut self) {
        self.stop();
    }
}

fn accept_loop(shared: Arc<Shared>, listener: TcpListener) {
    while shared.running.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, peer)) => {
                if let Err(e) = register(&shared, stream, peer) {
                    tracing::warn!(%peer, error = %e, "failed to set up connection");
                }
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(shared.config.accept_poll_interval);
            }
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                thread::sleep(shared.config.accept_poll_interval);
            }
        }
    }
    tracing::debug!("accept loop exited");
}

fn register(shared: &Arc<Shared>, stream: TcpStream, peer: SocketAddr) -> Result<(), TransportError> {
    // Some platforms hand out accepted sockets with the listener's non-blocking flag.
    stream.set_nonblocking(false)?;
    stream.set_nodelay(true)?;
    stream.set_read_timeout(Some(shared.config.poll_interval))?;

    let id = shared.next_client.fetch_add(1, Ordering::SeqCst);
    let conn = Arc::new(Connection {
        id,
        peer,
        writer: Mutex::new(stream.try_clone()?),
    });
    lock(&shared.clients).insert(id, Arc::clone(&conn));

    let worker_shared = Arc::clone(shared);
    let spawned = thread::Builder::new()
        .name(format!("sockidl-conn-{id}"))
        .spawn(move || serve_connection(worker_shared, conn, stream));
    match spawned {
        Ok(handle) => {
            let mut workers = lock(&shared.workers);
            reap_finished(&mut workers);
            workers.push(handle);
            Ok(())
        }
        Err(e) => {
            lock(&shared.clients).remove(&id);
            Err(e.into())
        }
    }
}

/// Join and drop handles of workers whose connection has already ended.
fn reap_finished(workers: &mut Vec<JoinHandle<()>>) {
    let (finished, live): (Vec<_>, Vec<_>) = workers.drain(..).partition(|h| h.is_finished());
    *workers = live;
    for handle in finished {
        let _ = handle.join();
    }
}

#[tracing::instrument(skip_all, fields(client = conn.id, peer = %conn.peer))]
fn serve_connection(shared: Arc<Shared>, conn: Arc<Connection>, stream: TcpStream) {
    CURRENT_CLIENT.with(|current| current.set(Some(conn.id)));
    tracing::info!("client connected");
    shared.events.client_connected(conn.id);

    let mut reader = FrameReader::new(stream, shared.config.max_frame_len);
    while shared.running.load(Ordering::SeqCst) {
        match reader.read_frame() {
            Ok(None) => continue,
            Ok(Some(payload)) => dispatch(&shared, &conn, &payload),
            Err(TransportError::Closed) => break,
            Err(e) => {
                if shared.running.load(Ordering::SeqCst) {
                    tracing::warn!(error = %e, "closing connection");
                }
                break;
            }
        }
    }

    lock(&shared.clients).remove(&conn.id);
    conn.close();
    tracing::info!("client disconnected");
    shared.events.client_disconnected(conn.id);
}

fn dispatch(shared: &Shared, conn: &Connection, payload: &[u8]) {
    let id = match peek_message_id(payload) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "dropping malformed frame");
            return;
        }
    };

    let Some(handler) = shared.handlers.get(id) else {
        tracing::debug!(id, len = payload.len(), "no handler for message; drained");
        return;
    };

    match handler(payload) {
        Ok(Some(response)) => {
            if let Err(e) = conn.send(&response) {
                tracing::warn!(id, error = %e, "failed to send response");
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(id, error = %e, "dropping undecodable request"),
    }
}
