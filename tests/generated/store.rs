// Generated by sockidl v0.1.0-alpha.1 from interface `Store`. Do not edit.

#![allow(unused_imports, unused_mut, dead_code, unused_variables)]
use std::sync::Arc;
use sockidl_runtime::prelude::*;
/// `SubscribeRequest` (request).
pub const MSG_SUBSCRIBE_REQ: u32 = 1000;
/// `SubscribeResponse` (response).
pub const MSG_SUBSCRIBE_RESP: u32 = 1001;
/// `PutRequest` (request).
pub const MSG_PUT_REQ: u32 = 1002;
/// `PutResponse` (response).
pub const MSG_PUT_RESP: u32 = 1003;
/// `GetRequest` (request).
pub const MSG_GET_REQ: u32 = 1004;
/// `GetResponse` (response).
pub const MSG_GET_RESP: u32 = 1005;
/// `RemoveRequest` (request).
pub const MSG_REMOVE_REQ: u32 = 1006;
/// `RemoveResponse` (response).
pub const MSG_REMOVE_RESP: u32 = 1007;
/// `ChecksumRequest` (request).
pub const MSG_CHECKSUM_REQ: u32 = 1008;
/// `ChecksumResponse` (response).
pub const MSG_CHECKSUM_RESP: u32 = 1009;
/// `WatcherOnStoredNotification` (notification).
pub const MSG_OBSERVER_WATCHER_ON_STORED_REQ: u32 = 1010;
/// `WatcherOnRemovedNotification` (notification).
pub const MSG_OBSERVER_WATCHER_ON_REMOVED_REQ: u32 = 1011;
/// Declared in module 'inventory'. Encoded as its `i32` ordinal.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum Kind {
    #[default]
    TOOL = 0,
    PART = 1,
    KIT = 2,
}
impl Wire for Kind {
    fn encode(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        w.write_i32(*self as i32);
        Ok(())
    }
    fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        match r.read_i32()? {
            0 => Ok(Kind::TOOL),
            1 => Ok(Kind::PART),
            2 => Ok(Kind::KIT),
            value => {
                Err(WireError::InvalidEnum {
                    type_name: "Kind",
                    value,
                })
            }
        }
    }
}
/// Declared in module 'inventory'.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Item {
    pub name: String,
    pub kind: Kind,
    pub counts: Vec<i32>,
}
impl Wire for Item {
    fn encode(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.name.encode(w)?;
        self.kind.encode(w)?;
        self.counts.encode(w)?;
        Ok(())
    }
    fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            name: Wire::decode(r)?,
            kind: Wire::decode(r)?,
            counts: Wire::decode(r)?,
        })
    }
}
#[derive(Debug, Clone, PartialEq)]
pub struct SubscribeRequest {
    pub watcher: InterfaceHandle,
}
impl Message for SubscribeRequest {
    const ID: u32 = MSG_SUBSCRIBE_REQ;
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.watcher.encode(w)?;
        Ok(())
    }
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self { watcher: Wire::decode(r)? })
    }
}
#[derive(Debug, Clone, PartialEq)]
pub struct SubscribeResponse {
    pub status: i32,
    pub return_value: bool,
}
impl Message for SubscribeResponse {
    const ID: u32 = MSG_SUBSCRIBE_RESP;
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.status.encode(w)?;
        self.return_value.encode(w)?;
        Ok(())
    }
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            status: Wire::decode(r)?,
            return_value: Wire::decode(r)?,
        })
    }
}
#[derive(Debug, Clone, PartialEq)]
pub struct PutRequest {
    pub key: String,
    pub item: Item,
}
impl Message for PutRequest {
    const ID: u32 = MSG_PUT_REQ;
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.key.encode(w)?;
        self.item.encode(w)?;
        Ok(())
    }
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            key: Wire::decode(r)?,
            item: Wire::decode(r)?,
        })
    }
}
#[derive(Debug, Clone, PartialEq)]
pub struct PutResponse {
    pub status: i32,
    pub return_value: bool,
}
impl Message for PutResponse {
    const ID: u32 = MSG_PUT_RESP;
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.status.encode(w)?;
        self.return_value.encode(w)?;
        Ok(())
    }
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            status: Wire::decode(r)?,
            return_value: Wire::decode(r)?,
        })
    }
}
#[derive(Debug, Clone, PartialEq)]
pub struct GetRequest {
    pub key: String,
}
impl Message for GetRequest {
    const ID: u32 = MSG_GET_REQ;
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.key.encode(w)?;
        Ok(())
    }
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self { key: Wire::decode(r)? })
    }
}
#[derive(Debug, Clone, PartialEq)]
pub struct GetResponse {
    pub status: i32,
    pub return_value: Item,
}
impl Message for GetResponse {
    const ID: u32 = MSG_GET_RESP;
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.status.encode(w)?;
        self.return_value.encode(w)?;
        Ok(())
    }
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            status: Wire::decode(r)?,
            return_value: Wire::decode(r)?,
        })
    }
}
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveRequest {
    pub key: String,
}
impl Message for RemoveRequest {
    const ID: u32 = MSG_REMOVE_REQ;
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.key.encode(w)?;
        Ok(())
    }
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self { key: Wire::decode(r)? })
    }
}
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveResponse {
    pub status: i32,
    pub remaining: i32,
    pub response_status: i32,
}
impl Message for RemoveResponse {
    const ID: u32 = MSG_REMOVE_RESP;
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.status.encode(w)?;
        self.remaining.encode(w)?;
        self.response_status.encode(w)?;
        Ok(())
    }
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            status: Wire::decode(r)?,
            remaining: Wire::decode(r)?,
            response_status: Wire::decode(r)?,
        })
    }
}
#[derive(Debug, Clone, PartialEq)]
pub struct ChecksumRequest {
    pub digest: [u8; 4],
}
impl Message for ChecksumRequest {
    const ID: u32 = MSG_CHECKSUM_REQ;
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.digest.encode(w)?;
        Ok(())
    }
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self { digest: Wire::decode(r)? })
    }
}
#[derive(Debug, Clone, PartialEq)]
pub struct ChecksumResponse {
    pub status: i32,
    pub return_value: i32,
}
impl Message for ChecksumResponse {
    const ID: u32 = MSG_CHECKSUM_RESP;
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.status.encode(w)?;
        self.return_value.encode(w)?;
        Ok(())
    }
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            status: Wire::decode(r)?,
            return_value: Wire::decode(r)?,
        })
    }
}
#[derive(Debug, Clone, PartialEq)]
pub struct WatcherOnStoredNotification {
    pub key: String,
    pub item: Item,
}
impl Message for WatcherOnStoredNotification {
    const ID: u32 = MSG_OBSERVER_WATCHER_ON_STORED_REQ;
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.key.encode(w)?;
        self.item.encode(w)?;
        Ok(())
    }
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            key: Wire::decode(r)?,
            item: Wire::decode(r)?,
        })
    }
}
#[derive(Debug, Clone, PartialEq)]
pub struct WatcherOnRemovedNotification {
    pub key: String,
}
impl Message for WatcherOnRemovedNotification {
    const ID: u32 = MSG_OBSERVER_WATCHER_ON_REMOVED_REQ;
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.key.encode(w)?;
        Ok(())
    }
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self { key: Wire::decode(r)? })
    }
}
/// Handlers for messages the server pushes to `Store` clients. Unimplemented handlers log the event.
pub trait StoreEvents: Send + Sync + 'static {
    /// `Watcher.onStored` pushed by the server.
    fn watcher_on_stored(&self, key: String, item: Item) {
        sockidl_runtime::tracing::info!(
            id = MSG_OBSERVER_WATCHER_ON_STORED_REQ, "unhandled Watcher.onStored"
        );
    }
    /// `Watcher.onRemoved` pushed by the server.
    fn watcher_on_removed(&self, key: String) {
        sockidl_runtime::tracing::info!(
            id = MSG_OBSERVER_WATCHER_ON_REMOVED_REQ, "unhandled Watcher.onRemoved"
        );
    }
}
/// Events implementation that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingStoreEvents;
impl StoreEvents for LoggingStoreEvents {}
fn dispatch_store_event(
    events: &dyn StoreEvents,
    id: u32,
    payload: &[u8],
) -> Result<(), WireError> {
    match id {
        MSG_OBSERVER_WATCHER_ON_STORED_REQ => {
            let __message = WatcherOnStoredNotification::from_payload(payload)?;
            events.watcher_on_stored(__message.key, __message.item);
        }
        MSG_OBSERVER_WATCHER_ON_REMOVED_REQ => {
            let __message = WatcherOnRemovedNotification::from_payload(payload)?;
            events.watcher_on_removed(__message.key);
        }
        _ => {}
    }
    Ok(())
}
/// Message ids the server pushes to this client.
pub const STORE_PUSH_IDS: &[u32] = &[
    MSG_OBSERVER_WATCHER_ON_STORED_REQ,
    MSG_OBSERVER_WATCHER_ON_REMOVED_REQ,
];
/// Client for `Store`.
pub struct StoreClient {
    core: ClientCore,
}
impl StoreClient {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }
    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_events_and_config(LoggingStoreEvents, config)
    }
    pub fn with_events(events: impl StoreEvents) -> Self {
        Self::with_events_and_config(events, ClientConfig::default())
    }
    pub fn with_events_and_config(events: impl StoreEvents, config: ClientConfig) -> Self {
        let __events: Arc<dyn StoreEvents> = Arc::new(events);
        let __dispatch: NotificationDispatch = Arc::new(move |id: u32, payload: &[u8]| dispatch_store_event(
            &*__events,
            id,
            payload,
        ));
        Self {
            core: ClientCore::new(config, STORE_PUSH_IDS.iter().copied(), __dispatch),
        }
    }
    /// Connect to `host:port`; starts listening unless the config disables it.
    pub fn connect(&self, host: &str, port: u16) -> Result<(), TransportError> {
        self.core.connect((host, port))
    }
    pub fn connect_to(
        &self,
        addr: impl std::net::ToSocketAddrs,
    ) -> Result<(), TransportError> {
        self.core.connect(addr)
    }
    pub fn disconnect(&self) {
        self.core.disconnect()
    }
    pub fn state(&self) -> ClientState {
        self.core.state()
    }
    pub fn is_connected(&self) -> bool {
        self.core.is_connected()
    }
    pub fn start_listening(&self) -> Result<(), TransportError> {
        self.core.start_listening()
    }
    pub fn stop_listening(&self) {
        self.core.stop_listening()
    }
    pub fn core(&self) -> &ClientCore {
        &self.core
    }
    /// Call `subscribe` and wait for `MSG_SUBSCRIBE_RESP`.
    pub fn subscribe(&self, watcher: InterfaceHandle) -> Result<bool, RpcError> {
        let __request = SubscribeRequest { watcher };
        let __payload = self.core.call(&__request.to_payload()?, MSG_SUBSCRIBE_RESP)?;
        let __response = SubscribeResponse::from_payload(&__payload)?;
        Ok(__response.return_value)
    }
    /// Call `put` and wait for `MSG_PUT_RESP`.
    pub fn put(&self, key: String, item: Item) -> Result<bool, RpcError> {
        let __request = PutRequest { key, item };
        let __payload = self.core.call(&__request.to_payload()?, MSG_PUT_RESP)?;
        let __response = PutResponse::from_payload(&__payload)?;
        Ok(__response.return_value)
    }
    /// Call `get` and wait for `MSG_GET_RESP`.
    pub fn get(&self, key: String) -> Result<Item, RpcError> {
        let __request = GetRequest { key };
        let __payload = self.core.call(&__request.to_payload()?, MSG_GET_RESP)?;
        let __response = GetResponse::from_payload(&__payload)?;
        Ok(__response.return_value)
    }
    /// Call `remove` and wait for `MSG_REMOVE_RESP`.
    pub fn remove(
        &self,
        key: String,
        status: &mut i32,
        remaining: &mut i32,
    ) -> Result<bool, RpcError> {
        let __request = RemoveRequest { key };
        let __payload = self.core.call(&__request.to_payload()?, MSG_REMOVE_RESP)?;
        let __response = RemoveResponse::from_payload(&__payload)?;
        *status = __response.status;
        *remaining = __response.remaining;
        Ok(__response.response_status == STATUS_OK)
    }
    /// Call `checksum` and wait for `MSG_CHECKSUM_RESP`.
    pub fn checksum(&self, digest: [u8; 4]) -> Result<i32, RpcError> {
        let __request = ChecksumRequest { digest };
        let __payload = self.core.call(&__request.to_payload()?, MSG_CHECKSUM_RESP)?;
        let __response = ChecksumResponse::from_payload(&__payload)?;
        Ok(__response.return_value)
    }
}
impl Default for StoreClient {
    fn default() -> Self {
        Self::new()
    }
}
/// Server-side implementation of `Store`.
pub trait StoreService: Send + Sync + 'static {
    fn subscribe(&self, watcher: InterfaceHandle) -> bool;
    fn put(&self, key: String, item: Item) -> bool;
    fn get(&self, key: String) -> Item;
    fn remove(&self, key: String, status: &mut i32, remaining: &mut i32);
    fn checksum(&self, digest: [u8; 4]) -> i32;
    fn on_client_connected(&self, client: ClientId) {}
    fn on_client_disconnected(&self, client: ClientId) {}
}
/// Handler table routing `Store` requests to `service`.
pub fn store_handlers<S: StoreService>(service: Arc<S>) -> HandlerTable {
    let mut __table = HandlerTable::new();
    let __service = Arc::clone(&service);
    __table
        .insert(
            MSG_SUBSCRIBE_REQ,
            Box::new(move |__payload: &[u8]| -> Result<Option<Vec<u8>>, WireError> {
                let __request = SubscribeRequest::from_payload(__payload)?;
                let __result = __service.subscribe(__request.watcher);
                let __response = SubscribeResponse {
                    status: STATUS_OK,
                    return_value: __result,
                };
                Ok(Some(__response.to_payload()?))
            }),
        );
    let __service = Arc::clone(&service);
    __table
        .insert(
            MSG_PUT_REQ,
            Box::new(move |__payload: &[u8]| -> Result<Option<Vec<u8>>, WireError> {
                let __request = PutRequest::from_payload(__payload)?;
                let __result = __service.put(__request.key, __request.item);
                let __response = PutResponse {
                    status: STATUS_OK,
                    return_value: __result,
                };
                Ok(Some(__response.to_payload()?))
            }),
        );
    let __service = Arc::clone(&service);
    __table
        .insert(
            MSG_GET_REQ,
            Box::new(move |__payload: &[u8]| -> Result<Option<Vec<u8>>, WireError> {
                let __request = GetRequest::from_payload(__payload)?;
                let __result = __service.get(__request.key);
                let __response = GetResponse {
                    status: STATUS_OK,
                    return_value: __result,
                };
                Ok(Some(__response.to_payload()?))
            }),
        );
    let __service = Arc::clone(&service);
    __table
        .insert(
            MSG_REMOVE_REQ,
            Box::new(move |__payload: &[u8]| -> Result<Option<Vec<u8>>, WireError> {
                let __request = RemoveRequest::from_payload(__payload)?;
                let mut __out_status = Default::default();
                let mut __out_remaining = Default::default();
                __service.remove(__request.key, &mut __out_status, &mut __out_remaining);
                let __response = RemoveResponse {
                    response_status: STATUS_OK,
                    status: __out_status,
                    remaining: __out_remaining,
                };
                Ok(Some(__response.to_payload()?))
            }),
        );
    let __service = Arc::clone(&service);
    __table
        .insert(
            MSG_CHECKSUM_REQ,
            Box::new(move |__payload: &[u8]| -> Result<Option<Vec<u8>>, WireError> {
                let __request = ChecksumRequest::from_payload(__payload)?;
                let __result = __service.checksum(__request.digest);
                let __response = ChecksumResponse {
                    status: STATUS_OK,
                    return_value: __result,
                };
                Ok(Some(__response.to_payload()?))
            }),
        );
    __table
}
/// Server for `Store`; dispatches requests to a [`StoreService`].
pub struct StoreServer<S: StoreService> {
    service: Arc<S>,
    core: ServerCore,
}
impl<S: StoreService> StoreServer<S> {
    pub fn new(service: S) -> Self {
        Self::with_config(service, ServerConfig::default())
    }
    pub fn with_config(service: S, config: ServerConfig) -> Self {
        Self {
            service: Arc::new(service),
            core: ServerCore::new(config),
        }
    }
    pub fn service(&self) -> &S {
        &self.service
    }
    /// Listen on `0.0.0.0:port`. Returns the bound address.
    pub fn start(&self, port: u16) -> Result<std::net::SocketAddr, TransportError> {
        self.start_on(("0.0.0.0", port))
    }
    pub fn start_on(
        &self,
        addr: impl std::net::ToSocketAddrs,
    ) -> Result<std::net::SocketAddr, TransportError> {
        let __events: Arc<dyn ConnectionEvents> = Arc::new(
            StoreConnectionHooks(Arc::clone(&self.service)),
        );
        self.core.start(addr, store_handlers(Arc::clone(&self.service)), __events)
    }
    /// Start and block until [`Self::stop`] is called from another thread.
    pub fn run(&self, port: u16) -> Result<(), TransportError> {
        self.start(port)?;
        self.core.wait();
        Ok(())
    }
    pub fn stop(&self) {
        self.core.stop()
    }
    pub fn is_running(&self) -> bool {
        self.core.is_running()
    }
    pub fn client_count(&self) -> usize {
        self.core.client_count()
    }
    pub fn local_addr(&self) -> Option<std::net::SocketAddr> {
        self.core.local_addr()
    }
    /// Push `Watcher.onStored` to every connected client except `exclude`. Returns how many were sent.
    pub fn notify_watcher_on_stored(
        &self,
        key: String,
        item: Item,
        exclude: Option<ClientId>,
    ) -> Result<usize, WireError> {
        let __message = WatcherOnStoredNotification {
            key,
            item,
        };
        Ok(self.core.broadcast(&__message.to_payload()?, exclude))
    }
    /// Push `Watcher.onRemoved` to every connected client except `exclude`. Returns how many were sent.
    pub fn notify_watcher_on_removed(
        &self,
        key: String,
        exclude: Option<ClientId>,
    ) -> Result<usize, WireError> {
        let __message = WatcherOnRemovedNotification { key };
        Ok(self.core.broadcast(&__message.to_payload()?, exclude))
    }
}
struct StoreConnectionHooks<S>(Arc<S>);
impl<S: StoreService> ConnectionEvents for StoreConnectionHooks<S> {
    fn client_connected(&self, client: ClientId) {
        self.0.on_client_connected(client)
    }
    fn client_disconnected(&self, client: ClientId) {
        self.0.on_client_disconnected(client)
    }
}
