// Generated by sockidl v0.1.0-alpha.1 from interface `Calc`. Do not edit.

#![allow(unused_imports, unused_mut, dead_code, unused_variables)]
use std::sync::Arc;
use sockidl_runtime::prelude::*;
/// `AddRequest` (request).
pub const MSG_ADD_REQ: u32 = 1000;
/// `AddResponse` (response).
pub const MSG_ADD_RESP: u32 = 1001;
/// `PingRequest` (request).
pub const MSG_PING_REQ: u32 = 1002;
/// `DivideRequest` (request).
pub const MSG_DIVIDE_REQ: u32 = 1003;
/// `DivideResponse` (response).
pub const MSG_DIVIDE_RESP: u32 = 1004;
/// `OnResultRequest` (request).
pub const MSG_ON_RESULT_REQ: u32 = 1005;
#[derive(Debug, Clone, PartialEq)]
pub struct AddRequest {
    pub a: i32,
    pub b: i32,
}
impl Message for AddRequest {
    const ID: u32 = MSG_ADD_REQ;
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.a.encode(w)?;
        self.b.encode(w)?;
        Ok(())
    }
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            a: Wire::decode(r)?,
            b: Wire::decode(r)?,
        })
    }
}
#[derive(Debug, Clone, PartialEq)]
pub struct AddResponse {
    pub status: i32,
    pub return_value: i32,
}
impl Message for AddResponse {
    const ID: u32 = MSG_ADD_RESP;
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
pub struct PingRequest {
    pub who: String,
}
impl Message for PingRequest {
    const ID: u32 = MSG_PING_REQ;
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.who.encode(w)?;
        Ok(())
    }
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self { who: Wire::decode(r)? })
    }
}
#[derive(Debug, Clone, PartialEq)]
pub struct DivideRequest {
    pub dividend: i32,
    pub divisor: i32,
}
impl Message for DivideRequest {
    const ID: u32 = MSG_DIVIDE_REQ;
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.dividend.encode(w)?;
        self.divisor.encode(w)?;
        Ok(())
    }
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            dividend: Wire::decode(r)?,
            divisor: Wire::decode(r)?,
        })
    }
}
#[derive(Debug, Clone, PartialEq)]
pub struct DivideResponse {
    pub status: i32,
    pub quotient: i32,
    pub remainder: i32,
}
impl Message for DivideResponse {
    const ID: u32 = MSG_DIVIDE_RESP;
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.status.encode(w)?;
        self.quotient.encode(w)?;
        self.remainder.encode(w)?;
        Ok(())
    }
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            status: Wire::decode(r)?,
            quotient: Wire::decode(r)?,
            remainder: Wire::decode(r)?,
        })
    }
}
#[derive(Debug, Clone, PartialEq)]
pub struct OnResultRequest {
    pub value: i32,
}
impl Message for OnResultRequest {
    const ID: u32 = MSG_ON_RESULT_REQ;
    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.value.encode(w)?;
        Ok(())
    }
    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self { value: Wire::decode(r)? })
    }
}
/// Handlers for messages the server pushes to `Calc` clients. Unimplemented handlers log the event.
pub trait CalcEvents: Send + Sync + 'static {
    /// `onResult` pushed by the server.
    fn on_result(&self, value: i32) {
        sockidl_runtime::tracing::info!(id = MSG_ON_RESULT_REQ, "unhandled onResult");
    }
}
/// Events implementation that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingCalcEvents;
impl CalcEvents for LoggingCalcEvents {}
fn dispatch_calc_event(
    events: &dyn CalcEvents,
    id: u32,
    payload: &[u8],
) -> Result<(), WireError> {
    match id {
        MSG_ON_RESULT_REQ => {
            let __message = OnResultRequest::from_payload(payload)?;
            events.on_result(__message.value);
        }
        _ => {}
    }
    Ok(())
}
/// Message ids the server pushes to this client.
pub const CALC_PUSH_IDS: &[u32] = &[MSG_ON_RESULT_REQ];
/// Client for `Calc`.
pub struct CalcClient {
    core: ClientCore,
}
impl CalcClient {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }
    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_events_and_config(LoggingCalcEvents, config)
    }
    pub fn with_events(events: impl CalcEvents) -> Self {
        Self::with_events_and_config(events, ClientConfig::default())
    }
    pub fn with_events_and_config(events: impl CalcEvents, config: ClientConfig) -> Self {
        let __events: Arc<dyn CalcEvents> = Arc::new(events);
        let __dispatch: NotificationDispatch = Arc::new(move |id: u32, payload: &[u8]| dispatch_calc_event(
            &*__events,
            id,
            payload,
        ));
        Self {
            core: ClientCore::new(config, CALC_PUSH_IDS.iter().copied(), __dispatch),
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
    /// Call `add` and wait for `MSG_ADD_RESP`.
    pub fn add(&self, a: i32, b: i32) -> Result<i32, RpcError> {
        let __request = AddRequest { a, b };
        let __payload = self.core.call(&__request.to_payload()?, MSG_ADD_RESP)?;
        let __response = AddResponse::from_payload(&__payload)?;
        Ok(__response.return_value)
    }
    /// Send `ping`; no response is expected.
    pub fn ping(&self, who: String) -> Result<(), RpcError> {
        let __request = PingRequest { who };
        self.core.send(&__request.to_payload()?)?;
        Ok(())
    }
    /// Call `divide` and wait for `MSG_DIVIDE_RESP`.
    pub fn divide(
        &self,
        dividend: i32,
        divisor: i32,
        quotient: &mut i32,
        remainder: &mut i32,
    ) -> Result<bool, RpcError> {
        let __request = DivideRequest { dividend, divisor };
        let __payload = self.core.call(&__request.to_payload()?, MSG_DIVIDE_RESP)?;
        let __response = DivideResponse::from_payload(&__payload)?;
        *quotient = __response.quotient;
        *remainder = __response.remainder;
        Ok(__response.status == STATUS_OK)
    }
}
impl Default for CalcClient {
    fn default() -> Self {
        Self::new()
    }
}
/// Server-side implementation of `Calc`.
pub trait CalcService: Send + Sync + 'static {
    fn add(&self, a: i32, b: i32) -> i32;
    fn ping(&self, who: String);
    fn divide(&self, dividend: i32, divisor: i32, quotient: &mut i32, remainder: &mut i32);
    fn on_client_connected(&self, client: ClientId) {}
    fn on_client_disconnected(&self, client: ClientId) {}
}
/// Handler table routing `Calc` requests to `service`.
pub fn calc_handlers<S: CalcService>(service: Arc<S>) -> HandlerTable {
    let mut __table = HandlerTable::new();
    let __service = Arc::clone(&service);
    __table
        .insert(
            MSG_ADD_REQ,
            Box::new(move |__payload: &[u8]| -> Result<Option<Vec<u8>>, WireError> {
                let __request = AddRequest::from_payload(__payload)?;
                let __result = __service.add(__request.a, __request.b);
                let __response = AddResponse {
                    status: STATUS_OK,
                    return_value: __result,
                };
                Ok(Some(__response.to_payload()?))
            }),
        );
    let __service = Arc::clone(&service);
    __table
        .insert(
            MSG_PING_REQ,
            Box::new(move |__payload: &[u8]| -> Result<Option<Vec<u8>>, WireError> {
                let __request = PingRequest::from_payload(__payload)?;
                __service.ping(__request.who);
                Ok(None)
            }),
        );
    let __service = Arc::clone(&service);
    __table
        .insert(
            MSG_DIVIDE_REQ,
            Box::new(move |__payload: &[u8]| -> Result<Option<Vec<u8>>, WireError> {
                let __request = DivideRequest::from_payload(__payload)?;
                let mut __out_quotient = Default::default();
                let mut __out_remainder = Default::default();
                __service
                    .divide(
                        __request.dividend,
                        __request.divisor,
                        &mut __out_quotient,
                        &mut __out_remainder,
                    );
                let __response = DivideResponse {
                    status: STATUS_OK,
                    quotient: __out_quotient,
                    remainder: __out_remainder,
                };
                Ok(Some(__response.to_payload()?))
            }),
        );
    __table
}
/// Server for `Calc`; dispatches requests to a [`CalcService`].
pub struct CalcServer<S: CalcService> {
    service: Arc<S>,
    core: ServerCore,
}
impl<S: CalcService> CalcServer<S> {
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
            CalcConnectionHooks(Arc::clone(&self.service)),
        );
        self.core.start(addr, calc_handlers(Arc::clone(&self.service)), __events)
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
    /// Push `onResult` to every connected client except `exclude`. Returns how many were sent.
    pub fn push_on_result(
        &self,
        value: i32,
        exclude: Option<ClientId>,
    ) -> Result<usize, WireError> {
        let __message = OnResultRequest { value };
        Ok(self.core.broadcast(&__message.to_payload()?, exclude))
    }
}
struct CalcConnectionHooks<S>(Arc<S>);
impl<S: CalcService> ConnectionEvents for CalcConnectionHooks<S> {
    fn client_connected(&self, client: ClientId) {
        self.0.on_client_connected(client)
    }
    fn client_disconnected(&self, client: ClientId) {
        self.0.on_client_disconnected(client)
    }
}
