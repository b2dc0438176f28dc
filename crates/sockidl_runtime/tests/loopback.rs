//! Client/server round trips over a loopback socket, using hand-written messages shaped like generated ones.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use sockidl_runtime::prelude::*;

const MSG_ADD_REQ: u32 = 1000;
const MSG_ADD_RESP: u32 = 1001;
const MSG_PING_REQ: u32 = 1002;
const MSG_CHANGED_REQ: u32 = 1003;
const MSG_SILENT_REQ: u32 = 1004;
const MSG_SILENT_RESP: u32 = 1005;

#[derive(Debug, Clone, PartialEq)]
struct AddRequest {
    a: i32,
    b: i32,
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
struct AddResponse {
    status: i32,
    return_value: i32,
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
struct StringMessage<const MID: u32> {
    text: String,
}

impl<const MID: u32> Message for StringMessage<MID> {
    const ID: u32 = MID;

    fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
        self.text.encode(w)
    }

    fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            text: Wire::decode(r)?,
        })
    }
}

type PingRequest = StringMessage<MSG_PING_REQ>;
type ChangedRequest = StringMessage<MSG_CHANGED_REQ>;

#[derive(Default)]
struct Recorder {
    pings: Mutex<Vec<String>>,
    connected: AtomicUsize,
    disconnected: AtomicUsize,
}

impl ConnectionEvents for Recorder {
    fn client_connected(&self, _client: ClientId) {
        self.connected.fetch_add(1, Ordering::SeqCst);
    }

    fn client_disconnected(&self, _client: ClientId) {
        self.disconnected.fetch_add(1, Ordering::SeqCst);
    }
}

fn fast_server() -> ServerCore {
    ServerCore::new(
        ServerConfig::default()
            .with_poll_interval(Duration::from_millis(50))
            .with_accept_poll_interval(Duration::from_millis(10)),
    )
}

fn fast_client_config() -> ClientConfig {
    ClientConfig::default()
        .with_poll_interval(Duration::from_millis(50))
        .with_call_timeout(Duration::from_secs(5))
}

fn handlers(recorder: Arc<Recorder>) -> HandlerTable {
    let mut table = HandlerTable::new();
    table.insert(
        MSG_ADD_REQ,
        Box::new(|payload: &[u8]| {
            let request = AddRequest::from_payload(payload)?;
            let response = AddResponse {
                status: STATUS_OK,
                return_value: request.a + request.b,
            };
            response.to_payload().map(Some)
        }),
    );
    table.insert(
        MSG_PING_REQ,
        Box::new(move |payload: &[u8]| {
            let request = PingRequest::from_payload(payload)?;
            recorder.pings.lock().unwrap().push(request.text);
            Ok(None)
        }),
    );
    table
}

fn silent_dispatch() -> NotificationDispatch {
    Arc::new(|_: u32, _: &[u8]| Ok(()))
}

fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}

#[test]
fn add_round_trip() {
    let recorder = Arc::new(Recorder::default());
    let server = fast_server();
    let addr = server
        .start("127.0.0.1:0", handlers(Arc::clone(&recorder)), recorder.clone())
        .unwrap();

    let client = ClientCore::new(fast_client_config(), [], silent_dispatch());
    client.connect(addr).unwrap();
    assert_eq!(client.state(), ClientState::Listening);

    let request = AddRequest { a: 2, b: 3 }.to_payload().unwrap();
    let payload = client.call(&request, MSG_ADD_RESP).unwrap();
    let response = AddResponse::from_payload(&payload).unwrap();
    assert_eq!(response.status, STATUS_OK);
    assert_eq!(response.return_value, 5);

    client.disconnect();
    assert_eq!(client.state(), ClientState::Disconnected);
    assert!(wait_until(|| recorder.disconnected.load(Ordering::SeqCst) == 1));
    assert_eq!(recorder.connected.load(Ordering::SeqCst), 1);
    server.stop();
}

#[test]
fn one_way_request_gets_no_response() {
    let recorder = Arc::new(Recorder::default());
    let server = fast_server();
    let addr = server
        .start("127.0.0.1:0", handlers(Arc::clone(&recorder)), recorder.clone())
        .unwrap();

    let client = ClientCore::new(fast_client_config(), [], silent_dispatch());
    client.connect(addr).unwrap();
    client
        .send(&PingRequest { text: "hello".into() }.to_payload().unwrap())
        .unwrap();

    assert!(wait_until(|| recorder.pings.lock().unwrap().len() == 1));
    assert_eq!(recorder.pings.lock().unwrap()[0], "hello");
    thread::sleep(Duration::from_millis(100));
    assert_eq!(client.queued_responses(), 0);
    server.stop();
}

#[test]
fn unknown_message_is_drained_and_connection_survives() {
    let recorder = Arc::new(Recorder::default());
    let server = fast_server();
    let addr = server
        .start("127.0.0.1:0", handlers(Arc::clone(&recorder)), recorder.clone())
        .unwrap();

    let client = ClientCore::new(fast_client_config(), [], silent_dispatch());
    client.connect(addr).unwrap();
    client
        .send(&StringMessage::<4242> { text: "junk".into() }.to_payload().unwrap())
        .unwrap();

    let request = AddRequest { a: 40, b: 2 }.to_payload().unwrap();
    let response = AddResponse::from_payload(&client.call(&request, MSG_ADD_RESP).unwrap()).unwrap();
    assert_eq!(response.return_value, 42);
    server.stop();
}

#[test]
fn call_without_response_times_out() {
    let recorder = Arc::new(Recorder::default());
    let server = fast_server();
    let mut table = handlers(Arc::clone(&recorder));
    table.insert(MSG_SILENT_REQ, Box::new(|_: &[u8]| Ok(None)));
    let addr = server.start("127.0.0.1:0", table, recorder.clone()).unwrap();

    let client = ClientCore::new(
        fast_client_config().with_call_timeout(Duration::from_millis(100)),
        [],
        silent_dispatch(),
    );
    client.connect(addr).unwrap();
    let err = client
        .call(&StringMessage::<MSG_SILENT_REQ> { text: String::new() }.to_payload().unwrap(), MSG_SILENT_RESP)
        .unwrap_err();
    assert!(err.is_timeout(), "{err}");
    server.stop();
}

#[test]
fn broadcast_reaches_everyone_but_the_excluded_client() {
    let recorder = Arc::new(Recorder::default());
    let server = fast_server();
    let addr = server
        .start("127.0.0.1:0", handlers(Arc::clone(&recorder)), recorder.clone())
        .unwrap();

    let received: Vec<Arc<Mutex<Vec<String>>>> = (0..3).map(|_| Arc::default()).collect();
    let clients: Vec<ClientCore> = received
        .iter()
        .map(|sink| {
            let sink = Arc::clone(sink);
            let dispatch: NotificationDispatch = Arc::new(move |id: u32, payload: &[u8]| {
                assert_eq!(id, MSG_CHANGED_REQ);
                sink.lock().unwrap().push(ChangedRequest::from_payload(payload)?.text);
                Ok(())
            });
            let client = ClientCore::new(fast_client_config(), [MSG_CHANGED_REQ], dispatch);
            client.connect(addr).unwrap();
            client
        })
        .collect();

    assert!(wait_until(|| server.client_count() == 3));
    let ids = server.clients();
    let excluded = ids[1];

    let payload = ChangedRequest { text: "k1".into() }.to_payload().unwrap();
    assert_eq!(server.broadcast(&payload, Some(excluded)), 2);

    assert!(wait_until(|| received[0].lock().unwrap().len() == 1));
    assert!(wait_until(|| received[2].lock().unwrap().len() == 1));
    thread::sleep(Duration::from_millis(100));
    assert!(received[1].lock().unwrap().is_empty());
    assert_eq!(received[0].lock().unwrap()[0], "k1");

    for client in &clients {
        client.disconnect();
    }
    assert!(wait_until(|| server.client_count() == 0));
    server.stop();
}

#[test]
fn stop_disconnects_clients() {
    let recorder = Arc::new(Recorder::default());
    let server = fast_server();
    let addr = server
        .start("127.0.0.1:0", handlers(Arc::clone(&recorder)), recorder.clone())
        .unwrap();

    let client = ClientCore::new(fast_client_config(), [], silent_dispatch());
    client.connect(addr).unwrap();
    assert!(wait_until(|| server.client_count() == 1));

    server.stop();
    assert_eq!(recorder.disconnected.load(Ordering::SeqCst), 1);
    assert!(wait_until(|| client.state() == ClientState::Connected));
}
