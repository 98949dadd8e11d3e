use super::*;

fn pending_with(id: u64) -> (PendingMap, oneshot::Receiver<Result<Value, CdpError>>) {
    let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
    let (tx, rx) = oneshot::channel();
    pending.lock().insert(id, tx);
    (pending, rx)
}

#[tokio::test]
async fn test_dispatch_routes_result_by_id() {
    let (pending, rx) = pending_with(3);
    let resp: CdpResponse = serde_json::from_str(r#"{"id": 3, "result": {"ok": true}}"#).unwrap();

    CdpClient::dispatch(resp, &pending);

    let value = rx.await.unwrap().unwrap();
    assert_eq!(value["ok"], true);
    assert!(pending.lock().is_empty());
}

#[tokio::test]
async fn test_dispatch_maps_protocol_error() {
    let (pending, rx) = pending_with(4);
    let resp: CdpResponse =
        serde_json::from_str(r#"{"id": 4, "error": {"code": -32000, "message": "No target"}}"#)
            .unwrap();

    CdpClient::dispatch(resp, &pending);

    match rx.await.unwrap() {
        Err(CdpError::Protocol { code, message }) => {
            assert_eq!(code, -32000);
            assert_eq!(message, "No target");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_dispatch_ignores_events_and_unknown_ids() {
    let (pending, _rx) = pending_with(9);

    let event: CdpResponse =
        serde_json::from_str(r#"{"method": "Page.loadEventFired", "params": {}}"#).unwrap();
    CdpClient::dispatch(event, &pending);

    let stray: CdpResponse = serde_json::from_str(r#"{"id": 42, "result": {}}"#).unwrap();
    CdpClient::dispatch(stray, &pending);

    assert!(pending.lock().contains_key(&9));
}

#[tokio::test]
async fn test_connect_to_closed_port_is_unavailable() {
    let err = CdpClient::connect("http://127.0.0.1:1", Duration::from_secs(1))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, CdpError::ChromeNotAvailable(_)));
}

/// A channel to a local socket that reads commands and never answers.
async fn silent_channel(command_timeout: Duration) -> (Channel, WsSource) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while let Some(Ok(_)) = ws.next().await {}
    });

    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{}", addr))
        .await
        .unwrap();
    let (sink, source) = ws.split();
    let channel = Channel {
        ws_tx: tokio::sync::Mutex::new(sink),
        request_id: AtomicU64::new(1),
        pending: Arc::new(Mutex::new(HashMap::new())),
        closed: Arc::new(AtomicBool::new(false)),
        command_timeout,
    };
    (channel, source)
}

#[tokio::test]
async fn test_timed_out_call_releases_its_waiter() {
    let (channel, _source) = silent_channel(Duration::from_millis(50)).await;

    let err = channel.call("Runtime.evaluate", None, None).await.unwrap_err();

    assert!(matches!(err, CdpError::Timeout(_)));
    assert!(channel.pending.lock().is_empty());
}

#[tokio::test]
async fn test_call_within_uses_its_own_limit() {
    let (channel, _source) = silent_channel(Duration::from_secs(60)).await;

    let err = channel
        .call_within("Runtime.evaluate", None, Some("s1"), Duration::from_millis(50))
        .await
        .unwrap_err();

    assert!(matches!(err, CdpError::Timeout(_)));
    assert!(channel.pending.lock().is_empty());
}

#[tokio::test]
async fn test_cancelled_call_releases_its_waiter() {
    let (channel, _source) = silent_channel(Duration::from_secs(60)).await;

    let outcome = tokio::time::timeout(
        Duration::from_millis(50),
        channel.call_unbounded("Runtime.evaluate", None, None),
    )
    .await;

    assert!(outcome.is_err());
    assert!(channel.pending.lock().is_empty());
}
