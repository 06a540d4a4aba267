//! Tests driving the client's login handling against a scripted relay.
//!
//! The relay here answers every login with a refusal and counts the
//! connections it accepts, so the tests can tell a single fatal exit from
//! a reconnect loop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::{sink::SinkExt, stream::StreamExt};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_util::codec::Framed;

use charla_client::{ClientError, run_client};
use charla_server::infrastructure::framing::FrameCodec;

/// Spawn a relay that refuses every login with the given message and
/// counts the connections it accepts
async fn spawn_rejecting_relay(refusal: &'static str) -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));
    let counter = connections.clone();

    tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let mut framed = Framed::new(stream, FrameCodec::default());
                // read the login attempt, refuse it, hang up
                if framed.next().await.is_some() {
                    let reply = json!({"status": "error", "msg": refusal});
                    let _ = framed.send(reply.to_string()).await;
                }
            });
        }
    });

    (addr, connections)
}

#[tokio::test]
async fn test_login_rejection_is_fatal_and_never_retried() {
    // given: a relay that rejects the login for a reason other than the
    // name being taken
    let (addr, connections) = spawn_rejecting_relay("name exceeds 32 characters").await;

    // when:
    let outcome = timeout(
        Duration::from_secs(2),
        run_client("127.0.0.1".to_string(), addr.port(), "Ana".to_string()),
    )
    .await
    .expect("client kept retrying a hopeless login");

    // then: one attempt, then a fatal error
    let err = outcome.unwrap_err();
    let client_err = err.downcast_ref::<ClientError>().unwrap();
    assert!(matches!(client_err, ClientError::LoginRejected(_)));
    assert_eq!(connections.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_taken_name_is_fatal_and_never_retried() {
    // given: a relay that reports the name as taken
    let (addr, connections) = spawn_rejecting_relay("name in use").await;

    // when:
    let outcome = timeout(
        Duration::from_secs(2),
        run_client("127.0.0.1".to_string(), addr.port(), "Ana".to_string()),
    )
    .await
    .expect("client kept retrying a taken name");

    // then:
    let err = outcome.unwrap_err();
    let client_err = err.downcast_ref::<ClientError>().unwrap();
    assert!(matches!(client_err, ClientError::DuplicateName(_)));
    assert_eq!(connections.load(Ordering::SeqCst), 1);
}
