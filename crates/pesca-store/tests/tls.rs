//! Connection-level checks against a local socket standing in for PostgreSQL.

use std::time::Duration;

use pesca_store::{ProductionSource, ProductionStore, StoreConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Length 8 followed by the SSLRequest code 80877103.
const SSL_REQUEST: [u8; 8] = [0, 0, 0, 8, 0x04, 0xd2, 0x16, 0x2f];

#[tokio::test]
async fn test_required_tls_sends_ssl_request() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 8];
        socket.read_exact(&mut request).await.unwrap();
        // Decline the upgrade.
        socket.write_all(b"N").await.unwrap();
        request
    });

    let config = StoreConfig {
        host: "127.0.0.1".to_string(),
        port,
        require_ssl: true,
        acquire_timeout: Duration::from_secs(5),
        ..Default::default()
    };
    let err = ProductionStore::connect_lazy(&config).ping().await.unwrap_err();

    let request = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(request, SSL_REQUEST);

    let message = err.to_string();
    assert!(!message.contains("without TLS support"), "{}", message);
    assert!(message.contains("does not support TLS"), "{}", message);
}
