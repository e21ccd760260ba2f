use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};

use block_breeze::adapter::protocol::{create_ack, create_hello};
use block_breeze::adapter::server::{build_observation, run_server, ServerConfig};
use block_breeze::adapter::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
use block_breeze::core::GameSession;

#[tokio::test]
async fn adapter_hello_command_ack_and_observation() {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        protocol_version: "1.0.0".to_string(),
        max_pending_commands: 8,
    };

    let (cmd_tx, mut cmd_rx) = mpsc::channel::<InboundCommand>(8);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await;
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");

    let stream = TcpStream::connect(addr).await.expect("connect failed");
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    // hello
    let hello = create_hello(1, "e2e-test", "1.0.0");
    let hello_line = serde_json::to_string(&hello).unwrap();
    write_half.write_all(hello_line.as_bytes()).await.unwrap();
    write_half.write_all(b"\n").await.unwrap();
    write_half.flush().await.unwrap();

    let welcome_line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await
        .unwrap()
        .unwrap()
        .expect("expected welcome line");
    let welcome_v: serde_json::Value = serde_json::from_str(&welcome_line).unwrap();
    assert_eq!(welcome_v["type"], "welcome");
    assert_eq!(welcome_v["seq"], 1);
    assert_eq!(welcome_v["role"], "controller");

    // The hello requested streaming, so the session loop is asked for an
    // immediate snapshot.
    let first_inbound = tokio::time::timeout(Duration::from_secs(2), cmd_rx.recv())
        .await
        .unwrap()
        .expect("expected snapshot request");
    assert!(matches!(first_inbound.payload, InboundPayload::SnapshotRequest));

    // command
    let cmd_line = r#"{"type":"command","seq":2,"ts":1,"mode":"place","place":{"slot":0,"row":3,"col":4}}"#;
    write_half.write_all(cmd_line.as_bytes()).await.unwrap();
    write_half.write_all(b"\n").await.unwrap();
    write_half.flush().await.unwrap();

    let inbound = tokio::time::timeout(Duration::from_secs(2), cmd_rx.recv())
        .await
        .unwrap()
        .expect("expected inbound command");
    assert_eq!(inbound.seq, 2);
    match inbound.payload {
        InboundPayload::Command(ClientCommand::Place { slot, row, col }) => {
            assert_eq!((slot, row, col), (0, 3, 4));
        }
        other => panic!("unexpected payload {:?}", other),
    }

    // ack after apply
    let ack = create_ack(2, 2);
    out_tx
        .send(OutboundMessage::ToClientAck {
            client_id: inbound.client_id,
            ack,
        })
        .unwrap();

    let ack_line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await
        .unwrap()
        .unwrap()
        .expect("expected ack line");
    let ack_v: serde_json::Value = serde_json::from_str(&ack_line).unwrap();
    assert_eq!(ack_v["type"], "ack");
    assert_eq!(ack_v["command_seq"], 2);
    assert_eq!(ack_v["status"], "ok");

    // broadcast observation reaches the streaming client
    let mut session = GameSession::new(1);
    session.start();
    let obs = build_observation(&session, 10, None);
    out_tx
        .send(OutboundMessage::BroadcastObservation { obs })
        .unwrap();

    let obs_line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await
        .unwrap()
        .unwrap()
        .expect("expected observation line");
    let obs_v: serde_json::Value = serde_json::from_str(&obs_line).unwrap();
    assert_eq!(obs_v["type"], "observation");
    assert_eq!(obs_v["seq"], 10);
    assert_eq!(obs_v["batch"].as_array().unwrap().len(), 3);

    server_handle.abort();
}

#[tokio::test]
async fn adapter_backpressure_returns_error() {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        protocol_version: "1.0.0".to_string(),
        max_pending_commands: 1,
    };

    let (cmd_tx, mut cmd_rx) = mpsc::channel::<InboundCommand>(1);
    let (_out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await;
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .unwrap()
        .unwrap();

    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    // Hand-rolled hello without streaming so no snapshot request occupies
    // the one-slot queue.
    let hello = r#"{"type":"hello","seq":1,"ts":1,"client":{"name":"e2e-test","version":"0"},"protocol_version":"1.0.0","formats":["json"],"requested":{"stream_observations":false,"command_mode":"place"}}"#;
    write_half.write_all(hello.as_bytes()).await.unwrap();
    write_half.write_all(b"\n").await.unwrap();
    write_half.flush().await.unwrap();
    // welcome
    let _ = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await
        .unwrap()
        .unwrap();

    // Send two commands without draining cmd_rx; second should backpressure.
    let cmd1 = r#"{"type":"command","seq":2,"ts":1,"mode":"place","place":{"slot":0,"row":0,"col":0}}"#;
    let cmd2 = r#"{"type":"command","seq":3,"ts":1,"mode":"place","place":{"slot":1,"row":0,"col":0}}"#;
    write_half.write_all(cmd1.as_bytes()).await.unwrap();
    write_half.write_all(b"\n").await.unwrap();
    write_half.write_all(cmd2.as_bytes()).await.unwrap();
    write_half.write_all(b"\n").await.unwrap();
    write_half.flush().await.unwrap();

    // Expect an error for seq=3.
    let mut got_backpressure = false;
    for _ in 0..5 {
        let next = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
            .await
            .unwrap();
        let line = next.unwrap().unwrap();
        let v: serde_json::Value = serde_json::from_str(&line).unwrap();
        if v["type"] == "error" && v["seq"] == 3 && v["code"] == "backpressure" {
            got_backpressure = true;
            break;
        }
    }
    assert!(got_backpressure);

    // The first command made it through untouched.
    let first = tokio::time::timeout(Duration::from_secs(2), cmd_rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.seq, 2);

    server_handle.abort();
}
