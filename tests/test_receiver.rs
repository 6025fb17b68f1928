mod common;

use common::*;
use std::time::Duration;
use tokio::{net::UdpSocket, time::sleep};
use usrp_bridge::{packet, Config, Error, LinkFrame, LinkReceiver, LinkState, PacketType};

fn config() -> Config {
    Config::new("127.0.0.1", 9, 0)
        .bind_host("127.0.0.1")
        .flush_interval(Duration::from_millis(50))
}

#[tokio::test]
async fn audio_frames_are_encoded_in_arrival_order() {
    let encoder = MarkerEncoder::default();
    let (sink, batches) = sink();
    let receiver = LinkReceiver::bind(&config(), encoder.clone(), sink).await.unwrap();
    assert_eq!(receiver.state(), LinkState::Listening);

    let node = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = receiver.local_addr();

    let start = LinkFrame {
        packet_type: PacketType::Text,
        ..Default::default()
    };
    node.send_to(&start.to_bytes(), addr).await.unwrap();

    // Arrival order wins over sequence numbers.
    node.send_to(&audio_frame(3, 1), addr).await.unwrap();
    node.send_to(&audio_frame(1, 2), addr).await.unwrap();
    node.send_to(b"USRP", addr).await.unwrap();
    node.send_to(&audio_frame(2, 3), addr).await.unwrap();
    node.send_to(&packet::encode(4, false, None), addr).await.unwrap();

    let frames = collect_frames(&batches, 3).await;
    assert_eq!(frames, vec![vec![1], vec![2], vec![3]]);

    sleep(Duration::from_millis(150)).await;
    assert_eq!(encoder.calls(), 3);
    assert!(batches.is_empty());
}

#[tokio::test]
async fn idle_ticks_do_nothing() {
    let encoder = MarkerEncoder::default();
    let (sink, batches) = sink();
    let receiver = LinkReceiver::bind(
        &config().flush_interval(Duration::from_millis(20)),
        encoder.clone(),
        sink,
    )
    .await
    .unwrap();

    sleep(Duration::from_millis(200)).await;

    assert_eq!(receiver.state(), LinkState::Listening);
    assert_eq!(encoder.calls(), 0);
    assert!(batches.is_empty());
}

#[tokio::test]
async fn encoder_failure_drops_only_that_batch() {
    let encoder = MarkerEncoder::default();
    let (sink, batches) = sink();
    let receiver = LinkReceiver::bind(&config(), encoder.clone(), sink).await.unwrap();

    let node = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = receiver.local_addr();

    node.send_to(&audio_frame(0, 0xFF), addr).await.unwrap();
    for _ in 0..100 {
        if encoder.calls() > 0 {
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(encoder.calls(), 1);

    node.send_to(&audio_frame(1, 7), addr).await.unwrap();

    let frames = collect_frames(&batches, 1).await;
    assert_eq!(frames, vec![vec![7]]);
    assert_eq!(receiver.state(), LinkState::Listening);
}

#[tokio::test]
async fn disconnect_releases_the_socket() {
    let (sink, _batches) = sink();
    let receiver = LinkReceiver::bind(&config(), MarkerEncoder::default(), sink)
        .await
        .unwrap();
    let addr = receiver.local_addr();

    receiver.disconnect();
    for _ in 0..100 {
        if receiver.state() == LinkState::Closed {
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(receiver.state(), LinkState::Closed);

    // The port is free again.
    UdpSocket::bind(addr).await.unwrap();
}

#[tokio::test]
async fn taken_port_is_a_bind_error() {
    let taken = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = taken.local_addr().unwrap().port();

    let (sink, _batches) = sink();
    let config = Config::new("127.0.0.1", 9, port).bind_host("127.0.0.1");

    match LinkReceiver::bind(&config, MarkerEncoder::default(), sink).await {
        Err(Error::Bind(_)) => {},
        other => panic!("expected a bind error, got {:?}", other.map(|r| r.local_addr())),
    }
}
