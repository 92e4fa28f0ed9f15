use super::*;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct Ping {
    seq: u32,
    label: String,
}

#[tokio::test]
async fn round_trips_a_value_through_an_in_memory_duplex() {
    let (mut client, mut server) = tokio::io::duplex(4096);

    let sent = Ping { seq: 7, label: "hello".into() };
    write_frame(&mut client, &sent).await.unwrap();

    let received: Ping = read_frame(&mut server).await.unwrap();
    assert_eq!(received, sent);
}

#[tokio::test]
async fn read_frame_on_a_closed_connection_reports_connection_closed() {
    let (client, mut server) = tokio::io::duplex(64);
    drop(client);

    let err = read_frame::<_, Ping>(&mut server).await.unwrap_err();
    assert!(matches!(err, WireError::ConnectionClosed));
}

#[tokio::test]
async fn oversized_length_prefix_is_rejected_without_allocating() {
    let (mut client, mut server) = tokio::io::duplex(64);
    client.write_all(&(MAX_FRAME_BYTES + 1).to_be_bytes()).await.unwrap();
    client.flush().await.unwrap();

    let err = read_frame::<_, Ping>(&mut server).await.unwrap_err();
    assert!(matches!(err, WireError::FrameTooLarge { .. }));
}

#[tokio::test]
async fn multiple_frames_on_one_stream_are_read_in_order() {
    let (mut client, mut server) = tokio::io::duplex(4096);

    for i in 0..3 {
        write_frame(&mut client, &Ping { seq: i, label: format!("msg-{i}") }).await.unwrap();
    }

    for i in 0..3 {
        let received: Ping = read_frame(&mut server).await.unwrap();
        assert_eq!(received.seq, i);
    }
}
