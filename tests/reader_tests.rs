//! Tests for frame acquisition over the mock serial port.

use tic_rs::constants::{TIC_FRAME_END, TIC_FRAME_MAX, TIC_FRAME_START};
use tic_rs::tic::frame::pack_frame;
use tic_rs::tic::serial_mock::MockSerialPort;
use tic_rs::{FrameReader, TicError};

fn reader(port: &MockSerialPort) -> FrameReader<MockSerialPort> {
    FrameReader::new(port.clone())
}

#[tokio::test]
async fn test_noise_before_start_is_skipped() {
    let port = MockSerialPort::new();
    let mut stream = b"\x7f\r\nPAPP 00".to_vec();
    stream.push(TIC_FRAME_END);
    stream.extend(pack_frame(&[("IINST", "002")]));
    port.queue_rx_data(&stream);

    let frame = reader(&port).read_frame().await.unwrap();
    let tags: Vec<_> = frame.groups().filter_map(|g| g.tag_str()).collect();
    assert_eq!(tags, vec!["IINST"]);
}

#[tokio::test]
async fn test_frame_split_across_reads() {
    let port = MockSerialPort::new();
    let wire = pack_frame(&[("ADCO", "123456789012"), ("PAPP", "00750")]);
    for byte in &wire {
        port.queue_rx_data(&[*byte]);
    }

    let frame = reader(&port).read_frame().await.unwrap();
    assert_eq!(frame.groups().count(), 2);
}

#[tokio::test]
async fn test_start_timeout() {
    let port = MockSerialPort::new();
    port.queue_rx_data(b"no marker here");

    let err = reader(&port).read_frame().await.unwrap_err();
    assert!(matches!(err, TicError::FrameStartTimeout));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_end_timeout() {
    let port = MockSerialPort::new();
    port.queue_rx_data(&[TIC_FRAME_START]);
    port.queue_rx_data(b"\nIINST 002 Y\r");
    port.queue_stall();
    port.queue_rx_data(&pack_frame(&[("PAPP", "00750")]));

    let mut reader = reader(&port);
    let err = reader.read_frame().await.unwrap_err();
    assert!(matches!(err, TicError::FrameEndTimeout));

    // The half frame is gone; the next call starts over
    let frame = reader.read_frame().await.unwrap();
    assert_eq!(frame.groups().next().unwrap().tag, b"PAPP");
}

#[tokio::test]
async fn test_too_long_then_recovers() {
    let port = MockSerialPort::new();
    let mut oversized = vec![TIC_FRAME_START];
    oversized.extend(std::iter::repeat(b'0').take(TIC_FRAME_MAX + 10));
    port.queue_rx_data(&oversized);
    port.queue_rx_data(&pack_frame(&[("ADCO", "123456789012")]));

    let mut reader = reader(&port);
    let err = reader.read_frame().await.unwrap_err();
    assert!(matches!(err, TicError::FrameTooLong { capacity } if capacity == TIC_FRAME_MAX));

    let frame = reader.read_frame().await.unwrap();
    let group = frame.groups().next().unwrap();
    assert_eq!(group.tag, b"ADCO");
    assert_eq!(group.data, b"123456789012");
    assert!(group.is_valid());
}

#[tokio::test]
async fn test_stale_input_is_flushed() {
    let port = MockSerialPort::new();
    port.queue_stale_data(&pack_frame(&[("PAPP", "99999")]));
    port.queue_rx_data(&pack_frame(&[("PAPP", "00750")]));

    let frame = reader(&port).read_frame().await.unwrap();
    assert_eq!(frame.groups().next().unwrap().data, b"00750");
    assert_eq!(port.discard_count(), 1);
}

#[tokio::test]
async fn test_bytes_after_end_do_not_leak() {
    let port = MockSerialPort::new();
    let mut stream = pack_frame(&[("IINST", "002")]);
    // Start of a second frame in the same chunk, cut short
    stream.push(TIC_FRAME_START);
    stream.extend_from_slice(b"\nIINST 0");
    port.queue_rx_data(&stream);
    port.queue_rx_data(&pack_frame(&[("IINST", "003")]));

    let mut reader = reader(&port);
    assert_eq!(reader.read_frame().await.unwrap().groups().next().unwrap().data, b"002");
    assert_eq!(reader.read_frame().await.unwrap().groups().next().unwrap().data, b"003");
    assert_eq!(port.discard_count(), 2);
}

#[tokio::test]
async fn test_device_error_is_fatal() {
    let port = MockSerialPort::new();
    port.set_next_error(std::io::Error::new(std::io::ErrorKind::Other, "gone"));

    let err = reader(&port).read_frame().await.unwrap_err();
    assert!(matches!(err, TicError::SerialPortError(_)));
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn test_recv_frame_helper() {
    let port = MockSerialPort::new();
    port.queue_rx_data(&pack_frame(&[("IINST", "002")]));
    let mut reader = reader(&port);
    let frame = tic_rs::recv_frame(&mut reader).await.unwrap();
    assert_eq!(frame.groups().count(), 1);
}
