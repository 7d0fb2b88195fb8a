use prober_common::config::Config;
use prober_common::error::ConfigError;
use prober_common::network::outcome::ProbeOutcome;
use prober_common::network::range::NetworkRange;
use prober_core::generator::AddressGenerator;
use prober_core::network::http::{ProbeError, Prober};
use prober_core::probe_loop::ProbeLoop;
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok";

fn loopback() -> NetworkRange {
    "127.0.0.1/32".parse().unwrap()
}

fn loopback_loop(port: u16, timeout: Duration) -> ProbeLoop {
    let mut cfg: Config = Config::new(loopback());
    cfg.port = port;
    cfg.timeout = timeout;
    ProbeLoop::new(&cfg)
}

async fn read_request_head(stream: &mut TcpStream) {
    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

/// Answers every connection with `response`, then closes it.
async fn serve_forever(response: &'static [u8]) -> u16 {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request_head(&mut stream).await;
                let _ = stream.write_all(response).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    port
}

#[test]
fn malformed_network_is_rejected_before_probing() {
    let err = "not-a-cidr".parse::<NetworkRange>().unwrap_err();
    assert_eq!(err, ConfigError::InvalidCidr("not-a-cidr".to_string()));
}

#[test]
fn default_config_probes_port_80_for_one_second() {
    let cfg: Config = Config::new("10.0.0.0/8".parse().unwrap());
    assert_eq!(cfg.port, 80);
    assert_eq!(cfg.timeout, Duration::from_secs(1));
}

#[test]
fn default_seed_sequence_is_reproducible() {
    let cfg: Config = Config::new("10.0.0.0/8".parse().unwrap());
    let first: Vec<Ipv4Addr> = AddressGenerator::new(cfg.network, cfg.seed).take(50).collect();
    let second: Vec<Ipv4Addr> = AddressGenerator::new(cfg.network, cfg.seed).take(50).collect();
    assert_eq!(first, second);
    assert!(first.iter().all(|addr| cfg.network.contains(*addr)));
}

#[tokio::test]
async fn loop_keeps_running_against_refusing_host() {
    let port = {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let probe_loop = loopback_loop(port, Duration::from_millis(500));
    let shutdown = probe_loop.shutdown_token();

    let handle = tokio::spawn(probe_loop.run());
    tokio::time::sleep(Duration::from_millis(300)).await;
    shutdown.cancel();

    let tally = handle.await.unwrap().expect("refused probes must not be fatal");
    assert!(tally.attempts > 0);
    assert_eq!(tally.success, 0);
    assert_eq!(tally.unreachable + tally.cancelled, tally.attempts);
}

#[tokio::test]
async fn loop_drains_responses_until_shut_down() {
    let port = serve_forever(RESPONSE).await;
    let probe_loop = loopback_loop(port, Duration::from_secs(1));
    let shutdown = probe_loop.shutdown_token();

    let handle = tokio::spawn(probe_loop.run());
    tokio::time::sleep(Duration::from_millis(300)).await;
    shutdown.cancel();

    let tally = handle.await.unwrap().expect("successful probes must not be fatal");
    assert!(tally.success > 0);
    assert_eq!(tally.success + tally.cancelled, tally.attempts);
}

#[tokio::test]
async fn loop_survives_timeouts() {
    // Never accepted, so every request hangs until the deadline.
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let mut probe_loop = loopback_loop(port, Duration::from_millis(100));

    assert_eq!(probe_loop.step().await.unwrap(), ProbeOutcome::Timeout);
    assert_eq!(probe_loop.step().await.unwrap(), ProbeOutcome::Timeout);
    assert_eq!(probe_loop.tally().timeout, 2);
    drop(listener);
}

#[tokio::test]
async fn loop_stops_on_first_unexpected_error() {
    let port = serve_forever(b"").await;
    let probe_loop = loopback_loop(port, Duration::from_secs(1));

    let result = tokio::time::timeout(Duration::from_secs(5), probe_loop.run())
        .await
        .expect("loop should stop by itself");
    let err = result.unwrap_err();
    assert!(matches!(err, ProbeError::Send(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn cancelled_probe_is_benign() {
    let prober = Prober::new(80, Duration::from_secs(1));
    let cancel = tokio_util::sync::CancellationToken::new();
    cancel.cancel();

    let outcome = prober.probe(Ipv4Addr::new(10, 0, 0, 1), &cancel).await.unwrap();
    assert_eq!(outcome, ProbeOutcome::Cancelled);
}
