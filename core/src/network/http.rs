use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use bytes::Bytes;
use http::header::{HOST, USER_AGENT};
use http::{Method, Request};
use http_body_util::{BodyExt, Empty};
use hyper_util::rt::TokioIo;
use prober_common::config::Config;
use prober_common::network::outcome::{DialFailure, ProbeOutcome};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const CLIENT_AGENT: &str = concat!("http-prober/", env!("CARGO_PKG_VERSION"));

/// A probe failure outside the benign outcome set.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("building request")]
    Request(#[from] http::Error),
    #[error("http handshake failed")]
    Handshake(#[source] hyper::Error),
    #[error("request failed")]
    Send(#[source] hyper::Error),
    #[error("draining response body failed")]
    Body(#[source] hyper::Error),
}

impl ProbeError {
    /// Names the stage and the concrete cause, e.g. `send/incomplete-message`.
    pub fn kind(&self) -> String {
        match self {
            ProbeError::Request(_) => "request/invalid".to_string(),
            ProbeError::Handshake(e) => format!("handshake/{}", hyper_cause(e)),
            ProbeError::Send(e) => format!("send/{}", hyper_cause(e)),
            ProbeError::Body(e) => format!("body/{}", hyper_cause(e)),
        }
    }
}

fn hyper_cause(err: &hyper::Error) -> &'static str {
    if err.is_parse() {
        "parse"
    } else if err.is_incomplete_message() {
        "incomplete-message"
    } else if err.is_canceled() {
        "canceled"
    } else if err.is_closed() {
        "closed"
    } else if err.is_timeout() {
        "timeout"
    } else if err.is_user() {
        "user"
    } else {
        "io"
    }
}

/// Issues a single timed `GET /` per call.
#[derive(Debug, Clone)]
pub struct Prober {
    port: u16,
    timeout: Duration,
}

impl Prober {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.port, cfg.timeout)
    }

    /// Probes `addr`, racing the request against the deadline and `cancel`.
    ///
    /// Dial failures, the deadline and cancellation are benign outcomes; every
    /// other failure is returned as a [`ProbeError`].
    pub async fn probe(
        &self,
        addr: Ipv4Addr,
        cancel: &CancellationToken,
    ) -> Result<ProbeOutcome, ProbeError> {
        info!("{addr}");
        let target = SocketAddr::new(addr.into(), self.port);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Ok(ProbeOutcome::Cancelled),
            res = timeout(self.timeout, fetch(target)) => match res {
                Ok(result) => result,
                Err(_elapsed) => {
                    debug!(%target, "probe deadline elapsed");
                    Ok(ProbeOutcome::Timeout)
                }
            },
        }
    }
}

/// Aborts the connection task when the probe is done with it.
struct ConnectionDriver(JoinHandle<()>);

impl Drop for ConnectionDriver {
    fn drop(&mut self) {
        self.0.abort();
    }
}

async fn fetch(target: SocketAddr) -> Result<ProbeOutcome, ProbeError> {
    let stream = match TcpStream::connect(target).await {
        Ok(s) => s,
        Err(e) => {
            let reason = DialFailure::from_io(&e);
            debug!(%target, error = %e, "dial failed");
            return Ok(ProbeOutcome::Unreachable(reason));
        }
    };

    let io = TokioIo::new(stream);
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
        .await
        .map_err(ProbeError::Handshake)?;

    let _driver = ConnectionDriver(tokio::spawn(async move {
        if let Err(e) = conn.await {
            debug!(error = %e, "connection ended with error");
        }
    }));

    let req = Request::builder()
        .method(Method::GET)
        .uri("/")
        .header(HOST, authority(target))
        .header(USER_AGENT, CLIENT_AGENT)
        .body(Empty::<Bytes>::new())?;

    let resp = sender.send_request(req).await.map_err(ProbeError::Send)?;
    let status = resp.status();

    // The whole body is read so the connection finishes cleanly.
    let mut body = resp.into_body();
    let mut drained: usize = 0;
    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(ProbeError::Body)?;
        if let Some(chunk) = frame.data_ref() {
            drained += chunk.len();
        }
    }

    debug!(%target, %status, bytes = drained, "response drained");
    Ok(ProbeOutcome::Success)
}

fn authority(target: SocketAddr) -> String {
    match target.port() {
        80 => target.ip().to_string(),
        _ => target.to_string(),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
