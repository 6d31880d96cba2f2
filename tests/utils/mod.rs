//! Mock OVH API servers for integration tests.
//!
//! `start_mock` serves every request through a swappable handler; the raw
//! TCP helpers cover transport failures hyper would refuse to produce.

#![allow(dead_code, reason = "each test crate uses a subset of helpers")]

use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::{Request, Response, StatusCode, body::Incoming, service::service_fn};
use hyper_util::rt::TokioIo;
use ovh_client_request::ovh::{ApiEndpoint, Credentials, DEFAULT_TIMEOUT, OvhClient};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

/// Shared handler type invoked for each incoming request.
pub type Handler = Arc<Mutex<Box<dyn FnMut(&Request<Incoming>) -> Response<Full<Bytes>> + Send>>>;

/// Handle returned by [`start_mock`] for shutting down the server.
pub struct ShutdownHandle {
    join: JoinHandle<()>,
    stop: oneshot::Sender<()>,
}

impl ShutdownHandle {
    /// Signal the server to stop and await shutdown.
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        let _ = self.join.await;
    }
}

/// Start an HTTP server forwarding requests to a shared handler.
///
/// # Errors
///
/// Returns an error if the server fails to bind to a local port.
#[expect(
    clippy::integer_division_remainder_used,
    reason = "tokio::select! uses % internally"
)]
pub async fn start_mock() -> Result<(SocketAddr, Handler, ShutdownHandle), std::io::Error> {
    let handler: Handler = Arc::new(Mutex::new(Box::new(|_req| {
        Response::builder()
            .status(404)
            .body(Full::from("No handler"))
            .expect("failed to create default response")
    })));
    let handler_clone = handler.clone();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, mut rx) = oneshot::channel();

    let join = tokio::spawn(async move {
        loop {
            tokio::select! {
                res = listener.accept() => match res {
                    Ok((stream, _)) => {
                        let io = TokioIo::new(stream);
                        let h = handler_clone.clone();
                        let service = service_fn(move |req: Request<Incoming>| {
                            let mut f = h.lock().expect("lock handler in service");
                            let resp = (f)(&req);
                            async move { Ok::<_, std::convert::Infallible>(resp) }
                        });
                        tokio::spawn(async move {
                            let _ = http1::Builder::new().serve_connection(io, service).await;
                        });
                    }
                    Err(e) => {
                        eprintln!("accept error: {e}");
                        match e.kind() {
                            ErrorKind::ConnectionAborted
                            | ErrorKind::ConnectionReset
                            | ErrorKind::Interrupted
                            | ErrorKind::WouldBlock => {}
                            _ => break,
                        }
                    }
                },
                _ = &mut rx => break,
            }
        }
    });

    Ok((addr, handler, ShutdownHandle { join, stop: tx }))
}

/// Build a response with an optional `X-Ovh-QueryID` header.
pub fn respond(status: StatusCode, body: &str, query_id: Option<&str>) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8");
    if let Some(id) = query_id {
        builder = builder.header("X-Ovh-QueryID", id);
    }
    builder
        .body(Full::from(body.to_string()))
        .expect("build response")
}

/// Path, raw request target and lower-cased headers of a request seen by
/// the mock.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub path_and_query: String,
    pub headers: HashMap<String, String>,
}

impl Recorded {
    pub fn from_request(req: &Request<Incoming>) -> Self {
        let headers = req
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let uri = req.uri();
        Self {
            path: uri.path().to_string(),
            path_and_query: uri
                .path_and_query()
                .map_or_else(|| uri.path().to_string(), ToString::to_string),
            headers,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Serve `/1.0/auth/time` with `server_time` and `body` for anything else,
/// recording every request.
pub fn install_api(
    handler: &Handler,
    server_time: i64,
    body: &'static str,
) -> Arc<Mutex<Vec<Recorded>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = Arc::clone(&seen);
    *handler.lock().expect("lock handler") = Box::new(move |req: &Request<Incoming>| {
        let recorded = Recorded::from_request(req);
        let is_time = recorded.path == "/1.0/auth/time";
        seen_clone.lock().expect("lock seen").push(recorded);
        if is_time {
            respond(StatusCode::OK, &server_time.to_string(), None)
        } else {
            respond(StatusCode::OK, body, Some("EU.ext-3.test"))
        }
    });
    seen
}

/// Client pointed at the mock, using the `/1.0` API prefix.
pub fn client_for(addr: SocketAddr, credentials: Credentials) -> OvhClient {
    let endpoint = ApiEndpoint::resolve(&format!("http://{addr}/1.0")).expect("resolve endpoint");
    OvhClient::new(endpoint, credentials, DEFAULT_TIMEOUT).expect("create client")
}

async fn read_request_head(stream: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(chunk.get(..n).unwrap_or_default()),
        }
    }
}

/// Answer one request with a body shorter than its `Content-Length`.
pub async fn start_truncating_server() -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let join = tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            read_request_head(&mut stream).await;
            let _ = stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n{\"par")
                .await;
            let _ = stream.shutdown().await;
        }
    });
    (addr, join)
}

/// Accept connections and never answer them.
pub async fn start_stalling_server() -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let join = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    (addr, join)
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    listener.local_addr().expect("local addr")
}
