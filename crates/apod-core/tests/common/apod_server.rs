//! Minimal HTTP/1.1 server for integration tests.
//!
//! Answers every GET through a handler closure that sees the request target
//! and the 0-based hit number. Replies may be delayed to exercise
//! cancellation of in-flight transfers.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub reason: &'static str,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            reason: "OK",
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16, reason: &'static str) -> Self {
        Self {
            status,
            reason,
            body: String::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub struct ApodServer {
    /// Endpoint URL, e.g. "http://127.0.0.1:12345/planetary/apod".
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    last_target: Arc<Mutex<Option<String>>>,
}

impl ApodServer {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Path and query of the most recent request.
    pub fn last_target(&self) -> Option<String> {
        self.last_target.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start<F>(handler: F) -> ApodServer
where
    F: Fn(&str, usize) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let handler = Arc::new(handler);
    let hits = Arc::new(AtomicUsize::new(0));
    let last_target = Arc::new(Mutex::new(None));

    let (h, t) = (Arc::clone(&hits), Arc::clone(&last_target));
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let handler = Arc::clone(&handler);
            let hits = Arc::clone(&h);
            let last_target = Arc::clone(&t);
            thread::spawn(move || {
                let Some(target) = read_target(&stream) else {
                    return;
                };
                let n = hits.fetch_add(1, Ordering::SeqCst);
                *last_target.lock().unwrap() = Some(target.clone());
                let reply = handler(&target, n);
                write_reply(stream, &reply);
            });
        }
    });

    ApodServer {
        base_url: format!("http://127.0.0.1:{}/planetary/apod", port),
        hits,
        last_target,
    }
}

fn read_target(mut stream: &TcpStream) -> Option<String> {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = stream.read(&mut buf).ok().filter(|n| *n > 0)?;
    let request = std::str::from_utf8(&buf[..n]).ok()?;
    let mut parts = request.lines().next()?.split_whitespace();
    let _method = parts.next()?;
    parts.next().map(str::to_string)
}

fn write_reply(mut stream: TcpStream, reply: &Reply) {
    if !reply.delay.is_zero() {
        thread::sleep(reply.delay);
    }
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reply.reason,
        reply.body.len(),
        reply.body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
