use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SheetStubConfig {
    /// Served for `GET /sheet` (any query string).
    pub sheet_csv: String,
    /// Status for `POST /order`.
    pub order_status: u16,
    /// Body for `POST /upload`.
    pub upload_reply: String,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub url: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Stands in for the published sheet, the order form and the upload script.
pub struct SheetStub {
    pub base_url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

#[allow(dead_code)]
impl SheetStub {
    pub fn spawn(config: SheetStubConfig) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start sheet stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let captured = Arc::new(Mutex::new(Vec::new()));
        let captured_in_thread = Arc::clone(&captured);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let mut body = String::new();
                if request.as_reader().read_to_string(&mut body).is_err() {
                    let _ = request.respond(
                        tiny_http::Response::from_string("invalid request body")
                            .with_status_code(400),
                    );
                    continue;
                }

                let url = request.url().to_string();
                let method = request.method().to_string();
                let content_type = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Content-Type"))
                    .map(|h| h.value.to_string());
                captured_in_thread
                    .lock()
                    .expect("lock captured requests")
                    .push(CapturedRequest {
                        method: method.clone(),
                        url: url.clone(),
                        content_type,
                        body,
                    });

                let path = url.split('?').next().unwrap_or(&url);
                let (status, reply) = match (method.as_str(), path) {
                    ("GET", "/sheet") => (200, config.sheet_csv.clone()),
                    ("POST", "/order") => (config.order_status, r#"{"result":"success"}"#.to_owned()),
                    ("POST", "/upload") => (200, config.upload_reply.clone()),
                    _ => (404, "not found".to_owned()),
                };
                let _ = request.respond(tiny_http::Response::from_string(reply).with_status_code(status));
            }
        });

        Self {
            base_url,
            captured,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn requests_to(&self, path: &str) -> Vec<CapturedRequest> {
        self.captured
            .lock()
            .expect("lock captured requests")
            .iter()
            .filter(|req| req.url.split('?').next() == Some(path))
            .cloned()
            .collect()
    }
}

impl Drop for SheetStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
