//! Drives the server over a real socket: contact endpoint, static site and
//! the client form component talking to it.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::LocalSet;

use dci_site::config::{AppState, Config};
use dci_site::contact::form::{ContactForm, Field, FormFields, FormStatus, HttpTransport};
use dci_site::contact::{Delivery, MailError, Mailer, OutboundEmail};
use dci_site::server::{self, ShutdownSignal};

/// Accepts every email unless `reject_with` is set
#[derive(Default)]
struct StubMailer {
    sent: Mutex<Vec<OutboundEmail>>,
    reject_with: Option<u16>,
}

#[async_trait]
impl Mailer for StubMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<Delivery, MailError> {
        if let Some(status) = self.reject_with {
            return Err(MailError::Rejected {
                status,
                message: Some("domain is not verified".to_string()),
            });
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(Delivery {
            id: Some("msg_1".to_string()),
        })
    }
}

struct TestServer {
    addr: SocketAddr,
    shutdown: Arc<ShutdownSignal>,
    _site: tempfile::TempDir,
}

impl TestServer {
    fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Bind an ephemeral port and spawn the accept loop on the current `LocalSet`
fn start(mailer: Arc<StubMailer>) -> TestServer {
    let site = tempfile::tempdir().unwrap();
    std::fs::write(site.path().join("index.html"), "<h1>DC Infrastructures</h1>").unwrap();

    let mut config = Config::load_from("does-not-exist").unwrap();
    config.logging.access_log = false;
    config.site.root = site.path().to_str().unwrap().to_string();

    let listener = server::create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
    let addr = listener.local_addr().unwrap();

    let state = Arc::new(AppState::new(config, mailer));
    let shutdown = Arc::new(ShutdownSignal::new());
    tokio::task::spawn_local(server::start_server_loop(
        listener,
        state,
        Arc::clone(&shutdown),
    ));

    TestServer {
        addr,
        shutdown,
        _site: site,
    }
}

#[tokio::test]
async fn test_form_lifecycle_against_running_server() {
    LocalSet::new()
        .run_until(async {
            let mailer = Arc::new(StubMailer::default());
            let server = start(Arc::clone(&mailer));

            let transport = HttpTransport::new(&server.base_url(), "/api/contact");
            let mut form = ContactForm::new(transport).with_reset_delay(Duration::from_millis(50));
            form.set_field(Field::Name, "Jane <Ops>");
            form.set_field(Field::Email, "jane@example.com");
            form.set_field(Field::Message, "Need a\nrack quote");
            assert!(form.set_input("company", "Acme Racks"));

            assert_eq!(form.submit().await, FormStatus::Success);
            assert_eq!(form.fields(), &FormFields::default());

            tokio::time::sleep(Duration::from_millis(200)).await;
            assert_eq!(form.status(), FormStatus::Idle);

            let sent = mailer.sent.lock().unwrap().clone();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].subject, "New Contact Form Submission from Jane <Ops>");
            assert!(sent[0].html.contains("Jane &lt;Ops&gt;"));
            assert!(sent[0].html.contains("Need a<br>rack quote"));
            assert!(sent[0].html.contains("Acme Racks"));

            server.shutdown.trigger();
        })
        .await;
}

#[tokio::test]
async fn test_validation_errors_over_the_wire() {
    LocalSet::new()
        .run_until(async {
            let mailer = Arc::new(StubMailer::default());
            let server = start(Arc::clone(&mailer));
            let client = reqwest::Client::new();
            let url = format!("{}/api/contact", server.base_url());

            let resp = client
                .post(&url)
                .json(&serde_json::json!({"name": "Jane", "email": "", "message": "Hi"}))
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status().as_u16(), 400);
            let body: serde_json::Value = resp.json().await.unwrap();
            assert_eq!(body, serde_json::json!({"error": "Missing required fields"}));

            let resp = client
                .post(&url)
                .json(&serde_json::json!({"name": "Jane", "email": "jane@", "message": "Hi"}))
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status().as_u16(), 400);
            let body: serde_json::Value = resp.json().await.unwrap();
            assert_eq!(body, serde_json::json!({"error": "Invalid email format"}));

            let resp = client
                .post(&url)
                .header("content-type", "application/json")
                .body("not json")
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status().as_u16(), 500);

            assert!(mailer.sent.lock().unwrap().is_empty());
            server.shutdown.trigger();
        })
        .await;
}

#[tokio::test]
async fn test_provider_rejection_surfaces_details() {
    LocalSet::new()
        .run_until(async {
            let mailer = Arc::new(StubMailer {
                reject_with: Some(403),
                ..StubMailer::default()
            });
            let server = start(mailer);

            let resp = reqwest::Client::new()
                .post(format!("{}/api/contact", server.base_url()))
                .json(&serde_json::json!({
                    "name": "Jane",
                    "email": "jane@example.com",
                    "company": "Acme",
                    "message": "Hi"
                }))
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status().as_u16(), 500);
            let body: serde_json::Value = resp.json().await.unwrap();
            assert_eq!(body["error"], "Failed to send email");
            assert_eq!(body["details"], "domain is not verified");

            server.shutdown.trigger();
        })
        .await;
}

#[tokio::test]
async fn test_static_site_and_method_guard() {
    LocalSet::new()
        .run_until(async {
            let server = start(Arc::new(StubMailer::default()));
            let client = reqwest::Client::new();

            let resp = client.get(server.base_url()).send().await.unwrap();
            assert_eq!(resp.status().as_u16(), 200);
            assert_eq!(resp.headers()["server"], "dci-site");
            let etag = resp.headers()["etag"].clone();
            assert_eq!(resp.text().await.unwrap(), "<h1>DC Infrastructures</h1>");

            let resp = client
                .get(server.base_url())
                .header("if-none-match", etag)
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status().as_u16(), 304);

            let resp = client
                .get(format!("{}/api/contact", server.base_url()))
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status().as_u16(), 405);
            assert_eq!(resp.headers()["allow"], "POST, OPTIONS");

            server.shutdown.trigger();
        })
        .await;
}
