use std::sync::{Arc, Mutex};

use bytes::Bytes;
use object_gateway::{new_driver, Driver, ObjectStoreDriver, S3Config, UrlTtl, WriteOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// Signing and URL construction are local, so these tests need no S3 endpoint.
// Static credentials are never sent anywhere.

fn signing_driver() -> ObjectStoreDriver {
    new_driver("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY", "nyc3").unwrap()
}

/// Points at a closed local port with transport retries disabled
fn unreachable_driver() -> ObjectStoreDriver {
    let config = S3Config::new("AKIDEXAMPLE", "secret", "nyc3")
        .with_endpoint("http://127.0.0.1:1")
        .with_allow_http(true)
        .with_max_retries(0);
    ObjectStoreDriver::s3(config).unwrap()
}

#[tokio::test]
async fn read_url_carries_requested_expiry() {
    let driver = signing_driver();

    let url = driver
        .get_read_url("photos", "albums/cat.png", UrlTtl::default())
        .await
        .unwrap();

    assert!(url.starts_with("https://nyc3.digitaloceanspaces.com/photos/albums/cat.png?"));
    assert!(url.contains("X-Amz-Expires=300"));
    assert!(url.contains("X-Amz-Signature="));
}

#[tokio::test]
async fn write_url_differs_from_read_url() {
    let driver = signing_driver();
    let ttl = UrlTtl::from_secs(900);

    let read = driver.get_read_url("photos", "cat.png", ttl).await.unwrap();
    let write = driver.get_write_url("photos", "cat.png", ttl).await.unwrap();

    assert!(write.contains("X-Amz-Expires=900"));
    assert_ne!(read, write);
}

#[tokio::test]
async fn zero_lifetime_is_raised_to_the_floor() {
    let driver = signing_driver();

    let url = driver
        .get_read_url("photos", "cat.png", UrlTtl::from_secs(0))
        .await
        .unwrap();

    assert!(url.contains("X-Amz-Expires=1&") || url.ends_with("X-Amz-Expires=1"));
}

#[tokio::test]
async fn signing_rejects_invalid_coordinates() {
    let driver = signing_driver();

    let err = driver
        .get_write_url("photos", "//", UrlTtl::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), None);
}

#[test]
fn public_url_uses_region_and_provider_domain() {
    let driver = signing_driver();

    assert_eq!(
        driver.build_public_url("photos", "albums/cat.png"),
        "https://nyc3.digitaloceanspaces.com/photos/albums/cat.png"
    );

    let custom = ObjectStoreDriver::s3(
        S3Config::new("key", "secret", "eu-central-1").with_provider_domain("storage.example.com"),
    )
    .unwrap();
    assert_eq!(
        custom.build_public_url("assets", "logo.svg"),
        "https://eu-central-1.storage.example.com/assets/logo.svg"
    );
}

#[test]
fn construction_fails_fast_on_malformed_credentials() {
    assert!(new_driver("", "secret", "nyc3").is_err());
    assert!(new_driver("key", "", "nyc3").is_err());
    assert!(new_driver("key", "secret", "").is_err());

    let driver = new_driver("key", "secret", "nyc3").unwrap();
    assert_eq!(driver.backend(), "s3");
}

#[tokio::test]
async fn unreachable_backend_is_not_accessible() {
    let driver = unreachable_driver();

    assert!(!driver.is_accessible("photos").await);
}

#[tokio::test]
async fn unreachable_backend_raises_driver_errors() {
    let driver = unreachable_driver();

    // A transport failure is not an absence
    let err = driver.get_info("photos", "cat.png").await.unwrap_err();
    assert_eq!(err.code(), None);
    assert!(err.cause().is_some());

    assert!(driver.get_as_bytes("photos", "cat.png").await.is_err());

    let err = driver
        .put_from_bytes(Bytes::from("x"), "photos", "cat.png", WriteOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.message(), "failed to store object");
}

// A local HTTP listener standing in for the provider. It records every
// request and answers each one with a fixed status and an empty body.

#[derive(Debug, Clone)]
struct RecordedRequest {
    line: String,
    headers: Vec<(String, String)>,
}

impl RecordedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header == name)
            .map(|(_, value)| value.as_str())
    }

    /// Header names covered by the SigV4 signature
    fn signed_headers(&self) -> Vec<String> {
        self.header("authorization")
            .and_then(|auth| auth.split("SignedHeaders=").nth(1))
            .and_then(|rest| rest.split(',').next())
            .map(|list| list.split(';').map(str::to_string).collect())
            .unwrap_or_default()
    }
}

struct StubProvider {
    endpoint: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubProvider {
    async fn start(status: u16) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(serve(socket, status, recorded.clone()));
            }
        });

        Self { endpoint, requests }
    }

    fn driver(&self) -> ObjectStoreDriver {
        let config = S3Config::new("AKIDEXAMPLE", "secret", "us-east-1")
            .with_endpoint(self.endpoint.clone())
            .with_allow_http(true)
            .with_max_retries(0);
        ObjectStoreDriver::s3(config).unwrap()
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn serve(mut socket: TcpStream, status: u16, requests: Arc<Mutex<Vec<RecordedRequest>>>) {
    let Some(request) = read_request(&mut socket).await else {
        return;
    };

    let body = if status == 200 && request.header("x-amz-copy-source").is_some() {
        "<CopyObjectResult><ETag>\"5d41402abc4b2a76\"</ETag></CopyObjectResult>"
    } else {
        ""
    };
    requests.lock().unwrap().push(request);

    let reason = match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        _ => "Internal Server Error",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\n\
         ETag: \"5d41402abc4b2a76\"\r\n\
         Last-Modified: Fri, 01 Mar 2024 12:00:00 GMT\r\n\
         Content-Type: text/plain\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let mut lines = head.split("\r\n");
    let line = lines.next()?.to_string();
    let headers = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();
    let request = RecordedRequest { line, headers };

    if request
        .header("expect")
        .is_some_and(|v| v.eq_ignore_ascii_case("100-continue"))
    {
        socket.write_all(b"HTTP/1.1 100 Continue\r\n\r\n").await.ok()?;
    }

    let length: usize = request
        .header("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let mut received = buf.len() - (head_end + 4);
    while received < length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        received += n;
    }

    Some(request)
}

#[tokio::test]
async fn writes_reach_plain_http_endpoints_with_a_signed_acl() {
    let provider = StubProvider::start(200).await;
    let driver = provider.driver();

    driver
        .put_from_bytes(Bytes::from("private"), "photos", "private.txt", WriteOptions::default())
        .await
        .unwrap();
    driver
        .put_from_bytes(
            Bytes::from("public"),
            "photos",
            "public.txt",
            WriteOptions::new().with_content_type("text/plain").public(),
        )
        .await
        .unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);

    assert!(requests[0].line.starts_with("PUT /photos/private.txt"));
    assert_eq!(requests[0].header("x-amz-acl"), Some("private"));

    assert!(requests[1].line.starts_with("PUT /photos/public.txt"));
    assert_eq!(requests[1].header("x-amz-acl"), Some("public-read"));
    assert_eq!(requests[1].header("content-type"), Some("text/plain"));

    for request in &requests {
        assert!(
            request.signed_headers().iter().any(|h| h == "x-amz-acl"),
            "x-amz-acl is not signed: {:?}",
            request.header("authorization")
        );
    }
}

#[tokio::test]
async fn same_container_copy_is_private() {
    let provider = StubProvider::start(200).await;
    let driver = provider.driver();

    driver
        .copy("photos", "albums/cat.png", "photos", "albums/cat-copy.png")
        .await
        .unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].line.starts_with("PUT /photos/albums/cat-copy.png"));
    assert_eq!(
        requests[0].header("x-amz-copy-source"),
        Some("photos/albums/cat.png")
    );
    assert_eq!(requests[0].header("x-amz-acl"), Some("private"));
    assert!(requests[0].signed_headers().iter().any(|h| h == "x-amz-acl"));
}

#[tokio::test]
async fn reserved_characters_in_keys_are_sent_verbatim() {
    let provider = StubProvider::start(200).await;
    let driver = provider.driver();
    let key = "report[1]%.txt";

    driver
        .put_from_bytes(Bytes::from("q1"), "photos", key, WriteOptions::default())
        .await
        .unwrap();
    driver.get_as_bytes("photos", key).await.unwrap();

    let requests = provider.requests();
    assert!(requests[0].line.starts_with("PUT /photos/report%5B1%5D%25.txt"));
    assert!(requests[1].line.starts_with("GET /photos/report%5B1%5D%25.txt "));

    assert_eq!(
        driver.build_public_url("photos", key),
        format!("{}/photos/report%5B1%5D%25.txt", provider.endpoint)
    );
}

#[tokio::test]
async fn object_info_url_follows_the_configured_endpoint() {
    let provider = StubProvider::start(200).await;
    let driver = provider.driver();

    let info = driver.get_info("photos", "cat.png").await.unwrap().unwrap();

    assert_eq!(info.url(), format!("{}/photos/cat.png", provider.endpoint));
    assert_eq!(info.content_type(), "text/plain");
    assert_eq!(info.etag(), "5d41402abc4b2a76");

    let requests = provider.requests();
    assert!(requests[0].line.starts_with("HEAD /photos/cat.png "));
}

#[tokio::test]
async fn not_found_responses_are_absence() {
    let provider = StubProvider::start(404).await;
    let driver = provider.driver();
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("cat.png");

    assert!(driver.get_info("photos", "cat.png").await.unwrap().is_none());
    assert!(driver.get_as_bytes("photos", "cat.png").await.unwrap().is_none());
    assert!(!driver.get_as_local_file("photos", "cat.png", &dest).await.unwrap());
}

#[tokio::test]
async fn backend_status_codes_reach_the_caller() {
    for status in [403u16, 500] {
        let provider = StubProvider::start(status).await;
        let driver = provider.driver();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("cat.png");

        let err = driver.get_info("photos", "cat.png").await.unwrap_err();
        assert_eq!(err.code(), Some(status));

        let err = driver.get_as_bytes("photos", "cat.png").await.unwrap_err();
        assert_eq!(err.code(), Some(status));

        let err = driver
            .get_as_local_file("photos", "cat.png", &dest)
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(status));
        assert!(!dest.exists());

        let err = driver
            .put_from_bytes(Bytes::from("x"), "photos", "cat.png", WriteOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(status));
        assert!(err.cause().is_some());
    }
}
