use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use folio_drive::gateway::{
    AspectRatio, CredentialStore, GatewayConfig, GatewayError, HttpGateway, ImageEditRequest,
    ImageInput, MediaGateway, MediaHandle, MediaPayload, VideoRequest,
};
use serde_json::json;

/// One request as the local server saw it
#[derive(Debug, Clone)]
struct Seen {
    method: String,
    path: String,
    api_key: Option<String>,
    body: String,
}

/// Local HTTP/1.1 server answering from a routing closure
struct StubServer {
    base_url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl StubServer {
    fn start<F>(route: F) -> Self
    where
        F: Fn(&Seen, &str) -> (u16, Vec<u8>) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
        let base_url = format!("http://{}", listener.local_addr().expect("addr"));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let base_bg = base_url.clone();
        let seen_bg = Arc::clone(&seen);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else {
                    break;
                };
                let Some(request) = read_request(&mut stream) else {
                    continue;
                };
                seen_bg.lock().unwrap().push(request.clone());

                let (status, body) = route(&request, &base_bg);
                let head = format!(
                    "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&body);
                let _ = stream.flush();
            }
        });

        Self { base_url, seen }
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    fn gateway(&self, output_dir: PathBuf) -> HttpGateway {
        let config = GatewayConfig {
            base_url: self.base_url.clone(),
            video_model: "video-model".into(),
            image_model: "image-model".into(),
            poll_interval: Duration::from_millis(5),
            request_timeout: Duration::from_secs(5),
            output_dir,
        };
        HttpGateway::new(config, CredentialStore::new(Some("test-key".into()))).unwrap()
    }
}

fn read_request(stream: &mut TcpStream) -> Option<Seen> {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        raw.extend_from_slice(&buf[..n]);
        if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&raw[..header_end]).into_owned();
    let header = |name: &str| {
        head.lines().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    };
    let content_length = header("content-length")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);
    while raw.len() < header_end + content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
    }

    let mut first = head.lines().next()?.split_whitespace();
    Some(Seen {
        method: first.next()?.to_string(),
        path: first.next()?.to_string(),
        api_key: header("x-goog-api-key"),
        body: String::from_utf8_lossy(&raw[header_end..]).into_owned(),
    })
}

fn json_body(value: serde_json::Value) -> Vec<u8> {
    value.to_string().into_bytes()
}

fn output_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("folio_drive_gateway_{name}"));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn photo() -> ImageInput {
    ImageInput {
        name: "photo.png".into(),
        payload: MediaPayload::new("image/png", vec![1, 2, 3]),
    }
}

fn video_request() -> VideoRequest {
    VideoRequest {
        image: photo(),
        prompt: "slow pan".into(),
        aspect: AspectRatio::Portrait,
    }
}

/// Routes `predictLongRunning` to a fresh operation that reports `finished`
/// after `polls_until_done` status checks.
fn video_route(
    polls_until_done: usize,
    finished: serde_json::Value,
    download: (u16, Vec<u8>),
) -> impl Fn(&Seen, &str) -> (u16, Vec<u8>) + Send + 'static {
    let polls = AtomicUsize::new(0);
    move |request, base| match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/models/video-model:predictLongRunning") => {
            (200, json_body(json!({ "name": "operations/op-1" })))
        }
        ("GET", "/operations/op-1") => {
            if polls.fetch_add(1, Ordering::SeqCst) + 1 < polls_until_done {
                return (200, json_body(json!({ "name": "operations/op-1", "done": false })));
            }
            let mut done = finished.clone();
            done["name"] = json!("operations/op-1");
            done["done"] = json!(true);
            (200, done.to_string().replace("{base}", base).into_bytes())
        }
        ("GET", "/files/clip.mp4") => download.clone(),
        _ => (404, json_body(json!({ "error": { "message": "no route" } }))),
    }
}

fn finished_with_video() -> serde_json::Value {
    json!({
        "response": {
            "generateVideoResponse": {
                "generatedSamples": [{ "video": { "uri": "{base}/files/clip.mp4" } }]
            }
        }
    })
}

#[test]
fn video_polls_until_done_then_saves_the_download() {
    let server = StubServer::start(video_route(
        3,
        finished_with_video(),
        (200, b"fake mp4 bytes".to_vec()),
    ));
    let dir = output_dir("saves");

    let path = match server.gateway(dir.clone()).generate_video(&video_request()) {
        Ok(MediaHandle::Video { path }) => path,
        other => panic!("expected a saved video, got {other:?}"),
    };
    assert!(path.starts_with(&dir));
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("mp4"));
    assert_eq!(fs::read(&path).unwrap(), b"fake mp4 bytes");

    let seen = server.seen();
    let polls = seen
        .iter()
        .filter(|request| request.path == "/operations/op-1")
        .count();
    assert_eq!(polls, 3);
    assert_eq!(seen.last().unwrap().path, "/files/clip.mp4");
    assert!(seen
        .iter()
        .all(|request| request.api_key.as_deref() == Some("test-key")));

    let start: serde_json::Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(start["parameters"]["aspectRatio"], "9:16");
    assert_eq!(start["instances"][0]["prompt"], "slow pan");

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn operation_error_is_reported() {
    let server = StubServer::start(video_route(
        1,
        json!({ "error": { "message": "safety filter" } }),
        (200, Vec::new()),
    ));

    let result = server
        .gateway(output_dir("op_error"))
        .generate_video(&video_request());
    assert!(
        matches!(&result, Err(GatewayError::Operation(message)) if message == "safety filter"),
        "{result:?}"
    );
    assert!(server.seen().iter().all(|request| request.path != "/files/clip.mp4"));
}

#[test]
fn finished_operation_without_a_uri_has_no_video() {
    let server = StubServer::start(video_route(
        2,
        json!({ "response": { "generateVideoResponse": { "generatedSamples": [] } } }),
        (200, Vec::new()),
    ));

    let result = server
        .gateway(output_dir("no_uri"))
        .generate_video(&video_request());
    assert!(matches!(result, Err(GatewayError::MissingVideo)), "{result:?}");
}

#[test]
fn failed_download_keeps_its_status() {
    let server = StubServer::start(video_route(1, finished_with_video(), (404, Vec::new())));
    let dir = output_dir("download_404");

    let result = server.gateway(dir.clone()).generate_video(&video_request());
    assert!(matches!(result, Err(GatewayError::Download(404))), "{result:?}");
    assert!(!dir.exists());
}

#[test]
fn rejected_key_asks_for_a_new_one() {
    let server = StubServer::start(|_, _| {
        (403, json_body(json!({ "error": { "message": "API key not valid" } })))
    });

    let result = server
        .gateway(output_dir("rejected"))
        .generate_video(&video_request());
    let Err(err) = result else {
        panic!("expected a credential error");
    };
    assert!(err.needs_credential(), "{err:?}");
}

#[test]
fn edit_image_decodes_the_first_inline_image() {
    let server = StubServer::start(|request, _| match request.path.as_str() {
        "/models/image-model:generateContent" => (
            200,
            json_body(json!({
                "candidates": [{
                    "content": { "parts": [
                        { "text": "Here you go" },
                        { "inlineData": { "mimeType": "image/png", "data": "AQID" } }
                    ] }
                }]
            })),
        ),
        _ => (404, Vec::new()),
    });

    let request = ImageEditRequest {
        image: photo(),
        prompt: "add a hat".into(),
    };
    let result = server.gateway(output_dir("edit")).edit_image(&request);
    assert_eq!(
        result.unwrap(),
        MediaHandle::Image(MediaPayload::new("image/png", vec![1, 2, 3]))
    );

    let seen = server.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].api_key.as_deref(), Some("test-key"));
    let body: serde_json::Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(body["contents"][0]["parts"][1]["text"], "add a hat");
}

#[test]
fn text_only_reply_has_no_image() {
    let server = StubServer::start(|_, _| {
        (
            200,
            json_body(json!({
                "candidates": [{ "content": { "parts": [{ "text": "I can't edit that." }] } }]
            })),
        )
    });

    let request = ImageEditRequest {
        image: photo(),
        prompt: "add a hat".into(),
    };
    let result = server.gateway(output_dir("text_only")).edit_image(&request);
    assert!(matches!(result, Err(GatewayError::MissingImage)), "{result:?}");
}
