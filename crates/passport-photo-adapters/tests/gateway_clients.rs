//! Gateway client tests against a scripted local HTTP server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use passport_photo_adapters::azure::{
    AzureContentSafetyClient, AzureFaceClient, AzureVisionClient, HttpClient,
};
use passport_photo_adapters::ClientSettings;
use passport_photo_core::domain::{MaskType, RecognitionQuality};
use passport_photo_core::{ContentModerator, FaceDetector, GatewayError, ImageTagger};

/// A request as seen by the fake server.
#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    target: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Serves one scripted response per connection, in order, then stops.
struct FakeServer {
    endpoint: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    handle: JoinHandle<()>,
}

impl FakeServer {
    fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        let handle = thread::spawn(move || {
            for (status, body) in responses {
                let (stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream);
                let recorded = read_request(&mut reader);
                seen.lock().unwrap().push(recorded);

                let mut stream = reader.into_inner();
                let reply = format!(
                    "HTTP/1.1 {status} Scripted\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(reply.as_bytes()).unwrap();
                stream.flush().unwrap();
            }
        });

        Self {
            endpoint,
            requests,
            handle,
        }
    }

    fn finish(self) -> Vec<Recorded> {
        self.handle.join().unwrap();
        let requests = self.requests.lock().unwrap().clone();
        requests
    }
}

fn read_request(reader: &mut impl BufRead) -> Recorded {
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).unwrap();
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((k, v)) = header.split_once(':') {
            headers.push((k.trim().to_string(), v.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .map_or(0, |(_, v)| v.parse().unwrap());
    let mut body = vec![0; length];
    reader.read_exact(&mut body).unwrap();

    Recorded {
        method,
        target,
        headers,
        body,
    }
}

fn http() -> HttpClient {
    HttpClient::new(ClientSettings {
        timeout: Duration::from_secs(5),
        max_retries: 2,
        retry_backoff: Duration::from_millis(10),
    })
    .unwrap()
}

const FACE_JSON: &str = r#"[{
    "faceRectangle": {"top": 10, "left": 20, "width": 30, "height": 40},
    "faceAttributes": {
        "qualityForRecognition": "medium",
        "exposure": {"exposureLevel": "goodExposure", "value": 0.5},
        "headPose": {"pitch": 0.0, "roll": 1.0, "yaw": -2.0},
        "blur": {"blurLevel": "low", "value": 0.1},
        "mask": {"type": "faceMask", "noseAndMouthCovered": true},
        "occlusion": {"foreheadOccluded": false, "eyeOccluded": false, "mouthOccluded": true}
    }
}]"#;

#[test]
fn test_face_request_and_mapping() {
    let server = FakeServer::start(vec![(200, FACE_JSON)]);
    let client = AzureFaceClient::new(http(), &format!("{}/", server.endpoint), "face-key");

    let faces = client.detect_faces(b"\xff\xd8jpeg").unwrap();
    let requests = server.finish();

    assert_eq!(faces.len(), 1);
    assert_eq!(faces[0].quality, Some(RecognitionQuality::Medium));
    assert_eq!(faces[0].mask, Some(MaskType::FaceMask));

    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(
        request.target,
        "/face/v1.0/detect?detectionModel=detection_03&recognitionModel=recognition_04\
         &returnFaceId=false&returnFaceAttributes=qualityForRecognition,exposure,headPose,\
         occlusion,blur,mask"
    );
    assert_eq!(request.header("Ocp-Apim-Subscription-Key"), Some("face-key"));
    assert_eq!(
        request.header("Content-Type"),
        Some("application/octet-stream")
    );
    assert_eq!(request.body, b"\xff\xd8jpeg");
}

#[test]
fn test_empty_face_list() {
    let server = FakeServer::start(vec![(200, "[]")]);
    let client = AzureFaceClient::new(http(), &server.endpoint, "k");
    assert!(client.detect_faces(b"img").unwrap().is_empty());
    server.finish();
}

#[test]
fn test_client_error_is_not_retried() {
    let server = FakeServer::start(vec![(401, r#"{"error":{"code":"401"}}"#)]);
    let client = AzureFaceClient::new(http(), &server.endpoint, "bad");

    let err = client.detect_faces(b"img").unwrap_err();
    let requests = server.finish();

    assert_eq!(requests.len(), 1);
    match err {
        GatewayError::Status {
            service,
            status,
            body,
        } => {
            assert_eq!(service, "face");
            assert_eq!(status, 401);
            assert!(body.contains("401"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn test_unavailable_is_retried() {
    let server = FakeServer::start(vec![(503, "{}"), (503, "{}"), (200, "[]")]);
    let client = AzureFaceClient::new(http(), &server.endpoint, "k");

    assert!(client.detect_faces(b"img").unwrap().is_empty());
    assert_eq!(server.finish().len(), 3);
}

#[test]
fn test_retries_are_bounded() {
    let server = FakeServer::start(vec![(503, "busy"), (502, "busy"), (500, "down")]);
    let client = AzureFaceClient::new(http(), &server.endpoint, "k");

    let err = client.detect_faces(b"img").unwrap_err();
    assert_eq!(server.finish().len(), 3);
    assert!(matches!(err, GatewayError::Status { status: 500, .. }));
}

#[test]
fn test_malformed_body_is_response_error() {
    let server = FakeServer::start(vec![(200, r#"{"not": "a list"}"#)]);
    let client = AzureFaceClient::new(http(), &server.endpoint, "k");

    let err = client.detect_faces(b"img").unwrap_err();
    server.finish();
    assert!(matches!(err, GatewayError::Response { service: "face", .. }));
}

#[test]
fn test_connection_refused_is_request_error() {
    let endpoint = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };
    let client = AzureVisionClient::new(
        HttpClient::new(ClientSettings {
            timeout: Duration::from_secs(2),
            max_retries: 0,
            retry_backoff: Duration::from_millis(1),
        })
        .unwrap(),
        &endpoint,
        "k",
    );

    let err = client.tag_image(b"img").unwrap_err();
    assert!(matches!(err, GatewayError::Request { service: "vision", .. }));
}

#[test]
fn test_moderation_request_and_mapping() {
    let server = FakeServer::start(vec![(
        200,
        r#"{"categoriesAnalysis": [
            {"category": "Hate", "severity": 2},
            {"category": "SelfHarm", "severity": 0},
            {"category": "Sexual", "severity": 0},
            {"category": "Violence", "severity": 0}
        ]}"#,
    )]);
    let client = AzureContentSafetyClient::new(http(), &server.endpoint, "mod-key");

    let result = client.analyze_image(&[0, 1, 2, 3]).unwrap();
    let requests = server.finish();

    assert_eq!(result.hate, 2);
    assert_eq!(result.violence, 0);

    let request = &requests[0];
    assert_eq!(
        request.target,
        "/contentsafety/image:analyze?api-version=2023-10-01"
    );
    assert_eq!(request.header("Ocp-Apim-Subscription-Key"), Some("mod-key"));
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"image": {"content": STANDARD.encode([0u8, 1, 2, 3])}})
    );
}

#[test]
fn test_moderation_missing_category() {
    let server = FakeServer::start(vec![(
        200,
        r#"{"categoriesAnalysis": [{"category": "Hate", "severity": 0}]}"#,
    )]);
    let client = AzureContentSafetyClient::new(http(), &server.endpoint, "k");

    let err = client.analyze_image(b"img").unwrap_err();
    server.finish();
    assert!(matches!(
        err,
        GatewayError::Response {
            service: "moderation",
            ..
        }
    ));
}

#[test]
fn test_vision_request_and_tags() {
    let server = FakeServer::start(vec![(
        200,
        r#"{"tagsResult": {"values": [
            {"name": "cat", "confidence": 0.95},
            {"name": "animal", "confidence": 0.8}
        ]}}"#,
    )]);
    let client = AzureVisionClient::new(http(), &server.endpoint, "vision-key");

    let tags = client.tag_image(b"img").unwrap();
    let requests = server.finish();

    assert_eq!(
        passport_photo_core::format_tags(&tags),
        vec![
            "Name: cat, Confidence: 0.95",
            "Name: animal, Confidence: 0.8"
        ]
    );
    assert_eq!(
        requests[0].target,
        "/computervision/imageanalysis:analyze?api-version=2023-10-01&features=tags&language=en"
    );
    assert_eq!(
        requests[0].header("Ocp-Apim-Subscription-Key"),
        Some("vision-key")
    );
}
