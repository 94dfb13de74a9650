//! Shared helpers for CLI integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::thread;

use assert_cmd::Command;

/// Every credential variable the binary reads.
pub const CREDENTIAL_VARS: [&str; 6] = [
    "AZURE_FACES_API_ENDPOINT",
    "AZURE_FACES_API_KEY",
    "AZURE_MODERATION_API_ENDPOINT",
    "AZURE_MODERATION_API_KEY",
    "AZURE_VISION_API_ENDPOINT",
    "AZURE_VISION_API_KEY",
];

/// The binary, isolated from the caller's environment and config files.
/// Runs in `dir`, which also serves as the XDG config home.
#[allow(deprecated)] // cargo_bin deprecation
pub fn passport_photo(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("passport-photo").unwrap();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env_remove("RUST_LOG");
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Points all three services at `endpoint`.
pub fn with_credentials<'a>(cmd: &'a mut Command, endpoint: &str) -> &'a mut Command {
    cmd.env("AZURE_FACES_API_ENDPOINT", endpoint)
        .env("AZURE_FACES_API_KEY", "test-face-key")
        .env("AZURE_MODERATION_API_ENDPOINT", endpoint)
        .env("AZURE_MODERATION_API_KEY", "test-moderation-key")
        .env("AZURE_VISION_API_ENDPOINT", endpoint)
        .env("AZURE_VISION_API_KEY", "test-vision-key")
}

/// Face centered in a 100x100 photo with every attribute acceptable.
pub const PASSING_FACE: &str = r#"[{
    "faceRectangle": {"top": 30, "left": 30, "width": 40, "height": 40},
    "faceAttributes": {
        "qualityForRecognition": "high",
        "exposure": {"exposureLevel": "goodExposure", "value": 0.5},
        "headPose": {"pitch": 0.0, "roll": 0.0, "yaw": 0.0},
        "blur": {"blurLevel": "low", "value": 0.0},
        "mask": {"type": "noMask", "noseAndMouthCovered": false},
        "occlusion": {"foreheadOccluded": false, "eyeOccluded": false, "mouthOccluded": false}
    }
}]"#;

/// All four categories at severity 0.
pub const CLEAN_MODERATION: &str = r#"{"categoriesAnalysis": [
    {"category": "Hate", "severity": 0},
    {"category": "SelfHarm", "severity": 0},
    {"category": "Sexual", "severity": 0},
    {"category": "Violence", "severity": 0}
]}"#;

/// A single `person` tag.
pub const PERSON_TAGS: &str =
    r#"{"tagsResult": {"values": [{"name": "person", "confidence": 0.99}]}}"#;

/// Scripted replies for the three services, as (status, body).
#[derive(Clone, Copy)]
pub struct Replies {
    pub face: (u16, &'static str),
    pub moderation: (u16, &'static str),
    pub vision: (u16, &'static str),
}

impl Default for Replies {
    fn default() -> Self {
        Self {
            face: (200, PASSING_FACE),
            moderation: (200, CLEAN_MODERATION),
            vision: (200, PERSON_TAGS),
        }
    }
}

/// Answers every connection by request path until the test process exits.
/// Returns the endpoint base URL.
pub fn fake_azure(replies: Replies) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            respond(stream, replies);
        }
    });

    endpoint
}

fn respond(stream: TcpStream, replies: Replies) {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    if reader.read_line(&mut line).is_err() {
        return;
    }
    let target = line.split_whitespace().nth(1).unwrap_or_default().to_string();

    let mut length = 0;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).is_err() {
            return;
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((k, v)) = header.split_once(':') {
            if k.eq_ignore_ascii_case("content-length") {
                length = v.trim().parse().unwrap_or(0);
            }
        }
    }
    let mut body = vec![0; length];
    if reader.read_exact(&mut body).is_err() {
        return;
    }

    let (status, reply) = if target.starts_with("/face/") {
        replies.face
    } else if target.starts_with("/contentsafety/") {
        replies.moderation
    } else if target.starts_with("/computervision/") {
        replies.vision
    } else {
        (404, "{}")
    };

    let mut stream = reader.into_inner();
    let response = format!(
        "HTTP/1.1 {status} Scripted\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{reply}",
        reply.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
