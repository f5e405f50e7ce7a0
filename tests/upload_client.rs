use d2h_tools::api::{ImageUploader, UploadClient};
use d2h_tools::error::UploadError;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use tempfile::TempDir;

/// Serve exactly one request with the given status and body. The raw
/// request (headers and body) is sent back over the channel.
fn one_shot_server(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/api/upload-image", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut head = String::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                content_length = v.trim().parse().unwrap();
            }
            let end = line == "\r\n";
            head.push_str(&line);
            if end {
                break;
            }
        }
        let mut payload = vec![0u8; content_length];
        reader.read_exact(&mut payload).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        stream.flush().unwrap();

        tx.send(head + &String::from_utf8_lossy(&payload)).unwrap();
    });

    (url, rx)
}

fn image_file() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pic.png");
    fs::write(&path, b"fake-png-bytes").unwrap();
    (dir, path)
}

#[test]
fn successful_upload_returns_url() {
    let (_dir, path) = image_file();
    let (url, rx) = one_shot_server("200 OK", r#"{"url":"https://cdn/x.png","id":7}"#);
    let client = UploadClient::new(url, "secret-token").unwrap();

    let uploaded = client.upload_image(&path).unwrap();

    assert_eq!(uploaded, "https://cdn/x.png");
    let request = rx.recv().unwrap();
    assert!(request.starts_with("POST /api/upload-image"));
    assert!(request
        .to_ascii_lowercase()
        .contains("authorization: bearer secret-token"));
    assert!(request.contains(r#"name="image"; filename="pic.png""#));
    assert!(request.contains("fake-png-bytes"));
}

#[test]
fn non_200_status_is_a_failure() {
    let (_dir, path) = image_file();
    let (url, _rx) = one_shot_server("401 Unauthorized", r#"{"message":"nope"}"#);
    let client = UploadClient::new(url, "t").unwrap();

    let err = client.upload_image(&path).unwrap_err();

    assert!(matches!(err, UploadError::Status { status: 401, .. }));
}

#[test]
fn other_success_codes_are_failures_too() {
    let (_dir, path) = image_file();
    let (url, _rx) = one_shot_server("201 Created", r#"{"url":"https://cdn/x.png"}"#);
    let client = UploadClient::new(url, "t").unwrap();

    assert!(matches!(
        client.upload_image(&path),
        Err(UploadError::Status { status: 201, .. })
    ));
}

#[test]
fn response_without_url_yields_none() {
    let (_dir, path) = image_file();
    let (url, _rx) = one_shot_server("200 OK", r#"{"path":"/x.png"}"#);
    let client = UploadClient::new(url, "t").unwrap();

    assert_eq!(client.upload(&path), None);
}

#[test]
fn non_json_response_is_a_failure() {
    let (_dir, path) = image_file();
    let (url, _rx) = one_shot_server("200 OK", "<html>oops</html>");
    let client = UploadClient::new(url, "t").unwrap();

    assert!(matches!(client.upload_image(&path), Err(UploadError::Json(_))));
}
