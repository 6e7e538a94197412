/*
 * Copyright 2025 Carver Automation Corporation.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Tests for posting documents to the ingestion API.
//!
//! A one-shot listener on 127.0.0.1 stands in for the API.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use asset_inventory::{publish_document, Error, PublishTarget};

struct CapturedRequest {
    request_line: String,
    headers: Vec<String>,
    body: Vec<u8>,
}

fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        request
    });

    (format!("http://{addr}/api/assets/import"), handle)
}

fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut headers = Vec::new();
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end().to_string();
        if line.is_empty() {
            break;
        }
        let lower = line.to_ascii_lowercase();
        if let Some(value) = lower.strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap();
        }
        headers.push(lower);
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).unwrap();

    CapturedRequest {
        request_line: request_line.trim_end().to_string(),
        headers,
        body,
    }
}

fn target(url: String) -> PublishTarget {
    PublishTarget {
        url,
        customer_param: "customer_id".to_string(),
        customer_id: 101,
        timeout: Duration::from_secs(5),
    }
}

#[test]
fn test_publish_posts_json_with_tenant_param() {
    let (url, server) = serve_once("200 OK", "accepted");
    let document = br#"{"ausers":[],"assets":[]}"#;

    let response = publish_document(&target(url), document).unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, "accepted");

    let request = server.join().unwrap();
    assert_eq!(
        request.request_line,
        "POST /api/assets/import?customer_id=101 HTTP/1.1"
    );
    assert!(request
        .headers
        .iter()
        .any(|h| h == "content-type: application/json"));
    assert_eq!(request.body, document.to_vec());
}

#[test]
fn test_publish_accepts_any_2xx() {
    let (url, server) = serve_once("202 Accepted", "queued");

    let response = publish_document(&target(url), b"{}").unwrap();
    assert_eq!(response.status, 202);
    assert_eq!(response.body, "queued");
    server.join().unwrap();
}

#[test]
fn test_publish_reports_api_error() {
    let (url, server) = serve_once("500 Internal Server Error", "boom");

    let result = publish_document(&target(url), b"{}");
    match result {
        Err(Error::IngestApi { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected IngestApi error, got {other:?}"),
    }
    server.join().unwrap();
}

#[test]
fn test_publish_connection_refused() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let result = publish_document(&target(format!("http://{addr}/api")), b"{}");
    assert!(matches!(result, Err(Error::Http(_))));
}

#[test]
fn test_publish_requires_url() {
    let result = publish_document(&target("   ".to_string()), b"{}");
    assert!(matches!(result, Err(Error::PublishUrlRequired)));
}
