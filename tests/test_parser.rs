use wireline::http::line_reader::LineReader;
use wireline::http::parser::{ParseError, ParseLimits, parse_request};
use wireline::http::request::{Method, Request};

async fn parse(raw: &[u8]) -> Result<Request, ParseError> {
    let mut reader = LineReader::new(raw);
    parse_request(&mut reader, ParseLimits::default()).await
}

#[tokio::test]
async fn test_parse_simple_get_request() {
    let parsed = parse(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n")
        .await
        .unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.header("Host"), Some("example.com"));
    assert!(parsed.params.is_empty());
}

#[tokio::test]
async fn test_parse_post_request_with_body() {
    let parsed = parse(b"POST /api HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello")
        .await
        .unwrap();

    assert_eq!(parsed.method, Method::POST);
    assert_eq!(parsed.path, "/api");
    assert_eq!(parsed.body, Some(b"hello".to_vec()));
}

#[tokio::test]
async fn test_parse_bare_lf_line_endings() {
    let parsed = parse(b"GET /lf HTTP/1.0\nAccept: */*\n\n").await.unwrap();

    assert_eq!(parsed.path, "/lf");
    assert_eq!(parsed.version, "HTTP/1.0");
    assert_eq!(parsed.header("Accept"), Some("*/*"));
}

#[tokio::test]
async fn test_parse_splits_query_from_path() {
    let parsed = parse(b"GET /search?q=rust&page=2 HTTP/1.1\r\n\r\n")
        .await
        .unwrap();

    assert_eq!(parsed.path, "/search");
    assert_eq!(parsed.query("q"), Some("rust"));
    assert_eq!(parsed.query("page"), Some("2"));
}

#[tokio::test]
async fn test_parse_header_value_keeps_raw_remainder() {
    let parsed = parse(b"GET / HTTP/1.1\r\nX-Thing: a:b\r\n\r\n").await.unwrap();

    assert_eq!(parsed.headers.get("X-Thing").unwrap(), " a:b");
    assert_eq!(parsed.header("X-Thing"), Some("a:b"));
}

#[tokio::test]
async fn test_parse_duplicate_headers_last_wins() {
    let parsed = parse(b"GET / HTTP/1.1\r\nX-A: one\r\nX-A: two\r\n\r\n")
        .await
        .unwrap();

    assert_eq!(parsed.headers.len(), 1);
    assert_eq!(parsed.header("X-A"), Some("two"));
}

#[tokio::test]
async fn test_parse_header_names_are_case_sensitive() {
    let parsed = parse(b"GET / HTTP/1.1\r\ncontent-type: text/html\r\n\r\n")
        .await
        .unwrap();

    assert!(parsed.headers.contains_key("content-type"));
    assert!(!parsed.headers.contains_key("Content-Type"));
}

#[tokio::test]
async fn test_parse_header_without_colon_is_skipped() {
    let parsed = parse(b"GET / HTTP/1.1\r\nBrokenHeader\r\nHost: x\r\n\r\n")
        .await
        .unwrap();

    assert_eq!(parsed.headers.len(), 1);
    assert_eq!(parsed.header("Host"), Some("x"));
}

#[tokio::test]
async fn test_parse_request_line_field_count() {
    for raw in [
        &b"GET /\r\n\r\n"[..],
        &b"GET / HTTP/1.1 extra\r\n\r\n"[..],
        &b"\r\n\r\n"[..],
    ] {
        assert!(matches!(parse(raw).await, Err(ParseError::BadRequestLine)));
    }
}

#[tokio::test]
async fn test_parse_lowercase_method_is_rejected() {
    let result = parse(b"get / HTTP/1.1\r\n\r\n").await;

    assert!(matches!(result, Err(ParseError::BadRequestLine)));
}

#[tokio::test]
async fn test_parse_extension_method() {
    let parsed = parse(b"PURGE /cache HTTP/1.1\r\n\r\n").await.unwrap();

    assert_eq!(parsed.method, Method::Extension("PURGE".to_string()));
    assert_eq!(parsed.method.as_str(), "PURGE");
}

#[tokio::test]
async fn test_parse_without_content_length_has_no_body() {
    let parsed = parse(b"POST /api HTTP/1.1\r\n\r\nignored").await.unwrap();

    assert!(parsed.body.is_none());
    assert!(parsed.body().is_empty());
}

#[tokio::test]
async fn test_parse_zero_content_length_is_empty_body() {
    let parsed = parse(b"POST /api HTTP/1.1\r\nContent-Length: 0\r\n\r\n")
        .await
        .unwrap();

    assert_eq!(parsed.body, Some(Vec::new()));
}

#[tokio::test]
async fn test_parse_binary_body() {
    let parsed = parse(b"POST /upload HTTP/1.1\r\nContent-Length: 4\r\n\r\n\x00\x01\x02\x03")
        .await
        .unwrap();

    assert_eq!(parsed.body(), &[0, 1, 2, 3]);
}

#[tokio::test]
async fn test_parse_invalid_content_length() {
    for value in ["abc", "-1", "1.5", ""] {
        let raw = format!("POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n", value);
        let result = parse(raw.as_bytes()).await;
        assert!(
            matches!(result, Err(ParseError::BadContentLength)),
            "value {:?}",
            value
        );
    }
}

#[tokio::test]
async fn test_parse_body_too_large_is_rejected_before_reading() {
    // Declares far more than is sent; the limit check must fire first.
    let result = parse(b"POST / HTTP/1.1\r\nContent-Length: 99999999999\r\n\r\nab").await;

    assert!(matches!(result, Err(ParseError::BodyTooLarge)));
}

#[tokio::test]
async fn test_parse_body_at_custom_limit() {
    let limits = ParseLimits {
        max_body: 3,
        ..ParseLimits::default()
    };

    let mut ok = LineReader::new(&b"POST / HTTP/1.1\r\nContent-Length: 3\r\n\r\nabc"[..]);
    assert!(parse_request(&mut ok, limits).await.is_ok());

    let mut too_big = LineReader::new(&b"POST / HTTP/1.1\r\nContent-Length: 4\r\n\r\nabcd"[..]);
    assert!(matches!(
        parse_request(&mut too_big, limits).await,
        Err(ParseError::BodyTooLarge)
    ));
}

#[tokio::test]
async fn test_parse_truncated_body_is_io_error() {
    let result = parse(b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello").await;

    assert!(matches!(result, Err(ParseError::Io(_))));
}

#[tokio::test]
async fn test_parse_too_many_headers() {
    let limits = ParseLimits {
        max_headers: 2,
        ..ParseLimits::default()
    };
    let mut reader = LineReader::new(&b"GET / HTTP/1.1\r\nA: 1\r\nB: 2\r\nC: 3\r\n\r\n"[..]);

    assert!(matches!(
        parse_request(&mut reader, limits).await,
        Err(ParseError::HeaderTooLarge)
    ));
}

#[tokio::test]
async fn test_parse_empty_stream_is_end_of_stream() {
    assert!(matches!(parse(b"").await, Err(ParseError::EndOfStream)));
}

#[tokio::test]
async fn test_parse_close_inside_headers_is_unexpected_eof() {
    let result = parse(b"GET / HTTP/1.1\r\nHost: x\r\n").await;

    assert!(matches!(result, Err(ParseError::UnexpectedEof)));
}

#[tokio::test]
async fn test_parse_does_not_read_past_body() {
    let raw = b"POST /a HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcGET /b HTTP/1.1\r\n\r\n";
    let mut reader = LineReader::new(&raw[..]);

    let first = parse_request(&mut reader, ParseLimits::default()).await.unwrap();
    let second = parse_request(&mut reader, ParseLimits::default()).await.unwrap();

    assert_eq!(first.body(), b"abc");
    assert_eq!(second.path, "/b");
}

#[tokio::test]
async fn test_parse_non_utf8_target_is_rejected() {
    let result = parse(b"GET /caf\xe9 HTTP/1.1\r\n\r\n").await;

    assert!(matches!(result, Err(ParseError::InvalidEncoding)));
}

#[tokio::test]
async fn test_parse_non_utf8_header_value_is_rejected() {
    let result = parse(b"GET / HTTP/1.1\r\nX-Name: \xff\xfe\r\n\r\n").await;

    assert!(matches!(result, Err(ParseError::InvalidEncoding)));
}
