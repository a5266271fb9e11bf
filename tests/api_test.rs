//! End-to-end tests over raw TCP.

use vts::config::TableConfig;

mod common;
use common::{get, post, send_bytes, send_raw, start_server, table_file};

#[tokio::test]
async fn favicon_is_empty_ok() {
    let server = start_server(vec![]).await;
    let reply = get(server.addr, "/favicon.ico").await;
    assert_eq!(reply.status, 200);
    assert!(reply.head.contains("Content-Length: 0"));
    assert!(reply.body.is_empty());
}

#[tokio::test]
async fn responses_carry_fixed_headers() {
    let server = start_server(vec![]).await;
    let reply = get(server.addr, "/").await;
    assert!(reply.head.starts_with("HTTP/1.1 200 OK"));
    assert!(reply.head.contains(concat!("Server: vts/", env!("CARGO_PKG_VERSION"))));
    assert!(reply.head.contains("Content-Type: text/html; charset=UTF-8"));
    assert!(reply.head.contains("Connection: close"));
    assert!(reply.head.contains(&format!("Content-Length: {}", reply.body.len())));
}

#[tokio::test]
async fn unknown_page_lists_modules() {
    let server = start_server(vec![]).await;
    let reply = get(server.addr, "/nowhere").await;
    assert_eq!(reply.status, 200);
    assert!(reply.body.starts_with("Page not found<br/><br/>Available pages:<br/>"));
    assert!(reply.body.contains("<a href='vts'>vts</a>"));
}

#[tokio::test]
async fn unsupported_method_gets_no_response() {
    let server = start_server(vec![]).await;
    let reply = send_raw(server.addr, "PATCH /vts HTTP/1.1\r\n\r\n").await;
    assert_eq!(reply.status, 0);
    assert!(reply.body.is_empty());

    let reply = send_raw(server.addr, "get /vts HTTP/1.1\r\n\r\n").await;
    assert_eq!(reply.status, 0);

    // The server keeps serving afterwards.
    assert_eq!(get(server.addr, "/vts").await.status, 200);
}

#[tokio::test]
async fn non_utf8_header_is_still_answered() {
    let server = start_server(vec![]).await;
    let reply = send_bytes(server.addr, b"GET /vts HTTP/1.1\r\nX-Name: caf\xe9\r\n\r\n").await;
    assert_eq!(reply.status, 200);
    assert!(reply.body.starts_with("The module has two modes"));
}

#[tokio::test]
async fn create_push_and_read_back() {
    let server = start_server(vec![]).await;
    let addr = server.addr;

    assert_eq!(get(addr, "/vts/manager?cmd=create&table=T").await.body, "OK");
    let pushed = post(addr, "/vts/table/t?cmd=push", "a;b;c").await;
    assert_eq!((pushed.status, pushed.body.as_str()), (200, "OK"));

    assert_eq!(get(addr, "/vts/table/t?row=0").await.body, "a;b;c");
    assert_eq!(get(addr, "/VTS/Table/T?ROW=0&COL=1").await.body, "b");
    assert_eq!(get(addr, "/vts/table/t?row=0&delimiter=|").await.body, "a|b|c");

    let popped = get(addr, "/vts/table/t?cmd=pop").await;
    assert_eq!(popped.body, "a;b;c");
    let empty = get(addr, "/vts/table/t").await;
    assert_eq!((empty.status, empty.body.as_str()), (400, "table is empty"));
}

#[tokio::test]
async fn file_table_cycles_through_rows() {
    let path = table_file("cycle", "a;b\nc;d\n\ne;f\n");
    let server = start_server(vec![TableConfig {
        filename: Some(path.to_string_lossy().into_owned()),
        ..TableConfig::named("Letters")
    }])
    .await;

    let mut served = Vec::new();
    for _ in 0..4 {
        served.push(get(server.addr, "/vts/table/letters").await.body);
    }
    assert_eq!(served, ["a;b", "c;d", "e;f", "a;b"]);

    let cell = get(server.addr, "/vts/table/letters?row=2&col=1").await;
    assert_eq!(cell.body, "f");
    let out_of_range = get(server.addr, "/vts/table/letters?row=3").await;
    assert_eq!(out_of_range.status, 400);

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn table_errors_are_bad_requests() {
    let server = start_server(vec![TableConfig::named("q")]).await;
    let addr = server.addr;

    let missing = get(addr, "/vts/table/ghost").await;
    assert_eq!(missing.status, 400);
    assert!(missing.body.starts_with("Table ghost not found!"));

    let wrong_method = get(addr, "/vts/table/q?cmd=push").await;
    assert_eq!(wrong_method.status, 400);

    let bad_row = get(addr, "/vts/table/q?row=-1").await;
    assert_eq!(bad_row.status, 400);

    let usage = get(addr, "/vts/table").await;
    assert_eq!(usage.status, 200);
    assert!(usage.body.contains("q - 0 rows"));
}

#[tokio::test]
async fn manager_reloads_and_deletes() {
    let path = table_file("reload", "one\n");
    let filename = path.to_string_lossy().into_owned();
    let server = start_server(vec![]).await;
    let addr = server.addr;

    let created = get(addr, &format!("/vts/manager?cmd=create&table=r&filename={}", filename)).await;
    assert_eq!(created.body, "OK");
    assert_eq!(server.tables.lookup("r").unwrap().len(), 1);

    std::fs::write(&path, "one\ntwo\nthree\n").unwrap();
    let reloaded = get(addr, "/vts/manager?cmd=reload&table=r").await;
    assert_eq!(reloaded.body, "OK");
    assert_eq!(get(addr, "/vts/table/r?row=2").await.body, "three");

    let deleted = get(addr, "/vts/manager?cmd=delete&table=r").await;
    assert_eq!(deleted.body, "OK");
    assert_eq!(get(addr, "/vts/table/r").await.status, 400);

    let again = get(addr, "/vts/manager?cmd=delete&table=r").await;
    assert_eq!(again.status, 400);

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn stop_drains_and_closes_listener() {
    let server = start_server(vec![]).await;
    let addr = server.addr;
    assert_eq!(get(addr, "/vts").await.status, 200);

    tokio::time::timeout(std::time::Duration::from_secs(5), server.stop())
        .await
        .expect("server should stop")
        .unwrap();
    assert!(tokio::net::TcpStream::connect(addr).await.is_err());
}
