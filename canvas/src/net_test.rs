use std::time::Duration;

use super::*;

fn ms(n: u64) -> Reconnect {
    Reconnect::After(Duration::from_millis(n))
}

#[test]
fn backoff_doubles_to_cap() {
    let mut backoff = Backoff::default();
    let delays: Vec<u64> = (0..6).map(|_| u64::try_from(backoff.next_delay().as_millis()).unwrap_or(u64::MAX)).collect();
    assert_eq!(delays, vec![1_000, 2_000, 4_000, 8_000, 10_000, 10_000]);
}

#[test]
fn open_resets_backoff() {
    let mut conn = Connection::new();
    assert_eq!(conn.state(), ConnectionState::Connecting);
    assert_eq!(conn.on_close(1006), ms(1_000));
    assert_eq!(conn.on_close(1006), ms(2_000));
    conn.on_open();
    assert_eq!(conn.state(), ConnectionState::Connected);
    assert_eq!(conn.on_close(1006), ms(1_000));
    assert_eq!(conn.state(), ConnectionState::Connecting);
}

#[test]
fn unauthorized_close_is_terminal() {
    let mut conn = Connection::new();
    conn.on_open();
    assert_eq!(conn.on_close(4001), Reconnect::SignIn);
    assert_eq!(conn.state(), ConnectionState::Unauthorized);
    assert_eq!(conn.on_close(1006), Reconnect::SignIn);
}

#[test]
fn replaced_connection_does_not_reconnect() {
    let mut conn = Connection::new();
    conn.on_open();
    assert_eq!(conn.on_close(1000), Reconnect::Stop);
    assert_eq!(conn.state(), ConnectionState::Disconnected);
}

#[test]
fn local_close_stops_retries() {
    let mut conn = Connection::new();
    conn.on_open();
    conn.close();
    assert_eq!(conn.on_close(1006), Reconnect::Stop);
}

#[test]
fn ws_url_switches_scheme_and_adds_token() {
    let url = ws_url("http://localhost:3000", "abc.def").expect("url");
    assert_eq!(url.as_str(), "ws://localhost:3000/ws?token=abc.def");

    let url = ws_url("https://board.example.com/app/", "t").expect("url");
    assert_eq!(url.as_str(), "wss://board.example.com/app/ws?token=t");
}

#[test]
fn ws_url_rejects_other_schemes() {
    assert!(matches!(ws_url("ftp://example.com", "t"), Err(NetError::BadUrl(_))));
    assert!(matches!(ws_url("::", "t"), Err(NetError::BadUrl(_))));
}
