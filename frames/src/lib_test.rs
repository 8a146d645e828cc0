use super::*;

#[test]
fn decode_client_rejects_non_json() {
    let err = decode_client("not json").expect_err("should fail");
    assert!(err.to_string().starts_with("invalid frame:"));
}

#[test]
fn decode_client_rejects_unknown_type() {
    assert!(decode_client(r#"{"type":"teleport","roomId":"demo"}"#).is_err());
}

#[test]
fn decode_client_rejects_missing_fields() {
    assert!(decode_client(r#"{"type":"shape","roomId":"demo"}"#).is_err());
    assert!(decode_client(r#"{"type":"zoom","roomId":"demo"}"#).is_err());
}

#[test]
fn encode_then_decode_server_message() {
    let msg = ServerMessage::error("Room not found");
    let text = encode(&msg).expect("encode");
    assert_eq!(text, r#"{"type":"error","message":"Room not found"}"#);
    assert_eq!(decode_server(&text).expect("decode"), msg);
}
