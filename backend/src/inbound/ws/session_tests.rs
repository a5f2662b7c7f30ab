//! WebSocket session handler tests.

use super::*;
use crate::domain::{CommentService, CommentServicePorts, User, UserId};
use crate::inbound::ws;
use crate::inbound::ws::state::{AllowedOrigins, WsState};
use crate::outbound::broadcast::BroadcastHub;
use crate::outbound::memory::{
    InMemoryCommentStore, InMemoryUserDirectory, StaticTokenAuthenticator,
};
use actix_web::{App, HttpServer, dev::Server, dev::ServerHandle, http::StatusCode, http::header};
use awc::error::WsClientError;
use awc::{BoxedSocket, ws::Codec, ws::Frame, ws::Message as ClientMessage};
use futures_util::{SinkExt, StreamExt};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;

type Socket = actix_codec::Framed<BoxedSocket, Codec>;

fn ws_state() -> WsState {
    let store = Arc::new(InMemoryCommentStore::new());
    let users = Arc::new(InMemoryUserDirectory::new([
        User::new(UserId::new(1).expect("valid user"), "Ann"),
        User::new(UserId::new(2).expect("valid user"), "Bob"),
    ]));
    let service = CommentService::new(
        CommentServicePorts {
            provider: store.clone(),
            creator: store.clone(),
            updater: store.clone(),
            deleter: store,
            users,
        },
        Arc::new(DefaultClock),
    );
    let hub = Arc::new(BroadcastHub::new(16));
    let authenticator = StaticTokenAuthenticator::new([
        ("ann-token".to_owned(), UserId::new(1).expect("valid user")),
        ("bob-token".to_owned(), UserId::new(2).expect("valid user")),
    ]);
    WsState::new(
        CommentEventBridge::new(Arc::new(service), hub),
        Arc::new(authenticator),
        AllowedOrigins::parse(["http://localhost:3000"]).expect("valid origins"),
        Duration::from_secs(2),
    )
}

#[fixture]
async fn ws_server() -> (String, ServerHandle) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let state = ws_state();
    let server: Server = HttpServer::new(move || {
        App::new()
            .app_data(actix_web::web::Data::new(state.clone()))
            .service(ws::ws_entry)
    })
    .listen(listener)
    .expect("bind test server")
    .disable_signals()
    .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    (format!("http://{addr}"), handle)
}

async fn connect(base: &str, post: &str, token: &str) -> Result<Socket, WsClientError> {
    let (_resp, socket) = awc::Client::default()
        .ws(format!("{base}/ws/posts/{post}?token={token}"))
        .set_header(header::ORIGIN, "http://localhost:3000")
        .connect()
        .await?;
    Ok(socket)
}

async fn send(socket: &mut Socket, value: Value) {
    socket
        .send(ClientMessage::Text(value.to_string().into()))
        .await
        .expect("send text");
}

async fn next_frame(socket: &mut Socket) -> Frame {
    loop {
        let frame = socket.next().await.expect("response frame").expect("frame");
        match frame {
            Frame::Ping(_) | Frame::Pong(_) => continue,
            other => return other,
        }
    }
}

async fn next_json(socket: &mut Socket) -> Value {
    match next_frame(socket).await {
        Frame::Text(bytes) => serde_json::from_slice(&bytes).expect("json"),
        other => panic!("expected text frame, got {other:?}"),
    }
}

async fn assert_silent(socket: &mut Socket) {
    let received = tokio::time::timeout(Duration::from_millis(250), next_frame(socket)).await;
    assert!(received.is_err(), "unexpected frame: {received:?}");
}

#[rstest]
#[actix_rt::test]
async fn created_comments_reach_every_subscriber(
    #[future] ws_server: (String, ServerHandle),
) {
    let (base, _server) = ws_server.await;
    let mut ann = connect(&base, "P1", "ann-token").await.expect("ann connects");
    let mut bob = connect(&base, "P1", "bob-token").await.expect("bob connects");

    send(
        &mut ann,
        json!({"type": "create_comment", "payload": {"post_id": "P1", "body": "hello"}}),
    )
    .await;

    for socket in [&mut ann, &mut bob] {
        let value = next_json(socket).await;
        assert_eq!(value["type"], "new_comment");
        assert_eq!(value["payload"]["body"], "hello");
        assert_eq!(value["payload"]["user"]["id"], 1);
        assert_eq!(value["payload"]["user"]["name"], "Ann");
    }
}

#[rstest]
#[actix_rt::test]
async fn subscribers_of_other_posts_see_nothing(#[future] ws_server: (String, ServerHandle)) {
    let (base, _server) = ws_server.await;
    let mut ann = connect(&base, "P1", "ann-token").await.expect("ann connects");
    let mut bob = connect(&base, "P2", "bob-token").await.expect("bob connects");

    send(
        &mut ann,
        json!({"type": "create_comment", "payload": {"post_id": "P1", "body": "hello"}}),
    )
    .await;

    assert_eq!(next_json(&mut ann).await["type"], "new_comment");
    assert_silent(&mut bob).await;
}

#[rstest]
#[actix_rt::test]
async fn failed_updates_reply_to_the_requester_only(
    #[future] ws_server: (String, ServerHandle),
) {
    let (base, _server) = ws_server.await;
    let mut ann = connect(&base, "P1", "ann-token").await.expect("ann connects");
    let mut bob = connect(&base, "P1", "bob-token").await.expect("bob connects");

    send(
        &mut ann,
        json!({"type": "create_comment", "payload": {"post_id": "P1", "body": "mine"}}),
    )
    .await;
    let created = next_json(&mut ann).await;
    let comment_id = created["payload"]["id"].as_str().expect("id").to_owned();
    assert_eq!(next_json(&mut bob).await["type"], "new_comment");

    send(
        &mut bob,
        json!({"type": "update_comment", "payload": {"comment_id": comment_id, "body": "hijack"}}),
    )
    .await;

    let reply = next_json(&mut bob).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["payload"]["code"], "unauthorized");
    assert_eq!(reply["payload"]["request_type"], "update_comment");
    assert_silent(&mut ann).await;
}

#[rstest]
#[actix_rt::test]
async fn author_edits_and_removals_are_broadcast(#[future] ws_server: (String, ServerHandle)) {
    let (base, _server) = ws_server.await;
    let mut ann = connect(&base, "P1", "ann-token").await.expect("ann connects");
    let mut bob = connect(&base, "P1", "bob-token").await.expect("bob connects");

    send(
        &mut ann,
        json!({"type": "create_comment", "payload": {"post_id": "P1", "body": "draft"}}),
    )
    .await;
    let comment_id = next_json(&mut ann).await["payload"]["id"]
        .as_str()
        .expect("id")
        .to_owned();
    next_json(&mut bob).await;

    send(
        &mut ann,
        json!({"type": "update_comment", "payload": {"comment_id": comment_id, "body": "final"}}),
    )
    .await;
    let edited = next_json(&mut bob).await;
    assert_eq!(edited["type"], "edit_comment");
    assert_eq!(edited["payload"]["body"], "final");
    next_json(&mut ann).await;

    send(
        &mut ann,
        json!({"type": "delete_comment", "payload": {"comment_id": comment_id}}),
    )
    .await;
    let removed = next_json(&mut bob).await;
    assert_eq!(
        removed,
        json!({"type": "remove_comment", "payload": {"comment_id": comment_id}})
    );
}

#[rstest]
#[actix_rt::test]
async fn removals_reach_the_post_the_comment_belongs_to(
    #[future] ws_server: (String, ServerHandle),
) {
    let (base, _server) = ws_server.await;
    let mut ann = connect(&base, "P2", "ann-token").await.expect("ann connects");
    let mut bob = connect(&base, "P1", "bob-token").await.expect("bob connects");

    send(
        &mut ann,
        json!({"type": "create_comment", "payload": {"post_id": "P1", "body": "elsewhere"}}),
    )
    .await;
    let created = next_json(&mut bob).await;
    assert_eq!(created["type"], "new_comment");
    let comment_id = created["payload"]["id"].as_str().expect("id").to_owned();

    send(
        &mut ann,
        json!({"type": "delete_comment", "payload": {"comment_id": comment_id}}),
    )
    .await;

    assert_eq!(
        next_json(&mut bob).await,
        json!({"type": "remove_comment", "payload": {"comment_id": comment_id}})
    );
    assert_silent(&mut ann).await;
}

#[rstest]
#[actix_rt::test]
async fn unknown_message_types_are_dropped(#[future] ws_server: (String, ServerHandle)) {
    let (base, _server) = ws_server.await;
    let mut ann = connect(&base, "P1", "ann-token").await.expect("ann connects");

    send(&mut ann, json!({"type": "typing", "payload": {}})).await;
    send(
        &mut ann,
        json!({"type": "delete_comment", "payload": {"comment_id": "missing"}}),
    )
    .await;

    let reply = next_json(&mut ann).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["payload"]["code"], "comment_not_found");
    assert_eq!(reply["payload"]["request_type"], "delete_comment");
}

#[rstest]
#[actix_rt::test]
async fn bad_payloads_get_an_invalid_argument_reply(
    #[future] ws_server: (String, ServerHandle),
) {
    let (base, _server) = ws_server.await;
    let mut ann = connect(&base, "P1", "ann-token").await.expect("ann connects");

    send(&mut ann, json!({"type": "create_comment", "payload": {"body": 7}})).await;

    let reply = next_json(&mut ann).await;
    assert_eq!(reply["payload"]["code"], "invalid_argument");
    assert_eq!(reply["payload"]["request_type"], "create_comment");
}

#[rstest]
#[actix_rt::test]
async fn closes_on_malformed_json(#[future] ws_server: (String, ServerHandle)) {
    let (base, _server) = ws_server.await;
    let mut ann = connect(&base, "P1", "ann-token").await.expect("ann connects");

    ann.send(ClientMessage::Text("not-json".into()))
        .await
        .expect("send text");

    match next_frame(&mut ann).await {
        Frame::Close(reason) => {
            assert_eq!(reason.expect("reason").code, CloseCode::Policy);
        }
        other => panic!("expected close frame, got {other:?}"),
    }
}

#[rstest]
#[case("")]
#[case("stolen")]
#[actix_rt::test]
async fn rejects_unknown_tokens(
    #[future] ws_server: (String, ServerHandle),
    #[case] token: &str,
) {
    let (base, _server) = ws_server.await;
    let error = connect(&base, "P1", token)
        .await
        .err()
        .expect("upgrade rejected");
    assert!(matches!(
        error,
        WsClientError::InvalidResponseStatus(StatusCode::UNAUTHORIZED)
    ));
}

#[rstest]
#[actix_rt::test]
async fn closes_after_timeout_without_client_messages(
    #[future] ws_server: (String, ServerHandle),
) {
    let (base, _server) = ws_server.await;
    let mut socket = connect(&base, "P1", "ann-token").await.expect("connects");
    tokio::time::sleep(CLIENT_TIMEOUT + HEARTBEAT_INTERVAL * 3).await;

    let reason = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match next_frame(&mut socket).await {
                Frame::Close(reason) => break reason,
                other => panic!("unexpected frame before close: {other:?}"),
            }
        }
    })
    .await
    .expect("close frame missing within timeout")
    .expect("close reason missing");

    assert_eq!(reason.code, CloseCode::Normal);
    assert_eq!(reason.description.as_deref(), Some("heartbeat timeout"));
}
