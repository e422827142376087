//! Integration tests for App page flows.
//!
//! Actions are executed by hand: navigations are fed back into the App and
//! transport signals are injected as events, so each test reads as the
//! sequence a driver would produce.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - The App is on the expected page
//! - No transport was requested when none should exist
//! - The rendered transcript matches

use roomchat_app::{App, AppAction, AppEvent, Command, Page};
use roomchat_core::{
    AllocationError, ConnectionAction, LinkStatus, RoomError, RoomId, TransportEvent,
    env::Environment,
};
use url::Url;

#[derive(Clone)]
struct FixedEnv;

impl Environment for FixedEnv {
    fn random_bytes(&self, buffer: &mut [u8]) {
        buffer.fill(11);
    }
}

fn app() -> App {
    App::new(Url::parse("http://localhost:8000/room.html").unwrap())
}

/// Follow navigations the way the runtime does; return transport actions.
fn follow(app: &mut App, actions: Vec<AppAction>) -> Vec<ConnectionAction> {
    let mut transport = Vec::new();
    let mut pending = actions;
    while !pending.is_empty() {
        for action in std::mem::take(&mut pending) {
            match action {
                AppAction::Navigate { url } => pending.extend(app.open_room(&url)),
                AppAction::Transport(action) => transport.push(action),
                AppAction::Render
                | AppAction::Quit
                | AppAction::AllocateRoom
                | AppAction::CopyRoomLink { .. } => {},
            }
        }
    }
    transport
}

fn inbound(app: &mut App, raw: &str) {
    app.handle(AppEvent::Transport(TransportEvent::Message(raw.into())));
}

#[test]
fn allocation_to_connected_room() {
    let mut app = app();
    let actions = app.create_room();
    assert!(follow(&mut app, actions).is_empty());

    let actions = app.handle(AppEvent::RoomAllocated { room_id: RoomId::new("a3f9c1").unwrap() });
    let transport = follow(&mut app, actions);
    assert_eq!(transport, vec![ConnectionAction::Open { room_id: RoomId::new("a3f9c1").unwrap() }]);

    app.handle(AppEvent::Transport(TransportEvent::Opened));
    assert_eq!(app.session().unwrap().status(), LinkStatus::Connected);
    assert_eq!(
        app.room_link().unwrap().as_str(),
        "http://localhost:8000/room.html?room=a3f9c1"
    );
}

#[test]
fn double_create_issues_one_allocation() {
    let mut app = app();
    let first = app.execute(Command::CreateRoom, &FixedEnv);
    let second = app.execute(Command::CreateRoom, &FixedEnv);

    let allocations = first.iter().chain(&second).filter(|a| **a == AppAction::AllocateRoom);
    assert_eq!(allocations.count(), 1);
}

#[test]
fn allocation_failure_does_not_navigate() {
    let mut app = app();
    app.create_room();

    let actions = app.handle(AppEvent::AllocationFailed {
        error: AllocationError::Unreachable("connection refused".into()),
    });

    assert!(actions.iter().all(|a| !matches!(a, AppAction::Navigate { .. })));
    assert!(matches!(app.page(), Page::Landing));
    assert!(app.alert().unwrap().contains("connection refused"));

    // A retry is allowed once the first attempt has failed.
    assert_eq!(app.create_room(), vec![AppAction::AllocateRoom, AppAction::Render]);
}

#[test]
fn missing_room_blocks_session() {
    let mut app = app();
    let url = Url::parse("http://localhost:8000/room.html?other=1").unwrap();
    let actions = app.open_room(&url);
    assert!(follow(&mut app, actions).is_empty());

    assert!(matches!(app.page(), Page::Blocked { reason: RoomError::Missing }));
    assert!(app.session().is_none());
    assert!(app.send_message("hello").is_empty());
}

#[test]
fn local_room_navigates_to_generated_token() {
    let mut app = app();
    let actions = app.execute(Command::CreateLocalRoom, &FixedEnv);
    let transport = follow(&mut app, actions);

    let room_id = app.session().unwrap().room_id().clone();
    assert_eq!(room_id.as_str(), "bbbbbb");
    assert_eq!(transport, vec![ConnectionAction::Open { room_id }]);
}

#[test]
fn conversation_renders_in_arrival_order() {
    let mut app = app();
    let actions = app.join_room(" lobby ");
    follow(&mut app, actions);
    app.handle(AppEvent::Transport(TransportEvent::Opened));

    inbound(&mut app, r#"{"type":"system","event":"welcome","client_id":"c-9"}"#);
    inbound(&mut app, r#"{"type":"system","event":"join"}"#);
    let actions = app.send_message("hello there");
    let sent = follow(&mut app, actions);
    inbound(&mut app, "hi!");
    inbound(&mut app, r#"{"type":"chat","text":"dropped"}"#);
    inbound(&mut app, r#"{"type":"system","event":"leave"}"#);

    assert_eq!(sent, vec![ConnectionAction::Send("hello there".into())]);

    let session = app.session().unwrap();
    assert_eq!(session.room_id().as_str(), "lobby");
    assert_eq!(session.client_id(), Some("c-9"));

    let rendered: Vec<String> = session.transcript().iter().map(ToString::to_string).collect();
    insta::assert_snapshot!(rendered.join("\n"), @r"
    * A peer joined the room
    You: hello there
    Peer: hi!
    * A peer left the room
    ");
}

#[test]
fn leave_then_rejoin_starts_fresh_session() {
    let mut app = app();
    let actions = app.join_room("lobby");
    follow(&mut app, actions);
    app.handle(AppEvent::Transport(TransportEvent::Opened));
    inbound(&mut app, "old message");

    let actions = app.leave_room();
    assert_eq!(follow(&mut app, actions), vec![ConnectionAction::Close]);
    assert!(matches!(app.page(), Page::Landing));

    let actions = app.join_room("lobby");
    follow(&mut app, actions);
    assert!(app.session().unwrap().transcript().is_empty());
}

#[test]
fn late_signal_after_leave_is_ignored() {
    let mut app = app();
    let actions = app.join_room("lobby");
    follow(&mut app, actions);
    app.leave_room();

    assert!(app.handle(AppEvent::Transport(TransportEvent::Opened)).is_empty());
    assert!(matches!(app.page(), Page::Landing));
}
