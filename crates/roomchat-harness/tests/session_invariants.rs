//! Property-based tests over multi-client runs.
//!
//! Two clients in one room perform arbitrary interleavings of sends, server
//! closes, reconnects and injected frames. After every step the standard
//! invariant registry must hold for both clients. At the end each client's
//! local entries must equal the frames its driver transmitted, in order.

use proptest::prelude::*;
use roomchat_app::{App, Command, Entry, Origin, Runtime};
use roomchat_core::RoomId;
use roomchat_harness::{
    ClientSnapshot, InvariantRegistry, SharedRelay, SimDriver, SimEnv, SystemSnapshot,
    create_shared_relay, lock_relay,
};
use url::Url;

#[derive(Debug, Clone)]
enum Action {
    Send(String),
    Kick,
    Reconnect,
    Inject(String),
    Deliver,
}

#[derive(Debug, Clone)]
struct Step {
    /// Acts on alice when true, bob otherwise.
    alice: bool,
    action: Action,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => "[ a-z]{0,6}".prop_map(Action::Send),
        1 => Just(Action::Kick),
        2 => Just(Action::Reconnect),
        2 => prop_oneof![
            Just(r#"{"type":"system","event":"join"}"#.to_owned()),
            Just(r#"{"type":"other"}"#.to_owned()),
            "[a-z{}\":]{0,8}",
        ].prop_map(Action::Inject),
        3 => Just(Action::Deliver),
    ]
}

fn step_strategy() -> impl Strategy<Value = Step> {
    (any::<bool>(), action_strategy()).prop_map(|(alice, action)| Step { alice, action })
}

fn client(relay: &SharedRelay, env: &SimEnv) -> Runtime<SimDriver> {
    let base = Url::parse("http://localhost:8000/room.html").unwrap();
    Runtime::new(SimDriver::new(relay.clone(), env.clone()), App::new(base))
}

fn snapshot(alice: &Runtime<SimDriver>, bob: &Runtime<SimDriver>) -> SystemSnapshot {
    SystemSnapshot::from_clients(vec![
        ClientSnapshot::from_app(0, alice.app()),
        ClientSnapshot::from_app(1, bob.app()),
    ])
}

async fn drive(steps: Vec<Step>) -> Result<(), TestCaseError> {
    let env = SimEnv::with_seed(11);
    let relay = create_shared_relay(env.clone());
    let registry = InvariantRegistry::standard();
    let mut alice = client(&relay, &env);
    let mut bob = client(&relay, &env);
    let room = RoomId::new("proproom").unwrap();

    for runtime in [&mut alice, &mut bob] {
        runtime.driver_mut().push_command(Command::JoinRoom(room.to_string()));
        runtime.step().await.unwrap();
    }

    for step in steps {
        let runtime = if step.alice { &mut alice } else { &mut bob };

        match step.action {
            Action::Send(text) => {
                runtime.driver_mut().push_command(Command::SendMessage(text));
                runtime.step().await.unwrap();
            },
            Action::Kick => {
                if let Some(link) = runtime.driver().link() {
                    lock_relay(&relay).kick(link);
                }
            },
            Action::Reconnect => {
                runtime.driver_mut().push_command(Command::Reconnect);
                runtime.step().await.unwrap();
            },
            Action::Inject(raw) => {
                if let Some(link) = runtime.driver().link() {
                    lock_relay(&relay).inject(link, &raw);
                }
            },
            Action::Deliver => {
                runtime.step().await.unwrap();
            },
        }

        let result = registry.check_all(&snapshot(&alice, &bob));
        prop_assert!(result.is_ok(), "{:?}", result);
    }

    for runtime in [&alice, &bob] {
        let session = runtime.app().session().unwrap();
        let local: Vec<&str> = session
            .transcript()
            .chat_entries()
            .filter(|e| e.origin == Origin::Local)
            .map(|e| e.text.as_str())
            .collect();
        let sent: Vec<&str> = runtime.driver().sent().iter().map(String::as_str).collect();
        prop_assert_eq!(local, sent);

        let sequences: Vec<u64> = session.transcript().iter().map(Entry::sequence).collect();
        let expected: Vec<u64> = (0..sequences.len() as u64).collect();
        prop_assert_eq!(sequences, expected);
    }

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_invariants_hold_under_interleavings(steps in prop::collection::vec(step_strategy(), 0..40)) {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        rt.block_on(drive(steps))?;
    }
}
