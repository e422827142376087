//! Property-based tests for inbound frame classification.
//!
//! Verifies that classification is total and that anything which is not a
//! JSON object is delivered verbatim as chat.

use proptest::prelude::*;
use roomchat_proto::{Inbound, decode, encode_chat};

proptest! {
    #[test]
    fn prop_decode_never_panics(raw in any::<String>()) {
        let _ = decode(&raw);
    }

    #[test]
    fn prop_non_object_frames_are_chat(raw in any::<String>()) {
        let is_object = matches!(
            serde_json::from_str::<serde_json::Value>(&raw),
            Ok(serde_json::Value::Object(_))
        );

        if !is_object {
            prop_assert_eq!(decode(&raw), Inbound::Chat(raw.clone()));
        }
    }

    #[test]
    fn prop_objects_are_never_chat(key in "[a-z]{1,8}", value in "[a-z0-9 ]{0,16}") {
        let raw = serde_json::json!({ key: value }).to_string();
        prop_assert!(!matches!(decode(&raw), Inbound::Chat(_)));
    }

    #[test]
    fn prop_plain_text_survives_encode_then_decode(text in "[a-zA-Z][a-zA-Z ,.!?]{0,64}") {
        prop_assert_eq!(decode(&encode_chat(&text)), Inbound::Chat(text.clone()));
    }
}
