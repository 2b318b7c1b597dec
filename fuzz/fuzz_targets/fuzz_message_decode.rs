//! Fuzz target: `Message::decode`
//!
//! Arbitrary bus frames must never panic the decoder, and anything it
//! accepts must survive a re-encode unchanged.
//!
//! cargo fuzz run fuzz_message_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use wakecycle::app::message::Message;

fuzz_target!(|data: &[u8]| {
    if let Ok(message) = Message::decode(data) {
        assert!(message.message_type.as_str().len() <= 32);
        let frame = message.encode().expect("decoded message re-encodes");
        assert_eq!(Message::decode(&frame).expect("re-decode"), message);
    }
});
