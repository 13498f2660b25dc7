//! Property-based tests for message assembly and keepalive accounting.

use proptest::prelude::*;

use subws::session::{KeepaliveMonitor, ProbeAction};
use subws::{Error, KeepaliveConfig, Limits, Message, MessageAssembler, OpCode};

use std::time::Duration;

fn fragments_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..16)
}

fn text_fragments_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(".{0,16}", 0..16)
}

proptest! {
    // =========================================================================
    // Property 1: assembled message == concatenation of fragments in order
    // =========================================================================
    #[test]
    fn test_binary_assembly_is_concatenation(fragments in fragments_strategy()) {
        let mut assembler = MessageAssembler::new(Limits::default());

        assembler.begin(OpCode::Binary).unwrap();
        for fragment in &fragments {
            assembler.append(fragment).unwrap();
        }
        let message = assembler.end().unwrap();

        let expected: Vec<u8> = fragments.concat();
        prop_assert_eq!(message, Message::binary(expected));
    }

    // =========================================================================
    // Property 2: same for text, with UTF-8 preserved across fragments
    // =========================================================================
    #[test]
    fn test_text_assembly_is_concatenation(fragments in text_fragments_strategy()) {
        let mut assembler = MessageAssembler::new(Limits::default());

        assembler.begin(OpCode::Text).unwrap();
        for fragment in &fragments {
            assembler.append(fragment.as_bytes()).unwrap();
        }
        let message = assembler.end().unwrap();

        let expected: String = fragments.concat();
        prop_assert_eq!(message.as_text(), Some(expected.as_str()));
    }

    // =========================================================================
    // Property 3: append before begin is always a protocol violation,
    // never silent loss or a crash
    // =========================================================================
    #[test]
    fn test_append_without_begin_always_fails(payload in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut assembler = MessageAssembler::new(Limits::default());

        prop_assert_eq!(assembler.append(&payload), Err(Error::NoMessageInProgress));
        prop_assert_eq!(assembler.buffered(), 0);
        prop_assert!(!assembler.is_assembling());
    }

    // =========================================================================
    // Property 4: append after end is equally a violation
    // =========================================================================
    #[test]
    fn test_append_after_end_always_fails(
        first in prop::collection::vec(any::<u8>(), 0..64),
        late in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut assembler = MessageAssembler::new(Limits::default());

        assembler.begin(OpCode::Binary).unwrap();
        assembler.append(&first).unwrap();
        assembler.end().unwrap();

        prop_assert_eq!(assembler.append(&late), Err(Error::NoMessageInProgress));
    }

    // =========================================================================
    // Property 5: with max unanswered probes N, timeout fires on tick N+1,
    // never earlier
    // =========================================================================
    #[test]
    fn test_timeout_after_exactly_max_probes(max in 1u32..10) {
        let mut monitor = KeepaliveMonitor::new(
            KeepaliveConfig::new(Duration::from_secs(5), max),
        );

        for tick in 1..=max {
            prop_assert_eq!(monitor.on_tick(), ProbeAction::SendProbe, "tick {}", tick);
        }
        prop_assert_eq!(monitor.on_tick(), ProbeAction::TimedOut);
    }

    // =========================================================================
    // Property 6: a pong at any point restarts the full probe budget
    // =========================================================================
    #[test]
    fn test_pong_restarts_probe_budget(max in 1u32..10, answered_after in 0u32..10) {
        let mut monitor = KeepaliveMonitor::new(
            KeepaliveConfig::new(Duration::from_secs(5), max),
        );

        // Some probes go unanswered, then a pong lands.
        for _ in 0..answered_after.min(max) {
            monitor.on_tick();
        }
        monitor.on_pong();
        prop_assert_eq!(monitor.outstanding(), 0);

        // The full budget is available again.
        for _ in 0..max {
            prop_assert_eq!(monitor.on_tick(), ProbeAction::SendProbe);
        }
        prop_assert_eq!(monitor.on_tick(), ProbeAction::TimedOut);
    }
}
