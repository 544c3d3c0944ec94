//! Property-based tests for the retry accumulator and the network machine.
//!
//! These tests use proptest to drive random, time-ordered observation
//! sequences and check the invariants that must hold after every step.

use proptest::prelude::*;
use tx_confidence::checkpoint::Checkpoint;
use tx_confidence::core::{ConfidenceLevel, Epoch, TxNetworkStatus};
use tx_confidence::machine::{TransitionError, TxNetworkStateMachine};
use tx_confidence::retry::RetryTimeoutState;
use tx_confidence::TxStateConfig;

#[derive(Clone, Copy, Debug)]
enum Op {
    Transmit,
    DeclineTransmit,
    RejectResponse,
    OffNetwork,
    InMempool,
    ConfirmBlock(u32),
    TxReplaced,
    UndoReplaced,
}

prop_compose! {
    fn arbitrary_op()(variant in 0..8u8, n_blocks in 0..10u32) -> Op {
        match variant {
            0 => Op::Transmit,
            1 => Op::DeclineTransmit,
            2 => Op::RejectResponse,
            3 => Op::OffNetwork,
            4 => Op::InMempool,
            5 => Op::ConfirmBlock(n_blocks),
            6 => Op::TxReplaced,
            _ => Op::UndoReplaced,
        }
    }
}

prop_compose! {
    /// Ops paired with non-decreasing epochs.
    fn timed_ops(max_len: usize)(
        steps in prop::collection::vec((arbitrary_op(), 0..120u64), 0..max_len)
    ) -> Vec<(Op, Epoch)> {
        let mut now = 0;
        steps
            .into_iter()
            .map(|(op, delta)| {
                now += delta;
                (op, now)
            })
            .collect()
    }
}

prop_compose! {
    fn arbitrary_config()(
        confirm_blocks in 1..8u32,
        transmit_timeout in 0..300u64,
        mempool in (0..200u64, 1..6u32),
        reorg in (0..400u64, 1..6u32),
    ) -> TxStateConfig {
        TxStateConfig::builder()
            .confirm_blocks(confirm_blocks)
            .transmit_timeout(transmit_timeout)
            .mempool(mempool.0, mempool.1)
            .reorg(reorg.0, reorg.1)
            .build()
            .unwrap()
    }
}

fn apply(machine: &mut TxNetworkStateMachine, op: Op, epoch: Epoch) {
    match op {
        Op::Transmit => machine.transmit(epoch),
        Op::DeclineTransmit => machine.decline_transmit(),
        Op::RejectResponse => machine.reject_response(),
        Op::OffNetwork => machine.off_network(epoch),
        Op::InMempool => machine.in_mempool(epoch),
        Op::ConfirmBlock(n) => {
            let _ = machine.confirm_block(n, epoch);
        }
        Op::TxReplaced => {
            let _ = machine.tx_replaced();
        }
        Op::UndoReplaced => machine.undo_replaced(),
    }
}

proptest! {
    #[test]
    fn accumulator_is_dead_iff_threshold_reached(
        max_tries in 0..6u32,
        spacing in 0..100u64,
        events in prop::collection::vec((any::<bool>(), 0..80u64), 0..30),
    ) {
        let mut state = RetryTimeoutState::new(max_tries, spacing);
        let mut now = 0u64;
        let mut fails_since_alive = 0u32;
        // Counted failures and the epoch of the latest one, tracked by hand
        let mut counted = 0u32;
        let mut last_counted: Option<u64> = None;

        for (is_alive, delta) in events {
            now += delta;
            if is_alive {
                state.alive(now);
                fails_since_alive = 0;
                counted = 0;
                last_counted = None;
            } else {
                state.fail(now);
                fails_since_alive += 1;
                let counts = match last_counted {
                    None => true,
                    Some(last) => now >= last + spacing,
                };
                if counts {
                    counted += 1;
                    last_counted = Some(now);
                }
            }
            prop_assert_eq!(state.fail_count(), counted);
            prop_assert_eq!(state.last_fail_time(), last_counted);
            prop_assert_eq!(state.is_dead(), counted >= max_tries);
            prop_assert!(state.fail_count() <= fails_since_alive);
        }
    }

    #[test]
    fn widely_spaced_failures_all_count(
        max_tries in 1..6u32,
        spacing in 1..100u64,
        n_fails in 0..10u32,
    ) {
        let mut state = RetryTimeoutState::new(max_tries, spacing);
        for i in 0..n_fails {
            state.fail(u64::from(i) * spacing);
        }
        prop_assert_eq!(state.fail_count(), n_fails);
        prop_assert_eq!(state.is_dead(), n_fails >= max_tries);
    }

    #[test]
    fn alive_always_resets(
        max_tries in 1..6u32,
        fails in prop::collection::vec(0..1000u64, 0..10),
    ) {
        let mut state = RetryTimeoutState::new(max_tries, 0);
        let mut sorted = fails;
        sorted.sort_unstable();
        for epoch in &sorted {
            state.fail(*epoch);
        }
        state.alive(sorted.last().copied().unwrap_or(0));
        prop_assert!(!state.is_dead());
        prop_assert_eq!(state.fail_count(), 0);
    }

    #[test]
    fn status_is_always_the_projection(
        config in arbitrary_config(),
        ops in timed_ops(40),
    ) {
        let mut machine = TxNetworkStateMachine::new(config);
        for (op, epoch) in ops {
            apply(&mut machine, op, epoch);
            prop_assert_eq!(
                machine.state(),
                TxNetworkStatus::project(machine.level(), machine.is_replaced())
            );
            if machine.is_replaced() {
                prop_assert!(!machine.level().is_confirmed());
            }
        }
    }

    #[test]
    fn off_network_never_raises_the_level(
        config in arbitrary_config(),
        ops in timed_ops(40),
        probe_delta in 0..500u64,
    ) {
        let mut machine = TxNetworkStateMachine::new(config);
        let mut now = 0;
        for (op, epoch) in ops {
            apply(&mut machine, op, epoch);
            now = epoch;
        }

        let before = machine.level();
        machine.off_network(now + probe_delta);
        prop_assert!(machine.level() <= before);
        if before == ConfidenceLevel::Dead {
            prop_assert_eq!(machine.level(), ConfidenceLevel::Dead);
        }
    }

    #[test]
    fn mempool_sighting_revives_dead(
        config in arbitrary_config(),
        ops in timed_ops(40),
    ) {
        let mut machine = TxNetworkStateMachine::new(config);
        let mut now = 0;
        for (op, epoch) in ops {
            apply(&mut machine, op, epoch);
            now = epoch;
        }

        machine.decline_transmit();
        machine.in_mempool(now);
        prop_assert_eq!(machine.level(), ConfidenceLevel::Mempool);
    }

    #[test]
    fn single_reorg_sample_is_absorbed(
        config in arbitrary_config(),
        n_blocks in 0..10u32,
        at in 0..10_000u64,
    ) {
        prop_assume!(config.reorg.tries >= 2);

        let mut machine = TxNetworkStateMachine::new(config);
        machine.transmit(0);
        machine.confirm_block(n_blocks, 0).unwrap();
        let status = machine.state();

        machine.off_network(at);
        prop_assert_eq!(machine.state(), status);
    }

    #[test]
    fn history_path_is_contiguous(
        config in arbitrary_config(),
        ops in timed_ops(40),
    ) {
        let mut machine = TxNetworkStateMachine::new(config);
        for (op, epoch) in ops {
            apply(&mut machine, op, epoch);
        }

        let transitions = machine.history().transitions();
        for pair in transitions.windows(2) {
            prop_assert_eq!(pair[0].to, pair[1].from);
        }
        for transition in transitions {
            prop_assert_ne!(transition.from, transition.to);
        }
        match transitions.first() {
            Some(first) => prop_assert_eq!(first.from, ConfidenceLevel::PreTransmit),
            None => prop_assert_eq!(machine.level(), ConfidenceLevel::PreTransmit),
        }
        if let Some(last) = transitions.last() {
            prop_assert_eq!(last.to, machine.level());
        }
    }

    #[test]
    fn rejected_inputs_leave_machine_untouched(
        config in arbitrary_config(),
        ops in timed_ops(40),
        n_blocks in 0..10u32,
    ) {
        let mut machine = TxNetworkStateMachine::new(config);
        let mut now = 0;
        for (op, epoch) in ops {
            apply(&mut machine, op, epoch);
            now = epoch;
        }

        let before = machine.clone();
        if machine.is_replaced() {
            prop_assert_eq!(
                machine.confirm_block(n_blocks, now),
                Err(TransitionError::AlreadyReplaced)
            );
            prop_assert_eq!(&machine, &before);
        }
        if machine.level().is_confirmed() {
            prop_assert!(machine.tx_replaced().is_err());
            prop_assert_eq!(&machine, &before);
        }
    }

    #[test]
    fn checkpoint_restores_identical_machine(
        config in arbitrary_config(),
        ops in timed_ops(30),
    ) {
        let mut machine = TxNetworkStateMachine::new(config);
        for (op, epoch) in ops {
            apply(&mut machine, op, epoch);
        }

        let bytes = machine.checkpoint().to_bytes().unwrap();
        let restored = Checkpoint::from_bytes(&bytes).unwrap().restore().unwrap();
        prop_assert_eq!(restored, machine);
    }
}
