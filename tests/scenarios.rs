use digital_dice::config::{Calibration, Prescale, REFERENCE_CLOCK_HZ};
use digital_dice::sim::Simulator;
use digital_dice::{encode, LedPattern, Phase, SleepDepth};

const SECOND: u64 = REFERENCE_CLOCK_HZ as u64;

/// Steps exactly one counter overflow.
fn next_overflow(sim: &mut Simulator) {
    let step = sim
        .board()
        .cycles_to_overflow()
        .expect("counter should be running");
    sim.run_cycles(step);
}

/// On a fresh die, rolls once so that `mix` becomes the carried seed.
fn settle_with_seed(sim: &mut Simulator, mix: u8) {
    assert_eq!(sim.die().seed(), 0);
    sim.press();
    sim.run_cycles(u64::from(mix));
    sim.release();
    assert!(sim.run_until_sleep(10 * SECOND));
    assert_eq!(sim.die().seed(), mix);
}

#[test]
fn press_from_deep_sleep_rolls_through_every_face() {
    let mut sim = Simulator::new();
    assert_eq!(sim.phase(), Phase::DeepSleep);

    sim.press();
    assert_eq!(sim.phase(), Phase::ArmedCollecting);
    assert_eq!(sim.die().animation_phase(), 0);
    assert_eq!(sim.board().prescale(), Some(Prescale::Div1));
    assert_eq!(sim.board().counter(), sim.die().seed());
    assert_eq!(sim.board().sleep_depth(), SleepDepth::Light);

    let ticks = Calibration::REFERENCE.animation_overflows as usize;
    let mut shown = Vec::new();
    for _ in 0..6 * ticks {
        let before = sim.board().show_count();
        next_overflow(&mut sim);
        if sim.board().show_count() != before {
            shown.push(sim.board().pattern());
        }
    }

    assert_eq!(sim.die().animation_phase(), 6);
    assert_eq!(shown.len(), 6);
    let mut faces: Vec<u8> = (1..=6)
        .map(|f| shown.iter().position(|p| *p == encode(f)).unwrap() as u8)
        .collect();
    faces.sort_unstable();
    assert_eq!(faces, [0, 1, 2, 3, 4, 5], "each face exactly once");
    assert_eq!(sim.phase(), Phase::ArmedCollecting);
}

#[test]
fn release_xors_counter_into_previous_result() {
    let mut sim = Simulator::new();

    // first roll: counter 3 at release leaves 3 as the carried seed
    sim.press();
    sim.run_cycles(3);
    sim.release();
    assert_eq!(sim.die().seed(), 3);
    assert!(sim.run_until_sleep(10 * SECOND));

    // second roll: counter starts at 3, released at 5
    sim.press();
    assert_eq!(sim.board().counter(), 3);
    sim.run_cycles(2);
    assert_eq!(sim.board().counter(), 5);
    sim.release();

    assert_eq!(sim.die().seed(), 6);
    assert_eq!(sim.die().last_result(), 1);
    assert_eq!(sim.board().pattern(), encode(1));
}

#[test]
fn display_times_out_into_deep_sleep() {
    let mut sim = Simulator::new();
    sim.press();
    sim.run_ms(250);
    sim.release();
    assert_eq!(sim.phase(), Phase::DisplayingCountingDown);
    assert_eq!(sim.board().prescale(), Some(Prescale::Div1024));

    // still showing after six seconds
    sim.run_ms(6_000);
    assert_eq!(sim.phase(), Phase::DisplayingCountingDown);
    assert_ne!(sim.board().pattern(), LedPattern::BLANK);

    assert!(sim.run_until_sleep(2 * SECOND));
    assert_eq!(sim.board().pattern(), LedPattern::BLANK);
    assert_eq!(sim.board().sleep_depth(), SleepDepth::Deep);
    assert!(!sim.board().overflow_enabled());

    // nothing happens until the next press
    let overflows = sim.overflows();
    let shown = sim.board().show_count();
    sim.run_ms(30_000);
    assert_eq!(sim.overflows(), overflows);
    assert_eq!(sim.board().show_count(), shown);
    assert_eq!(sim.phase(), Phase::DeepSleep);
}

#[test]
fn hold_lasts_about_seven_seconds() {
    let mut sim = Simulator::new();
    sim.press();
    sim.release();
    let released_at = sim.cycles();
    assert!(sim.run_until_sleep(10 * SECOND));
    let held = sim.cycles() - released_at;
    assert!((6 * SECOND..8 * SECOND).contains(&held), "{held}");
}

#[test]
fn press_during_countdown_cancels_pending_timeout() {
    let mut sim = Simulator::new();
    sim.press();
    sim.run_ms(100);
    sim.release();
    sim.run_ms(5_000);
    assert_eq!(sim.phase(), Phase::DisplayingCountingDown);

    sim.press();
    assert_eq!(sim.phase(), Phase::ArmedCollecting);
    assert_eq!(sim.die().timer().extension(), 0);
    assert_eq!(sim.board().prescale(), Some(Prescale::Div1));

    // hold well past when the old countdown would have expired
    sim.run_ms(4_000);
    assert_eq!(sim.phase(), Phase::ArmedCollecting);
    assert_eq!(sim.board().sleep_depth(), SleepDepth::Light);

    sim.release();
    assert_eq!(sim.phase(), Phase::DisplayingCountingDown);
    assert_ne!(sim.board().pattern(), LedPattern::BLANK);
}

#[test]
fn countdown_overflow_pending_at_press_never_reaches_collection() {
    let mut sim = Simulator::new();
    sim.press();
    sim.run_ms(100);
    sim.release();
    sim.run_ms(3_000);

    // counter wraps just as the button goes down
    sim.die_mut().hw_mut().latch_overflow();
    let overflows = sim.overflows();
    sim.press();

    assert_eq!(sim.overflows(), overflows);
    assert_eq!(sim.die().timer().extension(), 0);
    assert_eq!(sim.phase(), Phase::ArmedCollecting);
    assert_eq!(sim.board().live_writes(), 0);
}

#[test]
fn results_stay_in_range_over_many_rolls() {
    let mut sim = Simulator::new();
    let mut lcg: u32 = 0x1234_5678;
    let mut seen = [false; 7];

    for round in 0..200 {
        lcg = lcg.wrapping_mul(1664525).wrapping_add(1013904223);
        // 50..~1100 ms of holding, plus some sub-millisecond jitter
        let hold = (lcg >> 8) as u64 % (SECOND + 1) + SECOND / 20;
        sim.press();
        sim.run_cycles(hold);
        sim.release();

        let face = sim.die().last_result();
        assert!((1..=6).contains(&face), "round {round}: {face}");
        assert_eq!(sim.board().pattern(), encode(face));
        seen[face as usize] = true;

        // every third round press again before the display times out
        if round % 3 == 0 {
            sim.run_ms(1_000);
        } else {
            assert!(sim.run_until_sleep(10 * SECOND));
            assert_eq!(sim.board().pattern(), LedPattern::BLANK);
        }

        let pattern = sim.board().pattern();
        assert!((0..=6).any(|f| encode(f) == pattern));
    }

    assert!(seen[1..].iter().all(|s| *s), "{seen:?}");
}

#[test]
fn seed_carries_across_sleep() {
    let mut sim = Simulator::new();
    settle_with_seed(&mut sim, 0x2A);
    sim.press();
    assert_eq!(sim.board().counter(), 0x2A);
}

#[cfg(not(feature = "trace"))]
#[test]
fn firmware_build_keeps_no_trace() {
    let mut sim = Simulator::new();
    sim.roll(1_000);
    assert!(sim.run_until_sleep(10 * SECOND));
    assert!(sim.die().trace().is_empty());
    assert_eq!(sim.die().trace().last(), None);
}
