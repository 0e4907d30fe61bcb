//! End-to-end decontamination cycle through the control task.
//!
//! Time is injected: every test drives `ControlTask::tick` with a
//! simulated millisecond clock at the default 100 ms control tick.

use passbox::app::commands::{Command, CommandKind, Request, Source};
use passbox::app::events::Topic;
use passbox::channels::RequestChannel;
use passbox::fsm::Step;

use super::mock_hw::{rig, run};

const TICK_MS: u64 = 100;

fn cmd(kind: CommandKind) -> Request {
    Request::Command(Command::new(kind, Source::Remote))
}

#[test]
fn happy_path_walks_every_step_with_exact_durations() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    assert!(channel.try_send(cmd(CommandKind::StartCycle)).is_ok());

    let mut transitions = Vec::new();
    let mut last = task.state().current_step;
    let mut now = 0;
    while now <= 36_000 {
        task.tick(now);
        let step = task.state().current_step;
        if step != last {
            transitions.push((now, step));
            last = step;
        }
        now += TICK_MS;
    }

    assert_eq!(
        transitions,
        vec![
            (0, Step::ExtractAir),
            (3_000, Step::StopAir),
            (5_000, Step::InjectProduct),
            (7_000, Step::SterilizationPause),
            (27_000, Step::ExtractProduct),
            (30_000, Step::RenewAir),
            (33_000, Step::AuthorizeSterile),
            (35_000, Step::Idle),
        ]
    );

    let s = task.state();
    assert!(!s.cycle_running);
    assert!(s.sterile_access_authorized, "authorization persists after completion");

    let status = &task.sink().status;
    assert_eq!(
        status.on(Topic::CycleStep),
        vec![
            "0: Demarrage",
            "1: Extraction air",
            "2: Arret air",
            "3: Injection produit",
            "4: Pause sterilisation 20s",
            "5: Extraction produit",
            "6: Renouvellement air",
            "7: Autorisation porte sterile",
            "8: Termine",
        ]
    );
    assert_eq!(status.on(Topic::CycleRunning), vec!["true", "false"]);

    let display = &task.sink().display;
    assert_eq!(display.count_line2_prefix("Steril: "), 20);
    assert!(display.contains("Etape 4/7", "Steril: 20s"));
    assert!(display.contains("Etape 4/7", "Steril: 1s"));
    assert!(display.contains("CYCLE TERMINE", "Ouvrir sterile"));
}

#[test]
fn ready_message_follows_two_second_hold() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    task.apply(cmd(CommandKind::StartCycle));
    run(&mut task, 0, 36_900, TICK_MS);
    assert_eq!(task.sink().display.last(), Some(("CYCLE TERMINE", "Ouvrir sterile")));

    task.tick(37_000);
    assert_eq!(task.sink().display.last(), Some(("Pret", "Attente...")));
}

#[test]
fn emergency_mid_sterilisation_halts_immediately() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    task.apply(cmd(CommandKind::StartCycle));
    run(&mut task, 0, 10_000, TICK_MS);
    assert_eq!(task.state().current_step, Step::SterilizationPause);

    assert!(channel.try_send(cmd(CommandKind::ActivateEmergency)).is_ok());
    task.tick(10_100);

    let s = task.state();
    assert!(s.emergency_active);
    assert!(!s.cycle_running);
    assert_eq!(s.current_step, Step::Idle);
    assert!(!s.sterile_access_authorized);

    let progress_before = task.sink().display.count_line2_prefix("Steril: ");
    run(&mut task, 10_200, 40_000, TICK_MS);
    assert_eq!(
        task.sink().display.count_line2_prefix("Steril: "),
        progress_before,
        "no progress after emergency"
    );
    assert_eq!(task.sink().status.last(Topic::CycleStep), Some("URGENCE"));
    assert!(!task.sink().display.contains("Pret", "Attente..."));
}

#[test]
fn stop_then_restart_begins_at_first_step() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    task.apply(cmd(CommandKind::StartCycle));
    run(&mut task, 0, 8_000, TICK_MS);
    task.apply(cmd(CommandKind::StopCycle));
    task.tick(8_100);
    assert_eq!(task.state().current_step, Step::Idle);

    task.apply(cmd(CommandKind::StartCycle));
    task.tick(9_000);
    assert_eq!(task.state().current_step, Step::ExtractAir);
    task.tick(11_900);
    assert_eq!(task.state().current_step, Step::ExtractAir);
    task.tick(12_000);
    assert_eq!(task.state().current_step, Step::StopAir);
}

#[test]
fn sterile_door_opens_once_authorized_then_authorization_is_spent() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    task.apply(cmd(CommandKind::StartCycle));
    run(&mut task, 0, 32_900, TICK_MS);

    let denied = task.apply(cmd(CommandKind::OpenSterileDoor));
    assert!(matches!(denied.status, passbox::app::service::ApplyStatus::Denied(_)));
    assert_eq!(
        task.sink().status.last(Topic::CycleStep),
        Some("Erreur: cycle non termine")
    );

    task.tick(33_000);
    assert!(task.state().sterile_access_authorized);
    task.apply(cmd(CommandKind::OpenSterileDoor));
    let s = task.state();
    assert!(s.sterile_door_open);
    assert!(!s.sterile_access_authorized);
    assert_eq!(task.sink().status.last(Topic::SterileDoor), Some("true"));
}

#[test]
fn new_cycle_during_hold_suppresses_ready_message() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    task.apply(cmd(CommandKind::StartCycle));
    run(&mut task, 0, 35_000, TICK_MS);
    task.apply(cmd(CommandKind::StartCycle));
    run(&mut task, 35_100, 38_000, TICK_MS);
    assert!(!task.sink().display.contains("Pret", "Attente..."));
    assert!(task.state().cycle_running);
}

#[test]
fn stop_during_authorization_step_revokes_access() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    task.apply(cmd(CommandKind::StartCycle));
    run(&mut task, 0, 33_500, TICK_MS);
    assert_eq!(task.state().current_step, Step::AuthorizeSterile);
    assert!(task.state().sterile_access_authorized);

    task.apply(cmd(CommandKind::StopCycle));
    let s = task.state();
    assert!(!s.cycle_running);
    assert!(!s.sterile_access_authorized);
    assert_eq!(task.sink().status.last(Topic::CycleStep), Some("Arrete"));

    // The abandoned run's grant is not replayed by later ticks.
    run(&mut task, 33_600, 40_000, TICK_MS);
    assert!(!task.state().sterile_access_authorized);
}

#[test]
fn emergency_during_authorization_step_revokes_access() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    task.apply(cmd(CommandKind::StartCycle));
    run(&mut task, 0, 33_500, TICK_MS);
    assert!(task.state().sterile_access_authorized);

    task.apply(cmd(CommandKind::ActivateEmergency));
    assert!(!task.state().sterile_access_authorized);
    task.apply(cmd(CommandKind::DeactivateEmergency));
    assert!(!task.state().sterile_access_authorized);
}

#[test]
fn emergency_after_completion_revokes_access() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    task.apply(cmd(CommandKind::StartCycle));
    run(&mut task, 0, 36_000, TICK_MS);
    let s = task.state();
    assert!(!s.cycle_running);
    assert!(s.sterile_access_authorized);

    task.apply(cmd(CommandKind::ActivateEmergency));
    let s = task.state();
    assert!(s.emergency_active);
    assert!(!s.sterile_access_authorized);

    task.apply(cmd(CommandKind::DeactivateEmergency));
    run(&mut task, 36_100, 40_000, TICK_MS);
    assert!(!task.state().sterile_access_authorized);
}
