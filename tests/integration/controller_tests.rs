//! Interlock and emergency behaviour observed through the adapters.

use passbox::app::commands::{Command, CommandKind, Request, Source};
use passbox::app::events::Topic;
use passbox::app::service::ApplyStatus;
use passbox::channels::RequestChannel;
use passbox::interlock::DenyReason;

use super::mock_hw::rig;

fn cmd(kind: CommandKind) -> Request {
    Request::Command(Command::new(kind, Source::Remote))
}

#[test]
fn doors_are_never_open_together() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);

    task.apply(cmd(CommandKind::OpenContaminatedDoor));
    let out = task.apply(cmd(CommandKind::OpenSterileDoor));
    assert_eq!(out.status, ApplyStatus::Denied(DenyReason::ContaminatedDoorOpen));
    assert!(!task.state().sterile_door_open);

    let sink = task.sink();
    assert_eq!(sink.display.last(), Some(("REFUS STERILE", "Porte contam. ON")));
    assert_eq!(
        sink.status.last(Topic::CycleStep),
        Some("Erreur: inter-verrouillage")
    );

    task.apply(cmd(CommandKind::CloseContaminatedDoor));
    let out = task.apply(cmd(CommandKind::OpenSterileDoor));
    assert_eq!(out.status, ApplyStatus::Applied);
    assert_eq!(task.sink().display.last(), Some(("Porte sterile", "OUVERTE")));
}

#[test]
fn start_with_a_door_open_is_refused_without_state_change() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    task.apply(cmd(CommandKind::OpenSterileDoor));
    let before = task.state();

    let out = task.apply(cmd(CommandKind::StartCycle));
    assert_eq!(out.status, ApplyStatus::Denied(DenyReason::DoorsNotClosed));
    assert_eq!(task.state(), before);
    assert_eq!(task.sink().display.last(), Some(("ERREUR PORTES", "Fermer les 2")));
    assert_eq!(
        task.sink().status.last(Topic::CycleStep),
        Some("Erreur: portes ouvertes")
    );
}

#[test]
fn repeated_emergency_notifies_once() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    task.apply(cmd(CommandKind::ActivateEmergency));
    task.apply(cmd(CommandKind::ActivateEmergency));
    assert_eq!(task.sink().status.on(Topic::Emergency), vec!["true"]);
    assert_eq!(task.sink().display.frames.len(), 1);

    task.apply(cmd(CommandKind::DeactivateEmergency));
    task.apply(cmd(CommandKind::DeactivateEmergency));
    assert_eq!(task.sink().status.on(Topic::Emergency), vec!["true", "false"]);
    assert_eq!(task.sink().display.last(), Some(("Urgence OFF", "Etat normal")));
}

#[test]
fn emergency_blocks_doors_and_start() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    task.apply(cmd(CommandKind::ActivateEmergency));

    for kind in [
        CommandKind::OpenSterileDoor,
        CommandKind::OpenContaminatedDoor,
        CommandKind::StartCycle,
    ] {
        let out = task.apply(cmd(kind));
        assert_eq!(out.status, ApplyStatus::Denied(DenyReason::EmergencyActive));
    }
    assert_eq!(task.sink().display.last(), Some(("Refus: urgence", "MQTT")));

    // Closing is always allowed.
    let out = task.apply(cmd(CommandKind::CloseSterileDoor));
    assert_eq!(out.status, ApplyStatus::Applied);
}

#[test]
fn announce_publishes_full_status() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    task.apply(cmd(CommandKind::OpenContaminatedDoor));
    task.apply(Request::Announce);

    let status = &task.sink().status;
    assert_eq!(status.last(Topic::ContaminatedDoor), Some("true"));
    assert_eq!(status.last(Topic::SterileDoor), Some("false"));
    assert_eq!(status.last(Topic::Emergency), Some("false"));
    assert_eq!(status.last(Topic::CycleRunning), Some("false"));
    assert_eq!(status.last(Topic::CycleStep), Some("Systeme pret"));
    assert_eq!(
        task.sink().display.last(),
        Some(("MQTT OK", "Subscribe..."))
    );
}
