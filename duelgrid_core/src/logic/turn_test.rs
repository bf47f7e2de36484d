use crate::logic::board::{MatchState, Team};
use crate::logic::generator::TeamGenerator;
use crate::logic::rules::{Rejection, RejectionKind};

fn fresh_match() -> MatchState {
    MatchState::new_match(&mut TeamGenerator::new())
}

#[test]
fn test_end_turn_resets_incoming_team_only() {
    let mut state = fresh_match();
    // A has spent some resources, B is mid-way through a previous turn.
    for unit in &mut state.units {
        unit.moves_left = 0;
        unit.has_attacked = true;
    }
    let snapshot_a: Vec<_> = state
        .units
        .iter()
        .filter(|u| u.team == Team::A)
        .cloned()
        .collect();

    let next = state.end_turn(Team::A).unwrap();

    assert_eq!(next.turn, Team::B);
    for unit in next.units.iter().filter(|u| u.team == Team::B) {
        assert_eq!(unit.moves_left, unit.archetype().unwrap().move_range);
        assert!(!unit.has_attacked);
    }
    let after_a: Vec<_> = next.units.iter().filter(|u| u.team == Team::A).cloned().collect();
    assert_eq!(after_a, snapshot_a);
}

#[test]
fn test_end_turn_skips_dead_units() {
    let mut state = fresh_match();
    let fallen = state.units.iter_mut().find(|u| u.team == Team::B).unwrap();
    fallen.hp = 0;
    fallen.moves_left = 0;
    fallen.has_attacked = true;
    let fallen_id = fallen.id;

    let next = state.end_turn(Team::A).unwrap();
    let fallen = next.unit(fallen_id).unwrap();
    assert_eq!(fallen.moves_left, 0);
    assert!(fallen.has_attacked);
}

#[test]
fn test_end_turn_out_of_turn() {
    let state = fresh_match();
    let before = state.clone();

    let result = state.end_turn(Team::B);
    assert_eq!(
        result,
        Err(Rejection::NotYourTurn {
            acting: Team::B,
            turn: Team::A
        })
    );
    assert_eq!(state, before);
}

#[test]
fn test_end_turn_after_win_is_rejected() {
    let mut state = fresh_match();
    assert!(state.declare_winner(Team::A));

    let result = state.end_turn(Team::A);
    assert_eq!(result.map_err(|r| r.kind()), Err(RejectionKind::TurnViolation));
}

#[test]
fn test_winner_is_sticky() {
    let mut state = fresh_match();
    assert!(state.declare_winner(Team::B));
    assert!(!state.declare_winner(Team::A));
    assert_eq!(state.winner, Some(Team::B));
}

#[test]
fn test_turns_alternate() {
    let state = fresh_match();
    let b = state.end_turn(Team::A).unwrap();
    let a = b.end_turn(Team::B).unwrap();
    assert_eq!(a.turn, Team::A);
    assert_eq!(a.winner, None);
}
