//! Temporal difference updates and ε-greedy selection

mod common;

use common::{action, board, key};
use rand::{SeedableRng, rngs::StdRng};
use tetrad::{
    Action, Board, Error, StateKey,
    ports::Learner,
    q_learning::{Hyperparameters, QLearningAgent, SarsaAgent, TrainingMetadata},
};

const EPS: f64 = 1e-12;

fn params() -> Hyperparameters {
    Hyperparameters::new(0.5, 0.9, 0.1)
}

/// Previous state, previous action, and a successor with three open cells
/// valued 0.2, 0.5 and 0.1.
fn seeded<L: Learner>(agent: &mut L) -> (StateKey, Action, StateKey) {
    let prev = key("XOXO XOXO OXOX ----");
    let next = key("XOXO XOXO OXOX O---");
    let table = agent.core_mut().q_table_mut();
    table.set(action(3, 1), next.clone(), 0.2);
    table.set(action(3, 2), next.clone(), 0.5);
    table.set(action(3, 3), next.clone(), 0.1);
    (prev, action(3, 0), next)
}

#[test]
fn q_learning_bootstraps_off_the_best_successor_value() {
    let mut agent = QLearningAgent::new(params());
    let (prev, prev_action, next) = seeded(&mut agent);

    // The selected successor action does not matter off-policy
    agent.update(&prev, prev_action, Some((&next, action(3, 3))), 0.0);

    assert!((agent.value(prev_action, &prev) - 0.225).abs() < EPS);
    assert_eq!(agent.rewards(), &[0.0]);
}

#[test]
fn sarsa_bootstraps_off_the_selected_successor_action() {
    let mut agent = SarsaAgent::new(params());
    let (prev, prev_action, next) = seeded(&mut agent);

    agent.update(&prev, prev_action, Some((&next, action(3, 3))), 0.0);

    assert!((agent.value(prev_action, &prev) - 0.045).abs() < EPS);
}

#[test]
fn terminal_update_ignores_discount() {
    for gamma in [0.0, 0.9, 0.99] {
        let mut q = QLearningAgent::new(Hyperparameters::new(0.5, gamma, 0.1));
        let mut sarsa = SarsaAgent::new(Hyperparameters::new(0.5, gamma, 0.1));
        let state = key("OO-- XX-- X--- ----");
        let winning = action(0, 2);

        for agent in [&mut q as &mut dyn Learner, &mut sarsa] {
            agent.core_mut().q_table_mut().set(winning, state.clone(), 0.2);
            agent.update(&state, winning, None, 1.0);
            assert!((agent.value(winning, &state) - 0.6).abs() < EPS);
            assert_eq!(agent.rewards(), &[1.0]);
        }
    }
}

#[test]
fn lookups_do_not_create_entries() {
    let agent = QLearningAgent::new(params());
    assert_eq!(agent.value(action(2, 2), &Board::new().state_key()), 0.0);
    assert!(agent.q_table().is_empty());
}

#[test]
fn epsilon_decays_geometrically_per_selection() {
    let mut agent = SarsaAgent::new(Hyperparameters::new(0.5, 0.9, 0.4).with_eps_decay(0.05));
    let mut rng = StdRng::seed_from_u64(11);
    let board = Board::new();

    for _ in 0..25 {
        agent.select_action(&board, &mut rng).unwrap();
    }

    let expected = 0.4 * 0.95_f64.powi(25);
    assert!((agent.epsilon() - expected).abs() < 1e-9);
}

#[test]
fn greedy_selection_picks_the_unique_best_action() {
    let mut agent = QLearningAgent::new(Hyperparameters::new(0.5, 0.9, 0.0));
    let board = board("X--- ---- ---- ----");
    agent
        .core_mut()
        .q_table_mut()
        .set(action(2, 3), board.state_key(), 0.7);
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..50 {
        assert_eq!(agent.select_action(&board, &mut rng).unwrap(), action(2, 3));
    }
}

#[test]
fn greedy_ties_are_broken_at_random() {
    let mut agent = QLearningAgent::new(Hyperparameters::new(0.5, 0.9, 0.0));
    let board = board("XOXO XOXO OXOX O---");
    let mut rng = StdRng::seed_from_u64(2);

    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
        seen.insert(agent.select_action(&board, &mut rng).unwrap());
    }
    assert_eq!(seen.len(), 3);
}

#[test]
fn exploration_only_picks_legal_actions() {
    let mut agent = SarsaAgent::new(Hyperparameters::new(0.5, 0.9, 1.0));
    let board = board("XOXO XOXO OX-X ----");
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..200 {
        let chosen = agent.select_action(&board, &mut rng).unwrap();
        assert!(board.is_empty(chosen));
    }
}

#[test]
fn full_board_has_no_action_to_select() {
    let mut agent = QLearningAgent::new(params());
    let full = board("XXOO OOXX XXOO OOXX");
    let mut rng = StdRng::seed_from_u64(4);
    assert!(matches!(
        agent.select_action(&full, &mut rng),
        Err(Error::NoLegalActions)
    ));
}

#[test]
fn reloaded_agent_selects_identically() {
    let mut agent = QLearningAgent::new(Hyperparameters::new(0.5, 0.9, 0.3));
    let (prev, prev_action, next) = seeded(&mut agent);
    agent.update(&prev, prev_action, Some((&next, action(3, 1))), 0.0);

    let saved = agent.to_saved(TrainingMetadata::default());
    let mut restored = saved.to_agent().unwrap().into_box();
    assert_eq!(restored.q_table(), agent.q_table());
    assert_eq!(restored.rewards(), agent.rewards());

    let board = board("XOXO XOXO OXOX O---");
    let mut rng_a = StdRng::seed_from_u64(9);
    let mut rng_b = StdRng::seed_from_u64(9);
    for _ in 0..20 {
        assert_eq!(
            agent.select_action(&board, &mut rng_a).unwrap(),
            restored.select_action(&board, &mut rng_b).unwrap()
        );
    }
    assert_eq!(agent.epsilon(), restored.epsilon());
}
