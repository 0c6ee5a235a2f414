//! Tick-level behavior of the training session

mod common;

use common::{park_ball_mid_field, seeded_session, serve_into_left_goal};
use pong_rl::{
    pipeline::{TrainingConfig, TrainingSession, Transition},
    q_learning::{ExplorationSchedule, LearningParams},
    types::{Action, DiscreteState, PaddleId},
};

#[test]
fn test_first_tick_credits_default_transition() {
    let mut session = seeded_session(11);
    for paddle in PaddleId::BOTH {
        assert_eq!(session.previous(paddle), Transition::default());
    }

    let report = session.tick();

    let origin = DiscreteState::default();
    for paddle in PaddleId::BOTH {
        let table = session.agent(paddle).q_table();
        assert_eq!(table.entry(origin, Action::Stay), Some(0.0));
        assert_eq!(table.len(), 1);
        assert_eq!(
            session.previous(paddle),
            Transition {
                state: report.states[paddle.slot()],
                action: report.actions[paddle.slot()],
            }
        );
    }
}

#[test]
fn test_one_update_per_agent_per_tick() {
    let mut session = seeded_session(5);
    for _ in 0..300 {
        let before = PaddleId::BOTH.map(|p| session.agent(p).q_table().len());
        let report = session.tick();
        for paddle in PaddleId::BOTH {
            let after = session.agent(paddle).q_table().len();
            assert!(after == before[paddle.slot()] || after == before[paddle.slot()] + 1);
            assert_eq!(session.previous(paddle).state, report.states[paddle.slot()]);
            assert_eq!(session.previous(paddle).action, report.actions[paddle.slot()]);
        }
    }
    assert_eq!(session.tick_count(), 300);
}

#[test]
fn test_point_reward_credits_previous_decision() {
    // α = 1 and γ = 0 make the updated value equal the reward
    let config = TrainingConfig::default()
        .with_seed(21)
        .with_learning(LearningParams {
            learning_rate: 1.0,
            discount_factor: 0.0,
        });
    let mut session = TrainingSession::new(&config).unwrap();

    park_ball_mid_field(&mut session);
    let setup = session.tick();
    assert_eq!(setup.scorer, None);

    serve_into_left_goal(&mut session);
    let scoring = session.tick();
    assert_eq!(scoring.scorer, Some(PaddleId::Right));
    assert!(scoring.contacts.is_empty());
    assert_eq!(scoring.rewards[PaddleId::Left], -1.0);
    assert_eq!(scoring.rewards[PaddleId::Right], 1.0);

    let left = session.agent(PaddleId::Left).q_table();
    let right = session.agent(PaddleId::Right).q_table();
    assert_eq!(left.get(setup.states[0], setup.actions[0]), -1.0);
    assert_eq!(right.get(setup.states[1], setup.actions[1]), 1.0);
}

#[test]
fn test_point_resets_ball_and_counts_episode() {
    let mut session = seeded_session(8);
    serve_into_left_goal(&mut session);

    session.tick();

    let state = session.state();
    let arena = session.arena();
    assert_eq!(state.score(PaddleId::Right), 1);
    assert_eq!(state.score(PaddleId::Left), 0);
    assert_eq!(state.episode, 1);
    assert_eq!(state.ball.x, arena.width / 2.0);
    assert_eq!(state.ball.y, arena.height / 2.0);
    assert_eq!(state.ball.vx, 5.0);
    assert!(state.ball.vy >= -arena.ball_speed_y && state.ball.vy < arena.ball_speed_y);
}

#[test]
fn test_exploration_decays_after_exactly_100_episodes() {
    let mut session = seeded_session(3);
    session.state_mut().episode = 99;
    serve_into_left_goal(&mut session);

    let report = session.tick();

    assert_eq!(session.state().episode, 100);
    assert!(report.exploration_decayed);
    for paddle in PaddleId::BOTH {
        assert!((session.agent(paddle).epsilon() - 0.099).abs() < 1e-12);
    }

    // No further decay until the next multiple of the interval
    park_ball_mid_field(&mut session);
    let report = session.tick();
    assert!(!report.exploration_decayed);
    serve_into_left_goal(&mut session);
    let report = session.tick();
    assert_eq!(session.state().episode, 101);
    assert!(!report.exploration_decayed);
    for paddle in PaddleId::BOTH {
        assert!((session.agent(paddle).epsilon() - 0.099).abs() < 1e-12);
    }
}

#[test]
fn test_decay_stalls_when_one_agent_at_floor() {
    let mut session = seeded_session(4);
    session.agent_mut(PaddleId::Left).set_epsilon(0.01);
    session.state_mut().episode = 199;
    serve_into_left_goal(&mut session);

    let report = session.tick();

    assert!(!report.exploration_decayed);
    assert_eq!(session.agent(PaddleId::Left).epsilon(), 0.01);
    assert_eq!(session.agent(PaddleId::Right).epsilon(), 0.1);
}

#[test]
fn test_custom_decay_interval() {
    let exploration = ExplorationSchedule {
        interval: 1,
        ..ExplorationSchedule::default()
    };
    let config = TrainingConfig::default()
        .with_seed(2)
        .with_exploration(exploration);
    let mut session = TrainingSession::new(&config).unwrap();

    for _ in 0..3 {
        serve_into_left_goal(&mut session);
        assert!(session.tick().exploration_decayed);
    }
    for paddle in PaddleId::BOTH {
        assert!((session.agent(paddle).epsilon() - 0.097).abs() < 1e-12);
    }
}

#[test]
fn test_paddles_stay_in_bounds_over_long_run() {
    let mut session = seeded_session(99);
    let max_y = session.arena().max_paddle_y();
    for _ in 0..5_000 {
        session.tick();
        for paddle in PaddleId::BOTH {
            let y = session.state().paddle_y(paddle);
            assert!((0.0..=max_y).contains(&y), "paddle {paddle} at {y}");
        }
    }
}

#[test]
fn test_same_seed_same_trajectory() {
    let mut first = seeded_session(1234);
    let mut second = seeded_session(1234);
    for _ in 0..1_000 {
        assert_eq!(first.tick(), second.tick());
    }
    assert_eq!(first.frame(), second.frame());
}
