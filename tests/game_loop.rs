//! End-to-end runs of the game loop with a manual clock and keyboard

use std::time::Duration;

use glam::IVec2;
use ping_pong::audio::{AudioCall, RecordingAudio, SoundId};
use ping_pong::render::RecordingRenderer;
use ping_pong::sim::{GamePhase, GameState, PlayerId};
use ping_pong::{GameLoop, Key, KeyboardState, LoopControl, ManualClock, MusicTrack, Tuning};

type TestLoop = GameLoop<ManualClock, KeyboardState, RecordingAudio, RecordingRenderer>;

fn step() -> Duration {
    Tuning::default().tick_duration()
}

fn new_loop(state: GameState) -> TestLoop {
    GameLoop::new(
        state,
        ManualClock::new(),
        KeyboardState::new(),
        RecordingAudio::default(),
        RecordingRenderer::default(),
    )
}

/// Run `ticks` frames, each exactly one tick long
fn run_ticks(game: &mut TestLoop, ticks: u32) -> LoopControl {
    for _ in 0..ticks {
        game.clock_mut().advance(step());
        if game.frame() == LoopControl::Exit {
            return LoopControl::Exit;
        }
    }
    LoopControl::Continue
}

fn tap(game: &mut TestLoop, key: Key) {
    game.input_mut().key_down(key);
    game.input_mut().key_up(key);
}

#[test]
fn menu_countdown_then_play() {
    let mut game = new_loop(GameState::new(Tuning::default(), 11));
    tap(&mut game, Key::Enter);

    run_ticks(&mut game, 1);
    assert!(matches!(
        game.state().phase,
        GamePhase::Countdown { remaining: 3, .. }
    ));
    assert_eq!(
        game.audio().calls,
        vec![
            AudioCall::Music(MusicTrack::Menu),
            AudioCall::StopMusic,
            AudioCall::Sound(SoundId::BallBounceTransition),
        ]
    );

    run_ticks(&mut game, 180);
    assert_eq!(game.state().phase, GamePhase::Playing);

    let frames = &game.renderer().frames;
    let first_playing = frames
        .iter()
        .find(|s| s.phase == GamePhase::Playing)
        .map(|s| s.tick);
    assert_eq!(first_playing, Some(181), "3000 ms of countdown at 60 Hz");

    let mut headlines: Vec<String> = frames.iter().filter_map(|s| s.headline()).collect();
    headlines.dedup();
    assert_eq!(
        headlines,
        vec!["Starting in 3", "Starting in 2", "Starting in 1"]
    );
    assert!(frames.iter().all(|s| s.ball.is_none() || s.phase == GamePhase::Playing));
    assert!(game.renderer().last().and_then(|s| s.ball).is_some());
    assert_eq!(
        game.audio().calls.last(),
        Some(&AudioCall::Music(MusicTrack::Game))
    );
}

#[test]
fn exit_from_menu() {
    let mut game = new_loop(GameState::new(Tuning::default(), 11));
    tap(&mut game, Key::Down);
    tap(&mut game, Key::Down);
    tap(&mut game, Key::Enter);

    assert_eq!(run_ticks(&mut game, 10), LoopControl::Exit);
    assert_eq!(game.state().time_ticks, 3);
    assert!(game.has_exited());
}

#[test]
fn pause_freezes_until_space() {
    let mut state = GameState::new(Tuning::default(), 5);
    state.phase = GamePhase::Playing;
    let mut game = new_loop(state);

    run_ticks(&mut game, 5);
    tap(&mut game, Key::Escape);
    run_ticks(&mut game, 1);
    assert_eq!(game.state().phase, GamePhase::Paused);
    let frozen = game.state().ball.rect;

    // Held paddle keys do nothing while paused
    game.input_mut().key_down(Key::W);
    run_ticks(&mut game, 30);
    assert_eq!(game.state().ball.rect, frozen);
    assert_eq!(
        game.renderer().last().and_then(|s| s.prompt()),
        Some("Press SPACE to continue")
    );

    game.input_mut().key_up(Key::W);
    tap(&mut game, Key::Space);
    run_ticks(&mut game, 1);
    assert_eq!(game.state().phase, GamePhase::Playing);
    assert_ne!(game.state().ball.rect, frozen);
    assert_eq!(
        game.state().left.rect.pos,
        game.state().tuning.paddle_spawn(ping_pong::sim::Side::Left),
        "released key leaves the paddle still"
    );
}

#[test]
fn match_point_ends_game_and_space_restarts() {
    let mut state = GameState::new(Tuning::default(), 9);
    state.phase = GamePhase::Playing;
    state.score.player2 = 4;
    state.ball.rect.pos = IVec2::new(2, 20);
    state.ball.vel = IVec2::new(-3, 0);
    let mut game = new_loop(state);

    run_ticks(&mut game, 1);
    assert_eq!(
        game.state().phase,
        GamePhase::GameOver {
            winner: PlayerId::Player2
        }
    );
    let last = game.renderer().last().cloned().expect("rendered");
    assert_eq!(last.headline().as_deref(), Some("GAME OVER - Player 2 Wins!"));
    assert_eq!(last.scoreboard(), "00 - 05");
    assert_eq!(game.audio().count(SoundId::GameOver), 1);

    // Frozen until Space
    run_ticks(&mut game, 20);
    assert_eq!(game.state().score.player2, 5);

    tap(&mut game, Key::Space);
    run_ticks(&mut game, 1);
    assert_eq!(game.state().phase, GamePhase::Playing);
    assert_eq!(game.state().score, Default::default());
    assert_eq!(
        game.audio().calls.last(),
        Some(&AudioCall::Music(MusicTrack::Game))
    );
}

#[test]
fn same_seed_same_script_same_frames() {
    fn play(seed: u64) -> Vec<ping_pong::sim::GameSnapshot> {
        let mut game = new_loop(GameState::new(Tuning::default(), seed));
        tap(&mut game, Key::Enter);
        run_ticks(&mut game, 200);
        game.input_mut().key_down(Key::S);
        game.input_mut().key_down(Key::Up);
        run_ticks(&mut game, 400);
        game.input_mut().key_up(Key::S);
        run_ticks(&mut game, 900);
        game.renderer().frames.clone()
    }

    let a = play(2024);
    let b = play(2024);
    assert_eq!(a.len(), 1500);
    assert_eq!(a, b);
}

#[test]
fn paddles_stay_inside_while_held() {
    let mut state = GameState::new(Tuning::default(), 1);
    state.phase = GamePhase::Playing;
    let mut game = new_loop(state);

    game.input_mut().key_down(Key::W);
    game.input_mut().key_down(Key::Down);
    run_ticks(&mut game, 60);

    let max_y = game.state().tuning.max_paddle_y();
    for snap in &game.renderer().frames {
        assert!((0..=max_y).contains(&snap.left_paddle.y()));
        assert!((0..=max_y).contains(&snap.right_paddle.y()));
    }
    let last = game.renderer().last().expect("rendered");
    // A point may have respawned the paddles mid-run, but never out of bounds
    if last.score == Default::default() {
        assert_eq!(last.left_paddle.y(), 0);
        assert_eq!(last.right_paddle.y(), max_y);
    }
}
