//! Session module - two boards, cross-board rules, tick orchestration
//!
//! The session owns both boards and every timer. Cross-board effects (the
//! two-line gift, the global slowdown) are resolved here from lock outcomes,
//! so neither board ever holds a reference to the other. All activity runs
//! as discrete scheduler deadlines dispatched to completion one at a time.

pub mod scheduler;

use crate::core::snapshot::SessionSnapshot;
use crate::core::{Board, SimpleRng};
use crate::player::AutomatedPlayer;
use crate::session::scheduler::{Scheduler, TimerKind};
use crate::types::{
    GameAction, PieceKind, SessionState, Side, RAINBOW_DURATION_MS, RAINBOW_INTERVAL_MS,
    SLOWDOWN_DURATION_MS, THINKING_DELAY_MS,
};

pub struct GameSession {
    human: Board,
    machine: Board,
    player: AutomatedPlayer,
    scheduler: Scheduler,
    /// Session-level draws (gift kinds, restart reseeding).
    rng: SimpleRng,
    state: SessionState,
    winner: Option<Side>,
}

impl GameSession {
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let human_seed = rng.next_u32();
        let machine_seed = rng.next_u32();
        Self {
            human: Board::new(human_seed),
            machine: Board::new(machine_seed),
            player: AutomatedPlayer::new(),
            scheduler: Scheduler::new(),
            rng,
            state: SessionState::Ready,
            winner: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn board(&self, side: Side) -> &Board {
        match side {
            Side::Human => &self.human,
            Side::Machine => &self.machine,
        }
    }

    fn board_mut(&mut self, side: Side) -> &mut Board {
        match side {
            Side::Human => &mut self.human,
            Side::Machine => &mut self.machine,
        }
    }

    /// Spawn both boards' first pieces and arm all periodic activity.
    pub fn start(&mut self) {
        if self.state != SessionState::Ready {
            return;
        }
        if !self.human.new_piece(None) {
            self.terminate(Side::Human);
            return;
        }
        if !self.machine.new_piece(None) {
            self.terminate(Side::Machine);
            return;
        }
        self.state = SessionState::Running;

        let human_delay = self.human.fall_delay_ms() as u64;
        let machine_delay = self.machine.fall_delay_ms() as u64;
        self.scheduler.schedule_in(human_delay, TimerKind::Fall(Side::Human));
        self.scheduler
            .schedule_in(machine_delay, TimerKind::Fall(Side::Machine));
        self.scheduler
            .schedule_in(machine_delay, TimerKind::MachineDecide);
        self.scheduler
            .schedule_in(RAINBOW_INTERVAL_MS, TimerKind::RainbowStart);

        log::info!("session started");
    }

    /// Running <-> Paused. The scheduler clock freezes while paused, so no
    /// deadline is lost, fires early, or piles up as a backlog.
    pub fn toggle_pause(&mut self) {
        match self.state {
            SessionState::Running => {
                self.state = SessionState::Paused;
                log::info!("session paused");
            }
            SessionState::Paused => {
                self.state = SessionState::Running;
                log::info!("session resumed");
            }
            _ => {}
        }
    }

    /// Tear down unconditionally and begin a fresh run.
    pub fn restart(&mut self) {
        self.scheduler = Scheduler::new();
        self.player.cancel();
        let human_seed = self.rng.next_u32();
        let machine_seed = self.rng.next_u32();
        self.human = Board::new(human_seed);
        self.machine = Board::new(machine_seed);
        self.winner = None;
        self.state = SessionState::Ready;
        log::info!("session restarted");
        self.start();
    }

    /// Advance the session clock. Does nothing unless Running.
    pub fn tick(&mut self, elapsed_ms: u64) {
        if self.state != SessionState::Running {
            return;
        }
        for kind in self.scheduler.advance(elapsed_ms) {
            if self.state != SessionState::Running {
                break;
            }
            self.dispatch(kind);
        }
    }

    fn dispatch(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::Fall(side) => self.fall_tick(side),
            TimerKind::MachineDecide => self.machine_decide(),
            TimerKind::MachineCommit => self.player.commit(&mut self.machine),
            TimerKind::SlowdownReset(side) => {
                self.board_mut(side).reset_speed();
                log::debug!("{} board back to normal speed", side.as_str());
            }
            TimerKind::RainbowStart => {
                self.human.set_rainbow(true);
                self.machine.set_rainbow(true);
                self.scheduler
                    .schedule_in(RAINBOW_DURATION_MS, TimerKind::RainbowEnd);
                log::info!("rainbow mode on");
            }
            TimerKind::RainbowEnd => {
                self.human.set_rainbow(false);
                self.machine.set_rainbow(false);
                self.scheduler
                    .schedule_in(RAINBOW_INTERVAL_MS, TimerKind::RainbowStart);
                log::info!("rainbow mode off");
            }
        }
    }

    /// One gravity step for a board; locks and resolves when grounded.
    /// Reschedules itself at the board's (possibly just-updated) fall delay.
    fn fall_tick(&mut self, side: Side) {
        if !self.board_mut(side).try_move(0, 1) {
            self.lock_and_resolve(side);
            if self.state != SessionState::Running {
                return;
            }
        }
        let delay = self.board(side).fall_delay_ms() as u64;
        self.scheduler.schedule_in(delay, TimerKind::Fall(side));
    }

    /// Start a machine search when the player is idle; the resulting moves
    /// execute after the thinking delay.
    fn machine_decide(&mut self) {
        if self.player.start_decision(&self.machine) {
            self.scheduler
                .schedule_in(THINKING_DELAY_MS, TimerKind::MachineCommit);
        }
        let delay = self.machine.fall_delay_ms() as u64;
        self.scheduler.schedule_in(delay, TimerKind::MachineDecide);
    }

    /// Lock a board's piece, evaluate the cross-board rules on the outcome,
    /// and request the next piece. A failed request terminates the session
    /// with the opposing board as winner.
    fn lock_and_resolve(&mut self, side: Side) {
        let Some(outcome) = self.board_mut(side).lock_piece() else {
            return;
        };

        if outcome.lines_cleared == 2 {
            let kind = self.rng.choose(&PieceKind::EASY);
            self.board_mut(side.opponent()).gift_queued(kind);
            log::info!(
                "{} cleared 2 lines: {} queued for {}",
                side.as_str(),
                kind.as_str(),
                side.opponent().as_str()
            );
        }

        if outcome.crossed_level_step() {
            self.human.apply_slowdown();
            self.machine.apply_slowdown();
            self.scheduler
                .schedule_in(SLOWDOWN_DURATION_MS, TimerKind::SlowdownReset(Side::Human));
            self.scheduler.schedule_in(
                SLOWDOWN_DURATION_MS,
                TimerKind::SlowdownReset(Side::Machine),
            );
            log::info!(
                "{} reached {} points: both boards slowed",
                side.as_str(),
                outcome.score_after
            );
        }

        if !self.board_mut(side).new_piece(None) {
            self.terminate(side);
        }
    }

    fn terminate(&mut self, loser: Side) {
        self.state = SessionState::Terminated;
        self.winner = Some(loser.opponent());
        self.scheduler.cancel_all();
        self.player.cancel();
        log::info!(
            "{} board is out of room: {} wins",
            loser.as_str(),
            loser.opponent().as_str()
        );
    }

    /// Apply a gameplay command to the keyboard-driven board. A no-op unless
    /// the session is Running and that board is still alive.
    pub fn handle_action(&mut self, action: GameAction) {
        if self.state != SessionState::Running || self.human.game_over() {
            return;
        }
        match action {
            GameAction::MoveLeft => {
                self.human.try_move(-1, 0);
            }
            GameAction::MoveRight => {
                self.human.try_move(1, 0);
            }
            GameAction::SoftDrop => {
                self.human.try_move(0, 1);
            }
            GameAction::Rotate => {
                self.human.try_rotate();
            }
            GameAction::HardDrop => {
                while self.human.try_move(0, 1) {}
                self.lock_and_resolve(Side::Human);
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            human: self.human.snapshot(),
            machine: self.machine.snapshot(),
            state: self.state,
            winner: self.winner,
            now_ms: self.scheduler.now_ms(),
        }
    }

    #[cfg(test)]
    pub(crate) fn board_for_tests(&mut self, side: Side) -> &mut Board {
        self.board_mut(side)
    }

    #[cfg(test)]
    pub(crate) fn scheduler_for_tests(&self) -> &Scheduler {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BOARD_HEIGHT, BOARD_WIDTH, SLOWDOWN_DENOMINATOR, SLOWDOWN_NUMERATOR};

    fn running_session() -> GameSession {
        let mut session = GameSession::new(12345);
        session.start();
        assert_eq!(session.state(), SessionState::Running);
        session
    }

    /// Park the human piece as a vertical I against the left wall so hard
    /// drops never interfere with rows rigged on the right side.
    fn park_human_piece(session: &mut GameSession) {
        let board = session.board_for_tests(Side::Human);
        assert!(board.new_piece(Some(PieceKind::I)));
        for _ in 0..BOARD_WIDTH {
            if !board.try_move(-1, 0) {
                break;
            }
        }
    }

    #[test]
    fn test_start_spawns_both_boards() {
        let session = running_session();
        assert!(session.board(Side::Human).current().is_some());
        assert!(session.board(Side::Machine).current().is_some());
        assert!(session.board(Side::Human).queued_kind().is_some());
        assert!(session.board(Side::Machine).queued_kind().is_some());
    }

    #[test]
    fn test_actions_are_noops_before_start() {
        let mut session = GameSession::new(1);
        session.handle_action(GameAction::HardDrop);
        assert_eq!(session.state(), SessionState::Ready);
        assert!(session.board(Side::Human).current().is_none());
    }

    #[test]
    fn test_pause_freezes_clock_and_deadlines() {
        let mut session = running_session();
        let before = session.scheduler_for_tests().remaining_ms(TimerKind::Fall(Side::Human));
        session.toggle_pause();
        assert_eq!(session.state(), SessionState::Paused);

        // Ticks while paused change nothing
        session.tick(5_000);
        let after = session.scheduler_for_tests().remaining_ms(TimerKind::Fall(Side::Human));
        assert_eq!(before, after);

        session.toggle_pause();
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn test_two_line_clear_gifts_easy_kind_to_opponent() {
        let mut session = running_session();

        // Bottom two rows complete except where a vertical I will land.
        {
            let board = session.board_for_tests(Side::Human);
            board.fill_row_except(BOARD_HEIGHT as i8 - 1, &[0]);
            board.fill_row_except(BOARD_HEIGHT as i8 - 2, &[0]);
            assert!(board.new_piece(Some(PieceKind::I)));
            for _ in 0..BOARD_WIDTH {
                if !board.try_move(-1, 0) {
                    break;
                }
            }
        }

        session.handle_action(GameAction::HardDrop);

        let human = session.board(Side::Human);
        assert_eq!(human.score(), 150);
        let gifted = session
            .board(Side::Machine)
            .queued_kind()
            .expect("queued piece");
        assert!(
            PieceKind::EASY.contains(&gifted),
            "gifted kind {:?} not easy",
            gifted
        );
    }

    #[test]
    fn test_level_step_crossing_slows_both_boards_then_reverts_once() {
        let mut session = running_session();

        let human_base = session.board(Side::Human).fall_delay_ms();
        let machine_base = session.board(Side::Machine).fall_delay_ms();

        // 950 points, then a 2-line clear (+150) crosses 1000.
        {
            let board = session.board_for_tests(Side::Human);
            board.set_score(950);
            board.fill_row_except(BOARD_HEIGHT as i8 - 1, &[0]);
            board.fill_row_except(BOARD_HEIGHT as i8 - 2, &[0]);
        }
        park_human_piece(&mut session);
        session.handle_action(GameAction::HardDrop);

        let human = session.board(Side::Human);
        let machine = session.board(Side::Machine);
        assert_eq!(human.score(), 1100);
        assert_eq!(human.level(), 2);
        assert!(human.is_slowed());
        assert!(machine.is_slowed());
        // 20% slower than each board's own (level-adjusted) base
        let human_level2_base = 950;
        assert_eq!(
            human.fall_delay_ms(),
            human_level2_base * SLOWDOWN_NUMERATOR / SLOWDOWN_DENOMINATOR
        );
        assert_eq!(
            machine.fall_delay_ms(),
            machine_base * SLOWDOWN_NUMERATOR / SLOWDOWN_DENOMINATOR
        );
        assert_ne!(human.fall_delay_ms(), human_base);

        // Reverts exactly once after the slowdown window
        session.tick(SLOWDOWN_DURATION_MS);
        assert!(!session.board(Side::Human).is_slowed());
        assert!(!session.board(Side::Machine).is_slowed());
        assert_eq!(session.board(Side::Human).fall_delay_ms(), 950);
        assert_eq!(session.board(Side::Machine).fall_delay_ms(), machine_base);
        assert_eq!(
            session
                .scheduler_for_tests()
                .remaining_ms(TimerKind::SlowdownReset(Side::Human)),
            None
        );
    }

    #[test]
    fn test_overlapping_slowdowns_extend_the_window() {
        let mut session = running_session();

        let trigger_cross = |session: &mut GameSession, score: u32| {
            {
                let board = session.board_for_tests(Side::Human);
                board.set_score(score);
                board.fill_row_except(BOARD_HEIGHT as i8 - 1, &[0]);
                board.fill_row_except(BOARD_HEIGHT as i8 - 2, &[0]);
            }
            park_human_piece(session);
            session.handle_action(GameAction::HardDrop);
        };

        trigger_cross(&mut session, 950);
        session.tick(SLOWDOWN_DURATION_MS / 2);
        assert!(session.board(Side::Human).is_slowed());

        // Second crossing mid-window replaces the reset deadline
        trigger_cross(&mut session, 1950);
        session.tick(SLOWDOWN_DURATION_MS / 2);
        assert!(
            session.board(Side::Human).is_slowed(),
            "reset fired early despite replacement"
        );
        session.tick(SLOWDOWN_DURATION_MS / 2);
        assert!(!session.board(Side::Human).is_slowed());
    }

    #[test]
    fn test_machine_decides_then_commits_after_thinking_delay() {
        let mut session = running_session();

        let decide_delay = session
            .scheduler_for_tests()
            .remaining_ms(TimerKind::MachineDecide)
            .expect("decide scheduled");
        session.tick(decide_delay);

        assert!(
            session
                .scheduler_for_tests()
                .remaining_ms(TimerKind::MachineCommit)
                .is_some(),
            "commit not scheduled after decide"
        );

        session.tick(THINKING_DELAY_MS);
        // The committed piece was hard-dropped to its landing position.
        let machine = session.board(Side::Machine);
        let piece = machine.current().expect("current piece");
        assert!(!machine.piece_fits(&piece, 0, 1));
    }

    #[test]
    fn test_machine_board_overflow_terminates_with_human_winner() {
        let mut session = running_session();

        // Wall off the spawn area so the next machine piece cannot be
        // placed. Column 9 stays open so the lock clears no rows.
        {
            let board = session.board_for_tests(Side::Machine);
            for y in 0..=4 {
                for x in 0..=8 {
                    board.set(x, y, Some(PieceKind::T));
                }
            }
        }

        // Next machine fall tick fails to move, locks, and cannot respawn.
        let fall_delay = session
            .scheduler_for_tests()
            .remaining_ms(TimerKind::Fall(Side::Machine))
            .expect("fall scheduled");
        session.tick(fall_delay);

        assert_eq!(session.state(), SessionState::Terminated);
        assert_eq!(session.winner(), Some(Side::Human));

        // Terminated sessions ignore further ticks and input.
        let score = session.board(Side::Human).score();
        session.tick(60_000);
        session.handle_action(GameAction::HardDrop);
        assert_eq!(session.board(Side::Human).score(), score);
        assert_eq!(session.state(), SessionState::Terminated);
    }

    #[test]
    fn test_restart_resets_boards_from_any_state() {
        let mut session = running_session();
        {
            let board = session.board_for_tests(Side::Human);
            board.set_score(2500);
            board.set(0, 19, Some(PieceKind::Z));
        }
        session.toggle_pause();

        session.restart();
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.winner(), None);
        let human = session.board(Side::Human);
        assert_eq!(human.score(), 0);
        assert_eq!(human.level(), 1);
        assert_eq!(human.get(0, 19), Some(None));
        assert!(human.current().is_some());
    }

    /// Empty both grids so a long simulated run never ends in a loss.
    fn wipe_grids(session: &mut GameSession) {
        for side in [Side::Human, Side::Machine] {
            let board = session.board_for_tests(side);
            for y in 0..BOARD_HEIGHT as i8 {
                for x in 0..BOARD_WIDTH as i8 {
                    board.set(x, y, None);
                }
            }
        }
    }

    /// Drive the session for `total` virtual milliseconds in 1 s steps.
    fn run_for(session: &mut GameSession, total: u64) {
        let mut remaining = total;
        while remaining > 0 {
            let step = remaining.min(1000);
            session.tick(step);
            wipe_grids(session);
            remaining -= step;
        }
    }

    #[test]
    fn test_rainbow_window_toggles_both_boards() {
        let mut session = running_session();
        assert!(!session.board(Side::Human).rainbow());

        run_for(&mut session, RAINBOW_INTERVAL_MS);
        assert_eq!(session.state(), SessionState::Running);
        assert!(session.board(Side::Human).rainbow());
        assert!(session.board(Side::Machine).rainbow());

        run_for(&mut session, RAINBOW_DURATION_MS);
        assert!(!session.board(Side::Human).rainbow());
        assert!(!session.board(Side::Machine).rainbow());

        // The window re-arms for the next interval
        assert!(session
            .scheduler_for_tests()
            .remaining_ms(TimerKind::RainbowStart)
            .is_some());
    }
}
