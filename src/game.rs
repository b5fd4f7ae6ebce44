use crate::{error::check_max_take, player::Player, Error, Move, Result, Row};

/// The rules a game is played with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub board_size: usize,
    pub max_take: usize,
}

impl Settings {
    pub fn new(board_size: usize, max_take: usize) -> Result<Settings> {
        if board_size < 1 {
            return Err(Error::InvalidParameter {
                name: "board size",
                value: 0,
            });
        }
        check_max_take(max_take)?;
        Ok(Settings {
            board_size,
            max_take,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            board_size: 10,
            max_take: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    InProgress,
    /// The player at index `loser` took the last stick.
    Over { loser: usize },
}

/// A game between two players, the first one moving first.
pub struct Game<'p> {
    settings: Settings,
    row: Row,
    players: [&'p mut dyn Player; 2],
    current: usize,
    history: Vec<Move>,
    state: GameState,
}

impl<'p> Game<'p> {
    pub fn new(settings: Settings, first: &'p mut dyn Player, second: &'p mut dyn Player) -> Self {
        Game {
            settings,
            row: Row::new(settings.board_size),
            players: [first, second],
            current: 0,
            history: vec![],
            state: GameState::InProgress,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn row(&self) -> &Row {
        &self.row
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Index of the player whose turn it is.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn player_name(&self, index: usize) -> &str {
        self.players[index].name()
    }

    /// Plays one turn: asks the current player for a move, checks it and applies it.
    pub fn step(&mut self) -> Result<GameState> {
        if let GameState::Over { .. } = self.state {
            return Err(Error::NoMovesAvailable);
        }
        let max_take = self.settings.max_take;
        let m = self.players[self.current].choose_move(&self.row, max_take)?;
        self.row.play(m, max_take)?;
        self.history.push(m);
        log::info!(
            "{} takes {}: {}",
            self.players[self.current].name(),
            m,
            self.row
        );

        if self.row.is_empty() {
            self.state = GameState::Over {
                loser: self.current,
            };
        } else {
            self.current = 1 - self.current;
        }
        Ok(self.state)
    }

    /// Plays until the row is empty, returning the index of the winner.
    pub fn play(&mut self) -> Result<usize> {
        loop {
            if let GameState::Over { loser } = self.step()? {
                return Ok(1 - loser);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{player::Computer, player::Human, Advisor, Evaluator, IllegalMove};
    use std::io::Cursor;

    #[test]
    fn settings_must_be_positive() {
        assert!(Settings::new(0, 3).is_err());
        assert!(Settings::new(10, 0).is_err());
        assert_eq!(Settings::new(10, 3).unwrap(), Settings::default());
    }

    #[test]
    fn perfect_first_player_wins_ten_sticks() {
        let evaluator = Evaluator::new();
        for seed in 0..5 {
            let mut first = Computer::new("first", Advisor::seeded(evaluator.clone(), seed));
            let mut second = Computer::new("second", Advisor::seeded(evaluator.clone(), seed + 100));
            let mut game = Game::new(Settings::default(), &mut first, &mut second);
            assert_eq!(game.play().unwrap(), 0);
            assert_eq!(game.state(), GameState::Over { loser: 1 });
            assert!(game.row().is_empty());
            let taken: usize = game.history().iter().map(|m| m.len()).sum();
            assert_eq!(taken, 10);
        }
    }

    #[test]
    fn last_stick_loses() {
        let settings = Settings::new(2, 1).unwrap();
        let mut a = Human::new("a", Cursor::new("1\n"), Vec::new());
        let mut b = Human::new("b", Cursor::new("2\n"), Vec::new());
        let mut game = Game::new(settings, &mut a, &mut b);
        assert_eq!(game.step().unwrap(), GameState::InProgress);
        assert_eq!(game.current(), 1);
        assert_eq!(game.step().unwrap(), GameState::Over { loser: 1 });
        assert_eq!(game.step(), Err(Error::NoMovesAvailable));
    }

    #[test]
    fn illegal_moves_are_refused() {
        struct Greedy;
        impl Player for Greedy {
            fn name(&self) -> &str {
                "greedy"
            }
            fn choose_move(&mut self, row: &Row, _max_take: usize) -> Result<Move> {
                Ok(Move::new(0, row.len()))
            }
        }
        let mut a = Greedy;
        let mut b = Greedy;
        let mut game = Game::new(Settings::default(), &mut a, &mut b);
        assert_eq!(
            game.step(),
            Err(Error::IllegalMove(IllegalMove::TooLarge {
                take: 10,
                max_take: 3
            }))
        );
        assert!(game.history().is_empty());
    }
}
