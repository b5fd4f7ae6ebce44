use std::io::{BufRead, Stdout, StdinLock, Write};

use crate::{Advisor, Error, Evaluator, Move, Result, Row};

/// Something that can pick a move on a row.
pub trait Player {
    fn name(&self) -> &str;

    /// Returns the move to play on `row`, taking at most `max_take` sticks.
    fn choose_move(&mut self, row: &Row, max_take: usize) -> Result<Move>;
}

/// A player that plays the advisor's moves.
#[derive(Debug, Clone)]
pub struct Computer {
    name: String,
    advisor: Advisor,
}

impl Computer {
    pub fn new(name: impl Into<String>, advisor: Advisor) -> Computer {
        Computer {
            name: name.into(),
            advisor,
        }
    }
}

impl Player for Computer {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, row: &Row, max_take: usize) -> Result<Move> {
        let config = row.configuration();
        let target = self.advisor.choose_move(&config, max_take)?;
        let shape = self.advisor.orient(row.shape_towards(&target, max_take)?);
        let m = row.locate(shape).ok_or(Error::NoMovesAvailable)?;
        log::debug!("{} plays {}, leaving {}", self.name, m, target);
        Ok(m)
    }
}

/// A player typing moves as 1-based slots: `4` takes one stick, `4-6` or `4 6` a range.
///
/// `hint` lists the winning moves when an evaluator is attached, `quit` gives up.
/// Unreadable or illegal moves are reported and asked again.
pub struct Human<R, W> {
    name: String,
    input: R,
    output: W,
    hints: Option<Evaluator>,
}

impl Human<StdinLock<'static>, Stdout> {
    /// A player on the process's standard input and output.
    pub fn stdio(name: impl Into<String>) -> Self {
        Human::new(name, std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Human<R, W> {
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        Human {
            name: name.into(),
            input,
            output,
            hints: None,
        }
    }

    pub fn with_hints(mut self, evaluator: Evaluator) -> Self {
        self.hints = Some(evaluator);
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn show_row(&mut self, row: &Row) -> std::io::Result<()> {
        let ruler: String = (1..=row.len())
            .map(|slot| char::from_digit((slot % 10) as u32, 10).unwrap_or(' '))
            .collect();
        writeln!(self.output, "{}", row)?;
        writeln!(self.output, "{}", ruler)
    }

    fn show_hint(&mut self, row: &Row, max_take: usize) -> Result<()> {
        let Some(evaluator) = &self.hints else {
            return say(&mut self.output, "no hints in this game");
        };
        let winning = evaluator.winning_moves(&row.configuration(), max_take)?;
        let mut moves = winning
            .iter()
            .map(|target| row.move_towards(target, max_take))
            .collect::<Result<Vec<Move>>>()?;
        moves.sort_by_key(|m| (m.left, m.right));
        let text = if moves.is_empty() {
            "no winning move, good luck".to_string()
        } else {
            moves
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        say(&mut self.output, &text)
    }
}

impl<R: BufRead, W: Write> Player for Human<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, row: &Row, max_take: usize) -> Result<Move> {
        self.show_row(row).map_err(|_| Error::Aborted)?;
        loop {
            write!(self.output, "{}> ", self.name).map_err(|_| Error::Aborted)?;
            self.output.flush().map_err(|_| Error::Aborted)?;

            let mut line = String::new();
            let read = self.input.read_line(&mut line).map_err(|_| Error::Aborted)?;
            if read == 0 {
                return Err(Error::Aborted);
            }
            match line.trim() {
                "" => continue,
                "quit" => return Err(Error::Aborted),
                "hint" => self.show_hint(row, max_take)?,
                "board" => self.show_row(row).map_err(|_| Error::Aborted)?,
                text => match parse_move(text) {
                    Some(m) => match row.check(m, max_take) {
                        Ok(()) => return Ok(m),
                        Err(e) => say(&mut self.output, &e.to_string())?,
                    },
                    None => say(
                        &mut self.output,
                        &format!("cannot read a move from {:?}, try 4 or 4-6", text),
                    )?,
                },
            }
        }
    }
}

fn say<W: Write>(output: &mut W, text: &str) -> Result<()> {
    writeln!(output, "{}", text).map_err(|_| Error::Aborted)
}

/// Parses `x`, `x-y` or `x y` with 1-based slots.
fn parse_move(text: &str) -> Option<Move> {
    let mut ends = text
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<usize>());
    let first = ends.next()?.ok()?;
    let last = match ends.next() {
        Some(end) => end.ok()?,
        None => first,
    };
    if ends.next().is_some() || first == 0 || last == 0 {
        return None;
    }
    Some(Move::between(first - 1, last - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_typed_moves() {
        assert_eq!(parse_move("4"), Some(Move::new(3, 4)));
        assert_eq!(parse_move("4-6"), Some(Move::new(3, 6)));
        assert_eq!(parse_move("6 4"), Some(Move::new(3, 6)));
        assert_eq!(parse_move("0"), None);
        assert_eq!(parse_move("a-b"), None);
        assert_eq!(parse_move("1-2-3"), None);
    }

    #[test]
    fn human_is_asked_again_after_a_bad_move() {
        let input = Cursor::new("x\n4-9\n2-3\n");
        let mut human = Human::new("you", input, Vec::new());
        let m = human.choose_move(&Row::new(10), 3).unwrap();
        assert_eq!(m, Move::new(1, 3));
        let output = String::from_utf8(human.into_output()).unwrap();
        assert!(output.starts_with("||||||||||\n1234567890\n"));
        assert!(output.contains("cannot read a move"));
        assert!(output.contains("at most 3 per turn"));
    }

    #[test]
    fn human_gives_up_on_quit_or_end_of_input() {
        let mut human = Human::new("you", Cursor::new("quit\n"), Vec::new());
        assert_eq!(human.choose_move(&Row::new(3), 3), Err(Error::Aborted));
        let mut human = Human::new("you", Cursor::new(""), Vec::new());
        assert_eq!(human.choose_move(&Row::new(3), 3), Err(Error::Aborted));
    }

    #[test]
    fn hints_list_winning_moves() {
        let input = Cursor::new("hint\n1\n");
        let mut human = Human::new("you", input, Vec::new()).with_hints(Evaluator::new());
        // from [2, 1] the only winning move takes the pair
        let row: Row = "||-|".parse().unwrap();
        human.choose_move(&row, 3).unwrap();
        let output = String::from_utf8(human.into_output()).unwrap();
        assert!(output.contains("1-2\n"));
    }

    #[test]
    fn computer_moves_into_losing_configurations() {
        let evaluator = Evaluator::new();
        let mut computer = Computer::new("cpu", Advisor::seeded(evaluator.clone(), 3));
        let row = Row::new(10);
        let m = computer.choose_move(&row, 3).unwrap();
        let mut played = row.clone();
        played.play(m, 3).unwrap();
        assert!(evaluator.is_losing(&played.configuration(), 3).unwrap());
    }
}
