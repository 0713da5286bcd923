//! Line-oriented input scripts that stand in for mouse clicks and buttons.

use std::num::ParseIntError;

use tile_tactics_core::{CharacterAction, GridDimensions, OccupantId};
use tile_tactics_system_interaction::InteractionInput;

/// Single parsed script instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Click on a tile; coordinates wrap onto the torus.
    Tile {
        /// Unwrapped column.
        column: i64,
        /// Unwrapped row.
        row: i64,
    },
    /// Click on an occupant sprite.
    Occupant(OccupantId),
    /// Press an action button.
    Action(CharacterAction),
    /// Print the current grid.
    Show,
}

impl Step {
    /// Input delivered to the interaction system, if the step is an input.
    pub(crate) fn input(self, dimensions: GridDimensions) -> Option<InteractionInput> {
        match self {
            Self::Tile { column, row } => {
                let tile = dimensions.wrap(column, row);
                Some(InteractionInput::ActivateTile(tile))
            }
            Self::Occupant(occupant) => Some(InteractionInput::ActivateOccupant(occupant)),
            Self::Action(action) => Some(InteractionInput::ChooseAction(action)),
            Self::Show => None,
        }
    }
}

/// Errors raised while parsing a script.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ScriptError {
    /// The instruction keyword is not recognised.
    #[error("line {line}: unknown instruction `{keyword}`")]
    UnknownInstruction {
        line: usize,
        keyword: String,
    },
    /// The instruction lacks one of its arguments.
    #[error("line {line}: `{keyword}` expects {expected} argument(s)")]
    ArgumentCount {
        line: usize,
        keyword: &'static str,
        expected: usize,
    },
    /// An argument is not an integer.
    #[error("line {line}: `{value}` is not an integer")]
    InvalidNumber {
        line: usize,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Parses a script, skipping blank lines and `#` comments.
pub(crate) fn parse(contents: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (index, raw) in contents.lines().enumerate() {
        let line = index + 1;
        let text = raw.split('#').next().unwrap_or_default().trim();
        let mut words = text.split_whitespace();
        let Some(keyword) = words.next() else {
            continue;
        };
        let arguments: Vec<&str> = words.collect();

        let step = match keyword {
            "tile" => {
                let [column, row] = expect_arguments::<2>(line, "tile", &arguments)?;
                Step::Tile {
                    column: number(line, column)?,
                    row: number(line, row)?,
                }
            }
            "occupant" => {
                let [id] = expect_arguments::<1>(line, "occupant", &arguments)?;
                Step::Occupant(OccupantId::new(number(line, id)?))
            }
            "move" => {
                let [] = expect_arguments::<0>(line, "move", &arguments)?;
                Step::Action(CharacterAction::Move)
            }
            "retrieve" => {
                let [] = expect_arguments::<0>(line, "retrieve", &arguments)?;
                Step::Action(CharacterAction::Retrieve)
            }
            "show" => {
                let [] = expect_arguments::<0>(line, "show", &arguments)?;
                Step::Show
            }
            other => {
                return Err(ScriptError::UnknownInstruction {
                    line,
                    keyword: other.to_owned(),
                });
            }
        };
        steps.push(step);
    }
    Ok(steps)
}

fn expect_arguments<'a, const N: usize>(
    line: usize,
    keyword: &'static str,
    arguments: &[&'a str],
) -> Result<[&'a str; N], ScriptError> {
    <[&str; N]>::try_from(arguments).map_err(|_| ScriptError::ArgumentCount {
        line,
        keyword,
        expected: N,
    })
}

fn number<T>(line: usize, value: &str) -> Result<T, ScriptError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    value.parse().map_err(|source| ScriptError::InvalidNumber {
        line,
        value: value.to_owned(),
        source,
    })
}
