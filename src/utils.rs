use crate::engine::{Board, StateId, VALUE_COUNT};
use crate::error::{PuzzleError, PuzzleResult};

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '|' | ';' | '[' | ']')
}

/// Parses a list of edge values from text.
///
/// Values are unsigned integers separated by any mix of whitespace, commas, `|` or `;`.
/// Surrounding brackets are ignored, so a pasted list such as `[1,4,3,2, 3,2,2,4]`
/// and the text form of a [`StateId`] are both accepted.
///
/// # Arguments
/// * `s`: The text to parse.
///
/// # Returns
/// * `Ok(Vec<u8>)` with the values in order; the count is not checked here.
/// * `Err(PuzzleError::InvalidSymbol)` for the first token that is not a `u8`,
///   with its position in the value list.
///
/// # Examples
/// ```
/// use tile_match_solver::utils::parse_values;
///
/// assert_eq!(parse_values("[1,4, 3 2|5]").unwrap(), vec![1, 4, 3, 2, 5]);
/// assert!(parse_values("1,x,3").is_err());
/// ```
pub fn parse_values(s: &str) -> PuzzleResult<Vec<u8>> {
    s.split(is_separator)
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(position, token)| {
            token.parse::<u8>().map_err(|_| PuzzleError::InvalidSymbol {
                token: token.to_string(),
                position,
            })
        })
        .collect()
}

/// Parses text into a `Board`; see [`parse_values`] for the accepted format.
///
/// # Errors
/// Returns [`PuzzleError::InvalidSymbol`] for unparsable tokens and
/// [`PuzzleError::InvalidBoardSize`] unless exactly 36 values are present.
pub fn board_from_str(s: &str) -> PuzzleResult<Board<u8>> {
    Board::from_values(&parse_values(s)?)
}

/// Parses the text form written by `StateId`'s `Display` implementation.
///
/// # Errors
/// Same as [`board_from_str`].
pub fn parse_state_id(s: &str) -> PuzzleResult<StateId<u8>> {
    let values = parse_values(s)?;
    let values: [u8; VALUE_COUNT] =
        values
            .as_slice()
            .try_into()
            .map_err(|_| PuzzleError::InvalidBoardSize {
                expected: VALUE_COUNT,
                found: values.len(),
            })?;
    Ok(StateId::from_values(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SOLVED_EXAMPLE;

    #[test]
    fn test_parse_values_accepts_mixed_separators() {
        let values = parse_values(" 1, 2\n3\t4 | 5;6 ").unwrap();
        assert_eq!(values, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_parse_values_empty_input() {
        assert!(parse_values("").unwrap().is_empty());
        assert!(parse_values(" [ ] ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_values_invalid_token() {
        let err = parse_values("1, 2, three, 4").unwrap_err();
        assert_eq!(
            err,
            PuzzleError::InvalidSymbol {
                token: "three".to_string(),
                position: 2
            }
        );
        assert!(parse_values("1 256").is_err(), "values must fit in a u8");
        assert!(parse_values("-1").is_err());
    }

    #[test]
    fn test_board_from_str_solved_example() {
        let text = "[1,4,3,2, 3,2,2,4, 2,3,5,2, 3,5,2,5, 2,4,1,5, 5,3,3,4, 2,5,3,1, 1,3,2,5, 3,4,1,3]";
        let board = board_from_str(text).unwrap();
        assert!(board.is_solved());
        assert_eq!(board.values(), SOLVED_EXAMPLE);
    }

    #[test]
    fn test_board_from_str_wrong_count() {
        let result = board_from_str("1 2 3");
        assert_eq!(
            result.unwrap_err(),
            PuzzleError::InvalidBoardSize {
                expected: 36,
                found: 3
            }
        );
    }

    #[test]
    fn test_parse_state_id_round_trip() {
        let mut board = Board::from_values(&SOLVED_EXAMPLE).unwrap();
        board.shuffle_with_seed(21);
        let id = board.state_id();
        let parsed = parse_state_id(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
        assert_eq!(Board::from_state_id(&parsed), board);
    }

    #[test]
    fn test_parse_state_id_wrong_count() {
        assert!(matches!(
            parse_state_id("1,2,3,4|5,6,7,8"),
            Err(PuzzleError::InvalidBoardSize { found: 8, .. })
        ));
    }
}
