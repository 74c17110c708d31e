//! Key mapping for the board: direct cell keys and cursor movement.

use color_rush::CellIndex;
use crossterm::event::KeyCode;

/// Keys that click a cell directly, in index order (a 4×4 block of the
/// keyboard, row by row).
pub const DIRECT_KEYS: [char; 16] = [
    '1', '2', '3', '4', 'q', 'w', 'e', 'r', 'a', 's', 'd', 'f', 'z', 'x', 'c', 'v',
];

/// Cell index bound to `key`, if it is one of the direct keys.
pub fn direct_index(key: char) -> Option<CellIndex> {
    let key = key.to_ascii_lowercase();
    DIRECT_KEYS.iter().position(|&k| k == key)
}

/// Direct key for `index`, if it has one.
pub fn key_for_index(index: CellIndex) -> Option<char> {
    DIRECT_KEYS.get(index).copied()
}

/// Moves the cursor over a grid of `size` cells laid out `columns` wide.
///
/// The cursor stops at the edges instead of wrapping.
pub fn move_cursor(cursor: CellIndex, key: KeyCode, columns: usize, size: usize) -> CellIndex {
    if size == 0 || columns == 0 {
        return 0;
    }
    let column = cursor % columns;

    let next = match key {
        KeyCode::Right if column + 1 < columns => Some(cursor + 1),
        KeyCode::Left if column > 0 => Some(cursor - 1),
        KeyCode::Down => cursor.checked_add(columns),
        KeyCode::Up => cursor.checked_sub(columns),
        _ => None,
    };

    next.filter(|&n| n < size).unwrap_or(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_keys_cover_a_four_by_four_grid() {
        assert_eq!(direct_index('1'), Some(0));
        assert_eq!(direct_index('R'), Some(7));
        assert_eq!(direct_index('v'), Some(15));
        assert_eq!(direct_index('p'), None);
        assert_eq!(key_for_index(9), Some('s'));
        assert_eq!(key_for_index(16), None);
    }

    #[test]
    fn test_cursor_moves_within_grid() {
        assert_eq!(move_cursor(0, KeyCode::Right, 4, 16), 1);
        assert_eq!(move_cursor(0, KeyCode::Down, 4, 16), 4);
        assert_eq!(move_cursor(5, KeyCode::Up, 4, 16), 1);
        assert_eq!(move_cursor(5, KeyCode::Left, 4, 16), 4);
    }

    #[test]
    fn test_cursor_stops_at_edges() {
        assert_eq!(move_cursor(3, KeyCode::Right, 4, 16), 3);
        assert_eq!(move_cursor(4, KeyCode::Left, 4, 16), 4);
        assert_eq!(move_cursor(2, KeyCode::Up, 4, 16), 2);
        assert_eq!(move_cursor(13, KeyCode::Down, 4, 16), 13);
    }

    #[test]
    fn test_ragged_last_row() {
        // 10 cells, 4 wide: the last row holds 8 and 9 only
        assert_eq!(move_cursor(6, KeyCode::Down, 4, 10), 6);
        assert_eq!(move_cursor(5, KeyCode::Down, 4, 10), 9);
        assert_eq!(move_cursor(9, KeyCode::Right, 4, 10), 9);
    }
}
