// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#[path = "support/mod.rs"]
mod support;

use support::assert_screen;
use termgrid::Grid;

#[test]
fn narrower_resize_recuts_the_paragraph() -> anyhow::Result<()> {
    let mut grid = Grid::new(5, 5, 10)?;
    grid.write("AAAAA")?;
    grid.write("BBB")?;
    // One soft-wrapped paragraph of eight cells, recut at width three.
    grid.resize(3, 5)?;
    assert_eq!(grid.width(), 3);
    assert_eq!(grid.height(), 5);
    assert_screen(&grid, &["AAA", "AAB", "BB", "", ""]);
    assert!(!grid.get_line(0)?.wrapped());
    assert!(grid.get_line(1)?.wrapped());
    assert!(grid.get_line(2)?.wrapped());
    Ok(())
}

#[test]
fn wider_resize_rejoins_wrapped_lines() -> anyhow::Result<()> {
    let mut grid = Grid::new(5, 5, 10)?;
    grid.write("0123456789")?;
    assert_screen(&grid, &["01234", "56789", "", "", ""]);
    grid.resize(10, 5)?;
    assert_screen(&grid, &["0123456789", "", "", "", ""]);
    assert_eq!((grid.cursor().row(), grid.cursor().col()), (0, 9));
    Ok(())
}

#[test]
fn hard_newlines_are_never_rejoined() -> anyhow::Result<()> {
    let mut grid = Grid::new(5, 4, 10)?;
    grid.write("ab\ncd")?;
    grid.resize(10, 4)?;
    assert_screen(&grid, &["ab", "cd", "", ""]);
    Ok(())
}

#[test]
fn round_trip_restores_content() -> anyhow::Result<()> {
    let mut grid = Grid::new(10, 5, 10)?;
    grid.write("HELLO\nWORLD42\nOK")?;
    let before = grid.screen_to_string();
    let cursor_before = grid.cursor();
    grid.resize(4, 5)?;
    grid.resize(10, 5)?;
    assert_eq!(grid.screen_to_string(), before);
    assert_eq!(grid.cursor(), cursor_before);
    Ok(())
}

#[test]
fn cursor_stays_on_its_character() -> anyhow::Result<()> {
    let mut grid = Grid::new(10, 5, 10)?;
    grid.write("ABCDEFGH")?;
    grid.set_cursor(0, 3);
    let under = grid.get_char(0, 3)?;
    grid.resize(3, 5)?;
    let cursor = grid.cursor();
    assert_eq!(grid.get_char(cursor.row() as isize, cursor.col())?, under);
    assert_eq!((cursor.row(), cursor.col()), (1, 0));
    Ok(())
}

#[test]
fn cursor_in_blank_space_keeps_its_offset() -> anyhow::Result<()> {
    let mut grid = Grid::new(8, 4, 10)?;
    grid.write("ab")?;
    grid.set_cursor(0, 6);
    grid.resize(4, 4)?;
    assert_screen(&grid, &["ab", "", "", ""]);
    assert_eq!((grid.cursor().row(), grid.cursor().col()), (1, 2));
    Ok(())
}

#[test]
fn shrinking_height_spills_into_scrollback() -> anyhow::Result<()> {
    let mut grid = Grid::new(5, 4, 10)?;
    grid.write("aa\nbb\ncc\ndd")?;
    grid.resize(5, 2)?;
    assert_screen(&grid, &["cc", "dd"]);
    assert_eq!(grid.scrollback_size(), 2);
    assert_eq!(grid.get_char(-1, 0)?, 'b');
    assert_eq!(grid.get_char(-2, 0)?, 'a');
    assert_eq!((grid.cursor().row(), grid.cursor().col()), (1, 2));
    Ok(())
}

#[test]
fn growing_height_pulls_scrollback_back_on_screen() -> anyhow::Result<()> {
    let mut grid = Grid::new(5, 2, 10)?;
    grid.write("aa\nbb\ncc\ndd")?;
    assert_eq!(grid.scrollback_size(), 2);
    grid.resize(5, 4)?;
    assert_screen(&grid, &["aa", "bb", "cc", "dd"]);
    assert_eq!(grid.scrollback_size(), 0);
    assert_eq!((grid.cursor().row(), grid.cursor().col()), (3, 2));
    Ok(())
}

#[test]
fn scrollback_content_reflows_too() -> anyhow::Result<()> {
    let mut grid = Grid::new(4, 2, 10)?;
    // "abcdef" wraps into "abcd" + "ef"; two newlines push the
    // paragraph fully into scrollback.
    grid.write("abcdef\nx\ny")?;
    assert_eq!(grid.scrollback_size(), 2);
    grid.resize(6, 2)?;
    // The wrapped paragraph rejoined to one six-cell scrollback line.
    assert_eq!(grid.scrollback_size(), 1);
    assert_eq!(grid.get_char(-1, 0)?, 'a');
    assert_eq!(grid.get_char(-1, 5)?, 'f');
    assert_screen(&grid, &["x", "y"]);
    Ok(())
}

#[test]
fn wide_chars_never_split_across_reflowed_lines() -> anyhow::Result<()> {
    let mut grid = Grid::new(6, 4, 10)?;
    grid.write("ab中cd")?;
    grid.resize(3, 4)?;
    assert_screen(&grid, &["ab", "中\u{0}c", "d", ""]);
    assert_eq!(grid.get_char(1, 0)?, '中');
    assert_eq!(grid.get_char(1, 1)?, '\u{0}');
    Ok(())
}

#[test]
fn noop_resize_preserves_everything() -> anyhow::Result<()> {
    let mut grid = Grid::new(7, 3, 10)?;
    grid.write("one\ntwo2")?;
    let before = grid.screen_to_string();
    let cursor_before = grid.cursor();
    grid.resize(7, 3)?;
    assert_eq!(grid.screen_to_string(), before);
    assert_eq!(grid.cursor(), cursor_before);
    Ok(())
}

#[test]
fn resize_with_disabled_scrollback_drops_the_spill() -> anyhow::Result<()> {
    let mut grid = Grid::new(5, 4, 0)?;
    grid.write("aa\nbb\ncc\ndd")?;
    grid.resize(5, 2)?;
    assert_screen(&grid, &["cc", "dd"]);
    assert_eq!(grid.scrollback_size(), 0);
    Ok(())
}

#[test]
fn dimensions_update_and_screen_stays_full() -> anyhow::Result<()> {
    let mut grid = Grid::new(3, 2, 5)?;
    grid.write("x")?;
    grid.resize(9, 6)?;
    assert_eq!(grid.width(), 9);
    assert_eq!(grid.height(), 6);
    let screen = grid.screen_to_string();
    assert_eq!(screen.lines().count(), 6);
    for row in screen.lines() {
        assert_eq!(row.chars().count(), 9);
    }
    Ok(())
}
