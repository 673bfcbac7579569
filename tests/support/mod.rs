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

// Declarative write-scenario tests: build a grid, feed it writes, and
// compare the full screen plus the final cursor position. Expected rows
// are padded to the grid width so tests can elide trailing blanks.
#[allow(unused_macros)]
macro_rules! screen_frag {
    {
        $test_name:ident
        {
            width: $width:expr ,
            height: $height:expr ,
            scrollback: $scrollback:expr
        }
        <= $( $input:expr ),*
        => $( $row:expr ),* ; cursor ($crow:expr, $ccol:expr)
    } => {
        #[test]
        fn $test_name() -> anyhow::Result<()> {
            let mut grid = termgrid::Grid::new($width, $height, $scrollback)?;
            $(
                grid.write($input)?;
            )*
            crate::support::assert_screen(&grid, &[ $( $row ),* ]);
            assert_eq!(
                (grid.cursor().row(), grid.cursor().col()),
                ($crow, $ccol),
                "cursor position mismatch",
            );
            Ok(())
        }
    }
}

pub fn assert_screen(grid: &termgrid::Grid, rows: &[&str]) {
    assert_eq!(rows.len(), grid.height(), "expected row count must match the grid height");
    let mut want = String::new();
    for row in rows {
        let mut len = 0;
        for c in row.chars() {
            want.push(c);
            len += 1;
        }
        assert!(len <= grid.width(), "expected row {row:?} wider than the grid");
        for _ in len..grid.width() {
            want.push(' ');
        }
        want.push('\n');
    }
    eprintln!("GRID:\n{grid}");
    assert_eq!(grid.screen_to_string(), want);
}
