use crate::types::{Cell, StockSheet};

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// Character used for cells filled by `product`: `A`..`Z`, then `a`..`z`, then `#`.
fn product_char(product: usize) -> char {
    match product {
        0..=25 => (b'A' + product as u8) as char,
        26..=51 => (b'a' + (product - 26) as u8) as char,
        _ => '#',
    }
}

/// ASCII view of a sheet, `x` to the right and `y` downwards. Large sheets are
/// sampled down to fit an 80x40 box.
pub fn render_sheet(stock: &StockSheet) -> String {
    let (w, h) = (stock.width(), stock.height());
    if w == 0 || h == 0 {
        return String::new();
    }

    let scale = f64::min(1.0, f64::min(MAX_WIDTH / w as f64, MAX_HEIGHT / h as f64));
    let grid_w = ((w as f64 * scale).round() as usize).max(1);
    let grid_h = ((h as f64 * scale).round() as usize).max(1);

    let mut grid = vec![vec![' '; grid_w + 2]; grid_h + 2];
    draw_border(&mut grid);

    for row in 0..grid_h {
        let y = (row as u64 * h as u64 / grid_h as u64) as u32;
        for col in 0..grid_w {
            let x = (col as u64 * w as u64 / grid_w as u64) as u32;
            grid[row + 1][col + 1] = match stock.cell(x, y) {
                Some(Cell::Filled(p)) => product_char(p),
                _ => '.',
            };
        }
    }

    let mut result = String::new();
    for row in &grid {
        result.extend(row.iter());
        result.push('\n');
    }
    result
}

fn draw_border(grid: &mut [Vec<char>]) {
    let rows = grid.len();
    let cols = grid[0].len();
    for (j, row) in grid.iter_mut().enumerate() {
        for (i, c) in row.iter_mut().enumerate() {
            let edge_x = i == 0 || i == cols - 1;
            let edge_y = j == 0 || j == rows - 1;
            *c = match (edge_x, edge_y) {
                (true, true) => '+',
                (false, true) => '-',
                (true, false) => '|',
                (false, false) => *c,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Position, Rect};

    #[test]
    fn test_render_empty_sheet() {
        let output = render_sheet(&StockSheet::new(3, 2));
        assert_eq!(output, "+---+\n|...|\n|...|\n+---+\n");
    }

    #[test]
    fn test_render_filled_cells() {
        let mut stock = StockSheet::new(4, 2);
        stock.fill(Position::new(1, 0), Rect::new(2, 1), 0);
        stock.fill(Position::new(0, 1), Rect::new(1, 1), 27);
        let output = render_sheet(&stock);
        assert_eq!(output, "+----+\n|.AA.|\n|b...|\n+----+\n");
    }

    #[test]
    fn test_render_large_sheet_is_scaled() {
        let mut stock = StockSheet::new(200, 100);
        stock.fill(Position::ORIGIN, Rect::new(100, 100), 2);
        let output = render_sheet(&stock);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 42);
        assert!(lines.iter().all(|l| l.chars().count() == 82));
        assert!(lines[1].starts_with("|CCC"));
        assert!(lines[1].ends_with("..|"));
    }
}
