use crate::types::{Board, Placement};

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// Draws the board with every placement outlined and labelled. The first
/// output line is the top of the board.
pub fn render_solution(board: Board, placements: &[Placement]) -> String {
    let scale = f64::min(MAX_WIDTH / board.w as f64, MAX_HEIGHT / board.h as f64);
    let grid_w = (board.w as f64 * scale).round() as usize;
    let grid_h = (board.h as f64 * scale).round() as usize;

    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];

    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    for p in placements {
        let top = board.h - (p.y + p.piece.h);
        let sx = (p.x as f64 * scale).round() as usize;
        let sy = (top as f64 * scale).round() as usize;
        let sw = (p.piece.w as f64 * scale).round() as usize;
        let sh = (p.piece.h as f64 * scale).round() as usize;

        if sw == 0 || sh == 0 {
            continue;
        }

        draw_rect(&mut grid, sx, sy, sw, sh);

        let label: Vec<char> = p.piece.to_string().chars().collect();
        if sw > 2 && sh > 0 {
            let cx = sx + sw / 2;
            let cy = sy + sh / 2;
            let start_x = cx.saturating_sub(label.len() / 2);

            for (i, &ch) in label.iter().enumerate() {
                let x = start_x + i;
                if x > sx && x < sx + sw && cy > sy && cy < sy + sh {
                    grid[cy][x] = ch;
                }
            }
        }
    }

    let mut result = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

fn join(existing: char, stroke: char) -> char {
    match (existing, stroke) {
        ('+', _) => '+',
        ('|', '-') | ('-', '|') => '+',
        _ => stroke,
    }
}

fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    let rows = grid.len();
    let Some(cols) = grid.first().map(Vec::len) else {
        return;
    };

    for i in (x..=x + w).filter(|&i| i < cols) {
        for row in [y, y + h].into_iter().filter(|&r| r < rows) {
            grid[row][i] = join(grid[row][i], '-');
        }
    }

    for j in (y..=y + h).filter(|&j| j < rows) {
        for col in [x, x + w].into_iter().filter(|&c| c < cols) {
            grid[j][col] = join(grid[j][col], '|');
        }
    }

    for cx in [x, x + w] {
        for cy in [y, y + h] {
            if cy < rows && cx < cols {
                grid[cy][cx] = '+';
            }
        }
    }
}
