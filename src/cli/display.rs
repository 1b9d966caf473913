use crate::chess::{Board, Color, Square, TerminalResult, Winner};
use crate::messages::EngineStats;
use crate::session::{MoveRecord, Mover};
use std::fmt::Write as _;

/// How the board should be drawn
#[derive(Debug, Clone, Default)]
pub struct BoardView {
    pub unicode: bool,
    /// Squares highlighted as move targets (from a `hint` request)
    pub hints: Vec<Square>,
    /// Square the hinted piece stands on
    pub hint_origin: Option<Square>,
}

impl BoardView {
    pub fn new(unicode: bool) -> Self {
        Self {
            unicode,
            ..Default::default()
        }
    }

    pub fn with_hints(mut self, origin: Square, targets: Vec<Square>) -> Self {
        self.hint_origin = Some(origin);
        self.hints = targets;
        self
    }
}

/// Render a board from the given perspective.
///
/// White's perspective puts rank 1 at the bottom; Black's puts rank 8 at the
/// bottom and reverses the files. A king in check is drawn as `[K]`, hint
/// targets as `·` (or `*` in ASCII) and hinted captures as `(p)`.
pub fn render_board(board: &Board, perspective: Color, view: &BoardView) -> String {
    let mut out = String::new();
    let checked = board.checked_king();

    let ranks: Vec<u8> = match perspective {
        Color::White => (0..8).rev().collect(),
        Color::Black => (0..8).collect(),
    };
    let files: Vec<u8> = match perspective {
        Color::White => (0..8).collect(),
        Color::Black => (0..8).rev().collect(),
    };

    out.push_str("  ┌───┬───┬───┬───┬───┬───┬───┬───┐\n");
    for (row, &rank) in ranks.iter().enumerate() {
        let _ = write!(out, "{} │", rank + 1);
        for &file in &files {
            let square = Square::new_unchecked(file, rank);
            out.push_str(&render_cell(board, square, checked, view));
            out.push('│');
        }
        let _ = writeln!(out, " {}", rank + 1);

        if row < 7 {
            out.push_str("  ├───┼───┼───┼───┼───┼───┼───┼───┤\n");
        }
    }
    out.push_str("  └───┴───┴───┴───┴───┴───┴───┴───┘\n");

    out.push_str("   ");
    for &file in &files {
        let _ = write!(out, " {}  ", (file + b'a') as char);
    }
    out.truncate(out.trim_end().len());
    out.push('\n');
    out
}

fn render_cell(board: &Board, square: Square, checked: Option<Square>, view: &BoardView) -> String {
    let piece = board.get_piece(square);
    let symbol = piece.map(|p| {
        if view.unicode {
            p.unicode_symbol().to_string()
        } else {
            p.to_string()
        }
    });

    let is_hint = view.hints.contains(&square);
    match symbol {
        Some(s) if checked == Some(square) => format!("[{}]", s),
        Some(s) if is_hint => format!("({})", s),
        Some(s) if view.hint_origin == Some(square) => format!("<{}>", s),
        Some(s) => format!(" {} ", s),
        None if is_hint => {
            if view.unicode {
                " · ".to_string()
            } else {
                " * ".to_string()
            }
        }
        None => "   ".to_string(),
    }
}

/// Render the status lines shown under the board
pub fn render_board_status(board: &Board) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "To move: {}", board.active_color());
    let _ = writeln!(out, "Move #: {}", board.fullmove_number());
    if board.halfmove_clock() > 0 {
        let _ = writeln!(out, "Halfmove clock: {} (50-move rule)", board.halfmove_clock());
    }
    if board.is_check() {
        out.push_str("Check!\n");
    }
    out
}

/// Display a chess board from the specified perspective
pub fn display_board(board: &Board, perspective: Color, view: &BoardView) {
    println!();
    print!("{}", render_board(board, perspective, view));
    print!("{}", render_board_status(board));
}

/// Render the move list as a numbered White/Black table.
///
/// When Black moved first (a game started from a position with Black to
/// move), the first row has `...` in the White column.
pub fn render_move_history(history: &[MoveRecord], first_move_number: u32) -> String {
    if history.is_empty() {
        return "No moves yet.\n".to_string();
    }

    let mut cells: Vec<String> = Vec::with_capacity(history.len() + 1);
    if history[0].color == Color::Black {
        cells.push("...".to_string());
    }
    for record in history {
        let marker = match record.by {
            Mover::User => "",
            Mover::Bot => "*",
        };
        cells.push(format!("{}{}", record.san, marker));
    }

    let mut out = String::new();
    out.push_str("┌──────┬──────────┬──────────┐\n");
    out.push_str("│ Move │  White   │  Black   │\n");
    out.push_str("├──────┼──────────┼──────────┤\n");
    for (i, pair) in cells.chunks(2).enumerate() {
        let move_num = first_move_number as usize + i;
        let white_move = pair.first().map(|s| s.as_str()).unwrap_or("-");
        let black_move = pair.get(1).map(|s| s.as_str()).unwrap_or("-");
        let _ = writeln!(
            out,
            "│ {:>4} │ {:^8} │ {:^8} │",
            move_num, white_move, black_move
        );
    }
    out.push_str("└──────┴──────────┴──────────┘\n");
    out.push_str("(* = bot move)\n");
    out
}

pub fn display_move_history(history: &[MoveRecord], first_move_number: u32) {
    println!();
    print!("{}", render_move_history(history, first_move_number));
}

/// One-line verdict from the human's point of view
pub fn render_game_over(result: &TerminalResult, human_color: Color) -> String {
    let verdict = match result.winner {
        Winner::Draw => "🤝 Draw",
        winner if winner == Winner::from(human_color) => "🏆 You won!",
        _ => "😞 You lost",
    };
    format!("{} ({})", verdict, result)
}

pub fn display_game_over(result: &TerminalResult, human_color: Color) {
    println!();
    println!("{}", "=".repeat(40));
    println!("{}", render_game_over(result, human_color));
    println!("{}", "=".repeat(40));
}

/// Compact summary of the engine statistics attached to a bot reply
pub fn render_stats(stats: &EngineStats) -> String {
    let mut parts = Vec::new();
    if let Some(difficulty) = &stats.difficulty {
        match difficulty {
            serde_json::Value::String(s) => parts.push(format!("difficulty {}", s)),
            other => parts.push(format!("difficulty {}", other)),
        }
    }
    if let Some(depth) = stats.depth {
        parts.push(format!("depth {}", depth))
    }
    if let Some(user_cp) = stats.user_cp {
        parts.push(format!("eval {:+.0}cp", user_cp));
    }
    if let Some(cp_loss) = stats.cp_loss {
        parts.push(format!("your loss {:.0}cp", cp_loss));
    }
    if let Some(p) = stats.blunder_prob {
        parts.push(format!("blunder chance {:.0}%", p * 100.0));
    }
    if stats.is_blunder == Some(true) {
        parts.push("bot blundered".to_string());
    }
    if let Some(t) = stats.time_taken {
        parts.push(format!("{:.1}s", t));
    }

    if parts.is_empty() {
        "No engine statistics".to_string()
    } else {
        parts.join(" | ")
    }
}

/// Check if terminal supports Unicode chess pieces
pub fn supports_unicode() -> bool {
    std::env::var("TERM")
        .map(|term| {
            term.contains("xterm")
                || term.contains("screen")
                || term.contains("tmux")
                || term == "alacritty"
                || term == "kitty"
        })
        .unwrap_or(false)
        || std::env::var("TERM_PROGRAM").is_ok()
}
