use super::board::STARTING_FEN;
use super::outcome::TerminalResult;
use super::piece::Color;

/// Name the bot plays under in exported games
pub const BOT_PLAYER_NAME: &str = "ChessMorph Bot";
/// Name the human plays under in exported games
pub const HUMAN_PLAYER_NAME: &str = "Player";

/// Seven-tag roster (minus Round) plus the setup tags for non-standard starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnHeaders {
    pub event: String,
    pub site: String,
    /// `YYYY.MM.DD`
    pub date: String,
    pub white: String,
    pub black: String,
    pub start_fen: String,
}

impl PgnHeaders {
    /// Headers for a game between the local player and the bot
    pub fn for_session(human_color: Color, start_fen: &str, date: &str) -> Self {
        let (white, black) = match human_color {
            Color::White => (HUMAN_PLAYER_NAME, BOT_PLAYER_NAME),
            Color::Black => (BOT_PLAYER_NAME, HUMAN_PLAYER_NAME),
        };

        Self {
            event: "ChessMorph Game".to_string(),
            site: "Localhost".to_string(),
            date: date.to_string(),
            white: white.to_string(),
            black: black.to_string(),
            start_fen: start_fen.to_string(),
        }
    }

    fn has_custom_start(&self) -> bool {
        self.start_fen.trim() != STARTING_FEN
    }
}

/// A half-move as it appears in the movetext
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnMove {
    pub san: String,
    pub comment: Option<String>,
}

/// Render a game as PGN.
///
/// Move numbers follow the start position: a game that starts with Black to
/// move (or later than move 1) is numbered accordingly, with `N...` for a
/// leading Black move.
///
/// # Arguments
/// * `headers` - Tag pairs
/// * `first_mover` - Side that made the first recorded move
/// * `first_move_number` - Fullmove number of the start position
/// * `moves` - Half-moves in order
/// * `result` - Terminal result, `None` for an unfinished game (`*`)
pub fn export_pgn(
    headers: &PgnHeaders,
    first_mover: Color,
    first_move_number: u32,
    moves: &[PgnMove],
    result: Option<&TerminalResult>,
) -> String {
    let result_token = result.map(|r| r.winner.pgn_result()).unwrap_or("*");

    let mut out = String::new();
    push_tag(&mut out, "Event", &headers.event);
    push_tag(&mut out, "Site", &headers.site);
    push_tag(&mut out, "Date", &headers.date);
    push_tag(&mut out, "White", &headers.white);
    push_tag(&mut out, "Black", &headers.black);
    push_tag(&mut out, "Result", result_token);
    if headers.has_custom_start() {
        push_tag(&mut out, "SetUp", "1");
        push_tag(&mut out, "FEN", headers.start_fen.trim());
    }
    if let Some(result) = result {
        push_tag(&mut out, "Termination", &result.to_string());
    }
    out.push('\n');

    let mut tokens: Vec<String> = Vec::new();
    let mut color = first_mover;
    let mut number = first_move_number;
    let mut after_comment = false;

    for (index, mv) in moves.iter().enumerate() {
        match color {
            Color::White => tokens.push(format!("{}.", number)),
            Color::Black if index == 0 || after_comment => tokens.push(format!("{}...", number)),
            Color::Black => {}
        }

        tokens.push(mv.san.clone());
        after_comment = false;
        if let Some(comment) = &mv.comment {
            tokens.push(format!("{{{}}}", comment));
            after_comment = true;
        }

        if color == Color::Black {
            number += 1;
        }
        color = color.opposite();
    }
    tokens.push(result_token.to_string());

    out.push_str(&wrap_movetext(&tokens));
    out.push('\n');
    out
}

fn push_tag(out: &mut String, name: &str, value: &str) {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    out.push_str(&format!("[{} \"{}\"]\n", name, escaped));
}

// PGN export format keeps lines under 80 columns
fn wrap_movetext(tokens: &[String]) -> String {
    let mut text = String::new();
    let mut line_len = 0;

    for token in tokens {
        if line_len > 0 && line_len + 1 + token.len() > 79 {
            text.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            text.push(' ');
            line_len += 1;
        }
        text.push_str(token);
        line_len += token.len();
    }

    text
}
