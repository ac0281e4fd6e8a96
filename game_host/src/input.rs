//! Keyboard and touch input mapping

use game_core::{Directive, Side};

/// Key down: `w`/`s` drive paddle 1, the arrow keys drive paddle 2
pub fn handle_key_down(key: &str) -> Option<(Side, Directive)> {
    match key {
        "w" | "W" => Some((Side::Left, Directive::MoveUp)),
        "s" | "S" => Some((Side::Left, Directive::MoveDown)),
        "ArrowUp" => Some((Side::Right, Directive::MoveUp)),
        "ArrowDown" => Some((Side::Right, Directive::MoveDown)),
        _ => None,
    }
}

/// Key up: releasing a movement key holds that paddle
pub fn handle_key_up(key: &str) -> Option<(Side, Directive)> {
    handle_key_down(key).map(|(side, _)| (side, Directive::Hold))
}

/// Touch at `(x, y)` on a `width`×`height` surface
///
/// The left half drives paddle 1 and the right half paddle 2; touching the
/// upper half moves up, the lower half moves down.
pub fn handle_touch(x: f32, y: f32, width: f32, height: f32) -> Option<(Side, Directive)> {
    if !(0.0..width).contains(&x) || !(0.0..height).contains(&y) {
        return None;
    }
    let side = if x < width / 2.0 {
        Side::Left
    } else {
        Side::Right
    };
    let directive = if y < height / 2.0 {
        Directive::MoveUp
    } else {
        Directive::MoveDown
    };
    Some((side, directive))
}
