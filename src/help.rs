use crate::terminal::{Cell, Terminal};
use crossterm::style::Color;

pub const HELP_TEXT: &str = "\
WILDGLOBE
─────────────────────────────
Drag    Rotate the globe
Click   Open a species
1-5     Open species by number
←/h     Previous page (or spin west)
→/l     Next page (or spin east)
Hover   Read a map or chart point
x/Esc   Close the panel
Space   Pause/resume rotation
?       Close help
q       Quit (Esc when closed)
─────────────────────────────";

const BORDER: Color = Color::White;
const KEY: Color = Color::Cyan;
const TEXT: Color = Color::Grey;

/// Key column and description of a help line, split at the first double
/// space. Headings and rules have no key.
fn split_key(line: &str) -> Option<(&str, &str)> {
    let at = line.find("  ")?;
    Some(line.split_at(at))
}

/// The boxed overlay as cell rows, keys highlighted.
pub fn overlay_rows(help_text: &str) -> Vec<Vec<Cell>> {
    let cell = |ch, fg, bold| Cell { ch, fg: Some(fg), bold };
    let inner = help_text.lines().map(|l| l.chars().count()).max().unwrap_or(0) + 2;
    let edge = |left, right| {
        let mut row = vec![cell(left, BORDER, false)];
        row.resize(inner + 1, cell('─', BORDER, false));
        row.push(cell(right, BORDER, false));
        row
    };

    let mut rows = vec![edge('┌', '┐')];
    for line in help_text.lines() {
        let mut row = vec![cell('│', BORDER, false), cell(' ', TEXT, false)];
        match split_key(line) {
            Some((key, desc)) => {
                row.extend(key.chars().map(|ch| cell(ch, KEY, true)));
                row.extend(desc.chars().map(|ch| cell(ch, TEXT, false)));
            }
            None => row.extend(line.chars().map(|ch| cell(ch, BORDER, true))),
        }
        row.resize(inner + 1, cell(' ', TEXT, false));
        row.push(cell('│', BORDER, false));
        rows.push(row);
    }
    rows.push(edge('└', '┘'));
    rows
}

/// Dim the frame and draw the help box centered over it.
pub fn render_help_overlay(term: &mut Terminal, width: u16, height: u16, help_text: &str) {
    if help_text.is_empty() {
        return;
    }

    let rows = overlay_rows(help_text);
    let box_width = rows.first().map_or(0, Vec::len);
    let start_x = (width as usize).saturating_sub(box_width) / 2;
    let start_y = (height as usize).saturating_sub(rows.len()) / 2;

    term.dim();
    term.blit(start_x as i32, start_y as i32, &rows);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(row: &[Cell]) -> String {
        row.iter().map(|c| c.ch).collect()
    }

    #[test]
    fn overlay_is_a_closed_box() {
        let rows = overlay_rows(HELP_TEXT);
        assert_eq!(rows.len(), HELP_TEXT.lines().count() + 2);
        let width = rows[0].len();
        assert!(rows.iter().all(|row| row.len() == width));
        assert!(text(&rows[0]).starts_with('┌') && text(&rows[0]).ends_with('┐'));
        assert!(text(&rows[rows.len() - 1]).starts_with('└'));
        assert_eq!(text(&rows[1]).trim_matches(|c| c == '│' || c == ' '), "WILDGLOBE");
    }

    #[test]
    fn key_column_is_highlighted() {
        let rows = overlay_rows("Space   Pause\nTITLE");
        let key_row = &rows[1];
        assert_eq!(text(key_row), "│ Space   Pause │");
        for cell in &key_row[2..7] {
            assert_eq!((cell.fg, cell.bold), (Some(KEY), true), "{:?}", cell.ch);
        }
        for cell in &key_row[10..15] {
            assert_eq!((cell.fg, cell.bold), (Some(TEXT), false));
        }
        assert!(rows[2][2..7].iter().all(|c| c.fg == Some(BORDER)));
    }

    #[test]
    fn overlay_dims_what_is_behind_it() {
        let mut term = Terminal::offscreen(40, 20);
        term.set(0, 0, '⣿', Some(Color::Green), true);
        render_help_overlay(&mut term, 40, 20, "q  Quit");
        assert_eq!(term.cell(0, 0).fg, Some(Color::DarkGrey));
        assert!(!term.cell(0, 0).bold);
        // Box is 11 wide and 3 tall, centered
        assert_eq!(term.cell(14, 8).ch, '┌');
        assert_eq!(term.cell(16, 9).fg, Some(KEY));
    }
}
