/// Truecolor half-block presentation and crossterm input mapping
use crossterm::{
    cursor,
    event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind},
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use sr3d_core::{Color, FrameBuffer, RenderStats};

use crate::scene::InputEvent;

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '\u{2580}';

/// Terminal rows kept free for the status line
pub const STATUS_ROWS: u16 = 1;

/// Frame buffer size for a terminal of `cols` x `rows` cells.
///
/// Each cell shows two stacked pixels; the status line is not drawn into.
pub fn buffer_size(cols: u16, rows: u16) -> (usize, usize) {
    let rows = rows.saturating_sub(STATUS_ROWS);
    (usize::from(cols), usize::from(rows) * 2)
}

/// Colors of the pixel pair behind cell (`col`, `row`): top, then bottom.
///
/// The bottom pixel is `None` when the buffer has an odd height and `row`
/// is the last one.
pub fn cell_colors(buffer: &FrameBuffer, col: usize, row: usize) -> Option<(Color, Option<Color>)> {
    let (x, y) = (i32::try_from(col).ok()?, i32::try_from(row * 2).ok()?);
    let top = buffer.get_pixel(x, y)?;
    Some((top, buffer.get_pixel(x, y + 1)))
}

fn term_color(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Queue the whole buffer as half-block cells starting at the top-left.
///
/// Color commands are only emitted when a cell differs from its left
/// neighbour.
pub fn draw_buffer<W: Write>(buffer: &FrameBuffer, writer: &mut W) -> std::io::Result<()> {
    let rows = buffer.height().div_ceil(2);
    for row in 0..rows {
        writer.queue(cursor::MoveTo(0, row as u16))?;
        let mut current: Option<(Color, Color)> = None;
        for col in 0..buffer.width() {
            let Some((top, bottom)) = cell_colors(buffer, col, row) else {
                break;
            };
            let bottom = bottom.unwrap_or(Color::BLACK);
            if current != Some((top, bottom)) {
                writer.queue(SetForegroundColor(term_color(top)))?;
                writer.queue(SetBackgroundColor(term_color(bottom)))?;
                current = Some((top, bottom));
            }
            writer.queue(Print(HALF_BLOCK))?;
        }
    }
    writer.queue(ResetColor)?;
    Ok(())
}

/// Mode flags shown in the status line
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatusModes {
    pub wireframe: bool,
    pub auto_rotate: bool,
    pub lights: usize,
}

pub fn status_line(fps: f64, stats: &RenderStats, modes: StatusModes) -> String {
    let on_off = |flag: bool| if flag { "on" } else { "off" };
    format!(
        "SR3D | {fps:.1} fps | tris {}/{} culled {} | wire {} rotate {} lights {} | WASD move, space/c up/down, arrows/drag orbit, scroll/+/- zoom, f r l toggles, q quit",
        stats.drawn,
        stats.submitted,
        stats.culled,
        on_off(modes.wireframe),
        on_off(modes.auto_rotate),
        modes.lights,
    )
}

/// Queue the status line on terminal row `row`, clipped to `cols`.
pub fn draw_status<W: Write>(writer: &mut W, row: u16, cols: u16, text: &str) -> std::io::Result<()> {
    let clipped: String = text.chars().take(usize::from(cols)).collect();
    writer.queue(cursor::MoveTo(0, row))?;
    writer.queue(SetForegroundColor(TermColor::Yellow))?;
    writer.queue(SetBackgroundColor(TermColor::Black))?;
    writer.queue(Print(format!("{clipped:<width$}", width = usize::from(cols))))?;
    writer.queue(ResetColor)?;
    Ok(())
}

/// Turns crossterm events into [`InputEvent`]s, tracking mouse drags
#[derive(Debug, Default)]
pub struct InputMapper {
    drag_from: Option<(u16, u16)>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(&mut self, event: &Event) -> Option<InputEvent> {
        match event {
            Event::Key(key) => map_key(key),
            Event::Mouse(mouse) => self.map_mouse(mouse),
            _ => None,
        }
    }

    fn map_mouse(&mut self, mouse: &MouseEvent) -> Option<InputEvent> {
        let here = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_from = Some(here);
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (x0, y0) = self.drag_from.replace(here)?;
                let dx = f64::from(here.0) - f64::from(x0);
                let dy = f64::from(here.1) - f64::from(y0);
                Some(InputEvent::Orbit { dx, dy })
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag_from = None;
                None
            }
            MouseEventKind::ScrollUp => Some(InputEvent::Zoom(-1.0)),
            MouseEventKind::ScrollDown => Some(InputEvent::Zoom(1.0)),
            _ => None,
        }
    }
}

fn map_key(key: &KeyEvent) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    // Raw mode swallows SIGINT
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(InputEvent::Quit);
    }

    let event = match key.code {
        KeyCode::Char('w') => InputEvent::MoveForward,
        KeyCode::Char('s') => InputEvent::MoveBackward,
        KeyCode::Char('a') => InputEvent::StrafeLeft,
        KeyCode::Char('d') => InputEvent::StrafeRight,
        KeyCode::Char(' ') => InputEvent::MoveUp,
        KeyCode::Char('c') => InputEvent::MoveDown,
        KeyCode::Up => InputEvent::Orbit { dx: 0.0, dy: -1.0 },
        KeyCode::Down => InputEvent::Orbit { dx: 0.0, dy: 1.0 },
        KeyCode::Left => InputEvent::Orbit { dx: -1.0, dy: 0.0 },
        KeyCode::Right => InputEvent::Orbit { dx: 1.0, dy: 0.0 },
        KeyCode::Char('+') | KeyCode::Char('=') => InputEvent::Zoom(-1.0),
        KeyCode::Char('-') => InputEvent::Zoom(1.0),
        KeyCode::Char('f') => InputEvent::ToggleWireframe,
        KeyCode::Char('r') => InputEvent::ToggleAutoRotate,
        KeyCode::Char('l') => InputEvent::ToggleLighting,
        KeyCode::Char('q') | KeyCode::Esc => InputEvent::Quit,
        _ => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_buffer_size_leaves_status_row() {
        assert_eq!(buffer_size(80, 24), (80, 46));
        assert_eq!(buffer_size(10, 0), (10, 0));
    }

    #[test]
    fn test_cell_colors_pairs_rows() {
        let mut buffer = FrameBuffer::new(2, 3);
        buffer.clear(Color::BLACK);
        buffer.set_pixel(1, 0, Color::WHITE);
        buffer.set_pixel(1, 1, Color::new(1, 2, 3));
        buffer.set_pixel(0, 2, Color::new(9, 9, 9));

        assert_eq!(
            cell_colors(&buffer, 1, 0),
            Some((Color::WHITE, Some(Color::new(1, 2, 3))))
        );
        // Odd height: last row has no bottom pixel
        assert_eq!(cell_colors(&buffer, 0, 1), Some((Color::new(9, 9, 9), None)));
        assert_eq!(cell_colors(&buffer, 0, 2), None);
        assert_eq!(cell_colors(&buffer, 2, 0), None);
    }

    #[test]
    fn test_draw_buffer_writes_every_cell() {
        let mut buffer = FrameBuffer::new(3, 4);
        buffer.clear(Color::new(20, 20, 30));
        let mut out = Vec::new();
        draw_buffer(&buffer, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 6);
        // Uniform rows need one color switch each
        assert_eq!(text.matches("38;2;20;20;30").count(), 2);
    }

    #[test]
    fn test_key_mapping() {
        let mut mapper = InputMapper::new();
        assert_eq!(mapper.map(&key(KeyCode::Char('w'))), Some(InputEvent::MoveForward));
        assert_eq!(mapper.map(&key(KeyCode::Char(' '))), Some(InputEvent::MoveUp));
        assert_eq!(mapper.map(&key(KeyCode::Char('l'))), Some(InputEvent::ToggleLighting));
        assert_eq!(mapper.map(&key(KeyCode::Esc)), Some(InputEvent::Quit));
        assert_eq!(
            mapper.map(&key(KeyCode::Left)),
            Some(InputEvent::Orbit { dx: -1.0, dy: 0.0 })
        );
        assert_eq!(mapper.map(&key(KeyCode::Char('z'))), None);

        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(mapper.map(&ctrl_c), Some(InputEvent::Quit));
        assert_eq!(mapper.map(&key(KeyCode::Char('c'))), Some(InputEvent::MoveDown));
    }

    #[test]
    fn test_key_release_ignored() {
        let mut release = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(InputMapper::new().map(&Event::Key(release)), None);
    }

    #[test]
    fn test_mouse_drag_orbits() {
        let mut mapper = InputMapper::new();
        // Drag without a press is ignored
        assert_eq!(mapper.map(&mouse(MouseEventKind::Drag(MouseButton::Left), 5, 5)), None);

        assert_eq!(mapper.map(&mouse(MouseEventKind::Down(MouseButton::Left), 10, 10)), None);
        assert_eq!(
            mapper.map(&mouse(MouseEventKind::Drag(MouseButton::Left), 13, 8)),
            Some(InputEvent::Orbit { dx: 3.0, dy: -2.0 })
        );
        assert_eq!(
            mapper.map(&mouse(MouseEventKind::Drag(MouseButton::Left), 14, 8)),
            Some(InputEvent::Orbit { dx: 1.0, dy: 0.0 })
        );
        mapper.map(&mouse(MouseEventKind::Up(MouseButton::Left), 14, 8));
        assert_eq!(mapper.map(&mouse(MouseEventKind::Drag(MouseButton::Left), 20, 8)), None);

        assert_eq!(
            mapper.map(&mouse(MouseEventKind::ScrollUp, 0, 0)),
            Some(InputEvent::Zoom(-1.0))
        );
    }

    #[test]
    fn test_status_line() {
        let stats = RenderStats {
            submitted: 30,
            culled: 14,
            rejected: 0,
            drawn: 16,
        };
        let modes = StatusModes {
            wireframe: true,
            auto_rotate: false,
            lights: 3,
        };
        let line = status_line(29.96, &stats, modes);
        assert!(line.starts_with("SR3D | 30.0 fps | tris 16/30 culled 14 | wire on rotate off lights 3"));

        let mut out = Vec::new();
        draw_status(&mut out, 5, 8, &line).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("SR3D | 3"));
        assert!(!text.contains("fps"));
    }
}
