//! The page shown before the diorama is opened.

use crate::render::TerminalRenderer;
use crate::scene::View;
use crossterm::style::Color;
use std::io;

#[derive(Default)]
pub struct Landing;

impl Landing {
    pub fn height(&self) -> u16 {
        self.get_ascii().len() as u16
    }

    pub fn width(&self) -> u16 {
        self.get_ascii()
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0) as u16
    }

    pub fn get_ascii(&self) -> Vec<&'static str> {
        vec![
            "                 +&-                  ",
            "               _.-^-._    .--.        ",
            "            .-'   _   '-. |__|        ",
            "           /     |_|     \\|  |        ",
            "          /               \\  |        ",
            "         /|     _____     |\\ |        ",
            "          |    |==|==|    |  |        ",
            "          |    |--|--|    |  |        ",
            "  ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^  ",
        ]
    }

    pub fn hints(&self) -> Vec<String> {
        let views = View::ALL
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{} {}", i + 1, v.label()))
            .collect::<Vec<_>>()
            .join("  ");
        vec![
            "farmview".to_string(),
            "See your whole farm at a glance".to_string(),
            String::new(),
            "Press Enter to open the 3D demo".to_string(),
            format!("In the demo: {}  |  arrows orbit  +/- zoom  space pause  Esc close", views),
            "Press 'q' to quit".to_string(),
        ]
    }

    pub fn render(&self, renderer: &mut TerminalRenderer, width: u16, height: u16) -> io::Result<()> {
        let hints = self.hints();
        let block_height = self.height() + 1 + hints.len() as u16;
        let top = height.saturating_sub(block_height) / 2;

        let art_x = (width / 2).saturating_sub(self.width() / 2);
        for (i, line) in self.get_ascii().iter().enumerate() {
            renderer.render_line_colored(art_x, top + i as u16, line, Color::Yellow)?;
        }

        let hint_top = top + self.height() + 1;
        for (i, line) in hints.iter().enumerate() {
            let x = (width / 2).saturating_sub(line.chars().count() as u16 / 2);
            let color = if i == 0 { Color::Green } else { Color::White };
            renderer.render_line_colored(x, hint_top + i as u16, line, color)?;
        }
        Ok(())
    }
}
