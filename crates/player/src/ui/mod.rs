//! Terminal front-end: command parsing and text rendering.

pub mod terminal;

pub use terminal::{
    is_yes, parse_command, render_glossary, render_hud, render_inventory, render_map,
    render_view, resume_question, Command, Redraw, Screen, HELP,
};
