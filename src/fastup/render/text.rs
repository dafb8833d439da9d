//! Visible-text renderers.
//!
//! Both walk the tree the same way: text tokens contribute their capture,
//! branches and groups recurse, color brackets recurse into everything past
//! their color-spec child, and widget subtrees contribute nothing (the core
//! does not interpret them). `plain` stops there; `ansi` additionally wraps
//! color brackets in terminal escape sequences, restoring the enclosing
//! color on the way out so nesting works.

use crossterm::style::{Color, SetBackgroundColor, SetForegroundColor};

use super::Renderer;
use crate::fastup::arena::{Arena, ByteSpan};
use crate::fastup::store::{Tok, TokenStore};
use crate::fastup::token::{TokenId, TokenKind};

pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn name(&self) -> &str {
        "plain"
    }

    fn description(&self) -> &str {
        "visible text only, no styling"
    }

    fn render(&self, out: &mut Arena, store: &TokenStore<'_>, document: TokenId) -> ByteSpan {
        let mut buf = String::new();
        visit_plain(&mut buf, store.at(document), true);
        out.push_str(&buf)
    }
}

fn visit_plain(buf: &mut String, tk: Tok<'_, '_>, root: bool) {
    match tk.kind() {
        TokenKind::Text => buf.push_str(tk.text()),
        TokenKind::Mark => match tk.front() {
            // A widget carries no visible text of its own.
            '<' if !root => {}
            '(' | '[' => {
                let mut children = tk.children();
                children.next(); // the color spec
                for child in children {
                    visit_plain(buf, child, false);
                }
            }
            _ => {
                for child in tk.children() {
                    visit_plain(buf, child, false);
                }
            }
        },
    }
}

pub struct AnsiRenderer;

impl Renderer for AnsiRenderer {
    fn name(&self) -> &str {
        "ansi"
    }

    fn description(&self) -> &str {
        "terminal output with 24-bit color escape sequences"
    }

    fn render(&self, out: &mut Arena, store: &TokenStore<'_>, document: TokenId) -> ByteSpan {
        let mut buf = String::new();
        let env = Environment::default();
        visit_ansi(&mut buf, store.at(document), env, true);
        out.push_str(&buf)
    }
}

/// The colors in force around the subtree being visited, used to restore
/// the enclosing style when a color bracket closes.
#[derive(Debug, Clone, Copy, Default)]
struct Environment {
    foreground: Option<Color>,
    background: Option<Color>,
}

fn visit_ansi(buf: &mut String, tk: Tok<'_, '_>, env: Environment, root: bool) {
    match tk.kind() {
        TokenKind::Text => buf.push_str(tk.text()),
        TokenKind::Mark => match tk.front() {
            '<' if !root => {}
            bracket @ ('(' | '[') => {
                let mut children = tk.children();
                let color = children.next().and_then(|spec| parse_color(spec.text()));

                let inner = match (color, bracket) {
                    (Some(color), '(') => {
                        buf.push_str(&SetForegroundColor(color).to_string());
                        Environment { foreground: Some(color), ..env }
                    }
                    (Some(color), _) => {
                        buf.push_str(&SetBackgroundColor(color).to_string());
                        Environment { background: Some(color), ..env }
                    }
                    // Hand-built tree with a malformed color spec: render
                    // the contents unstyled.
                    (None, _) => env,
                };
                for child in children {
                    visit_ansi(buf, child, inner, false);
                }
                if color.is_some() {
                    if bracket == '(' {
                        let restore = env.foreground.unwrap_or(Color::Reset);
                        buf.push_str(&SetForegroundColor(restore).to_string());
                    } else {
                        let restore = env.background.unwrap_or(Color::Reset);
                        buf.push_str(&SetBackgroundColor(restore).to_string());
                    }
                }
            }
            _ => {
                for child in tk.children() {
                    visit_ansi(buf, child, env, false);
                }
            }
        },
    }
}

/// `rrggbb`, lowercase, exactly as the scanner validated it.
fn parse_color(text: &str) -> Option<Color> {
    if text.len() != 6 || !text.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&text[0..2], 16).ok()?;
    let g = u8::from_str_radix(&text[2..4], 16).ok()?;
    let b = u8::from_str_radix(&text[4..6], 16).ok()?;
    Some(Color::Rgb { r, g, b })
}
