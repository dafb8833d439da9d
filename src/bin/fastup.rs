//! Command-line interface for fastup
//! This binary parses a Fastup expression and renders it with one of the
//! registered renderers.
//!
//! Usage:
//!   fastup `<expression>`                     - Render with the default (ansi) renderer
//!   fastup -r `<renderer>` `<expression>`       - Render with a named renderer
//!   fastup --list-renderers                 - List all available renderers
//!   fastup --list-widgets                   - List all available widgets

use std::io::Write;

use clap::{Arg, ArgAction, Command};

use fastup::fastup::arena::Arena;
use fastup::fastup::parse::parse;
use fastup::fastup::render::RendererRegistry;
use fastup::fastup::store::TokenStore;
use fastup::fastup::widget::WidgetRegistry;

fn main() {
    let matches = Command::new("fastup")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse a Fastup expression and render it")
        .arg_required_else_help(true)
        .arg(
            Arg::new("expression")
                .help("The Fastup expression to render")
                .index(1),
        )
        .arg(
            Arg::new("renderer")
                .long("renderer")
                .short('r')
                .help("Renderer to use (see --list-renderers)")
                .default_value("ansi"),
        )
        .arg(
            Arg::new("no-newline")
                .long("no-newline")
                .short('n')
                .help("Do not print a trailing newline")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-renderers")
                .long("list-renderers")
                .help("List available renderers")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-widgets")
                .long("list-widgets")
                .help("List available widgets")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let renderers = RendererRegistry::with_builtins();
    let widgets = WidgetRegistry::with_builtins();

    let mut listed = false;
    if matches.get_flag("list-renderers") {
        println!("RENDERERS:");
        for name in renderers.list_renderers() {
            let description = renderers.get(&name).map_or("", |r| r.description());
            println!("    {name:<8}{description}");
        }
        listed = true;
    }
    if matches.get_flag("list-widgets") {
        println!("WIDGETS:");
        for name in widgets.list_widgets() {
            let description = widgets.get(&name).map_or("", |w| w.description());
            println!("    {name:<8}{description}");
        }
        listed = true;
    }

    let Some(expression) = matches.get_one::<String>("expression") else {
        if !listed {
            eprintln!("Error: no expression given");
            std::process::exit(1);
        }
        return;
    };
    let renderer = matches.get_one::<String>("renderer").unwrap();

    let mut store = TokenStore::new();
    let document = parse(&mut store, expression);

    let mut out = Arena::new();
    match renderers.render(renderer, &mut out, &store, document) {
        Ok(span) => {
            let mut stdout = std::io::stdout().lock();
            let _ = stdout.write_all(out.bytes(span));
            if !matches.get_flag("no-newline") {
                let _ = stdout.write_all(b"\n");
            }
        }
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
    }
}
