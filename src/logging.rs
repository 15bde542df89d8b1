use std::io::{self, Write};

use env_logger::fmt::{Color, Formatter};
use log::{Level, Record};

/// Install the logger. `RUST_LOG` wins over the configured level.
pub fn init(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    let result = env_logger::Builder::from_env(env)
        .format(format)
        .target(env_logger::Target::Stderr)
        .try_init();
    if let Err(e) = result {
        eprintln!("logger already installed: {}", e);
    }
}

fn format(buf: &mut Formatter, record: &Record<'_>) -> io::Result<()> {
    let level = record.level();
    let mut level_style = buf.style();
    match level {
        Level::Trace => level_style.set_color(Color::White),
        Level::Debug => level_style.set_color(Color::Blue),
        Level::Info => level_style.set_color(Color::Green),
        Level::Warn => level_style.set_color(Color::Yellow),
        Level::Error => level_style.set_color(Color::Red).set_bold(true),
    };
    let ts = buf.timestamp_millis();
    write!(buf, "{:>5} {}: ", level_style.value(level), ts)?;

    let mut module_style = buf.style();
    module_style.set_color(Color::Yellow);
    if let Some(module_path) = record.module_path() {
        write!(buf, "{}: ", module_style.value(module_path))?;
    }

    writeln!(buf, "{}", record.args())
}
