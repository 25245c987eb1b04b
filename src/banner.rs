//! Console lines printed to stdout rather than logged, so they show up whatever `RUST_LOG` says.

use sigsci_sounds_config::TagConfig;
use std::{
    io::{
        self,
        Write,
    },
    path::Path,
};

pub fn print_banner() {
    emit(write_banner);
}

pub fn print_run_hint() {
    emit(write_run_hint);
}

pub fn print_test_header(config_file: &Path) {
    emit(|out| write_test_header(out, config_file));
}

pub fn print_playing(tag: &TagConfig) {
    emit(|out| write_playing(out, tag));
}

pub fn print_done() {
    emit(|out| writeln!(out, "Done!"));
}

pub fn print_farewell() {
    emit(|out| writeln!(out, "\nTerminating SigSci Sounds!"));
}

/// A closed stdout is not worth failing over.
fn emit(write: impl FnOnce(&mut io::StdoutLock<'static>) -> io::Result<()>) {
    let mut out = io::stdout().lock();
    if let Err(err) = write(&mut out).and_then(|()| out.flush()) {
        debug!("failed to write to stdout: {err}");
    }
}

fn write_banner(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Initiating SigSci Sounds!")
}

fn write_run_hint(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Enjoy the soothing sounds of attacks and anomalies...")?;
    writeln!(out, "Press Ctrl+C to terminate.")
}

fn write_test_header(out: &mut impl Write, config_file: &Path) -> io::Result<()> {
    writeln!(out, "Testing sound files for {}", config_file.display())
}

fn write_playing(out: &mut impl Write, tag: &TagConfig) -> io::Result<()> {
    writeln!(out, "Playing sound for {} ({})", tag.name, tag.sound)
}
