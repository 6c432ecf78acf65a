use std::fmt::Display;

use console::style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Normal,
    Verbose,
}

/// Where the installer reports what it did. Nothing written here affects
/// the manifest.
pub trait Output {
    fn write(&mut self, verbosity: Verbosity, message: &str);

    fn info<M: Display>(&mut self, msg: M) where Self: Sized {
        self.write(Verbosity::Normal, &msg.to_string())
    }

    fn verbose<M: Display>(&mut self, msg: M) where Self: Sized {
        self.write(Verbosity::Verbose, &msg.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput {
    pub verbose: bool,
    pub quiet: bool,
}

impl ConsoleOutput {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    fn enabled(&self, verbosity: Verbosity) -> bool {
        match verbosity {
            _ if self.quiet => false,
            Verbosity::Normal => true,
            Verbosity::Verbose => self.verbose,
        }
    }
}

impl Output for ConsoleOutput {
    fn write(&mut self, verbosity: Verbosity, message: &str) {
        if !self.enabled(verbosity) {
            return
        }

        match verbosity {
            Verbosity::Normal => println!("{} {message}", style(now()).dim()),
            Verbosity::Verbose => println!("{} {}", style(now()).dim(), style(message).dim()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullOutput;

impl Output for NullOutput {
    fn write(&mut self, _: Verbosity, _: &str) {}
}

impl Output for Vec<String> {
    fn write(&mut self, _: Verbosity, message: &str) {
        self.push(message.to_string())
    }
}

impl<O: Output + ?Sized> Output for &mut O {
    fn write(&mut self, verbosity: Verbosity, message: &str) {
        (**self).write(verbosity, message)
    }
}

pub fn now() -> String {
    chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
