//! Fixed-rate polling loop
//! Sleeps a fixed period, runs one translator tick and writes the resulting commands.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::core::runtime::InputRuntime;
use crate::mapping::command::CommandWriter;
use crate::mapping::translator::Translator;

pub struct Poller<R, W: Write> {
    runtime: R,
    translator: Translator,
    writer: CommandWriter<W>,
    tick_period: Duration,
}

impl<R: InputRuntime, W: Write> Poller<R, W> {
    pub fn new(
        runtime: R,
        translator: Translator,
        writer: CommandWriter<W>,
        tick_period: Duration,
    ) -> Self {
        Self {
            runtime,
            translator,
            writer,
            tick_period,
        }
    }

    /// Runs the loop. With `max_ticks == None` this only returns on a write error.
    ///
    /// The sleep is not compensated for processing time, so the effective rate
    /// is slightly below the nominal one.
    pub fn run(&mut self, max_ticks: Option<u64>) -> io::Result<u64> {
        info!("Enter to main loop");
        let mut ticks = 0u64;
        while max_ticks.is_none_or(|limit| ticks < limit) {
            thread::sleep(self.tick_period);
            self.tick()?;
            ticks += 1;
        }
        debug!("Polling stopped after {} ticks", ticks);
        Ok(ticks)
    }

    /// One iteration without the sleep.
    pub fn tick(&mut self) -> io::Result<()> {
        let outcome = self.translator.step(&mut self.runtime);
        for command in &outcome.commands {
            self.writer.write_command(command)?;
        }
        Ok(())
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn writer(&self) -> &CommandWriter<W> {
        &self.writer
    }

    pub fn into_parts(self) -> (R, Translator, CommandWriter<W>) {
        (self.runtime, self.translator, self.writer)
    }
}
