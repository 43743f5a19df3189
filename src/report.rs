//! Console reporting.
//!
//! Everything the operator reads goes through [`Reporter`]; diagnostics go
//! through `tracing` on stderr instead.

use sqlserver_demo::{ConnectionTarget, DemoRecord, DemoStoreError};
use std::io::{self, BufRead, Write};

pub struct Reporter<W> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn loops(&mut self, loops: u32) -> io::Result<()> {
        writeln!(self.out, "Loops: {loops}")
    }

    pub fn cli_override(&mut self, wait_for_key: bool) -> io::Result<()> {
        writeln!(self.out, "CLI Override: {}", u8::from(wait_for_key))
    }

    pub fn fatal(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{message}")?;
        self.out.flush()
    }

    pub fn settings<'a, I>(&mut self, entries: I) -> io::Result<()>
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        writeln!(self.out, "\nConfiguration:")?;
        for (key, value) in entries {
            writeln!(self.out, "  {key} = {value}")?;
        }
        Ok(())
    }

    /// Connection parameters. The password is never printed.
    pub fn connection(&mut self, target: &ConnectionTarget) -> io::Result<()> {
        writeln!(self.out, "\nBuilding SQL connection with:")?;
        writeln!(self.out, "Server: {}", target.server)?;
        writeln!(self.out, "Database: {}", target.database)?;
        writeln!(self.out, "User: {}", target.user)
    }

    pub fn query_banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "\nQuery Log:")?;
        writeln!(self.out, "=========================================\n")
    }

    pub fn writing(&mut self, timestamp: &str) -> io::Result<()> {
        writeln!(self.out, "Writing {timestamp} to the database...")
    }

    pub fn record(&mut self, record: Option<&DemoRecord>) -> io::Result<()> {
        writeln!(self.out, "Reading last entry from database...")?;
        match record {
            Some(record) => writeln!(self.out, "{record}"),
            None => writeln!(self.out, "No entries found in Demo table."),
        }
    }

    pub fn database_error(&mut self, error: &DemoStoreError) -> io::Result<()> {
        writeln!(self.out, "{error}")
    }

    /// Final message; with `wait_for_key`, block until a line is read from
    /// `input`.
    pub fn done<R: BufRead>(&mut self, wait_for_key: bool, input: &mut R) -> io::Result<()> {
        if wait_for_key {
            writeln!(self.out, "\nDone. Press Enter.")?;
            self.out.flush()?;
            let mut line = String::new();
            input.read_line(&mut line)?;
        } else {
            writeln!(self.out, "\nDone.")?;
            self.out.flush()?;
        }
        Ok(())
    }
}
