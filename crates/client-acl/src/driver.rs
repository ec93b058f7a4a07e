//! Batch add, list and delete against a flow table.
//!
//! Listing and deleting walk the table with a cursor: the template is looked
//! up first, and if it is not present the walk starts at the entry after it.
//! Each processed entry becomes the key for the next fetch, until the table
//! reports `NotFound` or the requested count is reached.

use crate::display::FlowDisplay;
use crate::error::{ClientError, ClientResult};
use log::{debug, error, warn};
use ofdpa_rpc::{FlowEntry, FlowTableClient, OfdpaResult};
use std::io::Write;

/// What a batch does with the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Add,
    Delete,
    List,
}

/// Position of an enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Looking for the first entry at or after the template.
    Seeking,
    /// Positioned on an entry that has not been processed yet.
    Iterating,
    Done,
}

/// Summary of a completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchReport {
    /// Flows added, listed or deleted.
    pub processed: u32,
    /// Deletions the table rejected.
    pub failed: u32,
}

/// Drives batches against a [`FlowTableClient`], printing progress to `out`.
pub struct TableDriver<C, W> {
    client: C,
    out: W,
}

impl<C: FlowTableClient, W: Write> TableDriver<C, W> {
    pub fn new(client: C, out: W) -> Self {
        TableDriver { client, out }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn into_parts(self) -> (C, W) {
        (self.client, self.out)
    }

    /// Adds `count` copies of `flow`, advancing the destination MAC after each.
    ///
    /// Stops at the first rejected add; flows already added stay in the table.
    pub fn add_batch(&mut self, flow: &FlowEntry, count: u32) -> ClientResult<BatchReport> {
        writeln!(
            self.out,
            "Adding {} Policy ACL flows with the following parameters:",
            count
        )?;
        write!(self.out, "{}", FlowDisplay(flow))?;
        writeln!(
            self.out,
            "\nDestination MAC address is incremented in each additional flow.\n"
        )?;

        let mut flow = flow.clone();
        let mut report = BatchReport::default();
        for _ in 0..count {
            debug!(
                "Adding flow with destination MAC {}",
                flow.match_criteria.destination_mac.value
            );
            if let Err(e) = self.client.flow_add(&flow) {
                error!("Failed to add Policy ACL flow entry: {}", e);
                writeln!(self.out, "\nFailed to add Policy ACL flow entry: {}.", e)?;
                write!(self.out, "{}", FlowDisplay(&flow))?;
                return Err(ClientError::remote("flow_add", e));
            }
            report.processed += 1;
            flow.match_criteria.destination_mac.value.increment();
        }
        Ok(report)
    }

    /// Lists up to `count` flows starting at `template` (0 lists all).
    pub fn list_batch(&mut self, template: &FlowEntry, count: u32) -> ClientResult<BatchReport> {
        writeln!(self.out, "Listing up to {} Policy ACL flows.", count)?;
        let report = self.walk(template, count, Mode::List)?;
        if count != 0 && report.processed < count {
            writeln!(self.out, "\nNo more entries found.")?;
        }
        Ok(report)
    }

    /// Deletes up to `count` flows starting at `template` (0 deletes all).
    ///
    /// A rejected delete is reported and the walk continues.
    pub fn delete_batch(&mut self, template: &FlowEntry, count: u32) -> ClientResult<BatchReport> {
        writeln!(self.out, "Deleting up to {} Policy ACL flows.", count)?;
        self.walk(template, count, Mode::Delete)
    }

    /// Finds the template itself, or failing that the entry after it.
    fn seek(&mut self, template: &FlowEntry) -> OfdpaResult<FlowEntry> {
        match self.client.flow_get(template) {
            Err(e) if e.is_not_found() => self.client.flow_next_get(template),
            other => other,
        }
    }

    fn walk(&mut self, template: &FlowEntry, count: u32, mode: Mode) -> ClientResult<BatchReport> {
        let mut report = BatchReport::default();
        let mut current = template.clone();
        let mut state = BatchState::Seeking;

        while state != BatchState::Done {
            state = match state {
                BatchState::Seeking => match self.seek(&current) {
                    Ok(found) => {
                        current = found;
                        BatchState::Iterating
                    }
                    Err(e) if e.is_not_found() => BatchState::Done,
                    Err(e) => return Err(ClientError::remote("flow_get", e)),
                },
                BatchState::Iterating => {
                    report.processed += 1;
                    self.process(&current, report.processed, mode, &mut report)?;

                    if count != 0 && report.processed >= count {
                        BatchState::Done
                    } else {
                        match self.client.flow_next_get(&current) {
                            Ok(next) => {
                                current = next;
                                BatchState::Iterating
                            }
                            Err(e) if e.is_not_found() => BatchState::Done,
                            Err(e) => return Err(ClientError::remote("flow_next_get", e)),
                        }
                    }
                }
                BatchState::Done => BatchState::Done,
            };
        }

        debug!("{:?} batch finished: {:?}", mode, report);
        Ok(report)
    }

    fn process(
        &mut self,
        flow: &FlowEntry,
        number: u32,
        mode: Mode,
        report: &mut BatchReport,
    ) -> ClientResult<()> {
        match mode {
            Mode::Delete => writeln!(self.out, "Deleting flow number {}.", number)?,
            _ => writeln!(self.out, "Flow number {}.", number)?,
        }
        write!(self.out, "{}", FlowDisplay(flow))?;

        if mode == Mode::Delete {
            if let Err(e) = self.client.flow_delete(flow) {
                warn!("Failed to delete Policy ACL flow entry: {}", e);
                writeln!(self.out, "\nError deleting Policy ACL flow entry: {}.", e)?;
                report.failed += 1;
            }
        }
        Ok(())
    }
}
