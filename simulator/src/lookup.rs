//! The frozen output of a run: an indexed, weighted lookup table plus
//! a replay log ("books").
//!
//! The serving layer draws an index at play time and pays the row's
//! payout; the book for that index replays every board the round
//! showed. Both files round-trip losslessly: rebuilding the table from
//! the books reproduces identical weights and payouts.

use crate::{OutcomeRecord, Result};
use heist_engine::RoundEvent;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// One row of the lookup table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub index: u64,
    pub weight: f64,
    pub payout: f64,
}

/// The ordered, weighted outcome table for one bet mode. Read-only
/// once built.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupTable {
    pub mode: String,
    pub entries: Vec<LookupEntry>,
}

impl LookupTable {
    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// Weighted mean payout of the table.
    pub fn weighted_mean_payout(&self) -> f64 {
        let weighted: f64 = self.entries.iter().map(|e| e.weight * e.payout).sum();
        weighted / self.total_weight()
    }

    /// Write `index,weight,payout` rows. Floats print in Rust's
    /// shortest round-trip form, so reading the file back reproduces
    /// the exact values.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for entry in &self.entries {
            writeln!(writer, "{},{},{}", entry.index, entry.weight, entry.payout)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Rebuild a table from a replay log. The result is identical to
    /// the table the books were emitted alongside.
    pub fn from_books(mode: &str, books: &[Book]) -> Self {
        Self {
            mode: mode.to_string(),
            entries: books
                .iter()
                .map(|book| LookupEntry {
                    index: book.index,
                    weight: book.weight,
                    payout: book.payout,
                })
                .collect(),
        }
    }
}

/// One round's replay record, keyed by table index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub index: u64,
    pub criteria: String,
    pub weight: f64,
    pub payout: f64,
    pub capped: bool,
    pub events: Vec<RoundEvent>,
}

/// Freezes accepted records into the lookup table and its books.
pub struct LookupTableBuilder;

impl LookupTableBuilder {
    pub fn build(mode: &str, records: &[OutcomeRecord]) -> LookupTable {
        LookupTable {
            mode: mode.to_string(),
            entries: records
                .iter()
                .map(|record| LookupEntry {
                    index: record.index,
                    weight: record.weight,
                    payout: record.win,
                })
                .collect(),
        }
    }

    pub fn books(records: &[OutcomeRecord]) -> Vec<Book> {
        records
            .iter()
            .map(|record| Book {
                index: record.index,
                criteria: record.criteria.clone(),
                weight: record.weight,
                payout: record.win,
                capped: record.capped,
                events: record.round.events.clone(),
            })
            .collect()
    }
}

/// Write books as JSON lines, one per round.
pub fn write_books(books: &[Book], path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for book in books {
        serde_json::to_writer(&mut writer, book)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a books file written by [`write_books`].
pub fn read_books(path: &Path) -> Result<Vec<Book>> {
    let reader = BufReader::new(File::open(path)?);
    let mut books = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        books.push(serde_json::from_str(&line)?);
    }
    Ok(books)
}
