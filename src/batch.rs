use crate::{
    fetcher::SourceFetcher,
    output::OutputDir,
    record::{parse_listing, raw_fields, ContractRecord, Line},
    settings::DuplicatePolicy,
};
use std::{collections::HashMap, path::PathBuf};

const LOG_TARGET: &str = "batch";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<Failure>,
    pub skipped_lines: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// 1-based line number inside the listing.
    pub line: usize,
    /// `None` if the line could not be parsed into a record.
    pub name: Option<String>,
    pub reason: String,
}

impl Failure {
    fn record(record: &ContractRecord, reason: impl ToString) -> Self {
        Self {
            line: record.line,
            name: Some(record.name.clone()),
            reason: reason.to_string(),
        }
    }
}

/// Fetches the source of every contract in a listing and stores it
/// in the output directory. Records are processed one by one;
/// a failed record is logged and never stops the batch.
pub struct BatchScraper<F> {
    fetcher: F,
    output: OutputDir,
    min_line_length: usize,
}

impl<F: SourceFetcher> BatchScraper<F> {
    pub fn new(fetcher: F, output: OutputDir, min_line_length: usize) -> Self {
        Self {
            fetcher,
            output,
            min_line_length,
        }
    }

    pub async fn run(&self, listing: &str) -> BatchReport {
        let mut report = BatchReport::default();
        // contract name -> listing line it was written from
        let mut written: HashMap<String, usize> = HashMap::new();

        for line in parse_listing(listing, self.min_line_length) {
            let record = match line {
                Line::Record(record) => record,
                Line::TooShort => {
                    report.skipped_lines += 1;
                    continue;
                }
                Line::Invalid { line, text, error } => {
                    let (address, name) = raw_fields(text);
                    log::trace!(
                        target: LOG_TARGET,
                        "addr={}, name={}",
                        address,
                        name.unwrap_or_default()
                    );
                    log::warn!(target: LOG_TARGET, "line {line}: invalid record '{text}': {error}");
                    report.failures.push(Failure {
                        line,
                        name: None,
                        reason: error.to_string(),
                    });
                    continue;
                }
            };

            log::trace!(target: LOG_TARGET, "addr={}, name={}", record.raw_address, record.name);

            match self.output.on_duplicate() {
                DuplicatePolicy::KeepExisting if self.output.path_for(&record.name).exists() => {
                    log::warn!(
                        target: LOG_TARGET,
                        "{} {} skipped: output file already exists",
                        record.name,
                        record.raw_address
                    );
                    report
                        .failures
                        .push(Failure::record(&record, "output file already exists"));
                    continue;
                }
                DuplicatePolicy::Overwrite => {
                    if let Some(previous) = written.get(&record.name) {
                        log::warn!(
                            target: LOG_TARGET,
                            "{} {} overwrites the source written for line {}",
                            record.name,
                            record.raw_address,
                            previous
                        );
                    }
                }
                DuplicatePolicy::KeepExisting => {}
            }

            let source = match self.fetcher.fetch_source(&record.address).await {
                Ok(source) => source,
                Err(err) => {
                    log::info!(
                        target: LOG_TARGET,
                        "{} {} cannot get code: {}",
                        record.name,
                        record.raw_address,
                        err
                    );
                    report.failures.push(Failure::record(&record, err));
                    continue;
                }
            };

            let contents = format!("{source}\n//{}", record.raw_address);
            match self.output.write(&record.name, &contents) {
                Ok(path) => {
                    log::debug!(target: LOG_TARGET, "{} written to {}", record.name, path.display());
                    written.insert(record.name.clone(), record.line);
                    report.written.push(path);
                }
                Err(err) => {
                    log::warn!(
                        target: LOG_TARGET,
                        "{} {} cannot save code: {}",
                        record.name,
                        record.raw_address,
                        err
                    );
                    report.failures.push(Failure::record(&record, err));
                }
            }
        }

        log::info!(
            target: LOG_TARGET,
            "listing processed: written={}, failed={}, skipped_lines={}",
            report.written.len(),
            report.failures.len(),
            report.skipped_lines
        );
        report
    }
}
