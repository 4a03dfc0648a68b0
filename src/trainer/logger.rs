use std::{
    fmt::Debug,
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use super::EpochReport;

/// Receives training progress. Purely observational, nothing a logger does affects training.
pub trait Logger: Debug {
    fn epoch(&mut self, report: &EpochReport);

    fn batch(&mut self, _epoch: usize, _batch: usize, _batch_len: usize) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MockLogger;

impl Logger for MockLogger {
    fn epoch(&mut self, _report: &EpochReport) {}
}

/// Emits every report as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl TracingLogger {
    /// The lines logged for `report`. The first one always names the epoch.
    fn lines(report: &EpochReport) -> Vec<String> {
        let mut lines = vec![match report.test_accuracy {
            Some((correct, total)) => format!("Epoch {}: {} / {}", report.epoch, correct, total),
            None => format!("Epoch {} complete", report.epoch),
        }];
        if let Some(cost) = report.training_cost {
            lines.push(format!("Cost on training data: {}", cost));
        }
        if let Some((correct, total)) = report.training_accuracy {
            lines.push(format!("Accuracy on training data: {} / {}", correct, total));
        }
        if let Some(cost) = report.test_cost {
            lines.push(format!("Cost on test data: {}", cost));
        }
        lines
    }
}

impl Logger for TracingLogger {
    fn epoch(&mut self, report: &EpochReport) {
        for line in Self::lines(report) {
            tracing::info!("{}", line);
        }
    }

    fn batch(&mut self, epoch: usize, batch: usize, batch_len: usize) {
        tracing::trace!(epoch, batch, batch_len, "mini-batch done");
    }
}

/// Writes one CSV line per epoch:
/// `epoch,training_cost,training_correct,test_cost,test_correct`. Missing metrics are left empty.
#[derive(Debug)]
pub struct LogFile {
    file: PathBuf,
    writer: BufWriter<File>,
}

impl LogFile {
    pub fn new<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self {
            file: path.as_ref().to_owned(),
            writer: BufWriter::new(File::create(path)?),
        })
    }

    fn write_report(&mut self, report: &EpochReport) -> io::Result<()> {
        fn cell<T: ToString>(v: Option<T>) -> String {
            v.map(|v| v.to_string()).unwrap_or_default()
        }

        writeln!(
            self.writer,
            "{},{},{},{},{}",
            report.epoch,
            cell(report.training_cost),
            cell(report.training_accuracy.map(|(c, _)| c)),
            cell(report.test_cost),
            cell(report.test_accuracy.map(|(c, _)| c)),
        )?;
        self.writer.flush()
    }
}

impl Logger for LogFile {
    fn epoch(&mut self, report: &EpochReport) {
        if let Err(e) = self.write_report(report) {
            tracing::warn!(
                "Error while logging progress to file: {}\nError: {}",
                self.file.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_lines() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("log.csv");
        let mut log = LogFile::new(&path)?;

        log.epoch(&EpochReport {
            epoch: 0,
            training_cost: Some(0.5),
            test_accuracy: Some((7, 10)),
            ..Default::default()
        });
        log.epoch(&EpochReport {
            epoch: 1,
            ..Default::default()
        });

        let contents = std::fs::read_to_string(&path)?;
        assert_eq!(contents, "0,0.5,,,7\n1,,,,\n");
        Ok(())
    }

    #[test]
    fn every_epoch_is_named() {
        let cost_only = EpochReport {
            epoch: 4,
            training_cost: Some(0.5),
            ..Default::default()
        };
        assert_eq!(
            TracingLogger::lines(&cost_only),
            vec!["Epoch 4 complete", "Cost on training data: 0.5"]
        );

        let accuracy = EpochReport {
            epoch: 2,
            test_accuracy: Some((9, 10)),
            ..Default::default()
        };
        assert_eq!(TracingLogger::lines(&accuracy), vec!["Epoch 2: 9 / 10"]);
        assert_eq!(
            TracingLogger::lines(&EpochReport::default()),
            vec!["Epoch 0 complete"]
        );
    }

    #[test]
    fn loggers_accept_reports() {
        let report = EpochReport {
            epoch: 3,
            test_cost: Some(1.),
            ..Default::default()
        };
        MockLogger.epoch(&report);
        TracingLogger.epoch(&report);
        TracingLogger.epoch(&EpochReport::default());
    }
}
