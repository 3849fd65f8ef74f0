use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// One completed gradient-descent iteration.
///
/// `loss` is measured with the parameters the iteration started from;
/// `accuracy` and the optional snapshot use the parameters it produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub iteration: usize,
    pub loss: f64,
    pub accuracy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias: Option<f64>,
}

/// Append-only history of a single training run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingLog {
    records: Vec<TrainingRecord>,
}

impl TrainingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TrainingRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TrainingRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrainingRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TrainingRecord> {
        self.records.last()
    }

    pub fn losses(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.loss).collect()
    }

    pub fn accuracies(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.accuracy).collect()
    }

    /// Writes one JSON object per record, newline separated.
    pub fn write_json_lines<W: Write>(&self, mut writer: W) -> crate::Result<()> {
        for record in &self.records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Appends the records to `path` as JSON lines, creating the file if needed.
    pub fn save_json_lines<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        self.write_json_lines(std::io::BufWriter::new(file))
    }
}

impl<'a> IntoIterator for &'a TrainingLog {
    type Item = &'a TrainingRecord;
    type IntoIter = std::slice::Iter<'a, TrainingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(iteration: usize, loss: f64) -> TrainingRecord {
        TrainingRecord {
            iteration,
            loss,
            accuracy: 0.5,
            weights: None,
            bias: None,
        }
    }

    #[test]
    fn test_log_accessors() {
        let mut log = TrainingLog::new();
        assert!(log.is_empty());
        log.push(record(0, 0.9));
        log.push(record(1, 0.7));
        assert_eq!(log.len(), 2);
        assert_eq!(log.losses(), vec![0.9, 0.7]);
        assert_eq!(log.accuracies(), vec![0.5, 0.5]);
        assert_eq!(log.last().map(|r| r.iteration), Some(1));
        assert_eq!((&log).into_iter().count(), 2);
    }

    #[test]
    fn test_json_lines() {
        let mut log = TrainingLog::new();
        log.push(record(0, 0.25));
        log.push(TrainingRecord {
            weights: Some(vec![1.0, -1.0]),
            bias: Some(0.5),
            ..record(1, 0.125)
        });

        let mut buf = Vec::new();
        log.write_json_lines(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(!lines[0].contains("weights"));

        let parsed: TrainingRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed, log.records()[1]);
    }

    struct RefusesFlush(Vec<u8>);

    impl Write for RefusesFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn test_json_lines_flush_error_surfaces() {
        let mut log = TrainingLog::new();
        log.push(record(0, 0.7));
        let mut sink = RefusesFlush(Vec::new());
        assert!(log.write_json_lines(&mut sink).is_err());
        assert!(!sink.0.is_empty());
    }

    #[test]
    fn test_save_json_lines_appends() {
        let mut log = TrainingLog::new();
        log.push(record(0, 1.0));

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run.jsonl");
        log.save_json_lines(&path).unwrap();
        log.save_json_lines(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
