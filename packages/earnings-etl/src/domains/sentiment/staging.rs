use std::path::PathBuf;

use chrono::NaiveDate;

/// Local directory layout for batch request and result files.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<root>/input/batchinput_{date}.jsonl`
    pub fn input_path(&self, date: NaiveDate) -> PathBuf {
        self.root
            .join("input")
            .join(format!("batchinput_{}.jsonl", date))
    }

    /// `<root>/output/batchoutput_{date}.jsonl`
    pub fn output_path(&self, date: NaiveDate) -> PathBuf {
        self.root
            .join("output")
            .join(format!("batchoutput_{}.jsonl", date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_per_date() {
        let staging = StagingArea::new("batch_files");
        let date = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();

        assert_eq!(
            staging.input_path(date),
            PathBuf::from("batch_files/input/batchinput_2024-02-28.jsonl")
        );
        assert_eq!(
            staging.output_path(date),
            PathBuf::from("batch_files/output/batchoutput_2024-02-28.jsonl")
        );
    }
}
