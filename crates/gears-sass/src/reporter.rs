use serde::Serialize;
use std::path::PathBuf;

/// What a save did with one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Built,
    Skipped,
    Copied,
}

#[derive(Debug, Default, Serialize)]
pub struct BuildReport {
    pub built: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub copied: Vec<PathBuf>,
    pub total: usize,
}

impl BuildReport {
    pub fn record(&mut self, asset: PathBuf, outcome: BuildOutcome) {
        self.total += 1;
        match outcome {
            BuildOutcome::Built => self.built.push(asset),
            BuildOutcome::Skipped => self.skipped.push(asset),
            BuildOutcome::Copied => self.copied.push(asset),
        }
    }
}

pub fn report_text(report: &BuildReport) {
    if report.total == 0 {
        println!("No public assets found.");
        return;
    }

    for file in &report.built {
        println!("  built   {}", file.display());
    }
    for file in &report.copied {
        println!("  copied  {}", file.display());
    }
    println!(
        "\n{} built, {} copied, {} up to date",
        report.built.len(),
        report.copied.len(),
        report.skipped.len()
    );
}

pub fn report_dependencies(dependencies: &[PathBuf]) {
    for dep in dependencies {
        println!("{}", dep.display());
    }
}

pub fn report_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts() {
        let mut report = BuildReport::default();
        report.record(PathBuf::from("a.scss"), BuildOutcome::Built);
        report.record(PathBuf::from("b.scss"), BuildOutcome::Skipped);
        report.record(PathBuf::from("c.txt"), BuildOutcome::Copied);

        assert_eq!(report.total, 3);
        assert_eq!(report.built, vec![PathBuf::from("a.scss")]);
        assert_eq!(report.skipped, vec![PathBuf::from("b.scss")]);
        assert_eq!(report.copied, vec![PathBuf::from("c.txt")]);
    }

    #[test]
    fn test_serializes() {
        let mut report = BuildReport::default();
        report.record(PathBuf::from("main.scss"), BuildOutcome::Built);

        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["built"][0], "main.scss");
        assert_eq!(json["total"], 1);
    }
}
