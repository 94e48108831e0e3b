pub mod data_writer;
pub mod instance_reader;
pub mod instance_writer;
pub mod report_reader;
pub mod summary_writer;

#[cfg(test)]
pub(crate) mod tests {
    use std::path::{Path, PathBuf};

    pub(crate) fn test_instances_directory(name: impl AsRef<Path>) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("testcases")
            .join(name)
    }

    /// All files matching `pattern` (e.g. `single/valid/*.in`) below `testcases/`
    pub(crate) fn test_files(pattern: &str) -> Vec<PathBuf> {
        let pattern = test_instances_directory(pattern);
        let result: Vec<_> = glob::glob(pattern.to_str().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap())
            .collect();

        assert!(!result.is_empty(), "No test files match {pattern:?}");

        result
    }

    pub(crate) fn read_test_file(name: impl AsRef<Path>) -> String {
        std::fs::read_to_string(test_instances_directory(name)).unwrap()
    }
}
