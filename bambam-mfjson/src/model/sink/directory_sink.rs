use std::path::{Path, PathBuf};

use super::{sanitize_path_component, RoutePartition, SinkError, TrajectorySink};
use crate::model::encoding::{datetime_codec, TrajectoryDocument};

/// stage directory that holds one file per trajectory
pub const RAW_STAGE: &str = "raw";

/// writes each document to
/// `{root}/raw/{route}/Year=/Month=/Day=/{entity}-{trajectory_id}-{first_epoch}.mfjson`.
/// names depend only on document content, so re-running on the same input
/// overwrites the same files.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
    written: usize,
}

impl DirectorySink {
    pub fn new(root: &Path) -> DirectorySink {
        DirectorySink {
            root: root.to_path_buf(),
            written: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// number of files written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn path_for(&self, document: &TrajectoryDocument) -> Result<PathBuf, SinkError> {
        let entity_id = document
            .entity_id()
            .ok_or_else(|| SinkError::InvalidDocument(String::from("document has no feature")))?;
        let trajectory_id = document.trajectory_id().unwrap_or_default();
        let first = document.datetimes().first().ok_or_else(|| {
            SinkError::InvalidDocument(format!("trajectory of '{entity_id}' has no datetimes"))
        })?;
        let start = datetime_codec::parse_datetime(first).map_err(|e| {
            SinkError::InvalidDocument(format!("unreadable datetime '{first}': {e}"))
        })?;
        let partition = RoutePartition::new(document.route_id().as_deref(), start.date_naive());
        let filename = format!(
            "{}-{}-{}.mfjson",
            sanitize_path_component(entity_id),
            trajectory_id,
            start.timestamp()
        );
        Ok(partition.directory(&self.root, RAW_STAGE).join(filename))
    }
}

impl TrajectorySink for DirectorySink {
    fn emit(&mut self, document: TrajectoryDocument) -> Result<(), SinkError> {
        let path = self.path_for(&document)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SinkError::IoError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = document.to_json_pretty()?;
        std::fs::write(&path, json).map_err(|source| SinkError::IoError {
            path: path.clone(),
            source,
        })?;
        log::debug!("wrote trajectory file {}", path.display());
        self.written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::DirectorySink;
    use crate::model::encoding::{TrajectoryDocument, TrajectoryEncoder};
    use crate::model::sink::TrajectorySink;
    use crate::model::test_util::sample;

    fn document() -> TrajectoryDocument {
        let samples = vec![
            sample("y1858", "04:44:50", "t"),
            sample("y1858", "04:45:07", "t"),
        ];
        TrajectoryEncoder::default().encode(&samples, 3).unwrap()
    }

    #[test]
    fn test_writes_partitioned_file() {
        let root = std::env::temp_dir().join(format!("bambam-mfjson-dirsink-{}", std::process::id()));
        let mut sink = DirectorySink::new(&root);
        let doc = document();
        sink.emit(doc.clone()).unwrap();
        let expected = root
            .join("raw/1/Year=2024/Month=05/Day=01")
            .join("y1858-3-1714538690.mfjson");
        assert_eq!(sink.path_for(&doc).unwrap(), expected);
        let contents = std::fs::read_to_string(&expected).unwrap();
        let decoded: TrajectoryDocument = serde_json::from_str(&contents).unwrap();
        assert_eq!(decoded, doc);

        // same input, same file
        sink.emit(doc).unwrap();
        assert_eq!(std::fs::read_to_string(&expected).unwrap(), contents);
        assert_eq!(sink.written(), 2);
        std::fs::remove_dir_all(&root).unwrap();
    }
}
