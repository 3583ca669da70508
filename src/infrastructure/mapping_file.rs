// Line mapping loaded from a JSON file on disk
use crate::application::ports::MappingSource;
use crate::domain::line_mapping::LineMapping;
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct MappingFile {
    path: PathBuf,
}

impl MappingFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MappingSource for MappingFile {
    async fn load_mapping(&self) -> anyhow::Result<LineMapping> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("unable to read line mapping {}", self.path.display()))?;
        LineMapping::from_json(&text).with_context(|| format!("invalid line mapping JSON {}", self.path.display()))
    }
}
