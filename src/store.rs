//! Chart artifact storage
//!
//! Artifacts are keyed `charts/<uuid>.<ext>`, the same layout used for the
//! object-storage bucket.

use crate::error::Result;
use crate::render::RenderedChart;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Trait for artifact stores; `put` returns a link to the stored chart
pub trait ChartStore: Send + Sync {
    fn put(&self, chart: &RenderedChart) -> Result<String>;
}

/// New object key for a chart artifact
pub fn chart_key(extension: &str) -> String {
    format!("charts/{}.{}", Uuid::new_v4(), extension)
}

/// Stores artifacts as files under a root directory
///
/// Links are `file://` paths unless a public base URL is set, in which case
/// they are `{base}/{key}`. Remote chat clients can only display the latter,
/// so the root should be served under that base when charts are posted.
#[derive(Debug, Clone)]
pub struct LocalChartStore {
    root: PathBuf,
    public_base: Option<String>,
}

impl LocalChartStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            public_base: None,
        }
    }

    /// Link stored charts as `{base}/{key}` instead of a local file path
    pub fn with_public_base(mut self, base: impl Into<String>) -> Self {
        self.public_base = Some(base.into().trim_end_matches('/').to_string());
        self
    }
}

impl ChartStore for LocalChartStore {
    fn put(&self, chart: &RenderedChart) -> Result<String> {
        let key = chart_key(chart.extension);
        let path = self.root.join(&key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &chart.bytes)?;

        let absolute = path.canonicalize().unwrap_or(path);
        log::info!(
            "Stored {} ({} bytes) at {}",
            chart.content_type,
            chart.bytes.len(),
            absolute.display()
        );
        match &self.public_base {
            Some(base) => Ok(format!("{}/{}", base, key)),
            None => Ok(format!("file://{}", absolute.display())),
        }
    }
}
