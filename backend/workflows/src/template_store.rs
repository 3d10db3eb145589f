//! Message templates keyed by filename, loaded once from the demo directory.

use std::collections::HashMap;
use std::path::Path;

use nocode_core::{BotError, Template};
use tokio::fs;
use tracing::{debug, info};

/// Read-only map of template filename to [`Template`].
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: HashMap<String, Template>,
}

impl TemplateStore {
    /// Load every file in `dir` as a template keyed by its filename.
    ///
    /// Any unreadable entry or malformed payload fails the whole load.
    /// Subdirectories are skipped.
    pub async fn load(dir: &Path) -> Result<Self, BotError> {
        let io_err =
            |source: std::io::Error| BotError::TemplateLoad { path: dir.to_path_buf(), source };

        let mut entries = fs::read_dir(dir).await.map_err(io_err)?;
        let mut templates = HashMap::new();

        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            if entry.file_type().await.map_err(io_err)?.is_dir() {
                debug!(path = %path.display(), "Skipping directory in template dir");
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let source = fs::read_to_string(&path)
                .await
                .map_err(|source| BotError::TemplateLoad { path: path.clone(), source })?;
            let template = Template::parse(name.clone(), &source)?;

            debug!(template = %name, blocks = template.blocks().len(), "Loaded template");
            templates.insert(name, template);
        }

        info!(dir = %dir.display(), count = templates.len(), "Loaded message templates");
        Ok(Self { templates })
    }

    pub fn from_templates(templates: impl IntoIterator<Item = Template>) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|t| (t.name().to_string(), t))
                .collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
