use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::ExplorerConfig;
use crate::constants::{CONFIG_DIR_NAME, HOME_ENV_VAR};
use crate::models::{FieldDeclaration, FieldKind, HttpMethod, Operation};

const CONFIG_FILE: &str = "config.yaml";
const OPERATIONS_DIR: &str = "operations";

/// Locates and loads the explorer's files
pub struct Storage {
    config_dir: PathBuf,
}

impl Storage {
    /// `$API_EXPLORER_HOME`, else `~/.api-explorer`
    pub fn new() -> Self {
        let config_dir = std::env::var_os(HOME_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(CONFIG_DIR_NAME)
            });
        Storage { config_dir }
    }

    pub fn at(config_dir: impl Into<PathBuf>) -> Self {
        Storage {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn operations_dir(&self) -> PathBuf {
        self.config_dir.join(OPERATIONS_DIR)
    }

    /// Ensure config directory exists
    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        Ok(())
    }

    pub fn load_config(&self) -> Result<ExplorerConfig> {
        let config = ExplorerConfig::load(&self.config_dir.join(CONFIG_FILE))?;
        Ok(config)
    }

    /// Where the log goes; relative paths resolve against the config directory
    pub fn log_path(&self, config: &ExplorerConfig) -> PathBuf {
        let path = Path::new(&config.log_file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config_dir.join(path)
        }
    }

    /// Save an operation as `<name>.yaml` in the operations directory
    pub fn save_operation(&self, operation: &Operation) -> Result<PathBuf> {
        let dir = self.operations_dir();
        self.ensure_dir(&dir)?;
        let file_name: String = operation
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        let path = dir.join(format!("{}.yaml", file_name));
        let content = serde_yaml::to_string(operation)?;
        fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    /// Load every `*.yaml`/`*.yml` file of the operations directory, sorted
    /// by file name. A file holds one operation or a list of them; files that
    /// do not parse are skipped.
    pub fn load_operations(&self) -> Result<Vec<Operation>> {
        let dir = self.operations_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir).with_context(|| format!("reading {}", dir.display()))? {
            let path = entry?.path();
            let is_yaml = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == "yaml" || e == "yml");
            if is_yaml {
                paths.push(path);
            }
        }
        paths.sort();

        let mut operations = Vec::new();
        for path in paths {
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable operation file");
                    continue;
                }
            };
            if let Ok(list) = serde_yaml::from_str::<Vec<Operation>>(&content) {
                operations.extend(list);
            } else {
                match serde_yaml::from_str::<Operation>(&content) {
                    Ok(operation) => operations.push(operation),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping invalid operation file")
                    }
                }
            }
        }

        debug!(count = operations.len(), "operations loaded");
        Ok(operations)
    }

    /// First run: create the directory with a sample operation to explore
    pub fn init(&self) -> Result<()> {
        if self.operations_dir().exists() {
            return Ok(());
        }
        self.save_operation(&sample_operation())?;
        Ok(())
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

fn sample_operation() -> Operation {
    let mut id = FieldDeclaration::new("id", FieldKind::Path).required();
    id.default = Some("1".to_string());
    id.description = Some("Post id".to_string());

    Operation {
        name: "get-post".to_string(),
        method: HttpMethod::GET,
        url: "https://jsonplaceholder.typicode.com/posts/{id}".to_string(),
        description: Some("Fetch a single post".to_string()),
        fields: vec![id, FieldDeclaration::new("Accept", FieldKind::Header)],
    }
}
