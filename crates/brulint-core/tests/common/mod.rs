//! Test doubles shared by the integration tests

#![allow(dead_code)]

use brulint_core::config::raw::parse_config_value;
use brulint_core::{
    Analyzer, Backend, BrulintError, ConfigStore, Configuration, FileConfigStore, GlobalOptions,
    LintResult, Result,
};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What the mock analyzer saw and what it will report next
#[derive(Debug, Default)]
pub struct MockState {
    pub options: Option<GlobalOptions>,
    pub file_path: Option<PathBuf>,
    pub file_content: Option<String>,
    pub lint_config: Option<Configuration>,
    pub lint_calls: usize,
    /// Errors the next `lint` call adds
    pub next_errors: usize,
    pub output: String,
    /// Errors accumulated since the last clear
    pub accumulated: usize,
}

/// Records its inputs; accumulates errors like a real engine until cleared
pub struct MockAnalyzer {
    state: Arc<Mutex<MockState>>,
}

impl Analyzer for MockAnalyzer {
    fn lint(&mut self, path: &Path, content: &str, config: &Configuration) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.file_path = Some(path.to_path_buf());
        state.file_content = Some(content.to_string());
        state.lint_config = Some(config.clone());
        state.lint_calls += 1;
        state.accumulated += state.next_errors;
        Ok(())
    }

    fn result(&self) -> LintResult {
        let state = self.state.lock().unwrap();
        LintResult {
            error_count: state.accumulated,
            output: state.output.clone(),
            ..Default::default()
        }
    }

    fn clear_findings(&mut self) {
        self.state.lock().unwrap().accumulated = 0;
    }
}

/// Config store keyed by config file path, never touching the disk
#[derive(Default)]
pub struct MemoryStore {
    configs: HashMap<PathBuf, Configuration>,
    pub loads: AtomicUsize,
}

impl MemoryStore {
    /// Place a `tslint.json` with `raw` settings in `dir`
    pub fn with_config(mut self, dir: &Path, raw: Value) -> Self {
        let config = parse_config_value(&raw, Some(dir)).unwrap();
        self.configs.insert(dir.join("tslint.json"), config);
        self
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ConfigStore for MemoryStore {
    fn parse_inline_config(&self, raw: &Value) -> Result<Configuration> {
        parse_config_value(raw, None)
    }

    fn find_nearest_config_path(&self, start_dir: &Path) -> Result<Option<PathBuf>> {
        Ok(start_dir
            .ancestors()
            .map(|dir| dir.join("tslint.json"))
            .find(|path| self.configs.contains_key(path)))
    }

    fn load_config_from_path(&self, path: &Path) -> Result<Configuration> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.configs
            .get(path)
            .cloned()
            .ok_or_else(|| BrulintError::config_error(format!("no config at {}", path.display())))
    }
}

/// Backend handing out a mock analyzer and a chosen store
pub struct MockBackend {
    pub state: Arc<Mutex<MockState>>,
    pub store: Arc<dyn ConfigStore>,
    pub analyzers_created: AtomicUsize,
}

impl MockBackend {
    pub fn with_store(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            store,
            analyzers_created: AtomicUsize::new(0),
        }
    }

    /// Mock analyzer over the real file-system store
    pub fn on_disk() -> Self {
        Self::with_store(Arc::new(FileConfigStore::new()))
    }

    pub fn set_result(&self, errors: usize, output: &str) {
        let mut state = self.state.lock().unwrap();
        state.next_errors = errors;
        state.output = output.to_string();
    }

    pub fn last_config(&self) -> Option<Configuration> {
        self.state.lock().unwrap().lint_config.clone()
    }
}

impl Backend for MockBackend {
    fn config_store(&self) -> Arc<dyn ConfigStore> {
        Arc::clone(&self.store)
    }

    fn create_analyzer(&self, options: &GlobalOptions) -> Result<Box<dyn Analyzer>> {
        self.analyzers_created.fetch_add(1, Ordering::SeqCst);
        self.state.lock().unwrap().options = Some(options.clone());
        Ok(Box::new(MockAnalyzer {
            state: Arc::clone(&self.state),
        }))
    }
}
