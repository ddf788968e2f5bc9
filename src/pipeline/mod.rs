//! Static asset build: clear, copy and concatenate the page sources into a dist tree.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use futures::future::try_join_all;
use log::{debug, info, warn};
use thiserror::Error;

pub const DEFAULT_CSS_BUNDLE: &str = "index.css";
pub const DEFAULT_WATCH_INTERVAL_MS: u64 = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Task {
    Clear,
    Json,
    Html,
    Css,
    Scripts,
}

impl Task {
    /// Tasks run by a full build, in order.
    pub const BUILD: [Task; 5] = [Task::Clear, Task::Json, Task::Html, Task::Css, Task::Scripts];

    pub fn label(self) -> &'static str {
        match self {
            Task::Clear => "clear",
            Task::Json => "json",
            Task::Html => "html",
            Task::Css => "css",
            Task::Scripts => "scripts",
        }
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to {action} '{path}': {source}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("refusing to clear '{dist}': it contains the source directory '{src}'")]
    DistContainsSources { dist: String, src: String },

    #[error("watch interrupted: {source}")]
    Signal {
        #[source]
        source: std::io::Error,
    },
}

fn io_err(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> BuildError {
    let path = path.display().to_string();
    move |source| BuildError::Io {
        action,
        path,
        source,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltFile {
    pub path: PathBuf,
    pub bytes: u64,
}

#[derive(Clone, Debug, Default)]
pub struct BuildReport {
    pub files: Vec<BuiltFile>,
}

impl BuildReport {
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.bytes).sum()
    }
}

#[derive(Clone, Debug)]
pub struct BuildPipeline {
    pub src_dir: PathBuf,
    pub dist_dir: PathBuf,
    pub css_bundle: String,
}

type Snapshot = HashMap<Task, Vec<(PathBuf, Option<SystemTime>, u64)>>;

impl BuildPipeline {
    pub fn new(src_dir: impl Into<PathBuf>, dist_dir: impl Into<PathBuf>) -> Self {
        Self {
            src_dir: src_dir.into(),
            dist_dir: dist_dir.into(),
            css_bundle: DEFAULT_CSS_BUNDLE.to_string(),
        }
    }

    /// Source directory and extension a task reads from.
    fn inputs(&self, task: Task) -> Option<(PathBuf, &'static str)> {
        match task {
            Task::Clear => None,
            Task::Json => Some((self.src_dir.join("db"), "json")),
            Task::Html => Some((self.src_dir.clone(), "html")),
            Task::Css => Some((self.src_dir.join("css"), "css")),
            Task::Scripts => Some((self.src_dir.clone(), "js")),
        }
    }

    pub async fn clear(&self) -> Result<(), BuildError> {
        let dist = resolve_path(&self.dist_dir).await;
        let src = resolve_path(&self.src_dir).await;
        if src.starts_with(&dist) {
            return Err(BuildError::DistContainsSources {
                dist: self.dist_dir.display().to_string(),
                src: self.src_dir.display().to_string(),
            });
        }
        match tokio::fs::remove_dir_all(&self.dist_dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err("remove", &self.dist_dir)(e)),
        }
    }

    pub async fn run_task(&self, task: Task) -> Result<Vec<BuiltFile>, BuildError> {
        debug!("running task {}", task.label());
        match task {
            Task::Clear => {
                self.clear().await?;
                Ok(Vec::new())
            }
            Task::Json => self.copy_task(task, self.dist_dir.join("db")).await,
            Task::Html => self.copy_task(task, self.dist_dir.clone()).await,
            Task::Scripts => self.copy_task(task, self.dist_dir.join("js")).await,
            Task::Css => self.concat_css().await.map(|f| f.into_iter().collect()),
        }
    }

    pub async fn run_tasks(&self, tasks: &[Task]) -> Result<BuildReport, BuildError> {
        let mut report = BuildReport::default();
        for task in tasks {
            report.files.extend(self.run_task(*task).await?);
        }
        Ok(report)
    }

    pub async fn build(&self) -> Result<BuildReport, BuildError> {
        let report = self.run_tasks(&Task::BUILD).await?;
        info!(
            "built {} files ({} bytes) into {}",
            report.files.len(),
            report.total_bytes(),
            self.dist_dir.display()
        );
        Ok(report)
    }

    async fn copy_task(&self, task: Task, to: PathBuf) -> Result<Vec<BuiltFile>, BuildError> {
        let Some((from, ext)) = self.inputs(task) else {
            return Ok(Vec::new());
        };
        let sources = list_files(&from, ext).await?;
        if sources.is_empty() {
            return Ok(Vec::new());
        }
        tokio::fs::create_dir_all(&to)
            .await
            .map_err(io_err("create", &to))?;
        let copies = sources.into_iter().map(|source| {
            let target = to.join(source.file_name().unwrap_or_default());
            async move {
                let bytes = tokio::fs::copy(&source, &target)
                    .await
                    .map_err(io_err("copy", &source))?;
                Ok::<_, BuildError>(BuiltFile {
                    path: target,
                    bytes,
                })
            }
        });
        try_join_all(copies).await
    }

    /// Concatenates the stylesheets in file-name order into one bundle.
    async fn concat_css(&self) -> Result<Option<BuiltFile>, BuildError> {
        let Some((from, ext)) = self.inputs(Task::Css) else {
            return Ok(None);
        };
        let sources = list_files(&from, ext).await?;
        if sources.is_empty() {
            return Ok(None);
        }
        let mut bundle = String::new();
        for source in &sources {
            let contents = tokio::fs::read_to_string(source)
                .await
                .map_err(io_err("read", source))?;
            if !bundle.is_empty() {
                bundle.push('\n');
            }
            bundle.push_str(&contents);
        }
        let out_dir = self.dist_dir.join("css");
        tokio::fs::create_dir_all(&out_dir)
            .await
            .map_err(io_err("create", &out_dir))?;
        let target = out_dir.join(&self.css_bundle);
        tokio::fs::write(&target, bundle.as_bytes())
            .await
            .map_err(io_err("write", &target))?;
        Ok(Some(BuiltFile {
            path: target,
            bytes: bundle.len() as u64,
        }))
    }

    async fn snapshot(&self) -> Result<Snapshot, BuildError> {
        let mut snapshot = Snapshot::new();
        for task in Task::BUILD {
            let Some((dir, ext)) = self.inputs(task) else {
                continue;
            };
            let mut entries = Vec::new();
            for path in list_files(&dir, ext).await? {
                let meta = tokio::fs::metadata(&path)
                    .await
                    .map_err(io_err("stat", &path))?;
                entries.push((path, meta.modified().ok(), meta.len()));
            }
            snapshot.insert(task, entries);
        }
        Ok(snapshot)
    }

    /// Builds once, then rebuilds only the tasks whose inputs changed until Ctrl-C.
    pub async fn watch<F>(&self, interval: Duration, on_rebuild: F) -> Result<(), BuildError>
    where
        F: FnMut(&[Task], &BuildReport),
    {
        self.watch_until(interval, tokio::signal::ctrl_c(), on_rebuild)
            .await
    }

    /// Like [`watch`](Self::watch) but stops when `shutdown` resolves. Failed polls and
    /// rebuilds are logged and retried on the next tick.
    pub async fn watch_until<S, F>(
        &self,
        interval: Duration,
        shutdown: S,
        mut on_rebuild: F,
    ) -> Result<(), BuildError>
    where
        S: Future<Output = std::io::Result<()>>,
        F: FnMut(&[Task], &BuildReport),
    {
        let report = self.build().await?;
        on_rebuild(Task::BUILD.as_slice(), &report);
        let mut last = self.snapshot().await?;
        let mut ticker = tokio::time::interval(interval);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                res = &mut shutdown => {
                    return res.map_err(|source| BuildError::Signal { source });
                }
                _ = ticker.tick() => {
                    match self.poll_changes(&last).await {
                        Ok(Some((current, changed, report))) => {
                            on_rebuild(changed.as_slice(), &report);
                            last = current;
                        }
                        Ok(None) => {}
                        Err(e) => warn!("rebuild failed, retrying: {e}"),
                    }
                }
            }
        }
    }

    async fn poll_changes(
        &self,
        last: &Snapshot,
    ) -> Result<Option<(Snapshot, Vec<Task>, BuildReport)>, BuildError> {
        let current = self.snapshot().await?;
        let changed = changed_tasks(last, &current);
        if changed.is_empty() {
            return Ok(None);
        }
        let report = self.run_tasks(&changed).await?;
        Ok(Some((current, changed, report)))
    }
}

/// Canonical form when the path exists, otherwise absolute against the working dir.
async fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = tokio::fs::canonicalize(path).await {
        return canonical;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn changed_tasks(before: &Snapshot, after: &Snapshot) -> Vec<Task> {
    Task::BUILD
        .into_iter()
        .filter(|task| before.get(task) != after.get(task))
        .collect()
}

/// Top-level files in `dir` with extension `ext`, sorted by name. A missing dir is empty.
async fn list_files(dir: &Path, ext: &str) -> Result<Vec<PathBuf>, BuildError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_err("list", dir)(e)),
    };
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err("list", dir))? {
        let path = entry.path();
        let is_file = entry
            .file_type()
            .await
            .map_err(io_err("stat", &path))?
            .is_file();
        if is_file && path.extension().is_some_and(|e| e == ext) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
