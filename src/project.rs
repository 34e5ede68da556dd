//! The generation pipeline and project writer.
//!
//! ```text
//! GenerationRequest ──validate──▶ ProjectSpec
//!        ──IconNormalizer──▶ ResolvedIcon
//!        ──Generator──▶ Artifacts
//!        ──write_project──▶ <output_root>/<slug>/{index.html, manifest.json, service-worker.js, icons/icon-512x512.png}
//! ```
//!
//! Stages run strictly in sequence. Resolution and normalization degrade
//! instead of failing; validation, rendering and the filesystem writer fail
//! loudly, and [`Pipeline::run`] turns that failure into
//! [`GenerationResult::Failure`].
//!
//! Two names with the same slug write into the same directory; the later
//! run overwrites the earlier one file by file.

use crate::config::GeneratorConfig;
use crate::fetch::{FetchError, Fetcher};
use crate::generate::{
    Artifacts, GenerateError, Generator, ICON_FILE, MANIFEST_FILE, SHELL_FILE, WORKER_FILE,
};
use crate::metadata::{MetadataResolver, PageMetadata};
use crate::naming::{is_safe_slug, slugify};
use crate::normalize::IconNormalizer;
use crate::types::{GenerationRequest, GenerationResult, IconSource, ProjectSpec};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Name {0:?} does not produce a usable directory name")]
    UnsafeName(String),
    #[error("HTTP client error: {0}")]
    Fetch(#[from] FetchError),
    #[error("Render error: {0}")]
    Generate(#[from] GenerateError),
    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A project directory on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenProject {
    pub project_dir: PathBuf,
    /// The four generated files, in [`PROJECT_FILES`](crate::generate::PROJECT_FILES) order.
    pub files: Vec<PathBuf>,
}

impl From<WrittenProject> for GenerationResult {
    fn from(project: WrittenProject) -> Self {
        GenerationResult::success(
            project.project_dir.display().to_string(),
            project
                .files
                .iter()
                .map(|f| f.display().to_string())
                .collect(),
        )
    }
}

/// Validate a raw request into a [`ProjectSpec`].
///
/// Requires a non-blank `url` with an `http`/`https` scheme and a non-blank
/// `name` whose slug stays inside the output root.
pub fn validate_request(request: &GenerationRequest) -> Result<ProjectSpec, ProjectError> {
    let raw_url = request.url.trim();
    if raw_url.is_empty() {
        return Err(ProjectError::MissingParameter("url"));
    }
    let display_name = request.name.trim();
    if display_name.is_empty() {
        return Err(ProjectError::MissingParameter("name"));
    }

    let target_url = Url::parse(raw_url).map_err(|e| ProjectError::InvalidUrl {
        url: raw_url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(target_url.scheme(), "http" | "https") {
        return Err(ProjectError::InvalidUrl {
            url: raw_url.to_string(),
            reason: format!("unsupported scheme {:?}", target_url.scheme()),
        });
    }
    if !is_safe_slug(&slugify(display_name)) {
        return Err(ProjectError::UnsafeName(display_name.to_string()));
    }

    Ok(ProjectSpec {
        target_url,
        display_name: display_name.to_string(),
        icon_source: IconSource::parse(request.icon.as_deref()),
    })
}

/// Write artifacts into `<output_root>/<slug>/`, replacing existing files.
pub fn write_project(
    output_root: &Path,
    slug: &str,
    artifacts: &Artifacts,
) -> Result<WrittenProject, ProjectError> {
    let project_dir = output_root.join(slug);
    let contents: [(&str, &[u8]); 4] = [
        (SHELL_FILE, artifacts.shell_markup.as_bytes()),
        (MANIFEST_FILE, artifacts.manifest_document.as_bytes()),
        (WORKER_FILE, artifacts.worker_script.as_bytes()),
        (ICON_FILE, artifacts.icon_png.as_slice()),
    ];

    let mut files = Vec::with_capacity(contents.len());
    for (name, bytes) in contents {
        let path = project_dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ProjectError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, bytes).map_err(|source| ProjectError::Io {
            path: path.clone(),
            source,
        })?;
        log::info!("Wrote {}", path.display());
        files.push(path);
    }

    Ok(WrittenProject { project_dir, files })
}

/// All pipeline stages, sharing one HTTP client.
pub struct Pipeline {
    output_root: PathBuf,
    resolver: MetadataResolver,
    normalizer: IconNormalizer,
    generator: Generator,
}

impl Pipeline {
    pub fn new(config: &GeneratorConfig) -> Result<Self, ProjectError> {
        let fetcher = Fetcher::new(&config.fetch)?;
        Ok(Self {
            output_root: PathBuf::from(&config.output_root),
            resolver: MetadataResolver::new(fetcher.clone()),
            normalizer: IconNormalizer::new(fetcher),
            generator: Generator::new(config),
        })
    }

    /// Resolve a page's title and icon candidates.
    pub async fn resolve(&self, url: &str) -> PageMetadata {
        self.resolver.resolve(url).await
    }

    /// Generate a project from explicit inputs.
    pub async fn build(&self, request: &GenerationRequest) -> Result<WrittenProject, ProjectError> {
        let spec = validate_request(request)?;
        log::debug!(
            "Generating {:?} for {} (icon: {})",
            spec.display_name,
            spec.target_url,
            spec.icon_source
        );

        let icon = self.normalizer.normalize(&spec.icon_source).await;
        let artifacts = self.generator.generate(&spec, &icon)?;
        write_project(&self.output_root, &slugify(&spec.display_name), &artifacts)
    }

    /// Like [`build`](Self::build), reporting the outcome as a [`GenerationResult`].
    pub async fn run(&self, request: &GenerationRequest) -> GenerationResult {
        match self.build(request).await {
            Ok(project) => project.into(),
            Err(e) => {
                log::error!("Generation failed: {e}");
                GenerationResult::failure(e)
            }
        }
    }

    /// Resolve the page first, filling a missing name from its title and a
    /// missing icon from the best-ranked candidate.
    pub async fn wrap(
        &self,
        url: &str,
        name: Option<&str>,
        icon: Option<&str>,
    ) -> GenerationResult {
        let metadata = self.resolve(url).await;
        let request = wrap_request(url, name, icon, &metadata);
        self.run(&request).await
    }
}

/// Merge explicit inputs with resolved metadata. Explicit values win.
pub fn wrap_request(
    url: &str,
    name: Option<&str>,
    icon: Option<&str>,
    metadata: &PageMetadata,
) -> GenerationRequest {
    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(metadata.title.as_str());
    let icon = icon
        .map(String::from)
        .or_else(|| metadata.selected_icon().map(|c| c.url.to_string()));
    GenerationRequest {
        url: url.to_string(),
        name: name.to_string(),
        icon,
    }
}
