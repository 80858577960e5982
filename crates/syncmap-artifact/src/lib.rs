//! Acquisition of library source artifacts.
//!
//! Given Maven coordinates, finds the `-sources.jar` in the local Maven
//! repository and falls back to downloading it from Maven Central. Downloads
//! land in a cache directory via a temporary file and rename, so a failed
//! transfer never publishes a partial jar.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

mod source_set;

pub use source_set::SourceSet;

pub const MAVEN_CENTRAL: &str = "https://repo1.maven.org/maven2";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("invalid coordinates: {coordinates} (expected group:artifact:version)")]
    InvalidCoordinates { coordinates: String },

    #[error("failed to determine home directory for the local Maven repository")]
    MissingHomeDir,

    #[error("http fetch failed: {message}")]
    Http { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

/// Parsed `group:artifact:version` coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MavenCoordinates {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl MavenCoordinates {
    /// Name of the published sources jar, e.g. `widgets-1.0.0-sources.jar`.
    #[must_use]
    pub fn sources_jar_name(&self) -> String {
        format!("{}-{}-sources.jar", self.artifact_id, self.version)
    }

    /// Location of the sources jar inside a Maven repository layout.
    #[must_use]
    pub fn sources_jar_path(&self, repo: &Path) -> PathBuf {
        repo.join(self.group_id.replace('.', "/"))
            .join(&self.artifact_id)
            .join(&self.version)
            .join(self.sources_jar_name())
    }

    /// Download URL under a Maven-layout remote repository base.
    #[must_use]
    pub fn sources_jar_url(&self, base: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            base.trim_end_matches('/'),
            self.group_id.replace('.', "/"),
            self.artifact_id,
            self.version,
            self.sources_jar_name()
        )
    }
}

impl FromStr for MavenCoordinates {
    type Err = ArtifactError;

    fn from_str(coordinates: &str) -> Result<Self, Self::Err> {
        let invalid = || ArtifactError::InvalidCoordinates {
            coordinates: coordinates.to_string(),
        };
        let mut parts = coordinates.split(':');
        let (Some(group_id), Some(artifact_id), Some(version), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if group_id.is_empty() || artifact_id.is_empty() || version.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
        })
    }
}

impl std::fmt::Display for MavenCoordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

fn default_maven_repo() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)?;
    Some(home.join(".m2/repository"))
}

/// Resolves sources jars from the local Maven repository, a download cache,
/// or a remote Maven-layout repository, in that order.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    maven_repo: PathBuf,
    cache_dir: PathBuf,
    remote_base: String,
}

impl ArtifactStore {
    /// `maven_repo` defaults to `~/.m2/repository`; `cache_dir` defaults to
    /// a `syncmap` directory under the system temp dir.
    pub fn new(
        maven_repo: Option<PathBuf>,
        cache_dir: Option<PathBuf>,
    ) -> Result<Self, ArtifactError> {
        let maven_repo = maven_repo
            .or_else(default_maven_repo)
            .ok_or(ArtifactError::MissingHomeDir)?;
        let cache_dir = cache_dir.unwrap_or_else(|| std::env::temp_dir().join("syncmap"));
        Ok(Self {
            maven_repo,
            cache_dir,
            remote_base: MAVEN_CENTRAL.to_string(),
        })
    }

    /// Override the remote repository base URL.
    #[must_use]
    pub fn with_remote_base(mut self, base: impl Into<String>) -> Self {
        self.remote_base = base.into();
        self
    }

    /// Path to the sources jar for `coordinates`, fetching it if necessary.
    pub fn locate(&self, coordinates: &MavenCoordinates) -> Result<PathBuf, ArtifactError> {
        let local = coordinates.sources_jar_path(&self.maven_repo);
        if local.is_file() {
            tracing::info!(%coordinates, path = %local.display(), "found sources jar in local Maven repository");
            return Ok(local);
        }

        let cached = self.cache_dir.join(coordinates.sources_jar_name());
        if cached.is_file() {
            tracing::info!(%coordinates, path = %cached.display(), "found sources jar in download cache");
            return Ok(cached);
        }

        let url = coordinates.sources_jar_url(&self.remote_base);
        tracing::info!(%coordinates, %url, "downloading sources jar");
        self.fetch(&url, &cached)?;
        Ok(cached)
    }

    fn fetch(&self, url: &str, dest: &Path) -> Result<(), ArtifactError> {
        let response = ureq::get(url).call().map_err(|err| {
            let message = match err {
                ureq::Error::Status(code, _response) => {
                    format!("server returned status {code} for {url}")
                }
                ureq::Error::Transport(transport) => {
                    format!("transport error for {url}: {transport}")
                }
            };
            ArtifactError::Http { message }
        })?;

        let parent = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        io::copy(&mut response.into_reader(), &mut tmp)?;
        tmp.as_file().sync_all()?;
        tmp.persist(dest).map_err(|err| err.error)?;
        Ok(())
    }
}
