//! Pipeline configuration and the fixed on-disk layout.
//!
//! All tool, script, and workspace locations are derived from a single root
//! directory so tests can substitute an alternate root. The configuration is
//! constructed once at process start and passed by reference into every
//! stage; nothing in the pipeline reads ambient global state.

use crate::pipeline::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Output basename the rasterizer is asked to write.
pub const FONT_BASENAME: &str = "noto_sans_cjk_regular";

/// Extension of the glyph-metrics artifact.
pub const METRICS_EXT: &str = "fnt";

/// Extension of the bitmap atlas artifact.
pub const IMAGE_EXT: &str = "png";

/// Default name of the optional configuration file.
pub const CONFIG_FILE_NAME: &str = "fontpak.toml";

/// Resolved locations of every external tool, script, and staging directory.
///
/// Paths default to the fixed relative layout the external tools expect
/// (`_tools_/`, `_script_/`, `workspace/`, `assets.pak`), all joined onto a
/// caller-chosen root.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding the external tool executables (`_tools_`).
    tools_root: PathBuf,

    /// Directory holding the archive-tool scripts (`_script_`).
    script_root: PathBuf,

    /// Root of the staging tree (`workspace`).
    workspace_root: PathBuf,

    /// Destination assets archive for the repack stage (`assets.pak`).
    assets_archive: PathBuf,
}

impl Config {
    /// Creates a configuration rooted at the given directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            tools_root: root.join("_tools_"),
            script_root: root.join("_script_"),
            workspace_root: root.join("workspace"),
            assets_archive: root.join("assets.pak"),
        }
    }

    /// Loads the configuration, applying overrides from a TOML file.
    ///
    /// With an explicit path the file must exist and parse. With `None`,
    /// `fontpak.toml` in the current directory is used when present,
    /// otherwise the defaults apply unchanged.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = Self::new(".");
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                let file: ConfigFile = toml::from_str(&raw)?;
                Ok(config.apply(file))
            }
            None => {
                let default = Path::new(CONFIG_FILE_NAME);
                if default.exists() {
                    let raw = std::fs::read_to_string(default)?;
                    let file: ConfigFile = toml::from_str(&raw)?;
                    Ok(config.apply(file))
                } else {
                    Ok(config)
                }
            }
        }
    }

    fn apply(mut self, file: ConfigFile) -> Self {
        let paths = file.paths.unwrap_or_default();
        if let Some(tools) = paths.tools {
            self.tools_root = tools;
        }
        if let Some(scripts) = paths.scripts {
            self.script_root = scripts;
        }
        if let Some(workspace) = paths.workspace {
            self.workspace_root = workspace;
        }
        if let Some(assets) = paths.assets_archive {
            self.assets_archive = assets;
        }
        self
    }

    /// Extraction/injection tool executable.
    pub fn extractor_exe(&self) -> PathBuf {
        self.tools_root.join("quickbms").join("quickbms.exe")
    }

    /// Large-archive variant of the archive tool, used for the repack stage.
    pub fn repacker_exe(&self) -> PathBuf {
        self.tools_root.join("quickbms").join("quickbms_4gb_files.exe")
    }

    /// Auxiliary font-metadata generator executable.
    pub fn fontgen_exe(&self) -> PathBuf {
        self.tools_root.join("fontgen").join("fontgen.exe")
    }

    /// Rasterizer executable.
    pub fn rasterizer_exe(&self) -> PathBuf {
        self.tools_root.join("txt2fnt").join("txt2fnt.exe")
    }

    /// Directory scanned for `*.ttf` typeface files.
    pub fn typeface_dir(&self) -> PathBuf {
        self.tools_root.join("ttf")
    }

    /// Archive-tool script used for extraction and listing.
    pub fn extract_script(&self) -> PathBuf {
        self.script_root.join("script-v1.bms")
    }

    /// Archive-tool script used for reimport/repack.
    pub fn repack_script(&self) -> PathBuf {
        self.script_root.join("script-v2.bms")
    }

    /// Raw extraction output directory.
    pub fn extracted_res_dir(&self) -> PathBuf {
        self.workspace_root.join("extracted-res")
    }

    /// Flattened rasterizer input directory.
    pub fn extracted_txt_dir(&self) -> PathBuf {
        self.workspace_root.join("extracted-txt")
    }

    /// Root of the modded-assets tree handed to the repack tool.
    pub fn modded_assets_dir(&self) -> PathBuf {
        self.workspace_root.join("modded-assets")
    }

    /// Rasterizer output directory inside the modded-assets tree.
    pub fn modded_fonts_dir(&self) -> PathBuf {
        self.modded_assets_dir().join("ui").join("fonts")
    }

    /// Staging tree for the reimport/injection path.
    pub fn inject_staging_dir(&self) -> PathBuf {
        self.workspace_root.join("inject-res")
    }

    /// Destination assets archive for the repack stage.
    pub fn assets_archive(&self) -> &Path {
        &self.assets_archive
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(".")
    }
}

/// On-disk configuration file shape.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    paths: Option<PathsSection>,
}

#[derive(Debug, Default, Deserialize)]
struct PathsSection {
    tools: Option<PathBuf>,
    scripts: Option<PathBuf>,
    workspace: Option<PathBuf>,
    assets_archive: Option<PathBuf>,
}
