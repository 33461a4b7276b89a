use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use catalog::{BrowseStrings, CatalogProvider, MEDIA_ID_ROOT};
use serde::{Deserialize, Serialize};
use source::{DirLocalFiles, FileJsonSource, RemoteJsonSource, TrackSource};
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
struct DumpConfig {
    version: u32,
    /// Remote catalog document; takes precedence when non-empty.
    catalog_url: String,
    /// Local catalog document, used when no URL is configured.
    catalog_file: String,
    /// Directory of downloaded media, one file per track id.
    local_dir: String,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            catalog_url: String::new(),
            catalog_file: "catalog.json".to_string(),
            local_dir: "media".to_string(),
        }
    }
}

#[derive(Debug)]
enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "io error: {}", err),
            ConfigError::Yaml(err) => write!(f, "yaml error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err)
    }
}

fn load_or_create_config(path: &Path) -> Result<(DumpConfig, bool), ConfigError> {
    if path.exists() {
        let contents = fs::read_to_string(path)?;
        let mut config: DumpConfig = serde_yaml::from_str(&contents)?;
        if config.version < CONFIG_VERSION {
            config.version = CONFIG_VERSION;
        }
        if config.catalog_file.trim().is_empty() {
            config.catalog_file = "catalog.json".to_string();
        }
        return Ok((config, false));
    }
    let config = DumpConfig::default();
    fs::write(path, serde_yaml::to_string(&config)?)?;
    Ok((config, true))
}

fn browse_strings() -> BrowseStrings {
    BrowseStrings {
        artists_title: "Artists".to_string(),
        artists_subtitle: "Songs by artist".to_string(),
        genres_title: "Genres".to_string(),
        genres_subtitle: "Songs by genre".to_string(),
        item_subtitle_template: "Songs of {}".to_string(),
        category_icon: None,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = env::args()
        .nth(1)
        .or_else(|| env::var("CATALOG_DUMP_CONFIG").ok())
        .unwrap_or_else(|| "catalog_dump.yaml".to_string());
    let (config, created) = load_or_create_config(&PathBuf::from(&config_path))?;
    if created {
        info!("Created default config at {}", config_path);
    } else {
        info!("Loaded config from {}", config_path);
    }

    let source: Arc<dyn TrackSource> = if config.catalog_url.trim().is_empty() {
        Arc::new(FileJsonSource::new(&config.catalog_file))
    } else {
        Arc::new(RemoteJsonSource::new(config.catalog_url.trim())?)
    };
    let local = Arc::new(DirLocalFiles::new(&config.local_dir));

    let provider = CatalogProvider::new(source, local);
    let stats = provider.load()?;
    println!(
        "Catalog: {} artists, {} albums, {} tracks",
        stats.artists, stats.albums, stats.tracks
    );

    let strings = browse_strings();
    for category in provider.children(MEDIA_ID_ROOT, &strings) {
        println!("{} ({})", category.title, category.id);
        for node in provider.children(&category.id, &strings) {
            println!("  {}", node.title);
            for child in provider.children(&node.id, &strings) {
                println!("    {}", child.title);
                for leaf in provider.children(&child.id, &strings) {
                    println!("      {}", leaf.title);
                }
            }
        }
    }

    Ok(())
}
