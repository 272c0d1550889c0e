use polysql::Dialect;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = "polysql.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unsupported output format: {other} (expected text or json)"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub version: String,

    #[serde(default)]
    pub compile: CompileConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompileConfig {
    pub driver: Option<String>,
    pub format: Option<String>,
    #[serde(default)]
    pub strict_driver: bool,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            compile: CompileConfig::default(),
        }
    }
}

impl ConfigFile {
    /// Load `path` if given, else the default file if it exists, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG);
                if default.is_file() {
                    Self::load(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("failed to read config file {}: {e}", path.display())
        })?;
        Self::parse(&raw)
            .map_err(|e| anyhow::anyhow!("invalid config file {}: {e:#}", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut file: ConfigFile = toml::from_str(raw)?;
        file.expand_env()?;
        file.validate()?;
        Ok(file)
    }

    fn expand_env(&mut self) -> anyhow::Result<()> {
        self.version = expand_env_vars(&self.version)?;
        if let Some(driver) = self.compile.driver.as_mut() {
            *driver = expand_env_vars(driver)?;
        }
        if let Some(format) = self.compile.format.as_mut() {
            *format = expand_env_vars(format)?;
        }
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }
        if let Some(format) = &self.compile.format {
            format.parse::<OutputFormat>()?;
        }
        if self.compile.strict_driver {
            if let Some(driver) = &self.compile.driver {
                driver.parse::<Dialect>()?;
            }
        }
        Ok(())
    }

    /// Resolve the dialect, with `--driver` taking precedence over the file.
    pub fn dialect(&self, driver_flag: Option<&str>) -> anyhow::Result<Dialect> {
        let Some(driver) = driver_flag.or(self.compile.driver.as_deref()) else {
            return Ok(Dialect::Generic);
        };
        if self.compile.strict_driver {
            Ok(driver.parse::<Dialect>()?)
        } else {
            Ok(Dialect::from_driver(driver))
        }
    }

    /// Resolve the output format, with `--format` taking precedence over the file.
    pub fn format(&self, format_flag: Option<&str>) -> anyhow::Result<OutputFormat> {
        match format_flag.or(self.compile.format.as_deref()) {
            Some(f) => f.parse(),
            None => Ok(OutputFormat::default()),
        }
    }
}

/// Expand `${NAME}` and `${NAME:-fallback}` references from the environment.
fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            anyhow::bail!("unterminated env var reference: ${{{after}");
        };

        let reference = &after[..end];
        let (name, fallback) = match reference.split_once(":-") {
            Some((name, fallback)) => (name, Some(fallback)),
            None => (reference, None),
        };
        if name.is_empty() {
            anyhow::bail!("invalid env var reference: ${{{reference}}}");
        }

        match (std::env::var(name), fallback) {
            (Ok(value), _) => out.push_str(&value),
            (Err(_), Some(fallback)) => out.push_str(fallback),
            (Err(_), None) => anyhow::bail!("missing env var for config expansion: {name}"),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}
