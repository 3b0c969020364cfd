use anyhow::Result;

/// Where to read an input from
#[derive(Clone, Debug, PartialEq)]
pub enum Source {
    Path(String),
    Url(String),
}

impl Source {
    pub fn new(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Source::Url(raw.to_string())
        } else {
            Source::Path(raw.to_string())
        }
    }

    pub async fn read(self) -> Result<Vec<u8>> {
        match self {
            Source::Url(url) => {
                info!("Fetching {url}");
                abstio::http_get(&url)
                    .await
                    .map_err(|err| anyhow!("{url}: {err}"))
            }
            Source::Path(path) => {
                if cfg!(target_arch = "wasm32") {
                    bail!("Can't read local file {path} on the web; use a URL");
                }
                Ok(fs_err::read(path)?)
            }
        }
    }

    /// Outside of widgetry, there's no runtime to drive the fetch
    #[cfg(not(target_arch = "wasm32"))]
    pub fn read_blocking(self) -> Result<Vec<u8>> {
        if let Source::Path(path) = self {
            return Ok(fs_err::read(path)?);
        }
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?
            .block_on(self.read())
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Source::Path(x) | Source::Url(x) => write!(f, "{x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_and_paths() {
        assert_eq!(
            Source::new("https://example.org/result.csv"),
            Source::Url("https://example.org/result.csv".to_string())
        );
        assert_eq!(
            Source::new("data/result.csv"),
            Source::Path("data/result.csv".to_string())
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Source::new("/definitely/not/here.csv")
            .read_blocking()
            .unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
