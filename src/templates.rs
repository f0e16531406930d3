use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

/// HTML pages loaded once at startup, keyed by their path relative to the
/// templates directory (`pages/index.html`).
#[derive(Debug, Clone, Default)]
pub struct Templates {
    pages: HashMap<String, String>,
}

impl Templates {
    pub fn load(dir: &Path) -> io::Result<Self> {
        let mut pages = HashMap::new();
        collect_pages(dir, dir, &mut pages)?;
        Ok(Self { pages })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pages.get(name).map(String::as_str)
    }
}

fn collect_pages(root: &Path, dir: &Path, pages: &mut HashMap<String, String>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_pages(root, &path, pages)?;
        } else if path.extension().is_some_and(|ext| ext == "html") {
            let name = relative_name(root, &path);
            pages.insert(name, fs::read_to_string(&path)?);
        }
    }
    Ok(())
}

fn relative_name(root: &Path, path: &Path) -> String {
    let relative: PathBuf = path.strip_prefix(root).unwrap_or(path).into();
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_nested_html_pages() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::write(dir.path().join("pages/index.html"), "<h1>home</h1>").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let templates = Templates::load(dir.path()).unwrap();

        assert_eq!(templates.get("pages/index.html"), Some("<h1>home</h1>"));
        assert_eq!(templates.get("notes.txt"), None);
    }

    #[test]
    fn missing_directory_is_an_error() {
        assert!(Templates::load(Path::new("/definitely/not/here")).is_err());
    }
}
