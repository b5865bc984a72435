//! Page rendering
//!
//! Turns the current todo list into the HTML page. The page template is either
//! the one compiled into the binary (`templates/todo.html`) or a file given in
//! the configuration, and static files under `assets/` are embedded as well.

pub mod template;

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rust_embed::RustEmbed;

use crate::error_handling::types::RenderError;
use crate::storage::types::Todo;
pub use template::PageTemplate;

/// Name of the built-in page template inside `templates/`.
pub const DEFAULT_TEMPLATE: &str = "todo.html";

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/templates/"]
struct Templates;

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/assets/"]
struct Assets;

/// Values available to the page template.
#[derive(Debug, Clone, Copy)]
pub struct PageData<'a> {
    pub title: &'a str,
    pub todos: &'a [Todo],
}

/// A static file served alongside the page.
#[derive(Debug, Clone)]
pub struct Asset {
    pub data: Cow<'static, [u8]>,
    pub content_type: String,
}

/// Look up an embedded static file by its path below `assets/`.
pub fn asset(path: &str) -> Option<Asset> {
    let file = Assets::get(path)?;
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();
    Some(Asset {
        data: file.data,
        content_type,
    })
}

fn embedded_template(name: &str) -> Result<String, RenderError> {
    let file = Templates::get(name).ok_or_else(|| RenderError::MissingTemplate(name.to_string()))?;
    String::from_utf8(file.data.into_owned())
        .map_err(|_| RenderError::InvalidTemplate(format!("{} is not valid UTF-8", name)))
}

fn file_template(path: &Path) -> Result<String, RenderError> {
    if !path.is_file() {
        return Err(RenderError::MissingTemplate(path.display().to_string()));
    }
    Ok(fs::read_to_string(path)?)
}

async fn reload_template(path: &Path) -> Result<String, RenderError> {
    match tokio::fs::read_to_string(path).await {
        Ok(source) => Ok(source),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(RenderError::MissingTemplate(path.display().to_string()))
        }
        Err(e) => Err(RenderError::Io(e)),
    }
}

/// Renders the list page from a compiled template.
///
/// The template is compiled when the renderer is built, so a broken template
/// stops the server before it starts listening. In reload mode the file is
/// read and compiled again on every render, and a broken edit only fails the
/// requests that hit it.
#[derive(Debug)]
pub struct PageRenderer {
    compiled: PageTemplate,
    reload_from: Option<PathBuf>,
}

impl PageRenderer {
    pub fn embedded() -> Result<Self, RenderError> {
        let compiled = PageTemplate::compile(&embedded_template(DEFAULT_TEMPLATE)?)?;
        Ok(Self {
            compiled,
            reload_from: None,
        })
    }

    pub fn from_file(path: &Path, reload: bool) -> Result<Self, RenderError> {
        let compiled = PageTemplate::compile(&file_template(path)?)?;
        info!("Loaded page template from {}", path.display());
        Ok(Self {
            compiled,
            reload_from: reload.then(|| path.to_path_buf()),
        })
    }

    /// Build the renderer described by the configuration values.
    pub fn from_config(template_path: Option<&Path>, reload: bool) -> Result<Self, RenderError> {
        match template_path {
            Some(path) => Self::from_file(path, reload),
            None => Self::embedded(),
        }
    }

    pub async fn render(&self, page: &PageData<'_>) -> Result<String, RenderError> {
        match &self.reload_from {
            Some(path) => {
                debug!("Reloading page template from {}", path.display());
                let fresh = PageTemplate::compile(&reload_template(path).await?)?;
                Ok(fresh.render(page))
            }
            None => Ok(self.compiled.render(page)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::TodoId;
    use chrono::Utc;
    use tempfile::TempDir;

    const MINIMAL: &str = "<h1>{{page_title}}</h1>{{#each todos}}<p data-id=\"{{id}}\">{{title}}</p>{{/each}}";

    #[tokio::test]
    async fn test_embedded_template_compiles_and_has_controls() {
        let renderer = PageRenderer::embedded().unwrap();
        let todos = vec![Todo {
            id: TodoId::new(),
            title: "Buy milk".to_string(),
            created_at: Utc::now(),
        }];
        let html = renderer
            .render(&PageData {
                title: "Todo Web App",
                todos: &todos,
            })
            .await
            .unwrap();
        assert!(html.contains("Todo Web App"));
        assert!(html.contains("Buy milk"));
        assert!(html.contains(&todos[0].id.to_string()));
        assert!(html.contains("action=\"/create-todo\""));
        assert!(html.contains("action=\"/update\""));
        assert!(html.contains("action=\"/delete\""));
    }

    #[test]
    fn test_missing_template_file() {
        let err = PageRenderer::from_file(Path::new("/definitely/not/todo.html"), false).unwrap_err();
        assert!(matches!(err, RenderError::MissingTemplate(_)));
    }

    #[test]
    fn test_invalid_template_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.html");
        fs::write(&path, "<h1>{{page_title}}</h1>").unwrap();
        let err = PageRenderer::from_file(&path, false).unwrap_err();
        assert!(matches!(err, RenderError::InvalidTemplate(_)));
    }

    #[tokio::test]
    async fn test_cached_template_ignores_later_edits() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, MINIMAL).unwrap();
        let renderer = PageRenderer::from_file(&path, false).unwrap();
        fs::write(&path, "broken").unwrap();
        let html = renderer
            .render(&PageData {
                title: "Still",
                todos: &[],
            })
            .await
            .unwrap();
        assert_eq!(html, "<h1>Still</h1>");
    }

    #[tokio::test]
    async fn test_reload_picks_up_edits_and_reports_breakage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, MINIMAL).unwrap();
        let renderer = PageRenderer::from_file(&path, true).unwrap();

        fs::write(&path, "<h2>{{page_title}}</h2>{{#each todos}}{{id}}{{title}}{{/each}}").unwrap();
        let page = PageData {
            title: "Edited",
            todos: &[],
        };
        assert_eq!(renderer.render(&page).await.unwrap(), "<h2>Edited</h2>");

        fs::write(&path, "{{#each todos}}").unwrap();
        assert!(matches!(
            renderer.render(&page).await,
            Err(RenderError::InvalidTemplate(_))
        ));

        fs::remove_file(&path).unwrap();
        assert!(matches!(
            renderer.render(&page).await,
            Err(RenderError::MissingTemplate(_))
        ));
    }

    #[test]
    fn test_embedded_assets() {
        let css = asset("style.css").unwrap();
        assert_eq!(css.content_type, "text/css");
        assert!(!css.data.is_empty());
        assert!(asset("missing.js").is_none());
    }
}
