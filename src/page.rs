use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};

pub const TITLE_PLACEHOLDER: &str = "{{ Title }}";
pub const CONTENT_PLACEHOLDER: &str = "{{ Content }}";

/// The text of the first `# ` heading line, trimmed.
pub fn extract_title(markdown: &str) -> Result<String> {
    markdown
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .ok_or(Error::MissingTitle)
}

/// Compile `markdown` and substitute it, with its title, into `template`.
pub fn render_page(markdown: &str, template: &str) -> Result<String> {
    let content = crate::markdown_to_html(markdown)?;
    let title = extract_title(markdown)?;
    Ok(template
        .replace(TITLE_PLACEHOLDER, &title)
        .replace(CONTENT_PLACEHOLDER, &content))
}

/// Render the markdown file `from` through `template_path` into `dest`.
pub fn generate_page(from: &Path, template_path: &Path, dest: &Path) -> Result<()> {
    info!(
        "Generating page from {} to {} using {}",
        from.display(),
        dest.display(),
        template_path.display()
    );

    let markdown = fs::read_to_string(from).map_err(Error::io(from))?;
    let template = fs::read_to_string(template_path).map_err(Error::io(template_path))?;
    let html = render_page(&markdown, &template)?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(Error::io(parent))?;
    }
    fs::write(dest, html).map_err(Error::io(dest))
}

/// Generate an `.html` page for every `.md` file under `content_dir`,
/// mirroring the directory layout under `dest_dir`.
///
/// Returns the written paths, sorted.
pub fn generate_pages_recursive(
    content_dir: &Path,
    template_path: &Path,
    dest_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    scan_markdown_files(content_dir, &mut sources)?;
    sources.sort();

    let mut written = Vec::with_capacity(sources.len());
    for source in sources {
        let relative = source.strip_prefix(content_dir).unwrap_or(&source);
        let dest = dest_dir.join(relative).with_extension("html");
        generate_page(&source, template_path, &dest)?;
        written.push(dest);
    }
    Ok(written)
}

fn scan_markdown_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir).map_err(Error::io(dir))? {
        let path = entry.map_err(Error::io(dir))?.path();
        if path.is_dir() {
            scan_markdown_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
    Ok(())
}

/// Replace `dest` with a fresh copy of `src`.
pub fn copy_static(src: &Path, dest: &Path) -> Result<()> {
    if dest.exists() {
        debug!("removing {}", dest.display());
        fs::remove_dir_all(dest).map_err(Error::io(dest))?;
    }
    copy_dir(src, dest)
}

fn copy_dir(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest).map_err(Error::io(dest))?;
    for entry in fs::read_dir(src).map_err(Error::io(src))? {
        let path = entry.map_err(Error::io(src))?.path();
        let Some(name) = path.file_name() else {
            continue;
        };
        let target = dest.join(name);
        if path.is_dir() {
            copy_dir(&path, &target)?;
        } else {
            debug!("copying {} -> {}", path.display(), target.display());
            fs::copy(&path, &target).map_err(Error::io(&path))?;
        }
    }
    Ok(())
}

/// Copy static assets and render every content page into the public dir.
pub fn build_site(config: &Config) -> Result<Vec<PathBuf>> {
    let paths = &config.paths;
    info!(
        "Copying {} to {}",
        paths.static_dir.display(),
        paths.public.display()
    );
    copy_static(&paths.static_dir, &paths.public)?;
    let pages = generate_pages_recursive(&paths.content, &paths.template, &paths.public)?;
    info!("Generated {} pages", pages.len());
    Ok(pages)
}
