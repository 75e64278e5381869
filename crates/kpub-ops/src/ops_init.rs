use std::path::Path;

use toml_edit::{value, DocumentMut, Item, Table};

use kpub_core::MANIFEST_FILE;
use kpub_util::errors::KpubError;
use kpub_util::progress;

/// Scaffold publication configuration into `Kpub.toml`.
///
/// Creates the manifest when absent and fills in whichever of the
/// `[project]` and `[publication]` sections is missing. Existing content
/// is never touched; the edit is format-preserving.
pub fn init(project_dir: &Path) -> miette::Result<()> {
    let path = project_dir.join(MANIFEST_FILE);
    let existing = path.is_file();
    let content = if existing {
        std::fs::read_to_string(&path).map_err(KpubError::Io)?
    } else {
        String::new()
    };
    let mut doc: DocumentMut = content.parse().map_err(|e| KpubError::Manifest {
        message: format!("Failed to parse {}: {e}", path.display()),
    })?;

    let mut added = Vec::new();
    if !doc.contains_key("project") {
        doc["project"] = Item::Table(project_skeleton(project_dir));
        added.push("[project]");
    }
    if !doc.contains_key("publication") {
        doc["publication"] = Item::Table(publication_skeleton());
        added.push("[publication]");
    }

    if added.is_empty() {
        progress::status_info(
            "Unchanged",
            &format!("{} already has both sections", path.display()),
        );
        return Ok(());
    }

    std::fs::write(&path, doc.to_string()).map_err(KpubError::Io)?;
    let verb = if existing { "Updated" } else { "Created" };
    progress::status(verb, &format!("{} ({})", path.display(), added.join(", ")));
    Ok(())
}

fn project_skeleton(project_dir: &Path) -> Table {
    let name = project_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "library".to_string());
    let mut table = Table::new();
    table["name"] = value(name);
    table["group"] = value("com.example");
    table["version"] = value("0.1.0");
    table["description"] = value("");
    table
}

fn publication_skeleton() -> Table {
    let mut table = Table::new();
    table.decor_mut().set_prefix(
        "\n# Metadata the central repository requires before it accepts an upload.\n",
    );
    table["github"] = value("user/repo");
    table["license"] = value("Apache-2.0");
    table["developer"] = value("your-id");
    table
}
