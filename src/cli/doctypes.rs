use std::path::Path;

use comfy_table::{Cell, Table};

use crate::config;
use crate::doctype::DocTypeRegistry;

pub fn doc_types(dir: &Path) -> anyhow::Result<()> {
    let registry = DocTypeRegistry::load(&dir.join(config::DOC_TYPE_FILE));

    if registry.is_empty() {
        println!(
            "No document-type definitions found. Add `name: code` lines to {} \
             or every category will use code {}.",
            config::DOC_TYPE_FILE,
            config::DEFAULT_DOC_TYPE
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Name", "Code"]);
    for (name, code) in registry.entries() {
        table.add_row(vec![Cell::new(name), Cell::new(code)]);
    }

    println!("{table}");
    Ok(())
}
