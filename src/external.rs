use crate::{discover::PluginModules, ir::ExternalTable, layout::Layout};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static NON_IDENTIFIER_CHARACTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_$]").unwrap());

/// Computes the externals of a build from its discovered plugin modules.
pub fn compute_external_table(layout: &Layout, modules: &[PluginModules]) -> ExternalTable {
    let mut mapping = HashMap::from([(
        layout.main.namespace.clone(),
        layout.main.global_name.clone(),
    )]);

    for modules in modules {
        let package = modules.package();

        for module in modules.modules() {
            mapping.insert(
                external_name(
                    &package.namespace,
                    package.strip.as_deref(),
                    module.stem(),
                ),
                global_name(module.stem()),
            );
        }
    }

    ExternalTable::new(
        [
            layout.main.namespace.clone(),
            layout.main.global_name.clone(),
        ]
        .into_iter()
        .chain(layout.plugins.iter().map(|package| package.namespace.clone()))
        .chain(layout.framework_externals.iter().cloned()),
        mapping,
    )
}

fn external_name(namespace: &str, strip: Option<&str>, stem: &str) -> String {
    format!(
        "{}/{}",
        namespace,
        match strip {
            Some(fragment) => stem.replacen(fragment, "", 1),
            None => stem.into(),
        }
    )
}

fn global_name(stem: &str) -> String {
    let name = NON_IDENTIFIER_CHARACTER.replace_all(stem, "_");

    if name.starts_with(|character: char| character.is_ascii_digit()) {
        format!("_{}", name)
    } else {
        name.into_owned()
    }
}
