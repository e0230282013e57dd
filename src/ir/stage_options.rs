use serde_json::{Value, json};
use std::path::Path;

const COMMON_JS_PLUGIN: &str = "@babel/plugin-transform-modules-commonjs";

pub const LICENSE_BANNER: &str = "/**
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
  *
  * @noflow
  * @nolint
  * @preventMunge
  * @preserve-invariant-messages
  */

";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DowngradeOptions {
    pub presets: &'static [&'static str],
    pub plugins: &'static [&'static str],
    pub babelrc: bool,
    /// Modules with this path component are passed through untouched.
    pub exclude: &'static str,
}

impl DowngradeOptions {
    pub const DEFAULT: Self = Self {
        presets: &["@babel/preset-react"],
        plugins: &["@babel/plugin-transform-flow-strip-types"],
        babelrc: false,
        exclude: "node_modules",
    };

    pub fn excludes(&self, path: &Path) -> bool {
        path.components()
            .any(|component| component.as_os_str() == self.exclude)
    }

    /// Babel configuration converting modules into strict CommonJS without interop helpers.
    pub fn config(&self) -> Value {
        json!({
            "babelrc": self.babelrc,
            "presets": self.presets,
            "plugins": self
                .plugins
                .iter()
                .map(|plugin| json!(plugin))
                .chain([json!([COMMON_JS_PLUGIN, { "strict": true, "noInterop": true }])])
                .collect::<Vec<_>>(),
        })
    }

    pub fn arguments(&self, config_file: &Path, path: &Path) -> Vec<String> {
        vec![
            "--config-file".into(),
            config_file.display().to_string(),
            "--filename".into(),
            path.display().to_string(),
        ]
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OptimizerOptions {
    pub compilation_level: &'static str,
    pub language_in: &'static str,
    pub language_out: &'static str,
    pub env: &'static str,
    pub warning_level: &'static str,
    pub apply_input_source_maps: bool,
    pub use_types_for_optimization: bool,
    pub process_common_js_modules: bool,
    pub rewrite_polyfills: bool,
    pub inject_libraries: bool,
}

impl OptimizerOptions {
    pub const DEFAULT: Self = Self {
        compilation_level: "SIMPLE",
        language_in: "ECMASCRIPT_2018",
        language_out: "ECMASCRIPT_2018",
        env: "CUSTOM",
        warning_level: "QUIET",
        apply_input_source_maps: false,
        use_types_for_optimization: false,
        process_common_js_modules: false,
        rewrite_polyfills: false,
        inject_libraries: false,
    };

    pub fn arguments(&self) -> Vec<String> {
        [
            ("compilation_level", self.compilation_level.to_owned()),
            ("language_in", self.language_in.to_owned()),
            ("language_out", self.language_out.to_owned()),
            ("env", self.env.to_owned()),
            ("warning_level", self.warning_level.to_owned()),
            (
                "apply_input_source_maps",
                self.apply_input_source_maps.to_string(),
            ),
            (
                "use_types_for_optimization",
                self.use_types_for_optimization.to_string(),
            ),
            (
                "process_common_js_modules",
                self.process_common_js_modules.to_string(),
            ),
            ("rewrite_polyfills", self.rewrite_polyfills.to_string()),
            ("inject_libraries", self.inject_libraries.to_string()),
        ]
        .into_iter()
        .map(|(name, value)| format!("--{}={}", name, value))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn render_downgrade_arguments() {
        assert_eq!(
            DowngradeOptions::DEFAULT.arguments(
                Path::new("/cache/babel.config.json"),
                Path::new("/src/Foo.js")
            ),
            vec![
                "--config-file",
                "/cache/babel.config.json",
                "--filename",
                "/src/Foo.js",
            ]
        );
    }

    #[test]
    fn render_downgrade_config() {
        assert_eq!(
            DowngradeOptions::DEFAULT.config(),
            json!({
                "babelrc": false,
                "presets": ["@babel/preset-react"],
                "plugins": [
                    "@babel/plugin-transform-flow-strip-types",
                    [
                        "@babel/plugin-transform-modules-commonjs",
                        { "strict": true, "noInterop": true }
                    ],
                ],
            })
        );
    }

    #[test]
    fn exclude_node_modules() {
        assert!(DowngradeOptions::DEFAULT.excludes(Path::new("/a/node_modules/react/index.js")));
        assert!(!DowngradeOptions::DEFAULT.excludes(Path::new("/a/src/node_modules.js")));
    }

    #[test]
    fn render_optimizer_arguments() {
        let arguments = OptimizerOptions::DEFAULT.arguments();

        assert_eq!(arguments[0], "--compilation_level=SIMPLE");
        assert!(arguments.contains(&"--use_types_for_optimization=false".to_owned()));
        assert!(arguments.contains(&"--rewrite_polyfills=false".to_owned()));
        assert!(arguments.contains(&"--inject_libraries=false".to_owned()));
        assert_eq!(arguments.len(), 10);
    }
}
