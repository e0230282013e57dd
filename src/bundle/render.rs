use crate::ir::{ExportMode, ModuleFormat, OutputOptions};

const MODULE_PRELUDE: &str = "function (module, exports, __require) {\n";

const REQUIRE_FUNCTION: &str = "var __cache = [];

function __require(id) {
  if (!__cache[id]) {
    var module = { exports: {} };
    __cache[id] = module;
    __modules[id].call(module.exports, module, module.exports, __require);
  }

  return __cache[id].exports;
}

";

/// Exposes the entry's default export alone when it has no other exports.
const AUTO_EXPORT: &str = "var __entry = __require(0);
var __keys = __entry !== null && typeof __entry === 'object'
  ? Object.keys(__entry).filter(function (key) { return key !== '__esModule'; })
  : [];

module.exports = __keys.length === 1 && __keys[0] === 'default' ? __entry.default : __entry;
";

/// Renders linked module bodies into a single file. The first module is the entry.
pub fn render_chunk(modules: &[String], options: &OutputOptions) -> String {
    let mut chunk = match options.format {
        ModuleFormat::CommonJs => String::from("'use strict';\n\n"),
    };

    chunk.push_str("var __modules = [\n");

    for code in modules {
        chunk.push_str(MODULE_PRELUDE);
        chunk.push_str(code);

        if !code.ends_with('\n') {
            chunk.push('\n');
        }

        chunk.push_str("},\n");
    }

    chunk.push_str("];\n\n");
    chunk.push_str(REQUIRE_FUNCTION);

    chunk.push_str(match options.exports {
        ExportMode::Auto => AUTO_EXPORT,
    });

    chunk
}
