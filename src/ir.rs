mod build_target;
mod external_table;
mod mode_flags;
mod output_options;
mod pipeline;
mod stage_options;
mod warning;

pub use build_target::*;
pub use external_table::*;
pub use mode_flags::*;
pub use output_options::*;
pub use pipeline::*;
pub use stage_options::*;
pub use warning::*;
