use clap::Parser;

#[derive(Parser)]
#[clap(about = "Build tool for Outline packages", version)]
pub struct Arguments {
    #[clap(long, help = "Rebuild targets on changes")]
    pub watch: bool,
    #[clap(long, help = "Optimize outputs for production")]
    pub prod: bool,
    #[clap(long, help = "Build outputs for library deployment")]
    pub www: bool,
    #[clap(long, help = "Remove a distribution directory before build")]
    pub clean: bool,
    #[clap(short = 'C', help = "Set a source tree root")]
    pub directory: Option<String>,
    #[clap(short, help = "Set a job limit of external tools")]
    pub job_limit: Option<usize>,
    #[clap(
        long,
        help = "Set a syntax downgrade command",
        env = "OUTLINE_BUILD_BABEL",
        default_value = "npx babel"
    )]
    pub babel: String,
    #[clap(
        long,
        help = "Set an optimizer command",
        env = "OUTLINE_BUILD_CLOSURE",
        default_value = "npx google-closure-compiler"
    )]
    pub closure: String,
    #[clap(long, help = "Show debug logs", env = "OUTLINE_BUILD_DEBUG")]
    pub debug: bool,
}
