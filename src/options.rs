#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Options {
    pub debug: bool,
    pub job_limit: Option<usize>,
    pub babel_command: Vec<String>,
    pub closure_command: Vec<String>,
}
